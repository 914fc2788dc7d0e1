//! Status and classification enums shared by every entity.
//!
//! Values are written in English snake_case. The French values written by
//! earlier versions of the application are accepted on read (serde aliases
//! and `FromStr`), so old backups keep importing.

use crate::error::CoreError;

macro_rules! define_string_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $wire:literal $(| $alias:literal)* => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire $(, alias = $alias)*)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The persisted string value.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $wire ),+
                }
            }

            /// French display label.
            pub fn label(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $wire $(| $alias)* => Ok($name::$variant), )+
                    other => Err(CoreError::Validation(format!(
                        "Invalid {} '{other}'. Must be one of: {}",
                        stringify!($name),
                        [$($wire),+].join(", ")
                    ))),
                }
            }
        }
    };
}

define_string_enum! {
    /// Project lifecycle status.
    ProjectStatus {
        Pending = "pending" | "en_attente" => "En attente",
        InProgress = "in_progress" | "en_cours" => "En cours",
        Done = "done" | "termine" => "Terminé",
    }
}

define_string_enum! {
    /// Kind of housing unit inside a block.
    ApartmentType {
        Apartment = "apartment" | "appartement" => "Appartement",
        Villa = "villa" => "Villa",
        Studio = "studio" => "Studio",
        Duplex = "duplex" => "Duplex",
    }
}

define_string_enum! {
    /// Commercial status of a housing unit.
    ApartmentStatus {
        Free = "free" | "libre" => "Libre",
        Reserved = "reserved" | "reserve" => "Réservé",
        Sold = "sold" | "vendu" => "Vendu",
    }
}

define_string_enum! {
    /// Stored contractor status. Expiry is also derived from the contract
    /// end date, see [`crate::models::contractor::Contractor::effective_status`].
    ContractorStatus {
        Active = "active" | "actif" => "Actif",
        Expired = "expired" | "expire" => "Expiré",
        Suspended = "suspended" | "suspendu" => "Suspendu",
    }
}

define_string_enum! {
    /// Reserve (punch-list item) lifecycle status.
    ReserveStatus {
        Open = "open" | "ouverte" => "Ouverte",
        InProgress = "in_progress" | "en_cours" => "En cours",
        Resolved = "resolved" | "resolue" => "Résolue",
    }
}

define_string_enum! {
    /// Planning task status.
    TaskStatus {
        Pending = "pending" | "en_attente" => "En attente",
        InProgress = "in_progress" | "en_cours" => "En cours",
        Done = "done" | "termine" => "Terminé",
    }
}

define_string_enum! {
    /// Priority shared by reserves and tasks.
    Priority {
        Urgent = "urgent" => "Urgent",
        Normal = "normal" => "Normal",
        Low = "low" | "faible" => "Faible",
    }
}

impl ReserveStatus {
    /// Position along the lifecycle. Transitions never decrease it.
    pub fn stage(self) -> u8 {
        match self {
            ReserveStatus::Open => 0,
            ReserveStatus::InProgress => 1,
            ReserveStatus::Resolved => 2,
        }
    }

    /// Resolved is the only terminal state.
    pub fn is_terminal(self) -> bool {
        self == ReserveStatus::Resolved
    }
}

impl Priority {
    /// Sort rank: urgent first, low last.
    pub fn rank(self) -> u8 {
        match self {
            Priority::Urgent => 0,
            Priority::Normal => 1,
            Priority::Low => 2,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_values_round_trip() {
        let json = serde_json::to_string(&ReserveStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        let back: ReserveStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ReserveStatus::InProgress);
    }

    #[test]
    fn french_aliases_are_accepted() {
        let s: ReserveStatus = serde_json::from_str("\"ouverte\"").unwrap();
        assert_eq!(s, ReserveStatus::Open);
        let p: Priority = serde_json::from_str("\"faible\"").unwrap();
        assert_eq!(p, Priority::Low);
        let t: ApartmentType = serde_json::from_str("\"appartement\"").unwrap();
        assert_eq!(t, ApartmentType::Apartment);
        let c: ContractorStatus = serde_json::from_str("\"actif\"").unwrap();
        assert_eq!(c, ContractorStatus::Active);
    }

    #[test]
    fn from_str_rejects_unknown_value() {
        let err = "cancelled".parse::<ReserveStatus>().unwrap_err();
        assert!(err.to_string().contains("open, in_progress, resolved"));
    }

    #[test]
    fn from_str_accepts_alias() {
        assert_eq!("termine".parse::<TaskStatus>().unwrap(), TaskStatus::Done);
    }

    #[test]
    fn priority_rank_orders_urgent_first() {
        assert!(Priority::Urgent.rank() < Priority::Normal.rank());
        assert!(Priority::Normal.rank() < Priority::Low.rank());
    }

    #[test]
    fn reserve_stage_is_monotonic_along_lifecycle() {
        assert!(ReserveStatus::Open.stage() < ReserveStatus::InProgress.stage());
        assert!(ReserveStatus::InProgress.stage() < ReserveStatus::Resolved.stage());
        assert!(ReserveStatus::Resolved.is_terminal());
        assert!(!ReserveStatus::Open.is_terminal());
    }

    #[test]
    fn labels_are_french() {
        assert_eq!(Priority::Low.label(), "Faible");
        assert_eq!(ReserveStatus::Resolved.label(), "Résolue");
    }
}

//! Display-name resolution for foreign keys.
//!
//! References are never enforced, so every lookup has a fallback label
//! instead of an error.

use crate::models::{Apartment, Block, Category, Contractor, Project};

pub const UNKNOWN_PROJECT: &str = "Projet inconnu";
pub const UNKNOWN_BLOCK: &str = "Bloc inconnu";
pub const UNKNOWN_APARTMENT: &str = "Appartement inconnu";
pub const UNKNOWN_CATEGORY: &str = "Catégorie inconnue";
pub const UNKNOWN_CONTRACTOR: &str = "Sous-traitant inconnu";

/// Records addressable by id.
pub trait Identified {
    fn id(&self) -> &str;
}

macro_rules! impl_identified {
    ($($ty:ty),+) => {
        $(impl Identified for $ty {
            fn id(&self) -> &str {
                &self.id
            }
        })+
    };
}

impl_identified!(
    Project,
    Block,
    Apartment,
    Category,
    Contractor,
    crate::models::Reserve,
    crate::models::Task,
    crate::models::Reception,
    crate::models::Notification
);

/// Linear search by id.
pub fn find_by_id<'a, T: Identified>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|item| item.id() == id)
}

pub fn project_name<'a>(projects: &'a [Project], id: &str) -> &'a str {
    find_by_id(projects, id).map_or(UNKNOWN_PROJECT, |p| p.name.as_str())
}

pub fn block_name<'a>(blocks: &'a [Block], id: &str) -> &'a str {
    find_by_id(blocks, id).map_or(UNKNOWN_BLOCK, |b| b.name.as_str())
}

pub fn apartment_number<'a>(apartments: &'a [Apartment], id: &str) -> &'a str {
    find_by_id(apartments, id).map_or(UNKNOWN_APARTMENT, |a| a.number.as_str())
}

pub fn category_name<'a>(categories: &'a [Category], id: &str) -> &'a str {
    find_by_id(categories, id).map_or(UNKNOWN_CATEGORY, |c| c.name.as_str())
}

pub fn contractor_name<'a>(contractors: &'a [Contractor], id: &str) -> &'a str {
    find_by_id(contractors, id).map_or(UNKNOWN_CONTRACTOR, |c| c.name.as_str())
}

/// Label for an optional block reference; `None` stays empty.
pub fn optional_block_name<'a>(blocks: &'a [Block], id: Option<&str>) -> &'a str {
    id.map_or("", |id| block_name(blocks, id))
}

/// Label for an optional apartment reference; `None` stays empty.
pub fn optional_apartment_number<'a>(apartments: &'a [Apartment], id: Option<&str>) -> &'a str {
    id.map_or("", |id| apartment_number(apartments, id))
}

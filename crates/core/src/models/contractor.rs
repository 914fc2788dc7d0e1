//! Contractor (subcontractor) entity model and DTOs.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::status::ContractorStatus;
use crate::types::{serde_date, Date, EntityId, Timestamp};

/// A subcontractor hired on one project for one or more categories of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contractor {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub specialty: String,
    pub project_id: EntityId,
    #[serde(default)]
    pub category_ids: Vec<EntityId>,
    #[serde(with = "serde_date")]
    pub contract_start: Date,
    #[serde(with = "serde_date")]
    pub contract_end: Date,
    pub status: ContractorStatus,
    pub created_at: Timestamp,
}

/// DTO for creating a new contractor.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_contract_dates"))]
pub struct CreateContractor {
    #[validate(length(min = 1, message = "Contractor name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub specialty: String,
    #[validate(length(min = 1, message = "Project is required"))]
    pub project_id: EntityId,
    #[serde(default)]
    pub category_ids: Vec<EntityId>,
    #[serde(with = "serde_date")]
    pub contract_start: Date,
    #[serde(with = "serde_date")]
    pub contract_end: Date,
    /// Defaults to `active` if omitted.
    pub status: Option<ContractorStatus>,
}

fn validate_contract_dates(input: &CreateContractor) -> Result<(), ValidationError> {
    if input.contract_end < input.contract_start {
        let mut err = ValidationError::new("date_order");
        err.message = Some("Contract end must not be before contract start".into());
        return Err(err);
    }
    Ok(())
}

/// DTO for updating an existing contractor. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateContractor {
    #[validate(length(min = 1, message = "Contractor name must not be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub specialty: Option<String>,
    pub project_id: Option<EntityId>,
    pub category_ids: Option<Vec<EntityId>>,
    pub contract_start: Option<Date>,
    pub contract_end: Option<Date>,
    pub status: Option<ContractorStatus>,
}

impl Contractor {
    pub fn from_create(input: &CreateContractor, id: EntityId, now: Timestamp) -> Self {
        let mut category_ids = Vec::with_capacity(input.category_ids.len());
        for cid in &input.category_ids {
            if !category_ids.contains(cid) {
                category_ids.push(cid.clone());
            }
        }
        Self {
            id,
            name: input.name.trim().to_string(),
            email: input.email.clone().unwrap_or_default(),
            phone: input.phone.clone(),
            specialty: input.specialty.clone(),
            project_id: input.project_id.clone(),
            category_ids,
            contract_start: input.contract_start,
            contract_end: input.contract_end,
            status: input.status.unwrap_or(ContractorStatus::Active),
            created_at: now,
        }
    }

    /// The contract end date has passed.
    pub fn is_expired(&self, today: Date) -> bool {
        self.contract_end < today
    }

    /// Status as displayed: an elapsed contract reads as expired regardless
    /// of the stored value, except for suspended contractors.
    pub fn effective_status(&self, today: Date) -> ContractorStatus {
        match self.status {
            ContractorStatus::Suspended => ContractorStatus::Suspended,
            _ if self.is_expired(today) => ContractorStatus::Expired,
            stored => stored,
        }
    }

    /// Whole days left on the contract (negative once expired).
    pub fn days_until_expiration(&self, today: Date) -> i64 {
        (self.contract_end - today).num_days()
    }

    pub fn works_in(&self, category_id: &str) -> bool {
        self.category_ids.iter().any(|c| c == category_id)
    }
}

impl UpdateContractor {
    pub fn apply(&self, contractor: &mut Contractor) {
        if let Some(name) = &self.name {
            contractor.name = name.trim().to_string();
        }
        if let Some(email) = &self.email {
            contractor.email = email.clone();
        }
        if let Some(phone) = &self.phone {
            contractor.phone = phone.clone();
        }
        if let Some(specialty) = &self.specialty {
            contractor.specialty = specialty.clone();
        }
        if let Some(project_id) = &self.project_id {
            contractor.project_id = project_id.clone();
        }
        if let Some(category_ids) = &self.category_ids {
            contractor.category_ids.clear();
            for cid in category_ids {
                if !contractor.category_ids.contains(cid) {
                    contractor.category_ids.push(cid.clone());
                }
            }
        }
        if let Some(start) = self.contract_start {
            contractor.contract_start = start;
        }
        if let Some(end) = self.contract_end {
            contractor.contract_end = end;
        }
        if let Some(status) = self.status {
            contractor.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create() -> CreateContractor {
        CreateContractor {
            name: "Électricité Moderne".into(),
            email: Some("contact@elec.fr".into()),
            phone: "01 23 45 67 89".into(),
            specialty: "Électricité".into(),
            project_id: "proj1".into(),
            category_ids: vec!["cat1".into(), "cat1".into(), "cat2".into()],
            contract_start: "2024-01-01".parse().unwrap(),
            contract_end: "2024-12-31".parse().unwrap(),
            status: None,
        }
    }

    fn day(s: &str) -> Date {
        s.parse().unwrap()
    }

    #[test]
    fn category_ids_are_deduplicated() {
        let c = Contractor::from_create(&create(), "c1".into(), chrono::Utc::now());
        assert_eq!(c.category_ids, vec!["cat1".to_string(), "cat2".to_string()]);
        assert!(c.works_in("cat2"));
        assert!(!c.works_in("cat3"));
    }

    #[test]
    fn invalid_email_is_rejected() {
        let mut input = create();
        input.email = Some("not-an-email".into());
        assert!(input.validate().is_err());
    }

    #[test]
    fn contract_end_before_start_is_rejected() {
        let mut input = create();
        input.contract_end = day("2023-06-01");
        assert!(input.validate().is_err());
    }

    #[test]
    fn expiry_is_derived_from_contract_end() {
        let c = Contractor::from_create(&create(), "c1".into(), chrono::Utc::now());
        assert!(!c.is_expired(day("2024-12-31")));
        assert!(c.is_expired(day("2025-01-01")));
        assert_eq!(c.effective_status(day("2025-01-01")), ContractorStatus::Expired);
        assert_eq!(c.effective_status(day("2024-06-01")), ContractorStatus::Active);
        assert_eq!(c.days_until_expiration(day("2024-12-01")), 30);
    }

    #[test]
    fn suspended_stays_suspended_after_expiry() {
        let mut c = Contractor::from_create(&create(), "c1".into(), chrono::Utc::now());
        c.status = ContractorStatus::Suspended;
        assert_eq!(c.effective_status(day("2026-01-01")), ContractorStatus::Suspended);
    }
}

//! Dashboard counters.

use serde::Serialize;

use crate::models::{Apartment, Block, Contractor, Project, Reserve, Task};
use crate::reserve_lifecycle::sort_reserves;
use crate::status::{ContractorStatus, Priority, ProjectStatus, ReserveStatus, TaskStatus};
use crate::types::{Date, EntityId};

/// Urgent reserves listed on the dashboard.
pub const URGENT_PREVIEW_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_projects: usize,
    pub active_projects: usize,
    pub open_reserves: usize,
    pub urgent_reserves: usize,
    pub active_tasks: usize,
    /// Still marked active although the contract end has passed.
    pub expired_contracts: usize,
}

fn is_open_urgent(r: &Reserve) -> bool {
    r.status == ReserveStatus::Open && r.priority == Priority::Urgent
}

pub fn dashboard_stats(
    projects: &[Project],
    reserves: &[Reserve],
    tasks: &[Task],
    contractors: &[Contractor],
    today: Date,
) -> DashboardStats {
    DashboardStats {
        total_projects: projects.len(),
        active_projects: projects
            .iter()
            .filter(|p| p.status == ProjectStatus::InProgress)
            .count(),
        open_reserves: reserves
            .iter()
            .filter(|r| r.status == ReserveStatus::Open)
            .count(),
        urgent_reserves: reserves.iter().filter(|r| is_open_urgent(r)).count(),
        active_tasks: tasks
            .iter()
            .filter(|t| t.status == TaskStatus::InProgress)
            .count(),
        expired_contracts: contractors
            .iter()
            .filter(|c| c.status == ContractorStatus::Active && c.is_expired(today))
            .count(),
    }
}

/// Oldest open urgent reserves, at most [`URGENT_PREVIEW_LIMIT`].
pub fn urgent_preview(reserves: &[Reserve]) -> Vec<&Reserve> {
    let mut urgent: Vec<&Reserve> = reserves.iter().filter(|r| is_open_urgent(r)).collect();
    sort_reserves(&mut urgent);
    urgent.truncate(URGENT_PREVIEW_LIMIT);
    urgent
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub project_id: EntityId,
    pub block_count: usize,
    pub apartment_count: usize,
    pub open_reserve_count: usize,
}

/// Per-project structure counts, in project order.
pub fn project_summaries(
    projects: &[Project],
    blocks: &[Block],
    apartments: &[Apartment],
    reserves: &[Reserve],
) -> Vec<ProjectSummary> {
    projects
        .iter()
        .map(|p| ProjectSummary {
            project_id: p.id.clone(),
            block_count: blocks.iter().filter(|b| b.project_id == p.id).count(),
            apartment_count: apartments.iter().filter(|a| a.project_id == p.id).count(),
            open_reserve_count: reserves
                .iter()
                .filter(|r| r.project_id == p.id && r.is_pending())
                .count(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::ApartmentStatus;
    use crate::status::ApartmentType;
    use chrono::Utc;

    fn day(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn project(id: &str, status: ProjectStatus) -> Project {
        Project {
            id: id.into(),
            name: id.into(),
            description: String::new(),
            start_date: day("2024-01-01"),
            end_date: day("2024-12-31"),
            status,
            created_at: Utc::now(),
        }
    }

    fn reserve(id: &str, status: ReserveStatus, priority: Priority) -> Reserve {
        Reserve {
            id: id.into(),
            project_id: "p1".into(),
            block_id: None,
            apartment_id: None,
            category_id: "c1".into(),
            contractor_id: "k1".into(),
            title: id.into(),
            description: String::new(),
            images: vec![],
            status,
            priority,
            created_at: Utc::now(),
            resolved_at: None,
            resolution_notes: None,
        }
    }

    fn contractor(end: &str, status: ContractorStatus) -> Contractor {
        Contractor {
            id: end.into(),
            name: end.into(),
            email: String::new(),
            phone: String::new(),
            specialty: String::new(),
            project_id: "p1".into(),
            category_ids: vec![],
            contract_start: day("2023-01-01"),
            contract_end: day(end),
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn counts_match_definitions() {
        let projects = vec![
            project("p1", ProjectStatus::InProgress),
            project("p2", ProjectStatus::Pending),
        ];
        let reserves = vec![
            reserve("r1", ReserveStatus::Open, Priority::Urgent),
            reserve("r2", ReserveStatus::InProgress, Priority::Urgent),
            reserve("r3", ReserveStatus::Open, Priority::Low),
        ];
        let contractors = vec![
            contractor("2024-01-01", ContractorStatus::Active),
            contractor("2024-01-01", ContractorStatus::Suspended),
            contractor("2025-01-01", ContractorStatus::Active),
        ];
        let stats = dashboard_stats(&projects, &reserves, &[], &contractors, day("2024-06-01"));
        assert_eq!(
            stats,
            DashboardStats {
                total_projects: 2,
                active_projects: 1,
                open_reserves: 2,
                urgent_reserves: 1,
                active_tasks: 0,
                expired_contracts: 1,
            }
        );
        assert_eq!(urgent_preview(&reserves).len(), 1);
    }

    #[test]
    fn summaries_count_structure_per_project() {
        let projects = vec![project("p1", ProjectStatus::InProgress)];
        let blocks = vec![Block {
            id: "b1".into(),
            project_id: "p1".into(),
            name: "A".into(),
            description: String::new(),
            created_at: Utc::now(),
        }];
        let apartments = vec![Apartment {
            id: "a1".into(),
            block_id: "b1".into(),
            project_id: "p1".into(),
            number: "A1".into(),
            kind: ApartmentType::Studio,
            surface: 30.0,
            status: ApartmentStatus::Free,
            created_at: Utc::now(),
        }];
        let summaries = project_summaries(&projects, &blocks, &apartments, &[]);
        assert_eq!(summaries[0].block_count, 1);
        assert_eq!(summaries[0].apartment_count, 1);
        assert_eq!(summaries[0].open_reserve_count, 0);
    }
}

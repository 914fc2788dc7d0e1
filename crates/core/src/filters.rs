//! Cascading filters between projects, categories and contractors.
//!
//! Each `available_*` function narrows one selector given the others. All of
//! them are single passes over the input slices and keep collection order.
//!
//! Note the asymmetry: categories and projects are the UNION of what each
//! present selector allows, while contractors are the INTERSECTION.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::lookup::find_by_id;
use crate::models::{Apartment, Block, Category, Contractor, Project, Reserve, Task};
use crate::status::{Priority, ReserveStatus, TaskStatus};
use crate::types::EntityId;

// ---------------------------------------------------------------------------
// Cascades
// ---------------------------------------------------------------------------

/// Categories offered once a project and/or contractor is chosen.
///
/// - project: categories used by at least one reserve of that project;
/// - contractor: the contractor's own categories;
/// - both: union of the two.
pub fn available_categories<'a>(
    categories: &'a [Category],
    reserves: &[Reserve],
    contractors: &[Contractor],
    project_id: Option<&str>,
    contractor_id: Option<&str>,
) -> Vec<&'a Category> {
    if project_id.is_none() && contractor_id.is_none() {
        return categories.iter().collect();
    }

    let mut allowed: HashSet<&str> = HashSet::new();
    if let Some(pid) = project_id {
        allowed.extend(
            reserves
                .iter()
                .filter(|r| r.project_id == pid)
                .map(|r| r.category_id.as_str()),
        );
    }
    if let Some(cid) = contractor_id {
        if let Some(contractor) = find_by_id(contractors, cid) {
            allowed.extend(contractor.category_ids.iter().map(String::as_str));
        }
    }

    categories
        .iter()
        .filter(|c| allowed.contains(c.id.as_str()))
        .collect()
}

/// Contractors matching every present selector.
pub fn available_contractors<'a>(
    contractors: &'a [Contractor],
    project_id: Option<&str>,
    category_id: Option<&str>,
) -> Vec<&'a Contractor> {
    contractors
        .iter()
        .filter(|c| project_id.map_or(true, |pid| c.project_id == pid))
        .filter(|c| category_id.map_or(true, |cid| c.works_in(cid)))
        .collect()
}

/// Projects offered once a category and/or contractor is chosen.
///
/// - category: projects with at least one reserve in that category;
/// - contractor: the contractor's project;
/// - both: union of the two.
pub fn available_projects<'a>(
    projects: &'a [Project],
    reserves: &[Reserve],
    contractors: &[Contractor],
    category_id: Option<&str>,
    contractor_id: Option<&str>,
) -> Vec<&'a Project> {
    if category_id.is_none() && contractor_id.is_none() {
        return projects.iter().collect();
    }

    let mut allowed: HashSet<&str> = HashSet::new();
    if let Some(cid) = category_id {
        allowed.extend(
            reserves
                .iter()
                .filter(|r| r.category_id == cid)
                .map(|r| r.project_id.as_str()),
        );
    }
    if let Some(kid) = contractor_id {
        if let Some(contractor) = find_by_id(contractors, kid) {
            allowed.insert(contractor.project_id.as_str());
        }
    }

    projects
        .iter()
        .filter(|p| allowed.contains(p.id.as_str()))
        .collect()
}

pub fn blocks_for_project<'a>(blocks: &'a [Block], project_id: &str) -> Vec<&'a Block> {
    blocks.iter().filter(|b| b.project_id == project_id).collect()
}

pub fn apartments_for_block<'a>(apartments: &'a [Apartment], block_id: &str) -> Vec<&'a Apartment> {
    apartments.iter().filter(|a| a.block_id == block_id).collect()
}

// ---------------------------------------------------------------------------
// Reception form selection
// ---------------------------------------------------------------------------

/// Selector state of the reception form, with its reset rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSelection {
    pub project_id: Option<EntityId>,
    pub block_ids: Vec<EntityId>,
    pub category_id: Option<EntityId>,
    pub contractor_id: Option<EntityId>,
}

impl FilterSelection {
    /// Changing project clears the block selection.
    pub fn select_project(&mut self, project_id: Option<EntityId>) {
        self.project_id = project_id;
        self.block_ids.clear();
    }

    /// Add or remove a block.
    pub fn toggle_block(&mut self, block_id: &str) {
        if let Some(pos) = self.block_ids.iter().position(|b| b == block_id) {
            self.block_ids.remove(pos);
        } else {
            self.block_ids.push(block_id.to_string());
        }
    }

    /// Choosing a category drops a contractor that does not work in it.
    pub fn select_category(&mut self, contractors: &[Contractor], category_id: Option<EntityId>) {
        if let (Some(cid), Some(kid)) = (category_id.as_deref(), self.contractor_id.as_deref()) {
            if let Some(contractor) = find_by_id(contractors, kid) {
                if !contractor.works_in(cid) {
                    self.contractor_id = None;
                }
            }
        }
        self.category_id = category_id;
    }

    /// Choosing a contractor selects its first category, if it has any.
    pub fn select_contractor(&mut self, contractors: &[Contractor], contractor_id: Option<EntityId>) {
        if let Some(kid) = contractor_id.as_deref() {
            if let Some(first) = find_by_id(contractors, kid).and_then(|c| c.category_ids.first()) {
                self.category_id = Some(first.clone());
            }
        }
        self.contractor_id = contractor_id;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ---------------------------------------------------------------------------
// List filters
// ---------------------------------------------------------------------------

/// Reserve list filter. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReserveFilter {
    pub status: Option<ReserveStatus>,
    pub priority: Option<Priority>,
    pub project_id: Option<EntityId>,
    pub category_id: Option<EntityId>,
    pub contractor_id: Option<EntityId>,
}

impl ReserveFilter {
    pub fn matches(&self, reserve: &Reserve) -> bool {
        self.status.map_or(true, |s| reserve.status == s)
            && self.priority.map_or(true, |p| reserve.priority == p)
            && self
                .project_id
                .as_deref()
                .map_or(true, |id| reserve.project_id == id)
            && self
                .category_id
                .as_deref()
                .map_or(true, |id| reserve.category_id == id)
            && self
                .contractor_id
                .as_deref()
                .map_or(true, |id| reserve.contractor_id == id)
    }

    pub fn apply<'a>(&self, reserves: &'a [Reserve]) -> Vec<&'a Reserve> {
        reserves.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Task list filter. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub project_id: Option<EntityId>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        self.status.map_or(true, |s| task.status == s)
            && self.priority.map_or(true, |p| task.priority == p)
            && self
                .project_id
                .as_deref()
                .map_or(true, |id| task.project_id == id)
    }

    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t)).collect()
    }
}

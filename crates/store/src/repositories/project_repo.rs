//! Repository for the `projects` collection.

use validator::Validate;

use chantier_core::error::CoreError;
use chantier_core::models::{CreateProject, Project, UpdateProject};
use chantier_core::types::new_id;

use super::{check_date_order, fetch, put, remove};
use crate::error::StoreResult;
use crate::store::Store;

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Validate and insert a new project.
    pub fn create(store: &mut Store, input: &CreateProject) -> StoreResult<Project> {
        input.validate()?;
        let project = Project::from_create(input, new_id(), store.now());
        store.update_projects(|items| items.push(project.clone()));
        tracing::info!(project_id = %project.id, name = %project.name, "Project created");
        Ok(project)
    }

    pub fn list(store: &Store) -> &[Project] {
        store.projects()
    }

    pub fn find_by_id<'a>(store: &'a Store, id: &str) -> Option<&'a Project> {
        chantier_core::lookup::find_by_id(store.projects(), id)
    }

    /// Apply a partial update. The resulting date range must stay ordered.
    pub fn update(store: &mut Store, id: &str, input: &UpdateProject) -> StoreResult<Project> {
        input.validate()?;
        let mut project = fetch(store.projects(), "Project", id)?;
        input.apply(&mut project);
        check_date_order(project.start_date, project.end_date, "Project")?;
        store.update_projects(|items| put(items, project.clone()));
        tracing::info!(project_id = %id, "Project updated");
        Ok(project)
    }

    /// Delete a project. Blocks, reserves and other records that reference
    /// it are left in place.
    pub fn delete(store: &mut Store, id: &str) -> StoreResult<()> {
        if !store.try_update_projects(|items| remove(items, id)) {
            return Err(CoreError::not_found("Project", id).into());
        }
        tracing::info!(project_id = %id, "Project deleted");
        Ok(())
    }
}

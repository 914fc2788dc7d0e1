//! Read-only projections over the whole store: dashboard, search, cascading
//! filter options and CSV exports.

use chantier_core::csv;
use chantier_core::dashboard::{self, DashboardStats, ProjectSummary};
use chantier_core::filters::{self, FilterSelection, ReserveFilter, TaskFilter};
use chantier_core::models::{Category, Contractor, Project, Reserve};
use chantier_core::planning;
use chantier_core::search::{self, SearchContext, SearchSuggestion};

use crate::store::Store;

pub fn dashboard_stats(store: &Store) -> DashboardStats {
    dashboard::dashboard_stats(
        store.projects(),
        store.reserves(),
        store.tasks(),
        store.contractors(),
        store.today(),
    )
}

pub fn urgent_preview(store: &Store) -> Vec<&Reserve> {
    dashboard::urgent_preview(store.reserves())
}

pub fn project_summaries(store: &Store) -> Vec<ProjectSummary> {
    dashboard::project_summaries(
        store.projects(),
        store.blocks(),
        store.apartments(),
        store.reserves(),
    )
}

pub fn search(store: &Store, query: &str) -> Vec<SearchSuggestion> {
    let ctx = SearchContext {
        projects: store.projects(),
        blocks: store.blocks(),
        apartments: store.apartments(),
        categories: store.categories(),
        reserves: store.reserves(),
    };
    search::suggestions(&ctx, query)
}

// ---------------------------------------------------------------------------
// Cascading selectors
// ---------------------------------------------------------------------------

/// Options offered by the three linked selectors for the current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOptions<'a> {
    pub projects: Vec<&'a Project>,
    pub categories: Vec<&'a Category>,
    pub contractors: Vec<&'a Contractor>,
}

pub fn filter_options<'a>(store: &'a Store, selection: &FilterSelection) -> FilterOptions<'a> {
    let project = selection.project_id.as_deref();
    let category = selection.category_id.as_deref();
    let contractor = selection.contractor_id.as_deref();
    FilterOptions {
        projects: filters::available_projects(
            store.projects(),
            store.reserves(),
            store.contractors(),
            category,
            contractor,
        ),
        categories: filters::available_categories(
            store.categories(),
            store.reserves(),
            store.contractors(),
            project,
            contractor,
        ),
        contractors: filters::available_contractors(store.contractors(), project, category),
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// `(filename, content)` of the reserve export for `filter`.
pub fn reserves_export(store: &Store, filter: &ReserveFilter) -> (String, String) {
    let rows = filter.apply(store.reserves());
    let body = csv::reserves_csv(&rows, store.projects(), store.blocks(), store.apartments());
    tracing::info!(rows = rows.len(), "Reserves exported to CSV");
    (csv::RESERVES_EXPORT_FILENAME.to_string(), body)
}

/// `(filename, content)` of the planning export, in view order.
pub fn planning_export(store: &Store, filter: &TaskFilter) -> (String, String) {
    let rows = planning::task_view(store.tasks(), filter);
    let body = csv::tasks_csv(&rows, store.projects());
    tracing::info!(rows = rows.len(), "Planning exported to CSV");
    (csv::planning_export_filename(store.today()), body)
}

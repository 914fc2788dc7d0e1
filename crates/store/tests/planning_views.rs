//! Integration tests for planning and the read-only views over the demo
//! dataset.

use chantier_core::csv::parse_csv;
use chantier_core::filters::{FilterSelection, TaskFilter};
use chantier_core::planning::{BarColor, MoveDirection, TimeScale};
use chantier_core::status::Priority;
use chantier_store::repositories::TaskRepo;
use chantier_store::seed::load_demo_data;
use chantier_store::{views, FixedClock, MemoryBackend, Store};

fn demo_store_at(instant: &str) -> Store {
    let mut store = Store::open(Box::new(MemoryBackend::new()))
        .with_clock(FixedClock(instant.parse().unwrap()));
    load_demo_data(&mut store).unwrap();
    store
}

fn view_ids(store: &Store, filter: &TaskFilter) -> Vec<String> {
    TaskRepo::view(store, filter)
        .into_iter()
        .map(|t| t.id.clone())
        .collect()
}

// -- planning ----------------------------------------------------------------

#[test]
fn moving_second_task_up_swaps_with_first() {
    let mut store = demo_store_at("2024-03-01T08:00:00Z");
    let all = TaskFilter::default();
    assert_eq!(view_ids(&store, &all), ["task1", "task3", "task2", "task4"]);

    assert!(TaskRepo::move_task(&mut store, &all, "task3", MoveDirection::Up).unwrap());
    assert_eq!(view_ids(&store, &all), ["task3", "task1", "task2", "task4"]);

    let by_id = |id: &str| store.tasks().iter().find(|t| t.id == id).unwrap().priority;
    assert_eq!(by_id("task3"), Priority::Urgent);
    assert_eq!(by_id("task1"), Priority::Normal);
}

#[test]
fn moves_stay_inside_the_filtered_view() {
    let mut store = demo_store_at("2024-03-01T08:00:00Z");
    let proj2 = TaskFilter {
        project_id: Some("proj2".into()),
        ..Default::default()
    };
    assert!(!TaskRepo::move_task(&mut store, &proj2, "task1", MoveDirection::Down).unwrap());
    assert!(!TaskRepo::move_task(&mut store, &proj2, "task2", MoveDirection::Up).unwrap());
    assert!(TaskRepo::move_task(&mut store, &proj2, "task2", MoveDirection::Down).unwrap());
    assert_eq!(view_ids(&store, &proj2), ["task4", "task2"]);
}

#[test]
fn monthly_gantt_over_demo_tasks() {
    let store = demo_store_at("2024-04-25T08:00:00Z");
    let chart = TaskRepo::gantt(&store, &TaskFilter::default(), TimeScale::Month);

    assert_eq!(chart.units.first(), Some(&"2024-02-01".parse().unwrap()));
    assert_eq!(chart.units.len(), 5);
    assert_eq!(chart.rows.len(), 4);

    let color = |id: &str| chart.rows.iter().find(|r| r.task_id == id).unwrap().color;
    assert_eq!(color("task1"), BarColor::Overdue);
    assert_eq!(color("task3"), BarColor::Overdue);
    assert_eq!(color("task2"), BarColor::Pending);
}

#[test]
fn planning_csv_follows_view_order() {
    let store = demo_store_at("2024-03-01T08:00:00Z");
    let (name, body) = views::planning_export(&store, &TaskFilter::default());
    assert_eq!(name, "planning_2024-03-01.csv");
    let rows = parse_csv(&body).unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[1][0], "Installation plomberie Bloc A");
    assert_eq!(rows[1][8], "65%");
}

// -- views -------------------------------------------------------------------

#[test]
fn dashboard_counts() {
    let store = demo_store_at("2025-01-15T08:00:00Z");
    let stats = views::dashboard_stats(&store);
    assert_eq!(stats.total_projects, 3);
    assert_eq!(stats.active_projects, 2);
    assert_eq!(stats.open_reserves, 2);
    assert_eq!(stats.urgent_reserves, 1);
    assert_eq!(stats.active_tasks, 1);
    assert_eq!(stats.expired_contracts, 3);
    assert_eq!(views::urgent_preview(&store)[0].id, "res1");

    let summaries = views::project_summaries(&store);
    assert_eq!(summaries[0].block_count, 3);
    assert_eq!(summaries[0].apartment_count, 4);
}

#[test]
fn search_is_case_insensitive() {
    let store = demo_store_at("2024-03-01T08:00:00Z");
    let hits = views::search(&store, "BLOC");
    assert_eq!(hits.len(), 3);
    assert!(views::search(&store, "   ").is_empty());
}

#[test]
fn selecting_a_project_narrows_categories_and_contractors() {
    let store = demo_store_at("2024-03-01T08:00:00Z");
    let mut selection = FilterSelection::default();
    selection.select_project(Some("proj1".into()));

    let options = views::filter_options(&store, &selection);
    let cats: Vec<&str> = options.categories.iter().map(|c| c.id.as_str()).collect();
    let conts: Vec<&str> = options.contractors.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(cats, ["cat1", "cat2", "cat4"]);
    assert_eq!(conts, ["cont1", "cont2", "cont4"]);
    assert_eq!(options.projects.len(), 3);
}

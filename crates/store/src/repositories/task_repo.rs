//! Repository for the `tasks` collection (planning).

use validator::Validate;

use chantier_core::error::CoreError;
use chantier_core::filters::TaskFilter;
use chantier_core::models::{CreateTask, Task, UpdateTask};
use chantier_core::planning::{self, GanttChart, MoveDirection, TimeScale};
use chantier_core::types::new_id;

use super::{check_date_order, fetch, put, remove};
use crate::error::StoreResult;
use crate::store::Store;

/// Provides CRUD operations and planning views for tasks.
pub struct TaskRepo;

impl TaskRepo {
    pub fn create(store: &mut Store, input: &CreateTask) -> StoreResult<Task> {
        input.validate()?;
        let task = Task::from_create(input, new_id(), store.now());
        store.update_tasks(|items| items.push(task.clone()));
        tracing::info!(task_id = %task.id, project_id = %task.project_id, "Task created");
        Ok(task)
    }

    pub fn list(store: &Store) -> &[Task] {
        store.tasks()
    }

    /// Filtered tasks, urgent first then earliest end date.
    pub fn view<'a>(store: &'a Store, filter: &TaskFilter) -> Vec<&'a Task> {
        planning::task_view(store.tasks(), filter)
    }

    pub fn update(store: &mut Store, id: &str, input: &UpdateTask) -> StoreResult<Task> {
        input.validate()?;
        let mut task = fetch(store.tasks(), "Task", id)?;
        input.apply(&mut task);
        check_date_order(task.start_date, task.end_date, "Task")?;
        store.update_tasks(|items| put(items, task.clone()));
        tracing::info!(task_id = %id, "Task updated");
        Ok(task)
    }

    /// Set progress from a raw value, clamped into `0..=100`.
    pub fn set_progress(store: &mut Store, id: &str, raw: i64) -> StoreResult<Task> {
        let mut task = fetch(store.tasks(), "Task", id)?;
        task.progress = planning::clamp_progress(raw);
        store.update_tasks(|items| put(items, task.clone()));
        tracing::info!(task_id = %id, progress = task.progress, "Task progress set");
        Ok(task)
    }

    pub fn delete(store: &mut Store, id: &str) -> StoreResult<()> {
        if !store.try_update_tasks(|items| remove(items, id)) {
            return Err(CoreError::not_found("Task", id).into());
        }
        tracing::info!(task_id = %id, "Task deleted");
        Ok(())
    }

    /// Move a task one slot up or down in the filtered view.
    ///
    /// Returns `Ok(false)` when it is already at that edge of the view.
    pub fn move_task(
        store: &mut Store,
        filter: &TaskFilter,
        id: &str,
        direction: MoveDirection,
    ) -> StoreResult<bool> {
        fetch(store.tasks(), "Task", id)?;
        if !planning::task_view(store.tasks(), filter)
            .iter()
            .any(|t| t.id == id)
        {
            return Ok(false);
        }
        let moved =
            store.try_update_tasks(|items| planning::move_task(items, filter, id, direction));
        if moved {
            tracing::info!(task_id = %id, ?direction, "Task moved");
        }
        Ok(moved)
    }

    /// Gantt projection of the filtered tasks as of the store clock.
    pub fn gantt(store: &Store, filter: &TaskFilter, scale: TimeScale) -> GanttChart {
        planning::gantt(store.tasks(), filter, scale, store.today())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use crate::backend::{MemoryBackend, StorageBackend};
    use chantier_core::status::Priority;

    /// Memory backend that counts writes.
    #[derive(Default)]
    struct CountingBackend {
        inner: MemoryBackend,
        writes: Rc<Cell<usize>>,
    }

    impl StorageBackend for CountingBackend {
        fn get(&self, key: &str) -> StoreResult<Option<String>> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
            self.writes.set(self.writes.get() + 1);
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> StoreResult<()> {
            self.inner.remove(key)
        }

        fn keys(&self) -> StoreResult<Vec<String>> {
            self.inner.keys()
        }
    }

    fn input(title: &str, priority: Priority) -> CreateTask {
        CreateTask {
            title: title.into(),
            description: String::new(),
            project_id: "p1".into(),
            assigned_to: "Équipe A".into(),
            start_date: "2024-02-01".parse().unwrap(),
            end_date: "2024-02-10".parse().unwrap(),
            duration: 10,
            status: None,
            priority,
            progress: 0,
            dependencies: vec![],
        }
    }

    #[test]
    fn progress_is_clamped() {
        let mut store = Store::open(Box::new(MemoryBackend::new()));
        let t = TaskRepo::create(&mut store, &input("Coffrage", Priority::Normal)).unwrap();
        assert_eq!(TaskRepo::set_progress(&mut store, &t.id, 140).unwrap().progress, 100);
        assert_eq!(TaskRepo::set_progress(&mut store, &t.id, -5).unwrap().progress, 0);
    }

    #[test]
    fn moving_up_swaps_priorities() {
        let mut store = Store::open(Box::new(MemoryBackend::new()));
        let urgent = TaskRepo::create(&mut store, &input("Fondations", Priority::Urgent)).unwrap();
        let low = TaskRepo::create(&mut store, &input("Finitions", Priority::Low)).unwrap();
        let filter = TaskFilter::default();

        assert!(!TaskRepo::move_task(&mut store, &filter, &urgent.id, MoveDirection::Up).unwrap());
        assert!(TaskRepo::move_task(&mut store, &filter, &low.id, MoveDirection::Up).unwrap());
        let view = TaskRepo::view(&store, &filter);
        assert_eq!(view[0].id, low.id);
        assert_eq!(view[0].priority, Priority::Urgent);
    }

    #[test]
    fn noop_move_and_missing_delete_do_not_write() {
        let backend = CountingBackend::default();
        let writes = Rc::clone(&backend.writes);
        let mut store = Store::open(Box::new(backend));
        let urgent = TaskRepo::create(&mut store, &input("Fondations", Priority::Urgent)).unwrap();
        TaskRepo::create(&mut store, &input("Finitions", Priority::Low)).unwrap();
        let after_create = writes.get();

        let filter = TaskFilter::default();
        assert!(!TaskRepo::move_task(&mut store, &filter, &urgent.id, MoveDirection::Up).unwrap());
        assert!(TaskRepo::delete(&mut store, "ghost").is_err());
        assert_eq!(writes.get(), after_create);

        assert!(TaskRepo::move_task(&mut store, &filter, &urgent.id, MoveDirection::Down).unwrap());
        assert_eq!(writes.get(), after_create + 1);
    }
}

//! Task ordering and Gantt projection.

use chrono::{Datelike, Months};
use serde::{Deserialize, Serialize};

use crate::filters::TaskFilter;
use crate::models::task::MAX_PROGRESS;
use crate::models::Task;
use crate::status::TaskStatus;
use crate::types::{Date, EntityId};

/// Longest Gantt axis, in units.
pub const MAX_TIME_UNITS: usize = 100;

/// Narrowest bar, in percent of the axis.
pub const MIN_BAR_WIDTH_PCT: f64 = 2.0;

// ---------------------------------------------------------------------------
// Ordering
// ---------------------------------------------------------------------------

/// Priority rank, then earliest end date.
pub fn sort_tasks(tasks: &mut [&Task]) {
    tasks.sort_by(|a, b| {
        a.priority
            .rank()
            .cmp(&b.priority.rank())
            .then_with(|| a.end_date.cmp(&b.end_date))
    });
}

/// Filtered and sorted view of the task list.
pub fn task_view<'a>(tasks: &'a [Task], filter: &TaskFilter) -> Vec<&'a Task> {
    let mut view = filter.apply(tasks);
    sort_tasks(&mut view);
    view
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Move a task one slot in the current view by swapping its priority with
/// the neighbour's.
///
/// Returns `false` when the task is not in the view or already at the edge.
pub fn move_task(
    tasks: &mut [Task],
    filter: &TaskFilter,
    task_id: &str,
    direction: MoveDirection,
) -> bool {
    let view: Vec<EntityId> = task_view(tasks, filter)
        .into_iter()
        .map(|t| t.id.clone())
        .collect();
    let Some(index) = view.iter().position(|id| id == task_id) else {
        return false;
    };
    let neighbour = match direction {
        MoveDirection::Up if index > 0 => &view[index - 1],
        MoveDirection::Down if index + 1 < view.len() => &view[index + 1],
        _ => return false,
    };

    let (Some(a), Some(b)) = (
        tasks.iter().position(|t| t.id == task_id),
        tasks.iter().position(|t| &t.id == neighbour),
    ) else {
        return false;
    };
    let moved = tasks[a].priority;
    tasks[a].priority = tasks[b].priority;
    tasks[b].priority = moved;
    true
}

pub fn is_overdue(task: &Task, today: Date) -> bool {
    task.end_date < today && task.status != TaskStatus::Done
}

/// Clamp a raw progress value into `0..=100`.
pub fn clamp_progress(raw: i64) -> u8 {
    raw.clamp(0, i64::from(MAX_PROGRESS)) as u8
}

// ---------------------------------------------------------------------------
// Gantt
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeScale {
    Day,
    #[default]
    Month,
    Year,
}

impl TimeScale {
    /// First unit of an axis that has to cover `date`.
    pub fn align(self, date: Date) -> Date {
        match self {
            TimeScale::Day => date,
            TimeScale::Month => date.with_day(1).unwrap_or(date),
            TimeScale::Year => Date::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
        }
    }

    /// Start of the unit after the one starting at `unit_start`.
    pub fn next(self, unit_start: Date) -> Option<Date> {
        match self {
            TimeScale::Day => unit_start.succ_opt(),
            TimeScale::Month => unit_start.checked_add_months(Months::new(1)),
            TimeScale::Year => unit_start.checked_add_months(Months::new(12)),
        }
    }
}

/// Unit start dates covering every task, at most [`MAX_TIME_UNITS`].
///
/// With no tasks the axis is the single unit containing `today`.
pub fn time_units(tasks: &[&Task], scale: TimeScale, today: Date) -> Vec<Date> {
    let min = tasks.iter().map(|t| t.start_date.min(t.end_date)).min();
    let max = tasks.iter().map(|t| t.start_date.max(t.end_date)).max();
    let (min, max) = match (min, max) {
        (Some(min), Some(max)) => (min, max),
        _ => (today, today),
    };

    let mut units = Vec::new();
    let mut current = Some(scale.align(min));
    while let Some(unit) = current {
        if unit > max || units.len() >= MAX_TIME_UNITS {
            break;
        }
        units.push(unit);
        current = scale.next(unit);
    }
    units
}

/// Horizontal position of a task bar, in percent of the axis width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarPlacement {
    pub left_pct: f64,
    pub width_pct: f64,
}

/// Locate a task on the axis by unit containment.
///
/// A start before the axis lands on the first unit and an end past it on
/// the last.
pub fn bar_placement(task: &Task, units: &[Date], scale: TimeScale) -> BarPlacement {
    let total = units.len();
    if total == 0 {
        return BarPlacement {
            left_pct: 0.0,
            width_pct: 100.0,
        };
    }

    let contains = |unit: Date, date: Date| {
        date >= unit && scale.next(unit).map_or(true, |end| date < end)
    };
    let mut start_index = 0;
    let mut end_index = total - 1;
    for (i, &unit) in units.iter().enumerate() {
        if contains(unit, task.start_date) {
            start_index = i;
        }
        if contains(unit, task.end_date) {
            end_index = i;
        }
    }

    let span = end_index.saturating_sub(start_index) + 1;
    let left_pct = start_index as f64 / total as f64 * 100.0;
    let width_pct = span as f64 / total as f64 * 100.0;
    BarPlacement {
        left_pct,
        width_pct: width_pct.max(MIN_BAR_WIDTH_PCT),
    }
}

/// Bar colour class, first match wins: done, overdue, in progress, pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarColor {
    Done,
    Overdue,
    InProgress,
    Pending,
}

pub fn bar_color(task: &Task, today: Date) -> BarColor {
    if task.status == TaskStatus::Done {
        BarColor::Done
    } else if is_overdue(task, today) {
        BarColor::Overdue
    } else if task.status == TaskStatus::InProgress {
        BarColor::InProgress
    } else {
        BarColor::Pending
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GanttRow {
    pub task_id: EntityId,
    pub placement: BarPlacement,
    pub color: BarColor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GanttChart {
    pub scale: TimeScale,
    pub units: Vec<Date>,
    pub rows: Vec<GanttRow>,
}

/// Project the filtered, sorted task view onto a Gantt axis.
pub fn gantt(tasks: &[Task], filter: &TaskFilter, scale: TimeScale, today: Date) -> GanttChart {
    let view = task_view(tasks, filter);
    let units = time_units(&view, scale, today);
    let rows = view
        .iter()
        .map(|t| GanttRow {
            task_id: t.id.clone(),
            placement: bar_placement(t, &units, scale),
            color: bar_color(t, today),
        })
        .collect();
    GanttChart { scale, units, rows }
}

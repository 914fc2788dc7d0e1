//! Reserve status workflow.
//!
//! A reserve only moves forward: `open -> in_progress -> resolved`, with the
//! shortcut `open -> resolved`. `resolved_at` is set exactly when the status
//! is `resolved`.

use crate::error::CoreError;
use crate::models::Reserve;
use crate::status::ReserveStatus;
use crate::types::{Date, Timestamp};

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Statuses reachable from `from` in one step.
pub fn valid_transitions(from: ReserveStatus) -> &'static [ReserveStatus] {
    match from {
        ReserveStatus::Open => &[ReserveStatus::InProgress, ReserveStatus::Resolved],
        ReserveStatus::InProgress => &[ReserveStatus::Resolved],
        ReserveStatus::Resolved => &[],
    }
}

/// Validate a status write. Writing the current status again is accepted.
pub fn validate_transition(current: ReserveStatus, next: ReserveStatus) -> Result<(), CoreError> {
    if current == next || valid_transitions(current).contains(&next) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Cannot move reserve from '{current}' back to '{next}'"
        )))
    }
}

/// Generic status write, rejected when it would move backwards.
pub fn set_status(
    reserve: &mut Reserve,
    next: ReserveStatus,
    now: Timestamp,
) -> Result<(), CoreError> {
    validate_transition(reserve.status, next)?;
    if reserve.status == next {
        return Ok(());
    }
    reserve.status = next;
    if next == ReserveStatus::Resolved {
        reserve.resolved_at = Some(now);
    }
    Ok(())
}

/// `open -> in_progress`. Any other state is left alone.
///
/// Returns whether the reserve changed.
pub fn take_charge(reserve: &mut Reserve) -> bool {
    if reserve.status != ReserveStatus::Open {
        return false;
    }
    reserve.status = ReserveStatus::InProgress;
    true
}

/// Resolve an open or in-progress reserve, recording the notes.
///
/// Already resolved reserves are left alone. Returns whether the reserve
/// changed.
pub fn resolve(reserve: &mut Reserve, notes: Option<&str>, now: Timestamp) -> bool {
    if reserve.status.is_terminal() {
        return false;
    }
    reserve.status = ReserveStatus::Resolved;
    reserve.resolved_at = Some(now);
    reserve.resolution_notes = notes
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(String::from);
    true
}

/// Check that `resolved_at` is present exactly when the reserve is resolved.
///
/// Used on records that did not come through the workflow above, such as
/// imported backups.
pub fn check_resolution(reserve: &Reserve) -> Result<(), CoreError> {
    match (reserve.status.is_terminal(), reserve.resolved_at.is_some()) {
        (true, false) => Err(CoreError::Validation(format!(
            "Reserve '{}' is resolved but has no resolution date",
            reserve.id
        ))),
        (false, true) => Err(CoreError::Validation(format!(
            "Reserve '{}' is '{}' but has a resolution date",
            reserve.id, reserve.status
        ))),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// Priority rank, then oldest first.
pub fn sort_reserves(reserves: &mut [&Reserve]) {
    reserves.sort_by(|a, b| {
        a.priority
            .rank()
            .cmp(&b.priority.rank())
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}

/// Open and in-progress reserves, sorted for the resolution screen.
pub fn pending_reserves(reserves: &[Reserve]) -> Vec<&Reserve> {
    let mut pending: Vec<&Reserve> = reserves.iter().filter(|r| r.is_pending()).collect();
    sort_reserves(&mut pending);
    pending
}

/// Urgent reserves not yet resolved.
pub fn urgent_pending_count(reserves: &[Reserve]) -> usize {
    reserves
        .iter()
        .filter(|r| r.is_pending() && r.is_urgent())
        .count()
}

/// `(reserve, days since creation)` pairs for the pending view.
pub fn pending_with_age(reserves: &[Reserve], today: Date) -> Vec<(&Reserve, i64)> {
    pending_reserves(reserves)
        .into_iter()
        .map(|r| (r, r.days_since_creation(today)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::Priority;
    use chrono::{Duration, Utc};

    fn reserve(id: &str, status: ReserveStatus, priority: Priority, age_hours: i64) -> Reserve {
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
            created_at: Utc::now() - Duration::hours(age_hours),
            resolved_at: None,
            resolution_notes: None,
        }
    }

    // -- transitions ---------------------------------------------------------

    #[test]
    fn forward_transitions_are_allowed() {
        use ReserveStatus::*;
        assert!(validate_transition(Open, InProgress).is_ok());
        assert!(validate_transition(Open, Resolved).is_ok());
        assert!(validate_transition(InProgress, Resolved).is_ok());
    }

    #[test]
    fn backward_transitions_are_rejected() {
        use ReserveStatus::*;
        assert!(validate_transition(InProgress, Open).is_err());
        assert!(validate_transition(Resolved, Open).is_err());
        assert!(validate_transition(Resolved, InProgress).is_err());
    }

    #[test]
    fn status_never_decreases_over_all_pairs() {
        for &from in ReserveStatus::ALL {
            for &to in ReserveStatus::ALL {
                let ok = validate_transition(from, to).is_ok();
                assert_eq!(ok, to.stage() >= from.stage(), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn set_status_stamps_resolution() {
        let mut r = reserve("r1", ReserveStatus::Open, Priority::Normal, 0);
        let now = Utc::now();
        set_status(&mut r, ReserveStatus::Resolved, now).unwrap();
        assert_eq!(r.resolved_at, Some(now));
        assert!(set_status(&mut r, ReserveStatus::Open, now).is_err());
        assert_eq!(r.status, ReserveStatus::Resolved);
    }

    // -- take_charge / resolve -----------------------------------------------

    #[test]
    fn take_charge_only_moves_open() {
        let mut r = reserve("r1", ReserveStatus::Open, Priority::Normal, 0);
        assert!(take_charge(&mut r));
        assert_eq!(r.status, ReserveStatus::InProgress);
        assert!(!take_charge(&mut r));
        assert_eq!(r.status, ReserveStatus::InProgress);
        assert!(r.resolved_at.is_none());
    }

    #[test]
    fn resolve_sets_timestamp_and_notes() {
        let mut r = reserve("r1", ReserveStatus::InProgress, Priority::Normal, 0);
        let now = Utc::now();
        assert!(resolve(&mut r, Some("Joint refait"), now));
        assert_eq!(r.status, ReserveStatus::Resolved);
        assert_eq!(r.resolved_at, Some(now));
        assert_eq!(r.resolution_notes.as_deref(), Some("Joint refait"));
    }

    #[test]
    fn resolving_twice_keeps_first_resolution() {
        let mut r = reserve("r1", ReserveStatus::Open, Priority::Normal, 0);
        let first = Utc::now();
        resolve(&mut r, None, first);
        assert!(!resolve(&mut r, Some("late"), first + Duration::hours(1)));
        assert_eq!(r.resolved_at, Some(first));
        assert!(r.resolution_notes.is_none());
    }

    #[test]
    fn take_charge_on_resolved_is_noop() {
        let mut r = reserve("r1", ReserveStatus::Open, Priority::Normal, 0);
        resolve(&mut r, None, Utc::now());
        assert!(!take_charge(&mut r));
        assert_eq!(r.status, ReserveStatus::Resolved);
    }

    // -- check_resolution ----------------------------------------------------

    #[test]
    fn resolution_date_must_match_status() {
        let mut r = reserve("r7", ReserveStatus::Resolved, Priority::Normal, 0);
        let err = check_resolution(&r).unwrap_err();
        assert!(err.to_string().contains("r7"));

        r.resolved_at = Some(Utc::now());
        assert!(check_resolution(&r).is_ok());

        r.status = ReserveStatus::Open;
        assert!(check_resolution(&r).is_err());
        r.resolved_at = None;
        assert!(check_resolution(&r).is_ok());
    }

    // -- views ---------------------------------------------------------------

    #[test]
    fn pending_view_sorts_by_priority_then_age() {
        let reserves = vec![
            reserve("low", ReserveStatus::Open, Priority::Low, 10),
            reserve("normal_new", ReserveStatus::Open, Priority::Normal, 1),
            reserve("done", ReserveStatus::Resolved, Priority::Urgent, 50),
            reserve("urgent", ReserveStatus::InProgress, Priority::Urgent, 2),
            reserve("normal_old", ReserveStatus::Open, Priority::Normal, 5),
        ];
        let order: Vec<&str> = pending_reserves(&reserves)
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(order, vec!["urgent", "normal_old", "normal_new", "low"]);
        assert_eq!(urgent_pending_count(&reserves), 1);
    }
}

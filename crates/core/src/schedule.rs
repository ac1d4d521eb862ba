//! Schedule conflict detection for class timetables.

use chrono::NaiveTime;
use thiserror::Error;
use uuid::Uuid;

/// Errors from validating a schedule slot.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    /// Day of week must be 1 (Monday) through 7 (Sunday).
    #[error("day of week must be between 1 and 7, got {0}")]
    InvalidDay(i16),

    /// The slot must end after it starts.
    #[error("slot must end after it starts")]
    EmptyTimeRange,
}

/// A timetable slot as seen by conflict checking.
#[derive(Debug, Clone, Copy)]
pub struct Slot {
    /// Class group the slot belongs to.
    pub class_group_id: Uuid,
    /// Teacher giving the lesson.
    pub teacher_id: Uuid,
    /// Day of week, 1 = Monday through 7 = Sunday.
    pub day_of_week: i16,
    /// Start time.
    pub starts_at: NaiveTime,
    /// End time (exclusive).
    pub ends_at: NaiveTime,
}

/// Validates the day and time range of a slot.
///
/// # Errors
///
/// Returns an error for a day outside 1..=7 or a non-positive time range.
pub fn validate_slot(slot: &Slot) -> Result<(), ScheduleError> {
    if !(1..=7).contains(&slot.day_of_week) {
        return Err(ScheduleError::InvalidDay(slot.day_of_week));
    }
    if slot.ends_at <= slot.starts_at {
        return Err(ScheduleError::EmptyTimeRange);
    }
    Ok(())
}

/// Whether two slots conflict.
///
/// Slots conflict when they fall on the same day, their half-open time
/// ranges overlap, and they compete for the same class group or the same
/// teacher. Back-to-back slots (one ends exactly when the other starts) do
/// not conflict.
#[must_use]
pub fn conflicts(a: &Slot, b: &Slot) -> bool {
    if a.day_of_week != b.day_of_week {
        return false;
    }
    let overlaps = a.starts_at < b.ends_at && b.starts_at < a.ends_at;
    overlaps && (a.class_group_id == b.class_group_id || a.teacher_id == b.teacher_id)
}

/// Finds the first existing slot that conflicts with a candidate.
#[must_use]
pub fn first_conflict<'a>(candidate: &Slot, existing: &'a [Slot]) -> Option<&'a Slot> {
    existing.iter().find(|slot| conflicts(candidate, slot))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn slot(class: Uuid, teacher: Uuid, day: i16, start: NaiveTime, end: NaiveTime) -> Slot {
        Slot {
            class_group_id: class,
            teacher_id: teacher,
            day_of_week: day,
            starts_at: start,
            ends_at: end,
        }
    }

    #[test]
    fn test_same_class_overlap_conflicts() {
        let class = Uuid::new_v4();
        let a = slot(class, Uuid::new_v4(), 1, t(8, 0), t(9, 0));
        let b = slot(class, Uuid::new_v4(), 1, t(8, 30), t(9, 30));
        assert!(conflicts(&a, &b));
    }

    #[test]
    fn test_same_teacher_overlap_conflicts() {
        let teacher = Uuid::new_v4();
        let a = slot(Uuid::new_v4(), teacher, 2, t(10, 0), t(11, 0));
        let b = slot(Uuid::new_v4(), teacher, 2, t(10, 45), t(11, 45));
        assert!(conflicts(&a, &b));
    }

    #[test]
    fn test_different_day_never_conflicts() {
        let class = Uuid::new_v4();
        let teacher = Uuid::new_v4();
        let a = slot(class, teacher, 1, t(8, 0), t(9, 0));
        let b = slot(class, teacher, 2, t(8, 0), t(9, 0));
        assert!(!conflicts(&a, &b));
    }

    #[test]
    fn test_back_to_back_slots_do_not_conflict() {
        let class = Uuid::new_v4();
        let a = slot(class, Uuid::new_v4(), 3, t(8, 0), t(9, 0));
        let b = slot(class, Uuid::new_v4(), 3, t(9, 0), t(10, 0));
        assert!(!conflicts(&a, &b));
    }

    #[test]
    fn test_unrelated_slots_do_not_conflict() {
        let a = slot(Uuid::new_v4(), Uuid::new_v4(), 1, t(8, 0), t(9, 0));
        let b = slot(Uuid::new_v4(), Uuid::new_v4(), 1, t(8, 0), t(9, 0));
        assert!(!conflicts(&a, &b));
    }

    #[rstest]
    #[case(0)]
    #[case(8)]
    #[case(-1)]
    fn test_invalid_day_rejected(#[case] day: i16) {
        let s = slot(Uuid::new_v4(), Uuid::new_v4(), day, t(8, 0), t(9, 0));
        assert_eq!(validate_slot(&s), Err(ScheduleError::InvalidDay(day)));
    }

    #[test]
    fn test_empty_range_rejected() {
        let s = slot(Uuid::new_v4(), Uuid::new_v4(), 1, t(9, 0), t(9, 0));
        assert_eq!(validate_slot(&s), Err(ScheduleError::EmptyTimeRange));
    }

    #[test]
    fn test_first_conflict_reports_match() {
        let class = Uuid::new_v4();
        let existing = vec![
            slot(Uuid::new_v4(), Uuid::new_v4(), 1, t(8, 0), t(9, 0)),
            slot(class, Uuid::new_v4(), 1, t(9, 0), t(10, 0)),
        ];
        let candidate = slot(class, Uuid::new_v4(), 1, t(9, 30), t(10, 30));
        let found = first_conflict(&candidate, &existing).unwrap();
        assert_eq!(found.class_group_id, class);
    }
}

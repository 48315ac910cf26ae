//! Matching courses against a requested day and clock time.

use super::types::{ClockTime, Course, MeetingTime};
use chrono::Weekday;

/// Returns the first meeting entry active on `day` at `at`, scanning the
/// course's entries in order. No ranking is applied beyond position.
pub fn meeting_at(course: &Course, day: Weekday, at: ClockTime) -> Option<&MeetingTime> {
    course
        .attributes
        .as_ref()?
        .meeting_times
        .iter()
        .find(|meeting| meeting.covers(day, at))
}

/// True when the course meets on `day` at `at`.
pub fn meets_at(course: &Course, day: Weekday, at: ClockTime) -> bool {
    meeting_at(course, day, at).is_some()
}

//! Eligibility filtering for fetched courses.

use super::types::Course;

/// The only schedule type the picker considers.
///
/// The catalog has served payloads without `scheduleTypeDescription`; this
/// implementation targets the shape where the field is present, so its
/// absence fails the predicate.
const LECTURE: &str = "Lecture";

/// Sections smaller than this are thesis/independent-study sized.
const MIN_ENROLLMENT: i64 = 10;

/// Reduces a fetched course list to the offerable subset.
pub fn offerable_courses(courses: Vec<Course>) -> Vec<Course> {
    courses.into_iter().filter(is_offerable).collect()
}

/// The eligibility predicate. A course is offerable when it carries
/// structured attributes, is a lecture, seats at least [`MIN_ENROLLMENT`],
/// and has at least one meeting time with a fixed start.
pub fn is_offerable(course: &Course) -> bool {
    let Some(attributes) = &course.attributes else {
        return false;
    };

    if attributes.schedule_type.as_deref() != Some(LECTURE) {
        return false;
    }

    if attributes.maximum_enrollment.unwrap_or(0) < MIN_ENROLLMENT {
        return false;
    }

    // Distance sections carry meeting entries with null times
    attributes
        .meeting_times
        .iter()
        .any(|meeting| meeting.start_time.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::{CourseAttributes, MeetingTime};

    fn course(attributes: Option<CourseAttributes>) -> Course {
        Course {
            id: "CS101".to_string(),
            attributes,
        }
    }

    fn lecture(maximum_enrollment: i64, meeting_times: Vec<MeetingTime>) -> Course {
        course(Some(CourseAttributes {
            schedule_type: Some("Lecture".to_string()),
            maximum_enrollment: Some(maximum_enrollment),
            meeting_times,
            ..Default::default()
        }))
    }

    fn morning_meeting() -> MeetingTime {
        MeetingTime {
            monday: true,
            start_time: Some("0900".to_string()),
            end_time: Some("0950".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_accepts_scheduled_lecture() {
        assert!(is_offerable(&lecture(30, vec![morning_meeting()])));
    }

    #[test]
    fn test_rejects_bare_reference() {
        assert!(!is_offerable(&course(None)));
    }

    #[test]
    fn test_rejects_non_lecture_schedule_types() {
        let lab = course(Some(CourseAttributes {
            schedule_type: Some("Lab".to_string()),
            maximum_enrollment: Some(30),
            meeting_times: vec![morning_meeting()],
            ..Default::default()
        }));
        assert!(!is_offerable(&lab));

        let untyped = course(Some(CourseAttributes {
            schedule_type: None,
            maximum_enrollment: Some(30),
            meeting_times: vec![morning_meeting()],
            ..Default::default()
        }));
        assert!(!is_offerable(&untyped));
    }

    #[test]
    fn test_rejects_small_sections() {
        assert!(!is_offerable(&lecture(5, vec![morning_meeting()])));
        assert!(is_offerable(&lecture(10, vec![morning_meeting()])));

        let uncapped = course(Some(CourseAttributes {
            schedule_type: Some("Lecture".to_string()),
            maximum_enrollment: None,
            meeting_times: vec![morning_meeting()],
            ..Default::default()
        }));
        assert!(!is_offerable(&uncapped));
    }

    #[test]
    fn test_rejects_courses_without_fixed_meeting_times() {
        assert!(!is_offerable(&lecture(30, vec![])));

        let distance = lecture(
            30,
            vec![MeetingTime {
                monday: true,
                start_time: None,
                end_time: None,
                ..Default::default()
            }],
        );
        assert!(!is_offerable(&distance));
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let courses = vec![
            lecture(30, vec![morning_meeting()]),
            lecture(5, vec![morning_meeting()]),
            course(None),
        ];

        let once = offerable_courses(courses);
        let once_ids: Vec<String> = once.iter().map(|c| c.id.clone()).collect();
        let twice = offerable_courses(once);
        let twice_ids: Vec<String> = twice.iter().map(|c| c.id.clone()).collect();
        assert_eq!(once_ids, twice_ids);
        assert_eq!(twice_ids.len(), 1);
    }
}

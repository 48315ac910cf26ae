//! Wire and domain types for the course catalog.
//!
//! The upstream catalog speaks JSON:API: every resource is `{id, attributes}`
//! and field names are camelCase. These types mirror that shape with serde
//! renames and keep every field optional that the catalog has been observed
//! to omit.

use chrono::{NaiveDate, NaiveTime, Timelike, Weekday};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// A term resource as returned by the catalog (open-terms listing and the
/// per-term detail endpoint share this shape).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermSummary {
    pub id: String,
    #[serde(default)]
    pub attributes: Option<TermAttributes>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TermAttributes {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "startDate", default)]
    pub start_date: Option<String>,
    #[serde(rename = "endDate", default)]
    pub end_date: Option<String>,
}

/// A term with its calendar window parsed.
///
/// Terms whose dates are missing, malformed, or inverted never count as
/// in-session; they are skipped during resolution rather than failing it.
#[derive(Debug, Clone, Serialize)]
pub struct Term {
    pub id: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl Term {
    /// Builds a term from its wire form, parsing the ISO `YYYY-MM-DD` dates.
    pub fn from_summary(summary: &TermSummary) -> Self {
        let attributes = summary.attributes.as_ref();
        Self {
            id: summary.id.clone(),
            description: attributes.and_then(|a| a.description.clone()),
            start_date: attributes
                .and_then(|a| a.start_date.as_deref())
                .and_then(parse_date),
            end_date: attributes
                .and_then(|a| a.end_date.as_deref())
                .and_then(parse_date),
        }
    }

    /// True when `today` falls inside the term's `[start, end]` window.
    pub fn contains(&self, today: NaiveDate) -> bool {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => start <= today && today <= end,
            _ => false,
        }
    }

    /// True when both dates parsed and the window is well-formed.
    pub fn has_valid_window(&self) -> bool {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => start <= end,
            _ => false,
        }
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// A course resource. A bare reference carries no `attributes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    #[serde(default)]
    pub attributes: Option<CourseAttributes>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseAttributes {
    #[serde(rename = "courseTitle", default)]
    pub title: Option<String>,
    #[serde(rename = "courseNumber", default)]
    pub course_number: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(rename = "scheduleTypeDescription", default)]
    pub schedule_type: Option<String>,
    #[serde(rename = "maximumEnrollment", default)]
    pub maximum_enrollment: Option<i64>,
    #[serde(rename = "meetingTimes", default)]
    pub meeting_times: Vec<MeetingTime>,
}

/// A recurring weekly time block. The catalog marks the active days with one
/// boolean per weekday and gives clock times as zero-padded "HHMM" strings,
/// which may be null for sections with no fixed schedule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeetingTime {
    #[serde(default)]
    pub monday: bool,
    #[serde(default)]
    pub tuesday: bool,
    #[serde(default)]
    pub wednesday: bool,
    #[serde(default)]
    pub thursday: bool,
    #[serde(default)]
    pub friday: bool,
    #[serde(default)]
    pub saturday: bool,
    #[serde(default)]
    pub sunday: bool,
    #[serde(rename = "startTime", default)]
    pub start_time: Option<String>,
    #[serde(rename = "endTime", default)]
    pub end_time: Option<String>,
    #[serde(rename = "meetingType", default)]
    pub meeting_type: Option<String>,
    #[serde(default)]
    pub building: Option<String>,
    #[serde(default)]
    pub room: Option<String>,
}

impl MeetingTime {
    pub fn meets_on(&self, day: Weekday) -> bool {
        match day {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }

    /// The parsed `[start, end]` window, or None when either time is missing
    /// or malformed.
    pub fn window(&self) -> Option<(ClockTime, ClockTime)> {
        let start = ClockTime::parse(self.start_time.as_deref()?)?;
        let end = ClockTime::parse(self.end_time.as_deref()?)?;
        Some((start, end))
    }

    /// True when this block is active on `day` at `at`, inclusive on both
    /// ends of the window.
    pub fn covers(&self, day: Weekday, at: ClockTime) -> bool {
        if !self.meets_on(day) {
            return false;
        }
        match self.window() {
            Some((start, end)) => start <= at && at <= end,
            None => false,
        }
    }
}

static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[01][0-9]|2[0-3])[0-5][0-9]$").unwrap());

/// A time of day stored as minutes since midnight.
///
/// The catalog's "HHMM" strings only order correctly as strings because they
/// are always four digits; parsing to an integer removes that fragility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime(u16);

impl ClockTime {
    /// Parses a zero-padded 24-hour "HHMM" string.
    pub fn parse(raw: &str) -> Option<Self> {
        if !TIME_RE.is_match(raw) {
            return None;
        }
        let hours: u16 = raw[..2].parse().ok()?;
        let minutes: u16 = raw[2..].parse().ok()?;
        Some(Self(hours * 60 + minutes))
    }

    pub fn from_time(time: NaiveTime) -> Self {
        Self((time.hour() * 60 + time.minute()) as u16)
    }

    pub fn minutes_since_midnight(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:02}", self.0 / 60, self.0 % 60)
    }
}

/// One page of the course listing.
///
/// `links` distinguishes "key absent" (a contract violation) from an explicit
/// null (the last page); `data` is required on every page.
#[derive(Debug, Clone, Deserialize)]
pub struct CoursePage {
    #[serde(default)]
    pub data: Option<Vec<Course>>,
    #[serde(default, deserialize_with = "double_option")]
    pub links: Option<Option<PageLinks>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageLinks {
    #[serde(default)]
    pub next: Option<String>,
}

/// Deserializes a field so that an absent key becomes `None` while an
/// explicit null becomes `Some(None)`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// A subject (department) code with its display title.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub abbreviation: String,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clock_time_parsing() {
        assert_eq!(
            ClockTime::parse("0000"),
            Some(ClockTime::from_time(NaiveTime::from_hms_opt(0, 0, 0).unwrap()))
        );
        assert_eq!(
            ClockTime::parse("2359").map(|t| t.minutes_since_midnight()),
            Some(23 * 60 + 59)
        );
        assert_eq!(
            ClockTime::parse("0930").map(|t| t.minutes_since_midnight()),
            Some(9 * 60 + 30)
        );

        assert!(ClockTime::parse("2400").is_none());
        assert!(ClockTime::parse("0960").is_none());
        assert!(ClockTime::parse("930").is_none());
        assert!(ClockTime::parse("09300").is_none());
        assert!(ClockTime::parse("9:30").is_none());
        assert!(ClockTime::parse("").is_none());
    }

    #[test]
    fn test_clock_time_ordering_and_display() {
        let early = ClockTime::parse("0859").unwrap();
        let late = ClockTime::parse("0900").unwrap();
        assert!(early < late);
        assert_eq!(late.to_string(), "0900");
    }

    #[test]
    fn test_term_window_parsing() {
        let summary: TermSummary = serde_json::from_value(json!({
            "id": "201701",
            "attributes": {
                "code": "201701",
                "description": "Fall 2017",
                "startDate": "2016-09-20",
                "endDate": "2017-01-01"
            }
        }))
        .unwrap();

        let term = Term::from_summary(&summary);
        assert!(term.has_valid_window());
        assert!(term.contains(NaiveDate::from_ymd_opt(2016, 10, 1).unwrap()));
        assert!(term.contains(NaiveDate::from_ymd_opt(2016, 9, 20).unwrap()));
        assert!(term.contains(NaiveDate::from_ymd_opt(2017, 1, 1).unwrap()));
        assert!(!term.contains(NaiveDate::from_ymd_opt(2017, 1, 2).unwrap()));
    }

    #[test]
    fn test_term_with_malformed_dates_never_matches() {
        let summary: TermSummary = serde_json::from_value(json!({
            "id": "201799",
            "attributes": {"startDate": "soon", "endDate": null}
        }))
        .unwrap();

        let term = Term::from_summary(&summary);
        assert!(!term.has_valid_window());
        assert!(!term.contains(NaiveDate::from_ymd_opt(2016, 10, 1).unwrap()));
    }

    #[test]
    fn test_course_page_links_absent_vs_null() {
        let missing: CoursePage = serde_json::from_value(json!({"data": []})).unwrap();
        assert!(missing.links.is_none());

        let null: CoursePage =
            serde_json::from_value(json!({"data": [], "links": null})).unwrap();
        assert!(matches!(null.links, Some(None)));

        let empty: CoursePage = serde_json::from_value(json!({"data": [], "links": {}})).unwrap();
        match empty.links {
            Some(Some(links)) => assert!(links.next.is_none()),
            other => panic!("expected empty links object, got {other:?}"),
        }

        let next: CoursePage = serde_json::from_value(
            json!({"data": [], "links": {"next": "/courses?page[number]=2"}}),
        )
        .unwrap();
        match next.links {
            Some(Some(links)) => assert!(links.next.is_some()),
            other => panic!("expected next link, got {other:?}"),
        }
    }

    #[test]
    fn test_meeting_time_covers_inclusive_window() {
        let meeting = MeetingTime {
            monday: true,
            start_time: Some("0900".to_string()),
            end_time: Some("0950".to_string()),
            ..Default::default()
        };

        let at = |raw: &str| ClockTime::parse(raw).unwrap();
        assert!(meeting.covers(Weekday::Mon, at("0930")));
        assert!(meeting.covers(Weekday::Mon, at("0900")));
        assert!(meeting.covers(Weekday::Mon, at("0950")));
        assert!(!meeting.covers(Weekday::Mon, at("1000")));
        assert!(!meeting.covers(Weekday::Mon, at("0859")));
        assert!(!meeting.covers(Weekday::Tue, at("0930")));
    }

    #[test]
    fn test_meeting_time_without_times_never_covers() {
        let meeting = MeetingTime {
            monday: true,
            ..Default::default()
        };
        assert!(!meeting.covers(Weekday::Mon, ClockTime::parse("0930").unwrap()));
    }
}

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Serialize, Serializer};

use crate::element::Element;
use crate::error::{Result, TimetableError};
use crate::format;
use crate::raw::{RawElement, RawPeriod};

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonKind {
    #[default]
    Lesson,
    OfficeHour,
    Standby,
    BreakSupervision,
    Exam,
}

impl LessonKind {
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("bs") => LessonKind::BreakSupervision,
            Some("ex") => LessonKind::Exam,
            Some("oh") => LessonKind::OfficeHour,
            Some("sb") => LessonKind::Standby,
            _ => LessonKind::Lesson,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LessonCode {
    #[default]
    Regular,
    Cancelled,
    Irregular,
}

impl LessonCode {
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("cancelled") => LessonCode::Cancelled,
            Some("irregular") => LessonCode::Irregular,
            _ => LessonCode::Regular,
        }
    }
}

impl std::fmt::Display for LessonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LessonCode::Regular => write!(f, "regular"),
            LessonCode::Cancelled => write!(f, "cancelled"),
            LessonCode::Irregular => write!(f, "irregular"),
        }
    }
}

// --- Elements ---

/// Elements of a period, bucketed by type. Each bucket is kept sorted by id
/// once it belongs to a [`Period`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Elements {
    pub classes: Vec<Element>,
    pub teachers: Vec<Element>,
    pub subjects: Vec<Element>,
    pub rooms: Vec<Element>,
}

impl Elements {
    fn sorted(mut self) -> Self {
        for bucket in [
            &mut self.classes,
            &mut self.teachers,
            &mut self.subjects,
            &mut self.rooms,
        ] {
            bucket.sort_by_key(Element::id);
        }
        self
    }

    fn buckets(&self) -> [&[Element]; 4] {
        [
            self.classes.as_slice(),
            self.teachers.as_slice(),
            self.subjects.as_slice(),
            self.rooms.as_slice(),
        ]
    }

    /// All elements across every bucket.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.buckets().into_iter().flatten()
    }
}

// --- Period ---

/// Unvalidated input for [`Period::new`]. Dates and times are canonical
/// `yyyy-mm-dd` / `hh:mm` strings.
#[derive(Debug, Clone, Default)]
pub struct PeriodRecord {
    pub id: i64,
    pub kind: LessonKind,
    pub code: LessonCode,
    pub lesson_number: i64,
    pub text: String,
    pub substitution_text: Option<String>,
    pub activity_type: String,
    pub student_group: Option<String>,
    pub elements: Elements,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
}

/// One lesson on one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Period {
    id: i64,
    kind: LessonKind,
    code: LessonCode,
    lesson_number: i64,
    text: String,
    substitution_text: Option<String>,
    activity_type: String,
    student_group: Option<String>,
    elements: Elements,
    date: NaiveDate,
    #[serde(serialize_with = "serialize_time")]
    start_time: NaiveTime,
    #[serde(serialize_with = "serialize_time")]
    end_time: NaiveTime,
}

fn serialize_time<S: Serializer>(
    time: &NaiveTime,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&format::format_time(*time))
}

impl Period {
    pub fn new(record: PeriodRecord) -> Result<Self> {
        let date = format::parse_date(&record.date)?;
        let start_time = format::parse_time(&record.start_time)?;
        let end_time = format::parse_time(&record.end_time)?;
        if start_time >= end_time {
            return Err(TimetableError::InvalidTimeRange {
                start: record.start_time,
                end: record.end_time,
            });
        }

        Ok(Self {
            id: record.id,
            kind: record.kind,
            code: record.code,
            lesson_number: record.lesson_number,
            text: record.text,
            substitution_text: record.substitution_text,
            activity_type: record.activity_type,
            student_group: record.student_group,
            elements: record.elements.sorted(),
            date,
            start_time,
            end_time,
        })
    }

    /// Build a period from a `getTimetable` record.
    pub fn from_raw(raw: &RawPeriod) -> Result<Self> {
        let elements =
            |list: &[RawElement]| -> Vec<Element> { list.iter().map(Element::from).collect() };

        Self::new(PeriodRecord {
            id: raw.id,
            kind: LessonKind::from_code(raw.lstype.as_deref()),
            code: LessonCode::from_code(raw.code.as_deref()),
            lesson_number: raw.lsnumber,
            text: raw.lstext.clone(),
            substitution_text: raw.subst_text.clone().filter(|text| !text.is_empty()),
            activity_type: raw.activity_type.clone(),
            student_group: raw.sg.clone().filter(|sg| !sg.is_empty()),
            elements: Elements {
                classes: elements(&raw.kl),
                teachers: elements(&raw.te),
                subjects: elements(&raw.su),
                rooms: elements(&raw.ro),
            },
            date: format::untis_date(raw.date),
            start_time: format::untis_time(raw.start_time),
            end_time: format::untis_time(raw.end_time),
        })
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn kind(&self) -> LessonKind {
        self.kind
    }

    pub fn code(&self) -> LessonCode {
        self.code
    }

    pub fn lesson_number(&self) -> i64 {
        self.lesson_number
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn substitution_text(&self) -> Option<&str> {
        self.substitution_text.as_deref()
    }

    pub fn activity_type(&self) -> &str {
        &self.activity_type
    }

    pub fn student_group(&self) -> Option<&str> {
        self.student_group.as_deref()
    }

    pub fn elements(&self) -> &Elements {
        &self.elements
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    pub fn end_time(&self) -> NaiveTime {
        self.end_time
    }

    pub fn date_string(&self) -> String {
        format::format_date(self.date)
    }

    pub fn start_time_string(&self) -> String {
        format::format_time(self.start_time)
    }

    pub fn end_time_string(&self) -> String {
        format::format_time(self.end_time)
    }

    pub fn start(&self) -> NaiveDateTime {
        self.date.and_time(self.start_time)
    }

    pub fn end(&self) -> NaiveDateTime {
        self.date.and_time(self.end_time)
    }

    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    /// Bucket-by-bucket comparison of element ids. Relies on the buckets being sorted.
    pub fn has_same_elements_as(&self, other: &Period) -> bool {
        self.elements
            .buckets()
            .into_iter()
            .zip(other.elements.buckets())
            .all(|(ours, theirs)| {
                ours.len() == theirs.len()
                    && ours.iter().zip(theirs).all(|(a, b)| a.id() == b.id())
            })
    }

    /// Whether this period differs from the nominal shape of its schedule.
    pub fn deviates_from_schedule(&self) -> bool {
        self.substitution_text.as_deref().is_some_and(|text| !text.is_empty())
            || self.code != LessonCode::Regular
            || self.elements.iter().any(Element::is_substituted)
    }

    /// Same weekly slot: lesson number, weekday and time range match.
    pub fn belongs_to_same_schedule_as(&self, other: &Period) -> bool {
        self.lesson_number == other.lesson_number
            && self.weekday() == other.weekday()
            && self.start_time == other.start_time
            && self.end_time == other.end_time
    }

    /// Back-to-back periods of the same lesson on the same day, in either order.
    pub fn can_be_combined_with(&self, other: &Period) -> bool {
        self.lesson_number == other.lesson_number
            && self.date == other.date
            && (self.start_time == other.end_time || other.start_time == self.end_time)
            && self.code == other.code
            && self.has_same_elements_as(other)
    }

    /// Merge with an adjacent period: the earlier one, stretched to the later one's end.
    ///
    /// Callers must check [`Period::can_be_combined_with`] first.
    pub fn combine_with(&self, other: &Period) -> Period {
        debug_assert!(self.can_be_combined_with(other));
        let (earlier, later) = if self.start() <= other.start() {
            (self, other)
        } else {
            (other, self)
        };

        Period {
            end_time: later.end_time,
            ..earlier.clone()
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn element(id: i64) -> Element {
        Element::Plain {
            id,
            name: format!("E{id}"),
            long_name: format!("Element {id}"),
        }
    }

    pub(crate) fn record(date: &str, start: &str, end: &str) -> PeriodRecord {
        PeriodRecord {
            id: 1,
            lesson_number: 42,
            elements: Elements {
                classes: vec![element(1)],
                teachers: vec![element(10)],
                subjects: vec![element(20)],
                rooms: vec![element(30)],
            },
            date: date.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            ..Default::default()
        }
    }

    pub(crate) fn period(date: &str, start: &str, end: &str) -> Period {
        Period::new(record(date, start, end)).unwrap()
    }

    #[test]
    fn rejects_malformed_date_and_time() {
        assert!(matches!(
            Period::new(record("20.04.2022", "12:00", "13:00")),
            Err(TimetableError::InvalidDate(_))
        ));
        assert!(matches!(
            Period::new(record("2022-04-20", "12", "13:00")),
            Err(TimetableError::InvalidTime(_))
        ));
        assert!(matches!(
            Period::new(record("2022-04-20", "13:00", "12:00")),
            Err(TimetableError::InvalidTimeRange { .. })
        ));
    }

    #[test]
    fn buckets_are_sorted_by_id() {
        let mut rec = record("2022-04-20", "12:00", "13:00");
        rec.elements.teachers = vec![element(15), element(3), element(9)];
        let period = Period::new(rec).unwrap();

        let ids: Vec<i64> = period.elements().teachers.iter().map(Element::id).collect();
        assert_eq!(ids, vec![3, 9, 15]);
    }

    #[test]
    fn same_elements_ignores_input_order() {
        let mut a = record("2022-04-20", "12:00", "13:00");
        a.elements.rooms = vec![element(31), element(30)];
        let mut b = record("2022-04-20", "12:00", "13:00");
        b.elements.rooms = vec![element(30), element(31)];

        let (a, b) = (Period::new(a).unwrap(), Period::new(b).unwrap());
        assert!(a.has_same_elements_as(&b));
        assert!(b.has_same_elements_as(&a));
        assert!(a.has_same_elements_as(&a));
    }

    #[test]
    fn same_id_in_different_bucket_is_not_same_elements() {
        let mut a = record("2022-04-20", "12:00", "13:00");
        a.elements.rooms = vec![element(10)];
        a.elements.teachers = vec![element(30)];

        let a = Period::new(a).unwrap();
        let b = period("2022-04-20", "12:00", "13:00");
        assert!(!a.has_same_elements_as(&b));
    }

    #[test]
    fn deviation_sources() {
        assert!(!period("2022-04-20", "12:00", "13:00").deviates_from_schedule());

        let mut cancelled = record("2022-04-20", "12:00", "13:00");
        cancelled.code = LessonCode::Cancelled;
        assert!(Period::new(cancelled).unwrap().deviates_from_schedule());

        let mut substitution = record("2022-04-20", "12:00", "13:00");
        substitution.substitution_text = Some("moved".to_string());
        assert!(Period::new(substitution).unwrap().deviates_from_schedule());

        let mut substitute_teacher = record("2022-04-20", "12:00", "13:00");
        substitute_teacher.elements.teachers = vec![Element::Substituted {
            id: 11,
            name: "SUB".to_string(),
            long_name: "Substitute".to_string(),
            original_id: 10,
            original_name: "E10".to_string(),
        }];
        assert!(Period::new(substitute_teacher).unwrap().deviates_from_schedule());
    }

    #[test]
    fn weekly_recurrence_is_same_schedule() {
        let a = period("2022-04-20", "12:00", "13:00");
        let b = period("2022-04-27", "12:00", "13:00");
        let other_day = period("2022-04-21", "12:00", "13:00");

        assert_eq!(a.weekday(), Weekday::Wed);
        assert!(a.belongs_to_same_schedule_as(&b));
        assert!(!a.belongs_to_same_schedule_as(&other_day));
        assert!(!a.can_be_combined_with(&b));
    }

    #[test]
    fn adjacent_periods_combine_in_either_order() {
        let first = period("2022-04-20", "12:00", "13:00");
        let second = period("2022-04-20", "13:00", "14:00");

        assert!(first.can_be_combined_with(&second));
        assert!(second.can_be_combined_with(&first));

        let combined = second.combine_with(&first);
        assert_eq!(combined.start_time_string(), "12:00");
        assert_eq!(combined.end_time_string(), "14:00");
        assert_eq!(combined, first.combine_with(&second));
    }

    #[test]
    fn gap_or_code_mismatch_blocks_combination() {
        let first = period("2022-04-20", "12:00", "13:00");
        let after_break = period("2022-04-20", "13:15", "14:00");
        assert!(!first.can_be_combined_with(&after_break));

        let mut cancelled = record("2022-04-20", "13:00", "14:00");
        cancelled.code = LessonCode::Cancelled;
        assert!(!first.can_be_combined_with(&Period::new(cancelled).unwrap()));
    }

    #[test]
    fn from_raw_converts_native_encoding() {
        let raw: RawPeriod = serde_json::from_value(serde_json::json!({
            "id": 5,
            "date": 20220420,
            "startTime": 800,
            "endTime": 845,
            "lstype": "oh",
            "code": "cancelled",
            "lsnumber": 77,
            "substText": "",
            "te": [{ "id": 2, "name": "B", "longname": "Bee" }, { "id": 1, "name": "A", "longname": "Ay" }]
        }))
        .unwrap();

        let period = Period::from_raw(&raw).unwrap();
        assert_eq!(period.date_string(), "2022-04-20");
        assert_eq!(period.start_time_string(), "08:00");
        assert_eq!(period.kind(), LessonKind::OfficeHour);
        assert_eq!(period.code(), LessonCode::Cancelled);
        assert_eq!(period.substitution_text(), None);
        assert_eq!(period.elements().teachers[0].id(), 1);
    }
}

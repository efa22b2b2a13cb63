use std::fmt::Write;

use timetable_common::{Element, Period, PeriodStatus, Schedule, ScheduleCollection};
use untis_client::MasterElement;

fn names(elements: &[Element]) -> String {
    let names: Vec<&str> = elements.iter().map(Element::name).collect();
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(",")
    }
}

fn describe(period: &Period) -> String {
    let elements = period.elements();
    format!(
        "{} {}  {}",
        names(&elements.subjects),
        names(&elements.teachers),
        names(&elements.rooms)
    )
}

fn header(schedule: &Schedule) -> Option<String> {
    let reference = schedule.reference()?;
    Some(format!(
        "{} {}-{}  #{}  {}  ({} unchanged, {} changed)",
        reference.weekday(),
        reference.start_time_string(),
        reference.end_time_string(),
        reference.lesson_number(),
        describe(reference),
        schedule.unchanged().count(),
        schedule.changed().count(),
    ))
}

/// One header line per schedule followed by its changed periods.
pub fn schedules(collection: &ScheduleCollection) -> String {
    let mut out = String::new();
    for schedule in collection {
        let Some(header) = header(schedule) else {
            continue;
        };
        let _ = writeln!(out, "{header}");

        for entry in schedule.entries() {
            if entry.status != PeriodStatus::Changed {
                continue;
            }
            let period = &entry.period;
            let _ = write!(
                out,
                "    {} {}-{}  {}  {}",
                period.date_string(),
                period.start_time_string(),
                period.end_time_string(),
                period.code(),
                describe(period)
            );
            if let Some(text) = period.substitution_text() {
                let _ = write!(out, "  \"{text}\"");
            }
            out.push('\n');
        }
    }
    out
}

pub fn elements(elements: &[MasterElement]) -> String {
    let mut out = String::new();
    for element in elements {
        let _ = writeln!(
            out,
            "{:>6}  {:<12} {}{}",
            element.id,
            element.name,
            element.long_name,
            if element.active { "" } else { "  (inactive)" }
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use timetable_common::RawPeriod;

    fn period(id: i64, date: u32, code: Option<&str>) -> Period {
        let raw: RawPeriod = serde_json::from_value(json!({
            "id": id,
            "date": date,
            "startTime": 1200,
            "endTime": 1300,
            "lsnumber": 4100,
            "code": code,
            "te": [{ "id": 10, "name": "MUE", "longname": "Mueller" }],
            "su": [{ "id": 21, "name": "MA", "longname": "Mathematics" }],
            "ro": [{ "id": 31, "name": "R101", "longname": "Room 101" }]
        }))
        .unwrap();
        Period::from_raw(&raw).unwrap()
    }

    #[test]
    fn schedule_summary_lists_changed_periods() {
        let collection = ScheduleCollection::from_periods(vec![
            period(1, 20220420, None),
            period(2, 20220427, Some("cancelled")),
        ]);

        let text = schedules(&collection);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Wed 12:00-13:00  #4100  MA MUE  R101  (1 unchanged, 1 changed)"
        );
        assert_eq!(lines[1], "    2022-04-27 12:00-13:00  cancelled  MA MUE  R101");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn inactive_elements_are_flagged() {
        let text = elements(&[MasterElement {
            id: 4,
            name: "5b".to_string(),
            long_name: "Class 5b".to_string(),
            active: false,
        }]);
        assert!(text.trim_end().ends_with("(inactive)"));
        assert!(text.contains("Class 5b"));
    }
}

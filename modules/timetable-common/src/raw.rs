use serde::{Deserialize, Serialize};

// --- Wire shapes of the remote timetable service ---

/// An element reference (class, teacher, subject, room) attached to a period.
/// `orgid`/`orgname` are only present when the element stands in for another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawElement {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub longname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orgid: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orgname: Option<String>,
}

/// One period as returned by `getTimetable`. Dates are `yyyymmdd` and times
/// `hhmm` integers; see [`crate::format`] for the conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPeriod {
    pub id: i64,
    pub date: u32,
    pub start_time: u32,
    pub end_time: u32,
    /// `ls` (lesson), `oh` (office hour), `sb` (standby), `bs` (break supervision), `ex` (exam)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lstype: Option<String>,
    /// Absent for regular periods, otherwise `cancelled` or `irregular`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default)]
    pub lsnumber: i64,
    #[serde(default)]
    pub lstext: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subst_text: Option<String>,
    #[serde(default)]
    pub activity_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sg: Option<String>,
    #[serde(default)]
    pub kl: Vec<RawElement>,
    #[serde(default)]
    pub te: Vec<RawElement>,
    #[serde(default)]
    pub su: Vec<RawElement>,
    #[serde(default)]
    pub ro: Vec<RawElement>,
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// --- JSON-RPC envelope ---

#[derive(Debug, Clone, Serialize)]
pub(crate) struct RpcRequest<'a> {
    pub id: String,
    pub method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    pub jsonrpc: &'static str,
}

/// `result` stays untyped until the error branch has been ruled out.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RpcResponse {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcErrorBody>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RpcErrorBody {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

// --- Remote methods ---

/// Result of `authenticate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: String,
    #[serde(default)]
    pub person_type: Option<i64>,
    #[serde(default)]
    pub person_id: Option<i64>,
    #[serde(default)]
    pub klasse_id: Option<i64>,
}

/// Element types accepted by `getTimetable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Class,
    Teacher,
    Subject,
    Room,
    Student,
}

impl ElementType {
    /// Numeric code used on the wire.
    pub fn code(self) -> u8 {
        match self {
            ElementType::Class => 1,
            ElementType::Teacher => 2,
            ElementType::Subject => 3,
            ElementType::Room => 4,
            ElementType::Student => 5,
        }
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElementType::Class => write!(f, "class"),
            ElementType::Teacher => write!(f, "teacher"),
            ElementType::Subject => write!(f, "subject"),
            ElementType::Room => write!(f, "room"),
            ElementType::Student => write!(f, "student"),
        }
    }
}

/// Whose timetable to fetch, and for which inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimetableQuery {
    pub element_type: ElementType,
    pub element_id: i64,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// An entry of the `getKlassen`/`getTeachers`/`getSubjects`/`getRooms` master data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterElement {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub long_name: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

pub mod cookies;
pub mod error;
pub mod types;

pub use cookies::CookieJar;
pub use error::{Result, UntisError};
pub use types::{ElementType, MasterElement, Session, TimetableQuery};

use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::header::{COOKIE, SET_COOKIE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use timetable_common::format::to_untis_date;
use timetable_common::{Period, RawPeriod, ScheduleCollection};
use tokio::sync::Mutex;
use tracing::{debug, info};
use types::{RpcRequest, RpcResponse};

const RPC_PATH: &str = "/WebUntis/jsonrpc.do";

pub struct UntisClient {
    http: reqwest::Client,
    endpoint: String,
    school: String,
    /// Held for a whole round trip so replayed and captured cookies never interleave.
    cookies: Mutex<CookieJar>,
    next_id: AtomicU64,
}

impl UntisClient {
    /// Client for `https://{server}/WebUntis/jsonrpc.do?school={school}`.
    pub fn new(server: &str, school: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("https://{}{}", server.trim_end_matches('/'), RPC_PATH),
            school: school.to_string(),
            cookies: Mutex::new(CookieJar::default()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Point the client at another scheme and host, e.g. `http://127.0.0.1:8080`.
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.endpoint = format!("{}{}", url.trim_end_matches('/'), RPC_PATH);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Current value of a session cookie.
    pub async fn cookie(&self, name: &str) -> Option<String> {
        self.cookies.lock().await.get(name).map(String::from)
    }

    /// Issue one JSON-RPC call and decode its `result`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Option<Value>,
    ) -> Result<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = RpcRequest {
            id: id.to_string(),
            method,
            params,
            jsonrpc: "2.0",
        };

        let mut cookies = self.cookies.lock().await;
        debug!(method, id, "JSON-RPC request");

        let mut req = self
            .http
            .post(&self.endpoint)
            .query(&[("school", self.school.as_str())])
            .json(&body);
        if let Some(header) = cookies.header() {
            req = req.header(COOKIE, header);
        }
        let resp = req.send().await?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(UntisError::UnexpectedStatus {
                expected: StatusCode::OK.as_u16(),
                actual: status.as_u16(),
            });
        }

        for value in resp.headers().get_all(SET_COOKIE) {
            if let Ok(set_cookie) = value.to_str() {
                cookies.absorb(set_cookie);
            }
        }
        drop(cookies);

        let text = resp.text().await?;
        let envelope: RpcResponse = serde_json::from_str(&text)?;
        if let Some(error) = envelope.error {
            return Err(UntisError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        Ok(serde_json::from_value(envelope.result.unwrap_or(Value::Null))?)
    }

    /// Open a session. The session cookie is kept for subsequent calls.
    pub async fn authenticate(&self, user: &str, password: &str, client: &str) -> Result<Session> {
        let params = json!({ "user": user, "password": password, "client": client });
        let session: Session = self.request("authenticate", Some(params)).await?;
        info!(
            person_type = ?session.person_type,
            person_id = ?session.person_id,
            "Authenticated"
        );
        Ok(session)
    }

    /// End the session and forget its cookies.
    pub async fn logout(&self) -> Result<()> {
        let result = self.request::<Value>("logout", None).await;
        self.cookies.lock().await.clear();
        result.map(|_| ())
    }

    /// Periods of one element's timetable, sorted chronologically.
    pub async fn timetable(&self, query: &TimetableQuery) -> Result<Vec<RawPeriod>> {
        let params = json!({
            "id": query.element_id,
            "type": query.element_type.code(),
            "startDate": to_untis_date(query.start),
            "endDate": to_untis_date(query.end),
        });

        let mut periods: Vec<RawPeriod> = self.request("getTimetable", Some(params)).await?;
        periods.sort_by_key(|p| (p.date, p.start_time, p.end_time, p.id));
        info!(
            element_type = %query.element_type,
            element_id = query.element_id,
            count = periods.len(),
            "Fetched timetable"
        );
        Ok(periods)
    }

    pub async fn classes(&self) -> Result<Vec<MasterElement>> {
        self.request("getKlassen", None).await
    }

    pub async fn teachers(&self) -> Result<Vec<MasterElement>> {
        self.request("getTeachers", None).await
    }

    pub async fn subjects(&self) -> Result<Vec<MasterElement>> {
        self.request("getSubjects", None).await
    }

    pub async fn rooms(&self) -> Result<Vec<MasterElement>> {
        self.request("getRooms", None).await
    }
}

/// Fetch a timetable and reconstruct its weekly schedules.
pub async fn fetch_schedules(
    client: &UntisClient,
    query: &TimetableQuery,
    combine: bool,
) -> Result<ScheduleCollection> {
    let raw = client.timetable(query).await?;
    let periods = raw
        .iter()
        .map(Period::from_raw)
        .collect::<timetable_common::Result<Vec<_>>>()?;

    let schedules = ScheduleCollection::from_periods(periods);
    let schedules = if combine {
        schedules.combine_sequential_schedules()
    } else {
        schedules
    };

    info!(
        periods = raw.len(),
        schedules = schedules.len(),
        combine,
        "Reconstructed schedules"
    );
    Ok(schedules)
}

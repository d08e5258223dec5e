use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    client::ApiClient,
    resources::Resource,
    types::{ApiError, RecordPage},
};

pub const FIELD_WORK_ENDPOINT: &str = "/api/attendance/field-work";
pub const MAKEUP_ENDPOINT: &str = "/api/attendance/makeup";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Punch {
    CheckIn,
    CheckOut,
}

impl Punch {
    pub fn label(self) -> &'static str {
        match self {
            Punch::CheckIn => "Check in",
            Punch::CheckOut => "Check out",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PunchRequest {
    pub employee_id: i64,
    #[serde(rename = "type")]
    pub punch: Punch,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldWorkRequest {
    pub employee_id: i64,
    pub location: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MakeupRequest {
    pub employee_id: i64,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub punch: Punch,
    pub reason: String,
}

/// Check-in and check-out times of one day's attendance record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayAttendance {
    #[serde(default)]
    pub check_in: Option<String>,
    #[serde(default)]
    pub check_out: Option<String>,
}

impl DayAttendance {
    pub fn can_punch(&self, punch: Punch) -> bool {
        match punch {
            Punch::CheckIn => self.check_in.is_none(),
            Punch::CheckOut => self.check_in.is_some() && self.check_out.is_none(),
        }
    }
}

/// Daily punches on top of the attendance collection.
#[derive(Clone)]
pub struct AttendanceClient {
    client: ApiClient,
}

impl AttendanceClient {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// The first record for `date`, or an empty day.
    pub async fn day(&self, date: NaiveDate) -> Result<DayAttendance, ApiError> {
        let page = self
            .client
            .resource(Resource::AttendanceRecords)
            .list(&[("date", date.format("%Y-%m-%d").to_string())])
            .await?;
        first_day(page)
    }

    pub async fn punch(
        &self,
        employee_id: i64,
        punch: Punch,
        at: DateTime<Utc>,
    ) -> Result<Value, ApiError> {
        let request = PunchRequest {
            employee_id,
            punch,
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        log::info!("{} for employee {}", punch.label(), employee_id);
        self.client
            .resource(Resource::AttendanceRecords)
            .create(&serde_json::to_value(&request).map_err(|e| {
                ApiError::decode(format!("Failed to encode punch: {}", e))
            })?)
            .await
    }

    pub async fn field_work(&self, request: &FieldWorkRequest) -> Result<Value, ApiError> {
        self.client.post(FIELD_WORK_ENDPOINT, request).await
    }

    pub async fn makeup(&self, request: &MakeupRequest) -> Result<Value, ApiError> {
        self.client.post(MAKEUP_ENDPOINT, request).await
    }
}

fn first_day(page: RecordPage) -> Result<DayAttendance, ApiError> {
    match page.items.into_iter().next() {
        Some(record) => serde_json::from_value(record)
            .map_err(|e| ApiError::decode(format!("Failed to parse attendance record: {}", e))),
        None => Ok(DayAttendance::default()),
    }
}

impl ApiClient {
    pub fn attendance(&self) -> AttendanceClient {
        AttendanceClient::new(self.clone())
    }
}

use crate::api::{ApiError, FieldWorkRequest, MakeupRequest, Punch};
use chrono::{DateTime, Local, NaiveDate};
use leptos::*;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn require_employee(employee_id: Option<i64>) -> Result<i64, ApiError> {
    employee_id.ok_or_else(|| ApiError::validation("No employee record is linked to this account"))
}

fn required(value: &str, message: &str) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ApiError::validation(message))
    } else {
        Ok(value.to_string())
    }
}

/// Clock time of a punch as `HH:MM:SS` in local time. Values that are not
/// RFC 3339 timestamps are shown as sent.
pub fn punch_time(raw: Option<&str>) -> String {
    match raw {
        None => "Not yet".into(),
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|at| at.with_timezone(&Local).format("%H:%M:%S").to_string())
            .unwrap_or_else(|_| raw.to_string()),
    }
}

#[derive(Clone, Copy)]
pub struct FieldWorkFormState {
    pub location: RwSignal<String>,
    pub reason: RwSignal<String>,
}

impl Default for FieldWorkFormState {
    fn default() -> Self {
        Self {
            location: create_rw_signal(String::new()),
            reason: create_rw_signal(String::new()),
        }
    }
}

impl FieldWorkFormState {
    pub fn to_request(&self, employee_id: Option<i64>) -> Result<FieldWorkRequest, ApiError> {
        validate_field_work(
            employee_id,
            &self.location.get_untracked(),
            &self.reason.get_untracked(),
        )
    }

    pub fn clear(&self) {
        self.location.set(String::new());
        self.reason.set(String::new());
    }
}

pub fn validate_field_work(
    employee_id: Option<i64>,
    location: &str,
    reason: &str,
) -> Result<FieldWorkRequest, ApiError> {
    let employee_id = require_employee(employee_id)?;
    Ok(FieldWorkRequest {
        employee_id,
        location: required(location, "Please enter the field work location")?,
        reason: required(reason, "Please enter the reason for field work")?,
    })
}

#[derive(Clone, Copy)]
pub struct MakeupFormState {
    pub date: RwSignal<String>,
    pub punch: RwSignal<Punch>,
    pub reason: RwSignal<String>,
}

impl MakeupFormState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            date: create_rw_signal(today.format(DATE_FORMAT).to_string()),
            punch: create_rw_signal(Punch::CheckIn),
            reason: create_rw_signal(String::new()),
        }
    }

    pub fn to_request(&self, employee_id: Option<i64>) -> Result<MakeupRequest, ApiError> {
        validate_makeup(
            employee_id,
            &self.date.get_untracked(),
            self.punch.get_untracked(),
            &self.reason.get_untracked(),
        )
    }

    pub fn reset(&self, today: NaiveDate) {
        self.date.set(today.format(DATE_FORMAT).to_string());
        self.punch.set(Punch::CheckIn);
        self.reason.set(String::new());
    }
}

pub fn validate_makeup(
    employee_id: Option<i64>,
    date: &str,
    punch: Punch,
    reason: &str,
) -> Result<MakeupRequest, ApiError> {
    let employee_id = require_employee(employee_id)?;
    let date = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
        .map_err(|_| ApiError::validation("Please pick a valid date"))?;
    Ok(MakeupRequest {
        employee_id,
        date,
        punch,
        reason: required(reason, "Please enter the reason for the makeup punch")?,
    })
}

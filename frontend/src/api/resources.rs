use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::Value;

use super::{
    client::ApiClient,
    types::{ApiError, RecordPage},
};

/// Feature modules backed by a plain REST collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Employees,
    Departments,
    Positions,
    SalaryStructures,
    SalaryAssignments,
    SalaryRecords,
    AttendanceRecords,
    AttendanceRules,
    Leave,
    Overtime,
    Interns,
    InternEvaluations,
}

impl Resource {
    pub const ALL: [Resource; 12] = [
        Resource::Employees,
        Resource::Departments,
        Resource::Positions,
        Resource::SalaryStructures,
        Resource::SalaryAssignments,
        Resource::SalaryRecords,
        Resource::AttendanceRecords,
        Resource::AttendanceRules,
        Resource::Leave,
        Resource::Overtime,
        Resource::Interns,
        Resource::InternEvaluations,
    ];

    pub fn api_path(self) -> &'static str {
        match self {
            Resource::Employees => "/api/employees",
            Resource::Departments => "/api/departments",
            Resource::Positions => "/api/positions",
            Resource::SalaryStructures => "/api/salary/structures",
            Resource::SalaryAssignments => "/api/salary/structure-assignments",
            Resource::SalaryRecords => "/api/salary/records",
            Resource::AttendanceRecords => "/api/attendance",
            Resource::AttendanceRules => "/api/attendance/rules",
            Resource::Leave => "/api/leave",
            Resource::Overtime => "/api/overtime",
            Resource::Interns => "/api/intern/status",
            Resource::InternEvaluations => "/api/intern/evaluations",
        }
    }

    /// Route of the screen listing this resource.
    pub fn route(self) -> &'static str {
        match self {
            Resource::Employees => "/employees",
            Resource::Departments => "/departments",
            Resource::Positions => "/positions",
            Resource::SalaryStructures => "/salary/structures",
            Resource::SalaryAssignments => "/salary/assignments",
            Resource::SalaryRecords => "/salary/records",
            Resource::AttendanceRecords => "/attendance/records",
            Resource::AttendanceRules => "/attendance/rules",
            Resource::Leave => "/attendance/leave",
            Resource::Overtime => "/attendance/overtime",
            Resource::Interns => "/intern",
            Resource::InternEvaluations => "/intern/evaluations",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Resource::Employees => "Employees",
            Resource::Departments => "Departments",
            Resource::Positions => "Positions",
            Resource::SalaryStructures => "Salary structures",
            Resource::SalaryAssignments => "Salary assignments",
            Resource::SalaryRecords => "Salary records",
            Resource::AttendanceRecords => "Attendance records",
            Resource::AttendanceRules => "Attendance rules",
            Resource::Leave => "Leave",
            Resource::Overtime => "Overtime",
            Resource::Interns => "Interns",
            Resource::InternEvaluations => "Intern evaluations",
        }
    }

    pub fn supports_approval(self) -> bool {
        matches!(self, Resource::Leave | Resource::Overtime)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeFile {
    Photo,
    Contract,
}

impl EmployeeFile {
    pub const ALL: [EmployeeFile; 2] = [EmployeeFile::Photo, EmployeeFile::Contract];

    fn segment(self) -> &'static str {
        match self {
            EmployeeFile::Photo => "photo",
            EmployeeFile::Contract => "contract",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EmployeeFile::Photo => "Photo",
            EmployeeFile::Contract => "Contract",
        }
    }

    /// File name extensions accepted for this kind, lowercase and without the dot.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            EmployeeFile::Photo => &["jpg", "jpeg", "png", "gif"],
            EmployeeFile::Contract => &["pdf", "doc", "docx"],
        }
    }

    pub fn max_bytes(self) -> usize {
        match self {
            EmployeeFile::Photo => 5 * 1024 * 1024,
            EmployeeFile::Contract => 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApprovalRequest {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

fn encode_id(id: &str) -> String {
    utf8_percent_encode(id, NON_ALPHANUMERIC).to_string()
}

/// CRUD over one [`Resource`], routed through the shared [`ApiClient`].
#[derive(Clone)]
pub struct ResourceClient {
    client: ApiClient,
    resource: Resource,
}

impl ResourceClient {
    pub fn new(client: ApiClient, resource: Resource) -> Self {
        Self { client, resource }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.resource.api_path(), encode_id(id))
    }

    pub async fn list(&self, query: &[(&str, String)]) -> Result<RecordPage, ApiError> {
        let data: Value = self
            .client
            .get_with_query(self.resource.api_path(), query)
            .await?;
        RecordPage::from_value(data)
    }

    pub async fn get(&self, id: &str) -> Result<Value, ApiError> {
        self.client.get(&self.item_path(id)).await
    }

    pub async fn create(&self, body: &Value) -> Result<Value, ApiError> {
        self.client.post(self.resource.api_path(), body).await
    }

    pub async fn update(&self, id: &str, body: &Value) -> Result<Value, ApiError> {
        self.client.put(&self.item_path(id), body).await
    }

    pub async fn delete(&self, id: &str) -> Result<Value, ApiError> {
        self.client.delete(&self.item_path(id)).await
    }

    pub async fn approve(&self, id: &str, request: &ApprovalRequest) -> Result<Value, ApiError> {
        if !self.resource.supports_approval() {
            return Err(ApiError::validation(format!(
                "{} records cannot be approved",
                self.resource.title()
            )));
        }
        let path = format!("{}/approve", self.item_path(id));
        self.client.post(&path, request).await
    }
}

impl ApiClient {
    pub fn resource(&self, resource: Resource) -> ResourceClient {
        ResourceClient::new(self.clone(), resource)
    }

    /// Uploads a photo or contract for an employee as `multipart/form-data`
    /// with the file under `file`.
    pub async fn upload_employee_file(
        &self,
        kind: EmployeeFile,
        employee_id: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<Value, ApiError> {
        if bytes.is_empty() {
            return Err(ApiError::validation("The selected file is empty"));
        }
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);
        let path = format!(
            "{}/upload/{}/{}",
            Resource::Employees.api_path(),
            kind.segment(),
            encode_id(employee_id)
        );
        log::info!("uploading {} for employee {}", kind.segment(), employee_id);
        self.post_multipart(&path, form).await
    }
}

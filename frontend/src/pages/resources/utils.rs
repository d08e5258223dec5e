use crate::api::{ApiError, EmployeeFile};
use serde_json::{Map, Value};

pub const PER_PAGE: u32 = 10;

/// Columns shown for a page of records: keys in first-seen order, with `id`
/// first and nested objects left out.
pub fn columns(records: &[Value]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        let Some(map) = record.as_object() else {
            continue;
        };
        for (key, value) in map {
            if value.is_object() || columns.iter().any(|c| c == key) {
                continue;
            }
            columns.push(key.clone());
        }
    }
    if let Some(pos) = columns.iter().position(|c| c == "id") {
        let id = columns.remove(pos);
        columns.insert(0, id);
    }
    columns
}

pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".into(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => if *b { "Yes" } else { "No" }.into(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| cell_text(Some(item)))
            .collect::<Vec<_>>()
            .join(", "),
        Some(other) => other.to_string(),
    }
}

pub fn record_id(record: &Value) -> Option<String> {
    match record.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn header_label(column: &str) -> String {
    let mut label = column.replace('_', " ");
    if let Some(first) = label.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    label
}

pub fn page_query(page: u32) -> Vec<(&'static str, String)> {
    vec![("page", page.to_string()), ("per_page", PER_PAGE.to_string())]
}

pub fn last_page(total: u64) -> u32 {
    let pages = total.div_ceil(PER_PAGE as u64).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

pub fn is_pending(record: &Value) -> bool {
    record.get("status").and_then(Value::as_str) == Some("pending")
}

/// Which record the editor is working on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    Closed,
    Create,
    Edit(String),
}

impl EditorMode {
    pub fn is_open(&self) -> bool {
        !matches!(self, EditorMode::Closed)
    }

    pub fn title(&self) -> String {
        match self {
            EditorMode::Closed => String::new(),
            EditorMode::Create => "New record".into(),
            EditorMode::Edit(id) => format!("Edit record {}", id),
        }
    }
}

/// The editor body: must be a JSON object. An `id` key is dropped since the
/// target is addressed by path.
pub fn parse_draft(draft: &str) -> Result<Value, ApiError> {
    let value: Value = serde_json::from_str(draft.trim())
        .map_err(|e| ApiError::validation(format!("Invalid JSON: {}", e)))?;
    match value {
        Value::Object(mut map) => {
            map.remove("id");
            if map.is_empty() {
                return Err(ApiError::validation("The record has no fields"));
            }
            Ok(Value::Object(map))
        }
        _ => Err(ApiError::validation("The record must be a JSON object")),
    }
}

/// Editable text for a fetched record.
pub fn draft_from(record: &Value) -> String {
    let mut map = record.as_object().cloned().unwrap_or_else(Map::new);
    map.remove("id");
    serde_json::to_string_pretty(&Value::Object(map)).unwrap_or_else(|_| "{}".into())
}

pub fn check_upload(kind: EmployeeFile, file_name: &str, size: usize) -> Result<(), ApiError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if !kind.extensions().contains(&extension.as_str()) {
        return Err(ApiError::validation(format!(
            "{} must be one of: {}",
            kind.label(),
            kind.extensions().join(", ")
        )));
    }
    if size == 0 {
        return Err(ApiError::validation("The selected file is empty"));
    }
    if size > kind.max_bytes() {
        return Err(ApiError::validation(format!(
            "{} must be at most {} MB",
            kind.label(),
            kind.max_bytes() / (1024 * 1024)
        )));
    }
    Ok(())
}

pub fn accept_attr(kind: EmployeeFile) -> String {
    kind.extensions()
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn columns_put_id_first_and_skip_objects() {
        let records = vec![
            json!({"name": "Finance", "id": 2, "manager": {"id": 9}}),
            json!({"id": 3, "name": "R&D", "description": "Lab"}),
        ];
        assert_eq!(columns(&records), vec!["id", "name", "description"]);
    }

    #[test]
    fn cells_render_scalars_and_lists() {
        assert_eq!(cell_text(None), "-");
        assert_eq!(cell_text(Some(&json!(null))), "-");
        assert_eq!(cell_text(Some(&json!("alice"))), "alice");
        assert_eq!(cell_text(Some(&json!(true))), "Yes");
        assert_eq!(cell_text(Some(&json!(4200.5))), "4200.5");
        assert_eq!(cell_text(Some(&json!(["a", 1]))), "a, 1");
    }

    #[test]
    fn ids_accept_numbers_and_strings() {
        assert_eq!(record_id(&json!({"id": 7})).as_deref(), Some("7"));
        assert_eq!(record_id(&json!({"id": "E-7"})).as_deref(), Some("E-7"));
        assert_eq!(record_id(&json!({"id": ""})), None);
        assert_eq!(record_id(&json!({"name": "x"})), None);
    }

    #[test]
    fn paging_helpers() {
        assert_eq!(last_page(0), 1);
        assert_eq!(last_page(10), 1);
        assert_eq!(last_page(11), 2);
        assert_eq!(page_query(3)[0], ("page", "3".to_string()));
        assert_eq!(header_label("employee_id"), "Employee id");
    }

    #[test]
    fn drafts_must_be_objects_with_fields() {
        assert!(parse_draft("[1, 2]").is_err());
        assert!(parse_draft("{\"name\": ").is_err());
        assert!(parse_draft("{\"id\": 4}").is_err());
        assert_eq!(
            parse_draft(" {\"id\": 4, \"name\": \"Finance\"} ").unwrap(),
            json!({"name": "Finance"})
        );
    }

    #[test]
    fn draft_from_record_leaves_id_out() {
        let draft = draft_from(&json!({"id": 4, "name": "Finance"}));
        assert!(!draft.contains("\"id\""));
        assert_eq!(parse_draft(&draft).unwrap(), json!({"name": "Finance"}));
        assert_eq!(draft_from(&json!(null)), "{}");
    }

    #[test]
    fn editor_mode_titles() {
        assert!(!EditorMode::Closed.is_open());
        assert_eq!(EditorMode::Create.title(), "New record");
        assert_eq!(EditorMode::Edit("4".into()).title(), "Edit record 4");
    }

    #[test]
    fn uploads_are_checked_by_kind() {
        assert!(check_upload(EmployeeFile::Photo, "me.PNG", 1024).is_ok());
        assert!(check_upload(EmployeeFile::Photo, "me.pdf", 1024).is_err());
        assert!(check_upload(EmployeeFile::Photo, "me.jpg", 0).is_err());
        assert!(check_upload(EmployeeFile::Photo, "me.jpg", 6 * 1024 * 1024).is_err());
        assert!(check_upload(EmployeeFile::Contract, "contract.docx", 6 * 1024 * 1024).is_ok());
        assert!(check_upload(EmployeeFile::Contract, "contract", 10).is_err());
        assert_eq!(accept_attr(EmployeeFile::Contract), ".pdf,.doc,.docx");
    }
}

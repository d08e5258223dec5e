use crate::api::{ApiClient, ApiError};
use serde::{Deserialize, Serialize};

pub const STATS_ENDPOINT: &str = "/api/dashboard/stats";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedCount {
    pub name: String,
    #[serde(default)]
    pub value: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub total_employees: u64,
    pub total_departments: u64,
    pub total_positions: u64,
    pub department_stats: Vec<NamedCount>,
    pub position_stats: Vec<NamedCount>,
}

pub async fn fetch_stats(api: &ApiClient) -> Result<DashboardStats, ApiError> {
    api.get(STATS_ENDPOINT).await
}

/// Whole-number percentage of `part` in `total`; 0 when `total` is 0.
pub fn share_percent(part: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    ((part.min(total) * 100 + total / 2) / total) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stats_tolerate_missing_fields() {
        let stats: DashboardStats = serde_json::from_value(json!({
            "totalEmployees": 12,
            "departmentStats": [{"name": "R&D", "value": 8}]
        }))
        .unwrap();
        assert_eq!(stats.total_employees, 12);
        assert_eq!(stats.total_positions, 0);
        assert_eq!(stats.department_stats[0].name, "R&D");
        assert!(stats.position_stats.is_empty());
    }

    #[test]
    fn share_rounds_and_guards_zero() {
        assert_eq!(share_percent(1, 3), 33);
        assert_eq!(share_percent(2, 3), 67);
        assert_eq!(share_percent(5, 0), 0);
        assert_eq!(share_percent(9, 4), 100);
    }
}

//! Point records - categorized map points submitted by clients

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Stored point row
#[derive(Debug, Clone)]
pub struct Point {
    pub id: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub category: String,
    pub creator_id: String,
    pub created_at: DateTime<Utc>,
}

/// Create payload. Every field is required.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub category: String,
    pub creator_id: String,
}

/// Result of a point insert.
///
/// Only the PostgreSQL backend reports the server-assigned timestamp back
/// to the caller; the SQLite backend stores one but does not return it.
#[derive(Debug, Clone)]
pub struct InsertedPoint {
    pub id: i64,
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_fields_are_required() {
        let result: Result<NewPoint, _> = serde_json::from_str(
            r#"{"longitude": 10.7, "category": "rail", "creator_id": "u1"}"#,
        );
        assert!(result.is_err(), "latitude must be present");
    }
}

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Gym equipment catalog entry
///
/// Images are kept inline as base64 text and shipped in every response.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Equipment {
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub equipment_type: String,
    pub name: String,
    pub description: Option<String>,
    pub image_base64: Option<String>,
    pub is_active: bool,
    #[serde(skip_serializing)]
    pub created_at: DateTime<Utc>,
}

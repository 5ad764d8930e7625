//! Layout document model and DTOs.

use plexus_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `config_layouts` table. At most one per dashboard.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LayoutDocument {
    pub id: DbId,
    pub dashboard_id: DbId,
    pub layout: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for `POST /dashboards/{id}/layout`.
///
/// `layout` may be a JSON array or a string holding one.
#[derive(Debug, Clone, Deserialize)]
pub struct SaveLayout {
    pub layout: Option<serde_json::Value>,
}

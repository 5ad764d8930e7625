//! Repository for the `config_layouts` table.

use plexus_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::layout::LayoutDocument;

/// Column list for `config_layouts` queries.
const COLUMNS: &str = "id, dashboard_id, layout, created_at, updated_at";

/// Reads and upserts the single layout document of a dashboard.
pub struct LayoutRepo;

impl LayoutRepo {
    /// Find a dashboard's layout document. Returns `None` if none was saved yet.
    pub async fn find_by_dashboard(
        pool: &PgPool,
        dashboard_id: DbId,
    ) -> Result<Option<LayoutDocument>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM config_layouts WHERE dashboard_id = $1");
        sqlx::query_as::<_, LayoutDocument>(&query)
            .bind(dashboard_id)
            .fetch_optional(pool)
            .await
    }

    /// Upsert a dashboard's layout. Creates if absent, replaces if it exists.
    ///
    /// `layout` is stored as given; callers validate its shape first.
    ///
    /// Uses `ON CONFLICT (dashboard_id) DO UPDATE` to guarantee one row per
    /// dashboard. There is no concurrency token: the last writer wins.
    pub async fn upsert(
        pool: &PgPool,
        dashboard_id: DbId,
        layout: &serde_json::Value,
    ) -> Result<LayoutDocument, sqlx::Error> {
        let query = format!(
            "INSERT INTO config_layouts (dashboard_id, layout) \
             VALUES ($1, $2) \
             ON CONFLICT (dashboard_id) DO UPDATE \
             SET layout = EXCLUDED.layout, \
                 updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LayoutDocument>(&query)
            .bind(dashboard_id)
            .bind(Json(layout))
            .fetch_one(pool)
            .await
    }
}

//! Repository for the `dashboards` table.

use std::collections::HashMap;

use plexus_core::types::DbId;
use sqlx::PgPool;

use crate::models::dashboard::{Dashboard, DashboardWithWidgets, NewDashboard};
use crate::repositories::WidgetRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, widget_ids, created_at, updated_at";

/// Provides CRUD operations for dashboards.
pub struct DashboardRepo;

impl DashboardRepo {
    /// Insert a new dashboard, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewDashboard) -> Result<Dashboard, sqlx::Error> {
        let query = format!(
            "INSERT INTO dashboards (name, widget_ids)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Dashboard>(&query)
            .bind(&input.name)
            .bind(&input.widget_ids)
            .fetch_one(pool)
            .await
    }

    /// Find a dashboard by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Dashboard>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dashboards WHERE id = $1");
        sqlx::query_as::<_, Dashboard>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List dashboards in ascending id order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Dashboard>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dashboards ORDER BY id ASC");
        sqlx::query_as::<_, Dashboard>(&query).fetch_all(pool).await
    }

    /// List dashboards with their widgets expanded.
    ///
    /// The registry is loaded once and matched in memory, so the cost is two
    /// queries regardless of the number of dashboards.
    pub async fn list_with_widgets(
        pool: &PgPool,
    ) -> Result<Vec<DashboardWithWidgets>, sqlx::Error> {
        let dashboards = Self::list(pool).await?;
        let widgets = WidgetRepo::list(pool).await?;
        let by_id: HashMap<DbId, _> = widgets.iter().map(|w| (w.id, w)).collect();

        Ok(dashboards
            .into_iter()
            .map(|d| DashboardWithWidgets::expand(d, &by_id))
            .collect())
    }

    /// Delete a dashboard, returning the removed row. Its layout document is
    /// removed by `ON DELETE CASCADE`; referenced widgets are untouched.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Dashboard>, sqlx::Error> {
        let query = format!("DELETE FROM dashboards WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Dashboard>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

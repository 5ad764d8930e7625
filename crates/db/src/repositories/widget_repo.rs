//! Repository for the `widgets` table.

use plexus_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::widget::{NewWidget, Widget};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, widget_type, name, title, colors, style, size, display_name, \
                        created_at, updated_at";

/// Provides CRUD operations for the widget registry.
pub struct WidgetRepo;

impl WidgetRepo {
    /// Insert a new widget, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewWidget) -> Result<Widget, sqlx::Error> {
        let query = format!(
            "INSERT INTO widgets (widget_type, name, title, colors, style, size, display_name)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Widget>(&query)
            .bind(input.widget_type.as_str())
            .bind(&input.name)
            .bind(&input.title)
            .bind(input.colors.as_ref().map(Json))
            .bind(input.style.as_ref().map(Json))
            .bind(input.size.map(Json))
            .bind(&input.display_name)
            .fetch_one(pool)
            .await
    }

    /// List every widget in ascending id order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Widget>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM widgets ORDER BY id ASC");
        sqlx::query_as::<_, Widget>(&query).fetch_all(pool).await
    }

    /// Live widgets referenced by a dashboard, in ascending id order.
    ///
    /// Returns an empty list when the dashboard does not exist or references
    /// nothing. Dangling ids are skipped.
    pub async fn list_for_dashboard(
        pool: &PgPool,
        dashboard_id: DbId,
    ) -> Result<Vec<Widget>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM widgets
             WHERE id = ANY(SELECT unnest(widget_ids) FROM dashboards WHERE id = $1)
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, Widget>(&query)
            .bind(dashboard_id)
            .fetch_all(pool)
            .await
    }

    /// Replace every field of a widget.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn replace(
        pool: &PgPool,
        id: DbId,
        input: &NewWidget,
    ) -> Result<Option<Widget>, sqlx::Error> {
        let query = format!(
            "UPDATE widgets SET
                widget_type = $2,
                name = $3,
                title = $4,
                colors = $5,
                style = $6,
                size = $7,
                display_name = $8
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Widget>(&query)
            .bind(id)
            .bind(input.widget_type.as_str())
            .bind(&input.name)
            .bind(&input.title)
            .bind(input.colors.as_ref().map(Json))
            .bind(input.style.as_ref().map(Json))
            .bind(input.size.map(Json))
            .bind(&input.display_name)
            .fetch_optional(pool)
            .await
    }

    /// Delete a widget, returning the removed row.
    ///
    /// Dashboards keep the dangling id; readers filter it out.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Widget>, sqlx::Error> {
        let query = format!("DELETE FROM widgets WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Widget>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

//! Dashboard model and DTOs.

use std::collections::HashMap;

use plexus_core::error::CoreError;
use plexus_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::widget::Widget;

/// A row from the `dashboards` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Dashboard {
    pub id: DbId,
    pub name: String,
    /// Referenced widget ids, in the order they were chosen.
    pub widget_ids: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A dashboard with its referenced widgets expanded.
///
/// Ids that no longer resolve to a widget are left out of `widgets`.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardWithWidgets {
    #[serde(flatten)]
    pub dashboard: Dashboard,
    pub widgets: Vec<Widget>,
}

impl DashboardWithWidgets {
    pub fn expand(dashboard: Dashboard, widgets_by_id: &HashMap<DbId, &Widget>) -> Self {
        let widgets = dashboard
            .widget_ids
            .iter()
            .filter_map(|id| widgets_by_id.get(id).map(|w| (*w).clone()))
            .collect();
        Self { dashboard, widgets }
    }
}

/// Request body for `POST /dashboards`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateDashboard {
    pub name: Option<String>,
    #[serde(default, alias = "widgets")]
    pub widget_ids: Option<Vec<DbId>>,
}

/// A validated dashboard, ready to insert.
#[derive(Debug, Clone)]
pub struct NewDashboard {
    pub name: String,
    pub widget_ids: Vec<DbId>,
}

impl CreateDashboard {
    pub fn validate(self) -> Result<NewDashboard, CoreError> {
        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| CoreError::Validation("Dashboard name is required".into()))?;
        Ok(NewDashboard {
            name,
            widget_ids: self.widget_ids.unwrap_or_default(),
        })
    }
}

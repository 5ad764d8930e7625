//! Wire types returned and accepted by the Plexus API.

use plexus_core::layout::{LayoutSource, LayoutWidget, WidgetDescriptor};
use plexus_core::types::{DbId, Timestamp};
use plexus_core::widget::{Size, StyleMap, WidgetColors};
use serde::{Deserialize, Serialize};

/// Public user fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
}

/// Body of a successful signup or login.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MeResponse {
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub db_healthy: bool,
}

/// A widget registry entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Widget {
    pub id: DbId,
    #[serde(rename = "type")]
    pub widget_type: String,
    pub name: String,
    pub title: Option<String>,
    pub colors: Option<WidgetColors>,
    pub style: Option<StyleMap>,
    pub size: Option<Size>,
    pub display_name: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl LayoutWidget for Widget {
    fn widget_id(&self) -> DbId {
        self.id
    }

    fn widget_type(&self) -> &str {
        &self.widget_type
    }

    fn label(&self) -> Option<&str> {
        self.title
            .as_deref()
            .or(self.display_name.as_deref())
            .or(Some(self.name.as_str()))
    }

    fn style(&self) -> Option<&StyleMap> {
        self.style.as_ref()
    }

    fn size(&self) -> Option<Size> {
        self.size
    }
}

/// Body for creating or replacing a widget.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WidgetInput {
    #[serde(rename = "type")]
    pub widget_type: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<WidgetColors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl WidgetInput {
    pub fn new(widget_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            widget_type: widget_type.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Dashboard {
    pub id: DbId,
    pub name: String,
    pub widget_ids: Vec<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A dashboard with its referenced widgets expanded.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardWithWidgets {
    #[serde(flatten)]
    pub dashboard: Dashboard,
    pub widgets: Vec<Widget>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CreateDashboard<'a> {
    pub name: &'a str,
    pub widget_ids: &'a [DbId],
}

/// A dashboard's stored layout document.
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutDocument {
    pub id: DbId,
    pub dashboard_id: DbId,
    pub layout: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Server-side resolution of a dashboard.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolvedDashboard {
    pub dashboard_id: DbId,
    pub source: LayoutSource,
    pub descriptors: Vec<WidgetDescriptor>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct MessageResponse {
    pub message: String,
}

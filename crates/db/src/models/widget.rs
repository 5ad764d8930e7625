//! Widget registry model and DTOs.

use plexus_core::error::CoreError;
use plexus_core::layout::LayoutWidget;
use plexus_core::types::{DbId, Timestamp};
use plexus_core::widget::{validate_widget_fields, Size, StyleMap, WidgetColors, WidgetType};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `widgets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Widget {
    pub id: DbId,
    #[serde(rename = "type")]
    pub widget_type: String,
    pub name: String,
    pub title: Option<String>,
    pub colors: Option<Json<WidgetColors>>,
    pub style: Option<Json<StyleMap>>,
    pub size: Option<Json<Size>>,
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
        self.style.as_ref().map(|s| &s.0)
    }

    fn size(&self) -> Option<Size> {
        self.size.as_ref().map(|s| s.0)
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Request body for creating or replacing a widget.
///
/// Every field is optional at the wire level so that a missing `type` or
/// `name` surfaces as a validation error rather than a decode failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WidgetInput {
    #[serde(rename = "type")]
    pub widget_type: Option<String>,
    pub name: Option<String>,
    pub title: Option<String>,
    pub colors: Option<WidgetColors>,
    pub style: Option<StyleMap>,
    pub size: Option<Size>,
    #[serde(alias = "widgetName", alias = "displayName")]
    pub display_name: Option<String>,
}

/// A validated widget definition, ready to insert or to replace a row with.
#[derive(Debug, Clone)]
pub struct NewWidget {
    pub widget_type: WidgetType,
    pub name: String,
    pub title: Option<String>,
    pub colors: Option<WidgetColors>,
    pub style: Option<StyleMap>,
    pub size: Option<Size>,
    pub display_name: Option<String>,
}

impl WidgetInput {
    /// Check the required fields and normalise blank optional text to `None`.
    pub fn validate(self) -> Result<NewWidget, CoreError> {
        let widget_type =
            validate_widget_fields(self.widget_type.as_deref(), self.name.as_deref())?;
        Ok(NewWidget {
            widget_type,
            name: self.name.unwrap_or_default().trim().to_string(),
            title: non_blank(self.title),
            colors: self.colors,
            style: self.style,
            size: self.size,
            display_name: non_blank(self.display_name),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

//! Widget value types and registry validation.
//!
//! A widget is a reusable definition (KPI card, chart or table) referenced by
//! id from dashboards. These types are shared by the registry rows in
//! `plexus-db`, the layout resolver and the client.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// Free-form style bag (`{"background": "#fff", "fontSize": 14}`).
pub type StyleMap = serde_json::Map<String, serde_json::Value>;

/// Valid values for a widget's `type` column.
pub const VALID_WIDGET_TYPES: &[&str] = &["kpi", "chart", "table"];

/// Default rendered size for charts.
pub const DEFAULT_CHART_SIZE: Size = Size {
    width: 600.0,
    height: 300.0,
};

/// Default rendered size for KPI cards, tables and unknown types.
pub const DEFAULT_TILE_SIZE: Size = Size {
    width: 300.0,
    height: 200.0,
};

/// The kind of visual a widget renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetType {
    Kpi,
    Chart,
    Table,
}

impl WidgetType {
    pub fn as_str(self) -> &'static str {
        match self {
            WidgetType::Kpi => "kpi",
            WidgetType::Chart => "chart",
            WidgetType::Table => "table",
        }
    }

    /// Parse a stored or submitted type string. Matching is exact.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "kpi" => Ok(WidgetType::Kpi),
            "chart" => Ok(WidgetType::Chart),
            "table" => Ok(WidgetType::Table),
            other => Err(CoreError::Validation(format!(
                "Unknown widget type '{other}'. Must be one of: {}",
                VALID_WIDGET_TYPES.join(", ")
            ))),
        }
    }

    pub fn default_size(self) -> Size {
        match self {
            WidgetType::Chart => DEFAULT_CHART_SIZE,
            WidgetType::Kpi | WidgetType::Table => DEFAULT_TILE_SIZE,
        }
    }
}

impl std::fmt::Display for WidgetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default size for a type string that may not be one of the known types.
///
/// Placements carry their type verbatim, so an unrecognised type still
/// renders at the tile size instead of failing.
pub fn default_size_for(widget_type: &str) -> Size {
    WidgetType::parse(widget_type)
        .map(WidgetType::default_size)
        .unwrap_or(DEFAULT_TILE_SIZE)
}

/// Rendered dimensions in pixels.
///
/// Drag-resizing produces fractional values; they are kept as written.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    #[serde(serialize_with = "write_pixels", deserialize_with = "pixels")]
    pub width: f64,
    #[serde(serialize_with = "write_pixels", deserialize_with = "pixels")]
    pub height: f64,
}

impl Size {
    pub fn new(width: impl Into<f64>, height: impl Into<f64>) -> Self {
        Self {
            width: width.into(),
            height: height.into(),
        }
    }
}

fn pixels<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value < 0.0 {
        return Err(serde::de::Error::custom(
            "size dimensions must be non-negative numbers",
        ));
    }
    Ok(value)
}

/// Largest magnitude below which every integer is exactly representable.
const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Write whole pixel values as JSON integers, everything else as floats.
pub(crate) fn write_pixels<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < EXACT_INTEGER_LIMIT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Widget colour setting: a single colour or an ordered palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WidgetColors {
    Single(String),
    Palette(Vec<String>),
}

/// Validate the required registry fields of a widget create/update request.
///
/// Returns the parsed type on success.
pub fn validate_widget_fields(
    widget_type: Option<&str>,
    name: Option<&str>,
) -> Result<WidgetType, CoreError> {
    let widget_type = widget_type.map(str::trim).filter(|s| !s.is_empty());
    let name = name.map(str::trim).filter(|s| !s.is_empty());
    match (widget_type, name) {
        (Some(widget_type), Some(_)) => WidgetType::parse(widget_type),
        _ => Err(CoreError::Validation(
            "Widget type and name are required".into(),
        )),
    }
}

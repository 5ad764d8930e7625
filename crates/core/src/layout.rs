//! Dashboard layout documents and their resolution against the widget registry.
//!
//! A stored layout is either a *legacy* list of widget ids or a *rich* list of
//! [`Placement`] records. Both shapes share one JSONB column and carry no
//! version tag: the first element decides. A JSON object with a truthy
//! `type` key marks the whole payload as rich; anything else is read as ids.
//!
//! [`resolve`] merges a payload with the live widgets of a dashboard and never
//! mutates either input.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::CoreError;
use crate::types::DbId;
use crate::widget::{default_size_for, write_pixels, Size, StyleMap};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("Layout must be a JSON array")]
    NotAnArray,

    #[error(
        "Layout entry {index} is not a {expected}; mixed or unrecognised layout shapes are not supported"
    )]
    UnexpectedEntry { index: usize, expected: &'static str },

    #[error("Layout entry {index} is not a valid placement: {reason}")]
    InvalidPlacement { index: usize, reason: String },

    #[error("Layout is not valid JSON: {0}")]
    Malformed(String),

    #[error("Index {index} is out of range for an arrangement of {len} widgets")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Widget template {0} not found")]
    UnknownTemplate(DbId),
}

impl From<LayoutError> for CoreError {
    fn from(err: LayoutError) -> Self {
        match err {
            LayoutError::UnknownTemplate(id) => CoreError::NotFound {
                entity: "Widget",
                id,
            },
            other => CoreError::Validation(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Placement records
// ---------------------------------------------------------------------------

/// Position of the resize handle relative to the widget's bottom-right corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HandlePosition {
    #[serde(
        default,
        serialize_with = "write_offset",
        skip_serializing_if = "Option::is_none"
    )]
    pub right: Option<f64>,
    #[serde(
        default,
        serialize_with = "write_offset",
        skip_serializing_if = "Option::is_none"
    )]
    pub bottom: Option<f64>,
}

fn write_offset<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(offset) => write_pixels(offset, serializer),
        None => serializer.serialize_none(),
    }
}

impl HandlePosition {
    /// Overwrite the fields present in `update`, keep the rest.
    pub fn merge(&mut self, update: HandlePosition) {
        if let Some(right) = update.right {
            self.right = Some(right);
        }
        if let Some(bottom) = update.bottom {
            self.bottom = Some(bottom);
        }
    }
}

/// Dashboard-local overrides carried by a [`Placement`].
///
/// Keys this type does not know about are kept in `extra` and written back
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(
        default,
        rename = "handlePosition",
        skip_serializing_if = "Option::is_none"
    )]
    pub handle_position: Option<HandlePosition>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Key a placement's widget reference was stored under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdKey {
    #[default]
    Id,
    WidgetId,
}

/// One entry of a rich layout: a widget reference plus its overrides.
///
/// The reference is read from `id`, or from `widget_id` when `id` is absent,
/// and written back under the same key. `widget_type` is kept verbatim so a
/// payload round-trips exactly, even for types the registry no longer
/// accepts. Snapshot fields written by older editors (`name`, `title`,
/// `colors`, ...) live in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PlacementRecord", into = "PlacementRecord")]
pub struct Placement {
    pub id: DbId,
    pub widget_type: String,
    pub props: Option<PlacementProps>,
    pub extra: Map<String, Value>,
    id_key: IdKey,
    /// `props` was stored as an explicit `null`.
    null_props: bool,
}

/// Wire shape of a [`Placement`].
#[derive(Serialize, Deserialize)]
struct PlacementRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<DbId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    widget_id: Option<DbId>,
    #[serde(rename = "type")]
    widget_type: String,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    props: Option<Option<PlacementProps>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Distinguish an explicit `null` from an absent key.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl TryFrom<PlacementRecord> for Placement {
    type Error = String;

    fn try_from(record: PlacementRecord) -> Result<Self, Self::Error> {
        let mut extra = record.extra;
        let (id, id_key) = match (record.id, record.widget_id) {
            (Some(id), widget_id) => {
                if let Some(widget_id) = widget_id {
                    extra.insert("widget_id".into(), widget_id.into());
                }
                (id, IdKey::Id)
            }
            (None, Some(widget_id)) => (widget_id, IdKey::WidgetId),
            (None, None) => return Err("missing field `id`".into()),
        };

        Ok(Self {
            id,
            widget_type: record.widget_type,
            null_props: matches!(record.props, Some(None)),
            props: record.props.flatten(),
            extra,
            id_key,
        })
    }
}

impl From<Placement> for PlacementRecord {
    fn from(placement: Placement) -> Self {
        let (id, widget_id) = match placement.id_key {
            IdKey::Id => (Some(placement.id), None),
            IdKey::WidgetId => (None, Some(placement.id)),
        };
        let props = match placement.props {
            Some(props) => Some(Some(props)),
            None if placement.null_props => Some(None),
            None => None,
        };

        Self {
            id,
            widget_id,
            widget_type: placement.widget_type,
            props,
            extra: placement.extra,
        }
    }
}

impl Placement {
    pub fn new(id: DbId, widget_type: impl Into<String>) -> Self {
        Self {
            id,
            widget_type: widget_type.into(),
            props: None,
            extra: Map::new(),
            id_key: IdKey::Id,
            null_props: false,
        }
    }

    /// Key the widget reference is written under.
    pub fn id_key(&self) -> IdKey {
        self.id_key
    }

    /// A placement standing for a registry widget with no overrides.
    pub fn from_widget<W: LayoutWidget + ?Sized>(widget: &W) -> Self {
        Self::new(widget.widget_id(), widget.widget_type())
    }

    /// Mutable access to the props bag, creating an empty one if absent.
    pub fn props_mut(&mut self) -> &mut PlacementProps {
        self.null_props = false;
        self.props.get_or_insert_with(PlacementProps::default)
    }

    /// Label stored inside an old-style widget snapshot, if any.
    fn snapshot_label(&self) -> Option<&str> {
        ["title", "name"]
            .iter()
            .find_map(|key| self.extra.get(*key).and_then(Value::as_str))
    }
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// Which stored shape a payload (or a resolution) came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutSource {
    /// No layout document, or an empty one: registry order.
    Registry,
    /// A bare list of widget ids.
    Legacy,
    /// A list of placement records.
    Rich,
}

/// A decoded layout document body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LayoutPayload {
    Legacy(Vec<DbId>),
    Rich(Vec<Placement>),
}

impl LayoutPayload {
    /// Decode a JSON array, choosing the shape from its first element.
    ///
    /// An empty array decodes as an empty legacy payload.
    pub fn from_value(value: &Value) -> Result<Self, LayoutError> {
        let items = value.as_array().ok_or(LayoutError::NotAnArray)?;
        let Some(first) = items.first() else {
            return Ok(LayoutPayload::Legacy(Vec::new()));
        };

        if is_rich_entry(first) {
            items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    if !is_rich_entry(item) {
                        return Err(LayoutError::UnexpectedEntry {
                            index,
                            expected: "placement record",
                        });
                    }
                    Placement::deserialize(item).map_err(|e| LayoutError::InvalidPlacement {
                        index,
                        reason: e.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(LayoutPayload::Rich)
        } else {
            items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    legacy_id(item).ok_or(LayoutError::UnexpectedEntry {
                        index,
                        expected: "widget id",
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(LayoutPayload::Legacy)
        }
    }

    /// Decode a value read from (or about to be written to) the layout column.
    ///
    /// Accepts both decoded JSON and a JSON string holding the encoded layout.
    pub fn from_stored(value: Value) -> Result<Self, LayoutError> {
        Self::from_value(&decode_stored(value)?)
    }

    pub fn source(&self) -> LayoutSource {
        match self {
            LayoutPayload::Legacy(_) => LayoutSource::Legacy,
            LayoutPayload::Rich(_) => LayoutSource::Rich,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            LayoutPayload::Legacy(ids) => ids.len(),
            LayoutPayload::Rich(placements) => placements.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'de> Deserialize<'de> for LayoutPayload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        LayoutPayload::from_value(&value).map_err(serde::de::Error::custom)
    }
}

/// Unwrap a string-encoded layout; pass any other JSON through unchanged.
pub fn decode_stored(value: Value) -> Result<Value, LayoutError> {
    match value {
        Value::String(encoded) => {
            serde_json::from_str(&encoded).map_err(|e| LayoutError::Malformed(e.to_string()))
        }
        other => Ok(other),
    }
}

/// An object whose `type` is truthy: a non-empty string, `true`, a non-zero
/// number, or any array or object.
fn is_rich_entry(value: &Value) -> bool {
    match value.as_object().and_then(|obj| obj.get("type")) {
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::Array(_) | Value::Object(_)) => true,
        Some(Value::Null) | None => false,
    }
}

/// Legacy ids were compared as strings by earlier clients, so numeric strings
/// are accepted alongside integers.
fn legacy_id(value: &Value) -> Option<DbId> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// What the resolver needs to know about a live registry widget.
pub trait LayoutWidget {
    fn widget_id(&self) -> DbId;
    fn widget_type(&self) -> &str;
    /// Human-facing label (title, display name or name).
    fn label(&self) -> Option<&str>;
    fn style(&self) -> Option<&StyleMap>;
    fn size(&self) -> Option<Size>;

    /// Props copied onto a new placement created from this widget.
    fn template_props(&self) -> PlacementProps {
        PlacementProps {
            style: self.style().cloned(),
            size: self.size(),
            ..PlacementProps::default()
        }
    }
}

/// Outcome of [`resolve`], tagged by the shape it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedLayout<W> {
    /// Live widgets in ascending id order.
    Registry(Vec<W>),
    /// Live widgets in legacy payload order, missing ids dropped.
    Ordered(Vec<W>),
    /// Rich placements exactly as stored.
    Placements(Vec<Placement>),
}

impl<W> ResolvedLayout<W> {
    pub fn source(&self) -> LayoutSource {
        match self {
            ResolvedLayout::Registry(_) => LayoutSource::Registry,
            ResolvedLayout::Ordered(_) => LayoutSource::Legacy,
            ResolvedLayout::Placements(_) => LayoutSource::Rich,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ResolvedLayout::Registry(widgets) | ResolvedLayout::Ordered(widgets) => widgets.len(),
            ResolvedLayout::Placements(placements) => placements.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Merge a dashboard's layout document with its live widgets.
///
/// `live` is the bulk-fetched widget set for the dashboard. It is indexed once
/// and matched in memory.
pub fn resolve<W: LayoutWidget + Clone>(
    layout: Option<&LayoutPayload>,
    live: &[W],
) -> ResolvedLayout<W> {
    match layout {
        Some(LayoutPayload::Rich(placements)) if !placements.is_empty() => {
            ResolvedLayout::Placements(placements.clone())
        }
        Some(LayoutPayload::Legacy(ids)) if !ids.is_empty() => {
            let by_id = index_by_id(live);
            ResolvedLayout::Ordered(
                ids.iter()
                    .filter_map(|id| by_id.get(id).map(|w| (*w).clone()))
                    .collect(),
            )
        }
        _ => {
            let mut widgets = live.to_vec();
            widgets.sort_by_key(|w| w.widget_id());
            ResolvedLayout::Registry(widgets)
        }
    }
}

fn index_by_id<W: LayoutWidget>(live: &[W]) -> HashMap<DbId, &W> {
    live.iter().map(|w| (w.widget_id(), w)).collect()
}

// ---------------------------------------------------------------------------
// Render descriptors
// ---------------------------------------------------------------------------

/// A render-ready widget: everything a KPI/chart/table view needs to lay
/// itself out, with placement overrides already applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetDescriptor {
    pub id: DbId,
    #[serde(rename = "type")]
    pub widget_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleMap>,
    pub size: Size,
    #[serde(
        default,
        rename = "handlePosition",
        skip_serializing_if = "Option::is_none"
    )]
    pub handle_position: Option<HandlePosition>,
    /// `true` when a rich placement has no matching live widget.
    #[serde(default)]
    pub detached: bool,
}

impl WidgetDescriptor {
    fn from_widget<W: LayoutWidget>(widget: &W) -> Self {
        Self {
            id: widget.widget_id(),
            widget_type: widget.widget_type().to_string(),
            title: widget.label().map(str::to_string),
            style: widget.style().cloned(),
            size: widget
                .size()
                .unwrap_or_else(|| default_size_for(widget.widget_type())),
            handle_position: None,
            detached: false,
        }
    }

    fn from_placement<W: LayoutWidget>(placement: &Placement, live: Option<&W>) -> Self {
        let props = placement.props.as_ref();
        let style = props
            .and_then(|p| p.style.clone())
            .or_else(|| live.and_then(|w| w.style().cloned()));
        let size = props
            .and_then(|p| p.size)
            .or_else(|| live.and_then(|w| w.size()))
            .unwrap_or_else(|| default_size_for(&placement.widget_type));
        let title = live
            .and_then(|w| w.label())
            .or_else(|| placement.snapshot_label())
            .map(str::to_string);

        Self {
            id: placement.id,
            widget_type: placement.widget_type.clone(),
            title,
            style,
            size,
            handle_position: props.and_then(|p| p.handle_position),
            detached: live.is_none(),
        }
    }
}

impl<W: LayoutWidget> ResolvedLayout<W> {
    /// Flatten into render-ready descriptors, in resolved order.
    ///
    /// For placements, `props.style` and `props.size` win over the matching
    /// live widget's stored values.
    pub fn descriptors(&self, live: &[W]) -> Vec<WidgetDescriptor> {
        match self {
            ResolvedLayout::Registry(widgets) | ResolvedLayout::Ordered(widgets) => {
                widgets.iter().map(WidgetDescriptor::from_widget).collect()
            }
            ResolvedLayout::Placements(placements) => {
                let by_id = index_by_id(live);
                placements
                    .iter()
                    .map(|p| WidgetDescriptor::from_placement(p, by_id.get(&p.id).copied()))
                    .collect()
            }
        }
    }
}

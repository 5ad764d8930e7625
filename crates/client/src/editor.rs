//! Layout editing against a live server.

use plexus_core::editor::Arrangement;
use plexus_core::layout::{
    resolve, HandlePosition, LayoutError, LayoutPayload, LayoutSource, ResolvedLayout,
    WidgetDescriptor,
};
use plexus_core::types::DbId;
use plexus_core::widget::Size;

use crate::api::ApiClient;
use crate::error::ClientError;
use crate::models::{LayoutDocument, Widget};

/// One dashboard opened in the layout editor.
///
/// Holds the dashboard's live widgets and the arrangement being edited.
/// Mutations mark the session dirty until the next [`save`](Self::save).
#[derive(Debug, Clone)]
pub struct EditorSession {
    dashboard_id: DbId,
    live: Vec<Widget>,
    source: LayoutSource,
    arrangement: Arrangement,
    dirty: bool,
}

impl EditorSession {
    /// Fetch the live widgets and the stored layout of `dashboard_id` and
    /// resolve them.
    ///
    /// Fetch failures other than missing credentials open an empty or
    /// registry-ordered session instead of failing: no live widgets if those
    /// could not be fetched, no layout if it could not be fetched or decoded.
    pub async fn load(client: &ApiClient, dashboard_id: DbId) -> Result<Self, ClientError> {
        let live = match client.dashboard_widgets(dashboard_id).await {
            Ok(live) => live,
            Err(e) if e.is_auth_failure() => return Err(e),
            Err(e) => {
                tracing::warn!(dashboard_id, error = %e, "Live widgets unavailable");
                Vec::new()
            }
        };

        let payload = match client.get_layout(dashboard_id).await {
            Ok(doc) => match LayoutPayload::from_stored(doc.layout) {
                Ok(payload) => Some(payload),
                Err(e) => {
                    tracing::debug!(dashboard_id, error = %e, "Stored layout unreadable");
                    None
                }
            },
            Err(e) => {
                tracing::debug!(dashboard_id, error = %e, "No layout fetched");
                None
            }
        };

        Ok(Self::new(dashboard_id, live, payload.as_ref()))
    }

    /// Open an editor from already-fetched parts.
    pub fn new(dashboard_id: DbId, live: Vec<Widget>, payload: Option<&LayoutPayload>) -> Self {
        let resolved = resolve(payload, &live);
        let source = resolved.source();
        let arrangement = Arrangement::from_resolved(resolved);
        Self {
            dashboard_id,
            live,
            source,
            arrangement,
            dirty: false,
        }
    }

    pub fn dashboard_id(&self) -> DbId {
        self.dashboard_id
    }

    /// Shape of the layout the session was opened from.
    pub fn source(&self) -> LayoutSource {
        self.source
    }

    pub fn live_widgets(&self) -> &[Widget] {
        &self.live
    }

    pub fn arrangement(&self) -> &Arrangement {
        &self.arrangement
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Render-ready descriptors for the current arrangement.
    pub fn descriptors(&self) -> Vec<WidgetDescriptor> {
        ResolvedLayout::<Widget>::Placements(self.arrangement.items().to_vec())
            .descriptors(&self.live)
    }

    /// Append a copy of the registry widget `template_id`.
    pub fn add_widget(&mut self, template_id: DbId, templates: &[Widget]) -> Result<DbId, LayoutError> {
        let id = self.arrangement.add_from_template(template_id, templates)?;
        self.dirty = true;
        Ok(id)
    }

    pub fn move_widget(&mut self, from: usize, to: usize) -> Result<(), LayoutError> {
        self.arrangement.move_item(from, to)?;
        self.dirty |= from != to;
        Ok(())
    }

    pub fn resize(&mut self, index: usize, size: Size) -> Result<(), LayoutError> {
        self.arrangement.resize(index, size)?;
        self.dirty = true;
        Ok(())
    }

    pub fn adjust_handle_position(
        &mut self,
        index: usize,
        update: HandlePosition,
    ) -> Result<(), LayoutError> {
        self.arrangement.adjust_handle_position(index, update)?;
        self.dirty = true;
        Ok(())
    }

    pub fn remove_widget(&mut self, index: usize) -> Result<(), LayoutError> {
        self.arrangement.remove(index)?;
        self.dirty = true;
        Ok(())
    }

    /// Upsert the arrangement as the dashboard's layout. Always writes the
    /// rich shape.
    pub async fn save(&mut self, client: &ApiClient) -> Result<LayoutDocument, ClientError> {
        let doc = client
            .save_layout(self.dashboard_id, &self.arrangement.to_payload())
            .await?;
        self.source = LayoutSource::Rich;
        self.dirty = false;
        tracing::info!(
            dashboard_id = self.dashboard_id,
            entries = self.arrangement.len(),
            "Layout saved"
        );
        Ok(doc)
    }
}

//! In-memory layout editing.
//!
//! An [`Arrangement`] is the editor's working copy of a dashboard layout. The
//! mutation primitives touch only the addressed placement and keep the
//! relative order of everything else. Saving always produces a rich payload,
//! whatever shape was read.

use crate::layout::{HandlePosition, LayoutError, LayoutPayload, LayoutWidget, Placement, ResolvedLayout};
use crate::types::DbId;
use crate::widget::Size;

/// Ordered placements being edited for one dashboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arrangement {
    items: Vec<Placement>,
}

impl Arrangement {
    pub fn new(items: Vec<Placement>) -> Self {
        Self { items }
    }

    /// Start editing from a resolved layout.
    ///
    /// Registry and legacy widgets become override-free placements keyed by
    /// their widget id; rich placements are taken as they are.
    pub fn from_resolved<W: LayoutWidget>(resolved: ResolvedLayout<W>) -> Self {
        let items = match resolved {
            ResolvedLayout::Registry(widgets) | ResolvedLayout::Ordered(widgets) => {
                widgets.iter().map(Placement::from_widget).collect()
            }
            ResolvedLayout::Placements(placements) => placements,
        };
        Self { items }
    }

    pub fn items(&self) -> &[Placement] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Local id for the next added placement: highest existing id + 1, or 1.
    pub fn next_id(&self) -> DbId {
        self.items.iter().map(|p| p.id).max().map_or(1, |max| max + 1)
    }

    /// Append a placement copied from `template`. Returns the new local id.
    pub fn add<W: LayoutWidget + ?Sized>(&mut self, template: &W) -> DbId {
        let id = self.next_id();
        let mut placement = Placement::new(id, template.widget_type());
        placement.props = Some(template.template_props());
        self.items.push(placement);
        id
    }

    /// Append a placement copied from the template with id `template_id`.
    pub fn add_from_template<W: LayoutWidget>(
        &mut self,
        template_id: DbId,
        templates: &[W],
    ) -> Result<DbId, LayoutError> {
        let template = templates
            .iter()
            .find(|w| w.widget_id() == template_id)
            .ok_or(LayoutError::UnknownTemplate(template_id))?;
        Ok(self.add(template))
    }

    /// Move the placement at `from` to `to`, shifting the ones in between.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<(), LayoutError> {
        self.check_index(from)?;
        self.check_index(to)?;
        if from != to {
            let item = self.items.remove(from);
            self.items.insert(to, item);
        }
        Ok(())
    }

    /// Replace `props.size` of one placement.
    pub fn resize(&mut self, index: usize, size: Size) -> Result<(), LayoutError> {
        self.get_mut(index)?.props_mut().size = Some(size);
        Ok(())
    }

    /// Merge `update` into `props.handlePosition` of one placement.
    pub fn adjust_handle_position(
        &mut self,
        index: usize,
        update: HandlePosition,
    ) -> Result<(), LayoutError> {
        self.get_mut(index)?
            .props_mut()
            .handle_position
            .get_or_insert_with(HandlePosition::default)
            .merge(update);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<Placement, LayoutError> {
        self.check_index(index)?;
        Ok(self.items.remove(index))
    }

    /// Serialize for saving. Always rich.
    pub fn to_payload(&self) -> LayoutPayload {
        LayoutPayload::Rich(self.items.clone())
    }

    pub fn into_payload(self) -> LayoutPayload {
        LayoutPayload::Rich(self.items)
    }

    fn check_index(&self, index: usize) -> Result<(), LayoutError> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(LayoutError::IndexOutOfRange {
                index,
                len: self.items.len(),
            })
        }
    }

    fn get_mut(&mut self, index: usize) -> Result<&mut Placement, LayoutError> {
        let len = self.items.len();
        self.items
            .get_mut(index)
            .ok_or(LayoutError::IndexOutOfRange { index, len })
    }
}

//! Ordered layer stack: the compositor hosts drive.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use facetview_core::{FacetKind, Region};

use crate::buffer::PixelBuffer;
use crate::layer::{FacetLayer, LayerId, RenderError};

/// One slot of a [`LayerStack`].
#[derive(Clone)]
pub struct StackEntry {
    pub layer: Arc<dyn FacetLayer>,
    pub visible: bool,
}

impl fmt::Debug for StackEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackEntry")
            .field("id", &self.layer.id())
            .field("name", &self.layer.name())
            .field("visible", &self.visible)
            .finish()
    }
}

/// Layers in draw order: index 0 is drawn first, the last entry ends up on top.
#[derive(Debug, Clone, Default)]
pub struct LayerStack {
    entries: Vec<StackEntry>,
}

impl LayerStack {
    /// An empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a visible layer on top.
    pub fn push(&mut self, layer: Arc<dyn FacetLayer>) -> LayerId {
        let id = layer.id();
        self.entries.push(StackEntry {
            layer,
            visible: true,
        });
        id
    }

    /// Inserts a visible layer at `index`, clamped to the stack length.
    pub fn insert(&mut self, index: usize, layer: Arc<dyn FacetLayer>) -> LayerId {
        let id = layer.id();
        let index = index.min(self.entries.len());
        self.entries.insert(
            index,
            StackEntry {
                layer,
                visible: true,
            },
        );
        id
    }

    /// Removes a layer by id and hands it back.
    pub fn remove(&mut self, id: LayerId) -> Option<Arc<dyn FacetLayer>> {
        let index = self.position(id)?;
        Some(self.entries.remove(index).layer)
    }

    /// Moves the entry at `from` so it ends up at `to`. Returns `false` when
    /// `from` is out of range; `to` is clamped.
    pub fn move_layer(&mut self, from: usize, to: usize) -> bool {
        if from >= self.entries.len() {
            return false;
        }
        let entry = self.entries.remove(from);
        let to = to.min(self.entries.len());
        self.entries.insert(to, entry);
        true
    }

    /// Draw-order index of a layer.
    pub fn position(&self, id: LayerId) -> Option<usize> {
        self.entries.iter().position(|e| e.layer.id() == id)
    }

    /// Look up a layer by id.
    pub fn get(&self, id: LayerId) -> Option<&Arc<dyn FacetLayer>> {
        self.entries.iter().find(|e| e.layer.id() == id).map(|e| &e.layer)
    }

    /// All entries in draw order.
    pub fn entries(&self) -> &[StackEntry] {
        &self.entries
    }

    /// Number of layers, visible or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the stack holds no layers.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Visibility of a layer, or `None` if it is not in the stack.
    pub fn is_visible(&self, id: LayerId) -> Option<bool> {
        self.entries.iter().find(|e| e.layer.id() == id).map(|e| e.visible)
    }

    /// Returns `false` if no layer has this id.
    pub fn set_visible(&mut self, id: LayerId, visible: bool) -> bool {
        match self.entries.iter_mut().find(|e| e.layer.id() == id) {
            Some(entry) => {
                entry.visible = visible;
                true
            }
            None => false,
        }
    }

    /// Flips the visibility of a layer. Unknown ids are ignored.
    pub fn toggle_visibility(&mut self, id: LayerId) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.layer.id() == id) {
            entry.visible = !entry.visible;
        }
    }

    /// Shows or hides every layer.
    pub fn set_all_visible(&mut self, visible: bool) {
        for entry in &mut self.entries {
            entry.visible = visible;
        }
    }

    /// Visible layers in draw order.
    pub fn visible_layers(&self) -> impl DoubleEndedIterator<Item = &Arc<dyn FacetLayer>> {
        self.entries.iter().filter(|e| e.visible).map(|e| &e.layer)
    }

    /// Facet kinds a region must carry to render every visible layer.
    pub fn required_facets(&self) -> BTreeSet<FacetKind> {
        self.visible_layers().map(|l| l.facet_kind()).collect()
    }

    /// Renders every visible layer in order. Every layer checks the region
    /// first, so a missing or mistyped facet leaves the buffer untouched.
    pub fn render(&self, buffer: &mut PixelBuffer, region: &Region) -> Result<(), RenderError> {
        for layer in self.visible_layers() {
            layer.check_region(region)?;
        }
        for layer in self.visible_layers() {
            layer.render(buffer, region)?;
        }
        log::debug!(
            "Rendered {} of {} layers over {}",
            self.visible_layers().count(),
            self.entries.len(),
            region.bounds()
        );
        Ok(())
    }

    /// Text of the topmost visible layer that has something to say.
    pub fn world_text(&self, region: &Region, wx: i32, wz: i32) -> Result<Option<String>, RenderError> {
        for layer in self.visible_layers().rev() {
            if let Some(text) = layer.world_text(region, wx, wz)? {
                return Ok(Some(text));
            }
        }
        Ok(None)
    }

    /// `(name, text)` for every visible layer with a value, top first.
    pub fn world_text_all(
        &self,
        region: &Region,
        wx: i32,
        wz: i32,
    ) -> Result<Vec<(String, String)>, RenderError> {
        let mut out = Vec::new();
        for layer in self.visible_layers().rev() {
            if let Some(text) = layer.world_text(region, wx, wz)? {
                out.push((layer.name(), text));
            }
        }
        Ok(out)
    }
}

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ExplorerSettings;
use crate::error::{InvalidPatternError, SessionError};
use crate::geometry::{GraphSpace, Point, PointerSpace, Rect, Transform};
use crate::graph::MetadataGraph;
use crate::graph::layout::Layout;
use crate::graph::node::NodeAttribute;
use crate::query::search::{SearchScope, search_attributes, toggle_scope};
use crate::query::spatial::select_in_rect;
use crate::selection::gesture::BoxSelect;
use crate::selection::store::SelectionStore;

/// A discrete UI event, as recorded in a replay file (one JSON object per line).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum InputEvent {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },
    /// Escape while dragging a box.
    Cancel,
    /// Enter in the search field.
    Search { pattern: String },
    Expand,
    Contract,
    Clear,
    ClickNode { id: String },
    ToggleAttribute {
        key: String,
        #[serde(default)]
        modifier: bool,
    },
    /// The view controller panned or zoomed.
    SetTransform {
        translate_x: f64,
        translate_y: f64,
        scale: f64,
    },
    /// The layout engine moved a node.
    MoveNode { id: String, x: f64, y: f64 },
}

/// One interactive exploration session over a loaded graph.
///
/// Owns every piece of mutable view state the engine reads: the layout snapshot, the
/// pan/zoom transform, the box gesture, the search scope and the selection store.
/// Events are applied synchronously, one at a time.
pub struct Session {
    graph: Arc<MetadataGraph>,
    layout: Layout,
    transform: Transform,
    gesture: BoxSelect,
    scope: SearchScope,
    store: SelectionStore,
}

impl Session {
    pub fn new(graph: Arc<MetadataGraph>, layout: Layout, settings: ExplorerSettings) -> Self {
        let store = SelectionStore::new(Arc::clone(&graph), settings.group_key);
        Self {
            graph,
            layout,
            transform: Transform::IDENTITY,
            gesture: BoxSelect::Idle,
            scope: settings.search_scope,
            store,
        }
    }

    pub fn graph(&self) -> &MetadataGraph {
        &self.graph
    }

    pub fn store(&self) -> &SelectionStore {
        &self.store
    }

    /// Mutable access, e.g. to subscribe a renderer.
    pub fn store_mut(&mut self) -> &mut SelectionStore {
        &mut self.store
    }

    pub fn scope(&self) -> &SearchScope {
        &self.scope
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// The box being dragged, in pointer space, for the renderer to draw.
    pub fn pending_box(&self) -> Option<Rect<PointerSpace>> {
        self.gesture.pending()
    }

    /// Apply one event. Errors leave the selection exactly as it was.
    pub fn handle(&mut self, event: InputEvent) -> Result<(), SessionError> {
        match event {
            InputEvent::PointerDown { x, y } => self.gesture.begin(Point::new(x, y)),
            InputEvent::PointerMove { x, y } => {
                self.gesture.update(Point::new(x, y));
            }
            InputEvent::PointerUp { x, y } => {
                self.pointer_up(Point::new(x, y));
            }
            InputEvent::Cancel => {
                if self.gesture.cancel() {
                    debug!("box select cancelled");
                }
            }
            InputEvent::Search { pattern } => {
                self.search(&pattern)?;
            }
            InputEvent::Expand => self.store.expand(),
            InputEvent::Contract => self.store.contract(),
            InputEvent::Clear => self.store.clear(),
            InputEvent::ClickNode { id } => {
                let idx = self.graph.find(&id).ok_or(SessionError::UnknownNode(id))?;
                self.store.toggle(idx);
            }
            InputEvent::ToggleAttribute { key, modifier } => {
                let key: NodeAttribute = key.parse()?;
                self.scope = toggle_scope(&self.scope, key, modifier);
                debug!(scope = ?self.scope, "search scope changed");
            }
            InputEvent::SetTransform {
                translate_x,
                translate_y,
                scale,
            } => {
                if scale.is_nan() || scale <= 0.0 {
                    return Err(SessionError::InvalidScale(scale));
                }
                self.transform = Transform::new(translate_x, translate_y, scale);
            }
            InputEvent::MoveNode { id, x, y } => {
                let idx = self.graph.find(&id).ok_or(SessionError::UnknownNode(id))?;
                self.layout.set_position(idx, Point::new(x, y));
            }
        }
        Ok(())
    }

    /// Finish a box gesture: select what the box covers under the current transform.
    ///
    /// Returns the graph-space box, or `None` for a pointer-up without a box in progress.
    pub fn pointer_up(&mut self, at: Point<PointerSpace>) -> Option<Rect<GraphSpace>> {
        let rect = self.gesture.commit(at, &self.transform)?;
        let hits = select_in_rect(&self.graph, &self.layout, &rect);
        self.store.replace(hits);
        Some(rect)
    }

    /// Replace the selection with the search result over the current scope.
    ///
    /// On an invalid pattern the error is logged and returned and nothing changes.
    pub fn search(&mut self, pattern: &str) -> Result<usize, InvalidPatternError> {
        match search_attributes(&self.graph, pattern, &self.scope) {
            Ok(hits) => {
                let count = hits.len();
                self.store.replace(hits);
                Ok(count)
            }
            Err(err) => {
                warn!("{err}");
                Err(err)
            }
        }
    }
}

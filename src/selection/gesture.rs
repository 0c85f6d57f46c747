use tracing::debug;

use crate::geometry::{GraphSpace, Point, PointerSpace, Rect, Transform, to_graph_space};

/// Box-selection gesture: `Idle -> Dragging -> Idle`.
///
/// Only geometry lives here. Committing yields the graph-space box; running the
/// spatial query and replacing the selection is up to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum BoxSelect {
    #[default]
    Idle,
    Dragging {
        start: Point<PointerSpace>,
        current: Point<PointerSpace>,
    },
}

impl BoxSelect {
    pub fn is_dragging(&self) -> bool {
        matches!(self, BoxSelect::Dragging { .. })
    }

    /// Pointer down: start a new box at `at`. Restarts any box already in progress.
    pub fn begin(&mut self, at: Point<PointerSpace>) {
        debug!(x = at.x, y = at.y, "box select started");
        *self = BoxSelect::Dragging { start: at, current: at };
    }

    /// Pointer move: stretch the pending box to `at`. Ignored while idle.
    pub fn update(&mut self, at: Point<PointerSpace>) -> Option<Rect<PointerSpace>> {
        if let BoxSelect::Dragging { current, .. } = self {
            *current = at;
        }
        self.pending()
    }

    /// The box to draw while dragging.
    pub fn pending(&self) -> Option<Rect<PointerSpace>> {
        match *self {
            BoxSelect::Idle => None,
            BoxSelect::Dragging { start, current } => Some(Rect::from_corners(start, current)),
        }
    }

    /// Pointer up: finish the box at `at` and return it in graph space.
    ///
    /// Returns `None` for a stray pointer-up with no box in progress.
    pub fn commit(&mut self, at: Point<PointerSpace>, transform: &Transform) -> Option<Rect<GraphSpace>> {
        let BoxSelect::Dragging { start, .. } = std::mem::take(self) else {
            return None;
        };
        let rect = to_graph_space(Rect::from_corners(start, at), transform);
        debug!(?rect, "box select committed");
        Some(rect)
    }

    /// Abandon the box in progress. Returns `false` if there was none.
    pub fn cancel(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        *self = BoxSelect::Idle;
        was_dragging
    }
}

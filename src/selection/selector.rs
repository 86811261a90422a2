//! Interactive rectangular selection tracking.
//!
//! The selector mirrors the pointer gestures of a grid view: pointer-down
//! anchors a drag, pointer-enter moves the live corner while dragging, and
//! pointer-up commits. The committed pair is retained until the next drag,
//! and a completed drag yields its rectangle exactly once.

use crate::selection::range::{CellPos, CellRect};

/// Drag tracking states.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

/// Tracks an anchor-to-cursor rectangle over one rendered grid.
#[derive(Clone, Debug, Default)]
pub struct RangeSelector {
    state: DragState,
    start: Option<CellPos>,
    end: Option<CellPos>,
}

impl RangeSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current drag state.
    pub fn state(&self) -> DragState {
        self.state
    }

    /// Returns true while a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.state == DragState::Dragging
    }

    /// Pointer pressed over a cell: anchor a new drag there.
    pub fn pointer_down(&mut self, pos: CellPos) {
        self.state = DragState::Dragging;
        self.start = Some(pos);
        self.end = Some(pos);
    }

    /// Pointer entered a cell: move the live corner, anchor unchanged.
    /// Ignored unless a drag is in progress.
    pub fn pointer_enter(&mut self, pos: CellPos) {
        if self.is_dragging() {
            self.end = Some(pos);
        }
    }

    /// Pointer released anywhere: stop tracking and commit.
    ///
    /// Returns the committed rectangle for a completed drag, and None when no
    /// drag was in progress (a document-level release can fire either way).
    /// The committed pair stays readable through [`selection`](Self::selection).
    pub fn pointer_up(&mut self) -> Option<CellRect> {
        if !self.is_dragging() {
            return None;
        }
        self.state = DragState::Idle;
        self.selection()
    }

    /// The current rectangle, committed or in-progress.
    pub fn selection(&self) -> Option<CellRect> {
        Some(CellRect::from_corners(self.start?, self.end?))
    }

    /// Canonical range notation of the current rectangle.
    pub fn notation(&self) -> Option<String> {
        self.selection().map(|rect| rect.notation())
    }

    /// Forgets any selection, e.g. when a new workbook replaces the grid.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

//! Undo/Redo history.
//!
//! Every mutation of the sketch is a reversible [`Action`]. The history only
//! stores actions; applying them (`commit`) is the controller's job, so undo
//! hands back the inverse action and redo hands back the action itself.

use sk_core::model::{DrawingRegion, Stroke};

/// A reversible unit of history.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Insert `stroke` at `index` of the stroke list.
    Paint { stroke: Stroke, index: usize },
    /// Remove `stroke`, which sits at `index` of the stroke list.
    Erase { stroke: Stroke, index: usize },
    /// Replace the region `before` with `after`.
    RegionResize {
        before: DrawingRegion,
        after: DrawingRegion,
    },
}

impl Action {
    /// The action that exactly undoes this one.
    pub fn inverse(&self) -> Action {
        match self {
            Action::Paint { stroke, index } => Action::Erase {
                stroke: stroke.clone(),
                index: *index,
            },
            Action::Erase { stroke, index } => Action::Paint {
                stroke: stroke.clone(),
                index: *index,
            },
            Action::RegionResize { before, after } => Action::RegionResize {
                before: *after,
                after: *before,
            },
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Action::Paint { .. } => "paint stroke",
            Action::Erase { .. } => "erase stroke",
            Action::RegionResize { .. } => "resize region",
        }
    }
}

/// Undo/redo stacks with a bounded undo depth.
#[derive(Debug)]
pub struct History {
    /// Undo-pending actions, oldest first.
    done: Vec<Action>,
    /// Redo-pending actions, most recently undone last.
    undone: Vec<Action>,
    max_depth: usize,
}

impl History {
    pub fn new(max_depth: usize) -> Self {
        let max_depth = max_depth.max(1);
        Self {
            done: Vec::with_capacity(max_depth.min(64)),
            undone: Vec::new(),
            max_depth,
        }
    }

    /// Push a freshly performed action. Clears the redo stack.
    pub fn record(&mut self, action: Action) {
        log::debug!("record: {}", action.description());
        self.done.push(action);
        if self.done.len() > self.max_depth {
            self.done.remove(0);
        }
        self.undone.clear();
    }

    /// Pop the last action and return its inverse for the caller to commit.
    pub fn undo(&mut self) -> Option<Action> {
        let action = self.done.pop()?;
        let inverse = action.inverse();
        self.undone.push(action);
        Some(inverse)
    }

    /// Pop the last undone action and return it for the caller to commit.
    pub fn redo(&mut self) -> Option<Action> {
        let action = self.undone.pop()?;
        self.done.push(action.clone());
        Some(action)
    }

    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    pub fn clear(&mut self) {
        self.done.clear();
        self.undone.clear();
    }

    /// Number of undo steps available.
    pub fn depth(&self) -> usize {
        self.done.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(sk_core::config::DEFAULT_HISTORY_DEPTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sk_core::model::Point;

    fn paint(n: usize) -> Action {
        Action::Paint {
            stroke: Stroke::new("#000", 1.0).with_points([Point::new(n as f64, 0.0)]),
            index: n,
        }
    }

    fn resize(w: f64) -> Action {
        Action::RegionResize {
            before: DrawingRegion::default(),
            after: DrawingRegion::new(0.0, 0.0, w, 150.0),
        }
    }

    #[test]
    fn inverse_is_involution() {
        for action in [paint(0), resize(200.0)] {
            assert_eq!(action.inverse().inverse(), action);
        }
        let Action::Erase { index, .. } = paint(3).inverse() else {
            panic!("paint must invert to erase");
        };
        assert_eq!(index, 3);
    }

    #[test]
    fn empty_history_is_a_noop() {
        let mut history = History::new(10);
        assert_eq!(history.undo(), None);
        assert_eq!(history.redo(), None);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn undo_returns_inverse_redo_returns_original() {
        let mut history = History::new(10);
        history.record(resize(180.0));
        assert_eq!(history.undo(), Some(resize(180.0).inverse()));
        assert!(history.can_redo());
        assert_eq!(history.redo(), Some(resize(180.0)));
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn record_after_undo_discards_redo() {
        let mut history = History::new(10);
        history.record(paint(0));
        history.record(paint(1));
        history.undo();
        history.record(paint(2));
        assert!(!history.can_redo());
        assert_eq!(history.undo(), Some(paint(2).inverse()));
        assert_eq!(history.undo(), Some(paint(0).inverse()));
        assert_eq!(history.undo(), None);
    }

    #[test]
    fn depth_bound_drops_oldest() {
        let mut history = History::new(3);
        for n in 0..5 {
            history.record(paint(n));
        }
        assert_eq!(history.depth(), 3);
        let undone: Vec<_> = std::iter::from_fn(|| history.undo()).collect();
        assert_eq!(undone, vec![paint(4).inverse(), paint(3).inverse(), paint(2).inverse()]);
    }

    #[test]
    fn clear_empties_both_stacks() {
        let mut history = History::default();
        history.record(paint(0));
        history.record(paint(1));
        history.undo();
        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.max_depth(), 200);
    }
}

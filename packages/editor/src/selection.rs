//! # Selection & Focus
//!
//! Tracks which node is focused and the on-screen rectangle the renderer
//! measured for it. The rect is only meaningful for the focused node: it is
//! dropped whenever focus changes, the node moves, or the viewport changes,
//! and it is never reported without a focused node.

use pagecraft_schema::{NodePath, Rect};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FocusTracker {
    focused: Option<NodePath>,
    rect: Option<Rect>,
}

impl FocusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Focus `path`, replacing any previous focus and its geometry.
    /// An empty rect counts as no geometry.
    pub fn focus(&mut self, path: NodePath, rect: Option<Rect>) {
        self.focused = Some(path);
        self.rect = rect.filter(|r| !r.is_empty());
    }

    /// Record fresh geometry for the focused node. Returns `false` (and
    /// changes nothing) when `path` is not the focused node.
    pub fn set_focus_rect(&mut self, path: &NodePath, rect: Rect) -> bool {
        if self.focused.as_ref() != Some(path) {
            return false;
        }
        self.rect = Some(rect).filter(|r| !r.is_empty());
        true
    }

    pub fn clear_focus(&mut self) {
        self.focused = None;
        self.rect = None;
    }

    /// Viewport scrolled or resized: keep focus, drop geometry
    pub fn invalidate_geometry(&mut self) {
        self.rect = None;
    }

    /// `path` changed position; drop geometry if it is (or holds) the focus
    pub fn node_moved(&mut self, path: &NodePath) {
        if self.focused.as_ref().is_some_and(|f| path.contains(f)) {
            self.rect = None;
        }
    }

    /// `path` left the tree; clear focus if it is (or holds) the focused node
    pub fn node_removed(&mut self, path: &NodePath) {
        if self.focused.as_ref().is_some_and(|f| path.contains(f)) {
            self.clear_focus();
        }
    }

    pub fn focused(&self) -> Option<&NodePath> {
        self.focused.as_ref()
    }

    /// Leaf id of the focused node
    pub fn focused_id(&self) -> Option<&str> {
        self.focused.as_ref().map(|p| p.leaf_id())
    }

    /// Geometry of the focused node; never reported without a focus
    pub fn rect(&self) -> Option<Rect> {
        self.focused.as_ref().and(self.rect)
    }

    pub fn is_focused(&self, path: &NodePath) -> bool {
        self.focused.as_ref() == Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logo() -> NodePath {
        NodePath::element("header", "navbar", "logo")
    }

    #[test]
    fn test_focus_and_rect() {
        let mut tracker = FocusTracker::new();
        tracker.focus(logo(), Some(Rect::new(0.0, 0.0, 120.0, 40.0)));

        assert_eq!(tracker.focused_id(), Some("logo"));
        assert_eq!(tracker.rect(), Some(Rect::new(0.0, 0.0, 120.0, 40.0)));
    }

    #[test]
    fn test_empty_rect_reads_as_none() {
        let mut tracker = FocusTracker::new();
        tracker.focus(logo(), Some(Rect::new(5.0, 5.0, 0.0, 0.0)));
        assert!(tracker.is_focused(&logo()));
        assert_eq!(tracker.rect(), None);
    }

    #[test]
    fn test_rect_for_other_node_is_ignored() {
        let mut tracker = FocusTracker::new();
        tracker.focus(logo(), None);

        let other = NodePath::element("header", "navbar", "nav");
        assert!(!tracker.set_focus_rect(&other, Rect::new(1.0, 1.0, 1.0, 1.0)));
        assert_eq!(tracker.rect(), None);

        assert!(tracker.set_focus_rect(&logo(), Rect::new(1.0, 1.0, 1.0, 1.0)));
        assert!(tracker.rect().is_some());
    }

    #[test]
    fn test_ancestor_move_drops_geometry() {
        let mut tracker = FocusTracker::new();
        tracker.focus(logo(), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));

        tracker.node_moved(&NodePath::section("footer"));
        assert!(tracker.rect().is_some());

        tracker.node_moved(&NodePath::component("header", "navbar"));
        assert_eq!(tracker.rect(), None);
        assert_eq!(tracker.focused(), Some(&logo()));
    }

    #[test]
    fn test_ancestor_removal_clears_focus() {
        let mut tracker = FocusTracker::new();
        tracker.focus(logo(), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));

        tracker.node_removed(&NodePath::section("header"));
        assert_eq!(tracker.focused(), None);
        assert_eq!(tracker.rect(), None);
    }

    #[test]
    fn test_invalidate_geometry_keeps_focus() {
        let mut tracker = FocusTracker::new();
        tracker.focus(logo(), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));

        tracker.invalidate_geometry();
        assert!(tracker.is_focused(&logo()));
        assert_eq!(tracker.rect(), None);
    }
}

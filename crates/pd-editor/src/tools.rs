//! Canvas tools.
//!
//! The canvas has one persistent tool, Select, which drives the interaction
//! engine. Arming a placement draft switches to a one-shot Place tool: the
//! next pointer-down on empty canvas drops the draft there, then the tool
//! switches back to Select.

use kurbo::Point;
use pd_core::{ElementDraft, ElementKind};

/// The active tool determines how a pointer-down on empty canvas is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Select,
    Place(ElementKind),
}

impl ToolKind {
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Select => "select",
            ToolKind::Place(_) => "place",
        }
    }
}

/// Holds the armed placement draft, if any.
#[derive(Debug, Clone, Default)]
pub struct PlaceTool {
    armed: Option<ElementDraft>,
}

impl PlaceTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(&self) -> ToolKind {
        match &self.armed {
            Some(draft) => ToolKind::Place(draft.kind),
            None => ToolKind::Select,
        }
    }

    pub fn armed(&self) -> Option<&ElementDraft> {
        self.armed.as_ref()
    }

    pub fn arm(&mut self, draft: ElementDraft) {
        log::debug!("tool: armed {}", draft.kind);
        self.armed = Some(draft);
    }

    /// Returns true if a draft was armed.
    pub fn disarm(&mut self) -> bool {
        self.armed.take().is_some()
    }

    /// Consume the armed draft, positioned with its top-left at `doc`.
    pub fn place_at(&mut self, doc: Point) -> Option<ElementDraft> {
        self.armed.take().map(|d| d.at(doc.x, doc.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pd_core::Bounds;

    #[test]
    fn place_is_one_shot() {
        let mut tool = PlaceTool::new();
        assert_eq!(tool.kind(), ToolKind::Select);

        tool.arm(ElementDraft::new(ElementKind::Dropdown).sized(120.0, 40.0));
        assert_eq!(tool.kind(), ToolKind::Place(ElementKind::Dropdown));

        let draft = tool.place_at(Point::new(30.0, 45.0)).unwrap();
        assert_eq!(draft.bounds, Bounds::new(30.0, 45.0, 120.0, 40.0));
        assert_eq!(tool.kind(), ToolKind::Select);
        assert!(tool.place_at(Point::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn disarm_reports_whether_anything_was_armed() {
        let mut tool = PlaceTool::new();
        assert!(!tool.disarm());
        tool.arm(ElementDraft::new(ElementKind::Button));
        assert!(tool.disarm());
        assert!(tool.armed().is_none());
    }
}

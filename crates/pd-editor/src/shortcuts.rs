//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s.
//! The shortcut map lives in Rust so it's shared across WASM and native.
//!
//! - Single letters arm a placement kind (next empty-canvas click places it)
//! - Escape drops the selection and any armed placement
//! - Delete / Backspace removes the selected element
//! - ⌘Delete = clear the canvas
//! - ⌘E = export the design document

use pd_core::ElementKind;

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// Arm click-to-place for a kind.
    Arm(ElementKind),
    Deselect,
    DeleteSelected,
    ClearCanvas,
    Export,
}

impl ShortcutAction {
    /// Stable name for hosts that dispatch on strings.
    pub fn name(self) -> &'static str {
        match self {
            ShortcutAction::Arm(ElementKind::Window) => "arm_window",
            ShortcutAction::Arm(ElementKind::Sidebar) => "arm_sidebar",
            ShortcutAction::Arm(ElementKind::Button) => "arm_button",
            ShortcutAction::Arm(ElementKind::TextInput) => "arm_text_input",
            ShortcutAction::Arm(ElementKind::Dropdown) => "arm_dropdown",
            ShortcutAction::Arm(ElementKind::SelectBox) => "arm_select_box",
            ShortcutAction::Deselect => "deselect",
            ShortcutAction::DeleteSelected => "delete",
            ShortcutAction::ClearCanvas => "clear_canvas",
            ShortcutAction::Export => "export",
        }
    }
}

/// Resolves key events into shortcut actions.
///
/// Uses platform-aware modifier detection: on macOS `meta` is ⌘,
/// on other platforms `ctrl` serves the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"b"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        _alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        if cmd {
            return match key {
                "Delete" | "Backspace" => Some(ShortcutAction::ClearCanvas),
                "e" | "E" => Some(ShortcutAction::Export),
                _ => None,
            };
        }

        if shift {
            return None;
        }

        match key {
            "w" | "W" => Some(ShortcutAction::Arm(ElementKind::Window)),
            "s" | "S" => Some(ShortcutAction::Arm(ElementKind::Sidebar)),
            "b" | "B" => Some(ShortcutAction::Arm(ElementKind::Button)),
            "t" | "T" => Some(ShortcutAction::Arm(ElementKind::TextInput)),
            "d" | "D" => Some(ShortcutAction::Arm(ElementKind::Dropdown)),
            "l" | "L" => Some(ShortcutAction::Arm(ElementKind::SelectBox)),
            "Delete" | "Backspace" => Some(ShortcutAction::DeleteSelected),
            "Escape" => Some(ShortcutAction::Deselect),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_arm_shortcuts() {
        assert_eq!(
            ShortcutMap::resolve("b", false, false, false, false),
            Some(ShortcutAction::Arm(ElementKind::Button))
        );
        assert_eq!(
            ShortcutMap::resolve("T", false, false, false, false),
            Some(ShortcutAction::Arm(ElementKind::TextInput))
        );
        assert_eq!(
            ShortcutMap::resolve("l", false, false, false, false),
            Some(ShortcutAction::Arm(ElementKind::SelectBox))
        );
    }

    #[test]
    fn resolve_delete() {
        assert_eq!(
            ShortcutMap::resolve("Delete", false, false, false, false),
            Some(ShortcutAction::DeleteSelected)
        );
        assert_eq!(
            ShortcutMap::resolve("Backspace", false, false, false, false),
            Some(ShortcutAction::DeleteSelected)
        );
    }

    #[test]
    fn resolve_cmd_delete_clears() {
        // Cmd+Delete on macOS, Ctrl+Backspace elsewhere
        assert_eq!(
            ShortcutMap::resolve("Delete", false, false, false, true),
            Some(ShortcutAction::ClearCanvas)
        );
        assert_eq!(
            ShortcutMap::resolve("Backspace", true, false, false, false),
            Some(ShortcutAction::ClearCanvas)
        );
    }

    #[test]
    fn resolve_export() {
        assert_eq!(
            ShortcutMap::resolve("e", false, false, false, true),
            Some(ShortcutAction::Export)
        );
        // Plain "e" is unbound
        assert_eq!(ShortcutMap::resolve("e", false, false, false, false), None);
    }

    #[test]
    fn resolve_escape() {
        assert_eq!(
            ShortcutMap::resolve("Escape", false, false, false, false),
            Some(ShortcutAction::Deselect)
        );
    }

    #[test]
    fn shift_letters_are_unbound() {
        assert_eq!(ShortcutMap::resolve("B", false, true, false, false), None);
    }

    #[test]
    fn action_names_are_unique() {
        let mut names: Vec<&str> = ElementKind::ALL
            .iter()
            .map(|k| ShortcutAction::Arm(*k).name())
            .chain(
                [
                    ShortcutAction::Deselect,
                    ShortcutAction::DeleteSelected,
                    ShortcutAction::ClearCanvas,
                    ShortcutAction::Export,
                ]
                .map(ShortcutAction::name),
            )
            .collect();
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }
}

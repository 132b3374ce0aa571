//! Keyboard shortcut registry and documentation.

use glsketch_core::DrawMode;

/// What a shortcut does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutCommand {
    SetMode(DrawMode),
    Export,
    Import,
    Clear,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
    pub command: ShortcutCommand,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        description: &'static str,
        command: ShortcutCommand,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
            command,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+S").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    fn matches(&self, key: &str, ctrl: bool, shift: bool) -> bool {
        self.key.eq_ignore_ascii_case(key) && self.ctrl == ctrl && self.shift == shift
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        use ShortcutCommand::*;
        vec![
            Shortcut::new("L", false, false, "Line", SetMode(DrawMode::Line)),
            Shortcut::new("S", false, false, "Square", SetMode(DrawMode::Square)),
            Shortcut::new("R", false, false, "Rectangle", SetMode(DrawMode::Rectangle)),
            Shortcut::new("P", false, false, "Polygon", SetMode(DrawMode::Polygon)),
            Shortcut::new("E", false, false, "Edit vertex", SetMode(DrawMode::VertexEdit)),
            Shortcut::new("S", true, false, "Export to JSON", Export),
            Shortcut::new("O", true, false, "Import JSON", Import),
            Shortcut::new("Delete", false, false, "Clear canvas", Clear),
        ]
    }

    /// Find the shortcut bound to a key combination. Keys are matched
    /// case-insensitively.
    pub fn find(key: &str, ctrl: bool, shift: bool) -> Option<Shortcut> {
        Self::all()
            .into_iter()
            .find(|s| s.matches(key, ctrl, shift))
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:20} {}", shortcut.format(), shortcut.description);
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        let shortcut = Shortcut::new("S", true, false, "Export", ShortcutCommand::Export);
        assert_eq!(shortcut.format(), "Ctrl+S");
        let shortcut = Shortcut::new("Z", true, true, "Redo", ShortcutCommand::Clear);
        assert_eq!(shortcut.format(), "Ctrl+Shift+Z");
    }

    #[test]
    fn test_find() {
        let s = ShortcutRegistry::find("s", false, false).unwrap();
        assert_eq!(s.command, ShortcutCommand::SetMode(DrawMode::Square));
        let s = ShortcutRegistry::find("S", true, false).unwrap();
        assert_eq!(s.command, ShortcutCommand::Export);
        assert!(ShortcutRegistry::find("S", true, true).is_none());
        assert!(ShortcutRegistry::find("Q", false, false).is_none());
    }

    #[test]
    fn test_every_mode_has_a_shortcut() {
        for mode in DrawMode::ALL {
            assert!(
                ShortcutRegistry::all()
                    .iter()
                    .any(|s| s.command == ShortcutCommand::SetMode(mode)),
                "{} has no shortcut",
                mode.name()
            );
        }
    }
}

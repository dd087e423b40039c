//! Platform-specific key bindings and their help-text labels

use crossterm::event::KeyModifiers;

/// Platform-appropriate modifier for the copy/export shortcut
/// - macOS: SUPER (Cmd key)
/// - Linux/Windows: CONTROL (Ctrl key)
#[cfg(target_os = "macos")]
pub const COPY_MODIFIER: KeyModifiers = KeyModifiers::SUPER;

#[cfg(not(target_os = "macos"))]
pub const COPY_MODIFIER: KeyModifiers = KeyModifiers::CONTROL;

/// Export shortcut display
#[cfg(target_os = "macos")]
pub const EXPORT_SHORTCUT: &str = "Cmd+E";

#[cfg(not(target_os = "macos"))]
pub const EXPORT_SHORTCUT: &str = "Ctrl+E";

/// Save/submit shortcut display; Ctrl+S works on all platforms
pub const SAVE_SHORTCUT: &str = "Ctrl+S";

/// Validate the current step and advance
pub const NEXT_STEP_SHORTCUT: &str = "Ctrl+N";

/// Go back one step without validating
pub const PREV_STEP_SHORTCUT: &str = "Ctrl+B";

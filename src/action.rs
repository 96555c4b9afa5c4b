//! Action enum - All possible application actions
//!
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use crate::model::TableId;
use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick for polling background requests
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Table Selection
    // ─────────────────────────────────────────────────────────────────────────
    /// Make a table the active one and open its viewer
    SelectTable(TableId),
    /// Close the viewer and clear the active table
    ClearSelection,

    // ─────────────────────────────────────────────────────────────────────────
    // Selector Focus
    // ─────────────────────────────────────────────────────────────────────────
    FocusLeft,
    FocusRight,
    FocusUp,
    FocusDown,
    /// Move focus to the next button, wrapping around
    FocusNext,
    /// Select the focused button
    ActivateFocused,

    // ─────────────────────────────────────────────────────────────────────────
    // Viewer
    // ─────────────────────────────────────────────────────────────────────────
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    /// Fetch the open table again
    Refresh,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    OpenQuitDialog,
    OpenHelp,
    CloseModal,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::SelectTable(table) => write!(f, "SelectTable({})", table),
            Action::ClearSelection => write!(f, "ClearSelection"),
            Action::FocusLeft => write!(f, "FocusLeft"),
            Action::FocusRight => write!(f, "FocusRight"),
            Action::FocusUp => write!(f, "FocusUp"),
            Action::FocusDown => write!(f, "FocusDown"),
            Action::FocusNext => write!(f, "FocusNext"),
            Action::ActivateFocused => write!(f, "ActivateFocused"),
            Action::ScrollUp => write!(f, "ScrollUp"),
            Action::ScrollDown => write!(f, "ScrollDown"),
            Action::PageUp => write!(f, "PageUp"),
            Action::PageDown => write!(f, "PageDown"),
            Action::Refresh => write!(f, "Refresh"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::CloseModal => write!(f, "CloseModal"),
        }
    }
}

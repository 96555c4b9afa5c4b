//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod button_group;
pub mod data_viewer;
pub mod header;
pub mod help_dialog;
pub mod layout;
pub mod quit_dialog;
pub mod table;

pub use button_group::ButtonGroup;
pub use data_viewer::DataViewer;
pub use header::{draw_header, BackendStatus};
pub use help_dialog::HelpDialog;
pub use layout::{calculate_main_layout, centered_popup};
pub use quit_dialog::QuitDialog;

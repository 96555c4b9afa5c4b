//! Root application component
//!
//! The App owns the one piece of shared UI state, the active table, and
//! coordinates the selector, the data viewer and the modal dialogs. Children
//! get the active table as a parameter and report choices back as Actions.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    calculate_main_layout, draw_header, BackendStatus, ButtonGroup, DataViewer, HelpDialog,
    QuitDialog,
};
use crate::model::{FetchState, Modal, ModalStack, TableId};
use crate::services::{request_runner, ApiClient, HealthStatus, PendingRequest};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tracing::{debug, info, warn};

pub struct App {
    /// Active table; `None` means no viewer is shown
    selection: Option<TableId>,

    /// Viewer for the active table, mounted iff `selection` is set
    viewer: Option<DataViewer>,

    client: ApiClient,
    modals: ModalStack,

    backend_status: BackendStatus,
    health_check: Option<PendingRequest<HealthStatus>>,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Child Components
    // ─────────────────────────────────────────────────────────────────────────
    pub selector: ButtonGroup,
    pub quit_dialog: QuitDialog,
    pub help_dialog: HelpDialog,
}

impl App {
    pub fn new(client: ApiClient) -> App {
        App {
            selection: None,
            viewer: None,
            client,
            modals: ModalStack::new(),
            backend_status: BackendStatus::default(),
            health_check: None,
            should_quit: false,
            selector: ButtonGroup::new(),
            quit_dialog: QuitDialog,
            help_dialog: HelpDialog::default(),
        }
    }

    /// Currently active table
    pub fn active_table(&self) -> Option<TableId> {
        self.selection
    }

    pub fn viewer(&self) -> Option<&DataViewer> {
        self.viewer.as_ref()
    }

    pub fn backend_status(&self) -> &BackendStatus {
        &self.backend_status
    }

    /// Make `table` active and mount its viewer
    ///
    /// Re-selecting the active table is a no-op; the open viewer keeps its
    /// rows and scroll position.
    pub fn select_table(&mut self, table: TableId) {
        if self.selection == Some(table) {
            debug!(%table, "table already active");
            return;
        }

        info!(%table, "table selected");
        self.selection = Some(table);
        self.viewer = Some(DataViewer::new(table, self.client.clone()));
    }

    /// Clear the active table and unmount the viewer
    pub fn clear_selection(&mut self) {
        self.selection = None;
        if let Some(viewer) = self.viewer.take() {
            info!(table = %viewer.table(), "viewer closed");
        }
    }

    fn poll_health_check(&mut self) {
        let Some(result) = self.health_check.as_ref().and_then(|p| p.poll()) else {
            return;
        };
        self.health_check = None;

        self.backend_status = match result {
            Ok(health) => {
                info!(status = %health.status, database = %health.database, "backend health");
                BackendStatus::Online(health)
            }
            Err(e) => {
                warn!(error = %e, "backend health check failed");
                BackendStatus::Offline(e.to_string())
            }
        };
    }

    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::Help => self.help_dialog.handle_key_event(key),
        }
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.draw(frame, area),
            Modal::Help => self.help_dialog.draw(frame, area),
        }
    }

    /// Content shown where the viewer goes while no table is selected
    fn draw_placeholder(&self, frame: &mut Frame, area: Rect) {
        let mut content = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Chọn một bảng ở trên để xem dữ liệu",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(Span::styled(
                "Press 1-6, click a button, or ? for help",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        if let Some(reason) = self.backend_status.offline_reason() {
            content.push(Line::from(""));
            content.push(Line::from(Span::styled(
                format!("Backend unreachable at {}: {}", self.client.base_url(), reason),
                Style::default().fg(Color::Red),
            )));
        }

        let placeholder = Paragraph::new(content)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        frame.render_widget(placeholder, area);
    }

    fn draw_help_bar(&self, frame: &mut Frame, area: Rect) {
        let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Cyan));
        let mut spans = vec![key("1-6"), Span::raw(" Open  ")];
        if let Some(viewer) = self.viewer.as_ref() {
            // ↑↓ scroll the viewer while it is open
            spans.extend([key("←→/Tab"), Span::raw(" Focus  ")]);
            let refresh = match viewer.state() {
                FetchState::Failed(_) => " Retry  ",
                _ => " Refresh  ",
            };
            spans.extend([
                key("j/k"),
                Span::raw(" Scroll  "),
                key("r"),
                Span::raw(refresh),
                key("Esc/x/[x]"),
                Span::raw(" Close  "),
            ]);
            if viewer.is_loading() {
                spans.push(Span::styled("fetching...  ", Style::default().fg(Color::Yellow)));
            }
        } else {
            spans.extend([
                key("←→↑↓"),
                Span::raw(" Focus  "),
                key("q/Esc"),
                Span::raw(" Quit  "),
            ]);
        }
        spans.extend([key("?"), Span::raw(" Help")]);

        let help = Paragraph::new(Line::from(spans))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, area);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn init(&mut self) -> Result<()> {
        let client = self.client.clone();
        self.health_check = Some(request_runner::spawn(move || client.health()));
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(Some(Action::ForceQuit));
        }

        if let Some(modal) = self.modals.top().cloned() {
            return self.handle_modal_key_event(&modal, key);
        }

        if key.code == KeyCode::Char('?') {
            return Ok(Some(Action::OpenHelp));
        }

        // The open viewer gets first pick; keys it ignores reach the selector
        if let Some(viewer) = self.viewer.as_mut() {
            if let Some(action) = viewer.handle_key_event(key)? {
                return Ok(Some(action));
            }
        } else if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
            return Ok(Some(Action::OpenQuitDialog));
        }

        self.selector.handle_key_event(key)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if !self.modals.is_empty() {
            return Ok(None);
        }
        if let Some(viewer) = self.viewer.as_mut() {
            if let Some(action) = viewer.handle_mouse_event(mouse)? {
                return Ok(Some(action));
            }
        }
        self.selector.handle_mouse_event(mouse)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::Tick => {
                self.poll_health_check();
                if let Some(viewer) = self.viewer.as_mut() {
                    viewer.update(Action::Tick)?;
                }
            }
            Action::Resize(_, _) => {}
            Action::ForceQuit => {
                self.should_quit = true;
            }

            Action::SelectTable(table) => {
                self.selector.update(action)?;
                self.select_table(table);
            }
            Action::ClearSelection => self.clear_selection(),

            Action::FocusLeft
            | Action::FocusRight
            | Action::FocusUp
            | Action::FocusDown
            | Action::FocusNext
            | Action::ActivateFocused => return self.selector.update(action),

            Action::ScrollUp
            | Action::ScrollDown
            | Action::PageUp
            | Action::PageDown
            | Action::Refresh => {
                if let Some(viewer) = self.viewer.as_mut() {
                    viewer.update(action)?;
                }
            }

            Action::OpenQuitDialog => self.modals.push(Modal::QuitConfirm),
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help);
            }
            Action::CloseModal => {
                self.modals.pop();
            }
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let layout = calculate_main_layout(area);

        draw_header(frame, layout.header, self.client.base_url(), self.backend_status());
        self.selector
            .draw_with_active(frame, layout.selector, self.selection)?;

        match self.viewer.as_mut() {
            Some(viewer) => viewer.draw(frame, layout.content)?,
            None => self.draw_placeholder(frame, layout.content),
        }

        self.draw_help_bar(frame, layout.help);

        if let Some(modal) = self.modals.top().cloned() {
            self.draw_modal(frame, area, &modal)?;
        }
        Ok(())
    }
}

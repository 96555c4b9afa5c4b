//! Data viewer - fetches one table and shows its rows
//!
//! Mounted by the App while a table is selected. The fetch runs in the
//! background; the viewer polls for the result on each tick.

use crate::action::Action;
use crate::component::Component;
use crate::components::table::{self, build_table_window, column_widths};
use crate::model::{FetchState, TableData, TableId};
use crate::services::{request_runner, ApiClient, PendingRequest};
use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Margin, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};
use tracing::{info, warn};

const PAGE_SIZE: usize = 20;

const CLOSE_LABEL: &str = "[x]";

/// Viewer for the rows of a single table
pub struct DataViewer {
    table: TableId,
    client: ApiClient,
    state: FetchState,
    pending: Option<PendingRequest<TableData>>,
    fetched_at: Option<DateTime<Local>>,
    col_widths: Vec<usize>,
    close_area: Option<Rect>,
    pub scroll_offset: usize,
}

impl DataViewer {
    /// Create a viewer and start fetching `table`
    pub fn new(table: TableId, client: ApiClient) -> Self {
        let mut viewer = Self {
            table,
            client,
            state: FetchState::Loading,
            pending: None,
            fetched_at: None,
            col_widths: Vec::new(),
            close_area: None,
            scroll_offset: 0,
        };
        viewer.refresh();
        viewer
    }

    pub fn table(&self) -> TableId {
        self.table
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Start a new fetch, discarding any fetch already in flight
    pub fn refresh(&mut self) {
        info!(table = %self.table, url = %self.client.url_for(self.table.endpoint_path()), "fetching table");

        let client = self.client.clone();
        let table = self.table;
        self.pending = Some(request_runner::spawn(move || client.fetch_table(table)));
        self.state = FetchState::Loading;
        self.scroll_offset = 0;
    }

    /// Check the background fetch, returns true if the state changed
    pub fn poll(&mut self) -> bool {
        let Some(result) = self.pending.as_ref().and_then(|p| p.poll()) else {
            return false;
        };
        let elapsed = self.pending.take().map(|p| p.elapsed()).unwrap_or_default();

        match result {
            Ok(data) => {
                info!(table = %self.table, rows = data.row_count(), ?elapsed, "table loaded");
                self.set_loaded(data);
            }
            Err(e) => {
                warn!(table = %self.table, error = %e, "failed to load table");
                self.state = FetchState::Failed(e.to_string());
            }
        }
        true
    }

    fn set_loaded(&mut self, data: TableData) {
        self.col_widths = column_widths(&data);
        self.state = FetchState::Loaded(data);
        self.fetched_at = Some(Local::now());
    }

    /// Status text and color shown in the title
    fn status(&self) -> (String, Color) {
        match &self.state {
            FetchState::Loading => ("Loading...".to_string(), Color::Yellow),
            FetchState::Loaded(data) => {
                let mut text = format!("{} rows", data.row_count());
                if let Some(at) = self.fetched_at {
                    text.push_str(&format!(" · {}", at.format("%H:%M:%S")));
                }
                (text, Color::Green)
            }
            FetchState::Failed(_) => ("Error".to_string(), Color::Red),
        }
    }

    /// Loaded table with at least one row
    fn table_data(&self) -> Option<&TableData> {
        match &self.state {
            FetchState::Loaded(data) if !data.is_empty() => Some(data),
            _ => None,
        }
    }

    /// Total scrollable lines and the height they scroll within
    fn scroll_extent(&self, visible_height: usize) -> (usize, usize) {
        match self.table_data() {
            Some(data) => (
                table::scroll_len(data),
                visible_height.saturating_sub(table::PINNED_LINES),
            ),
            None => (self.message_lines().len(), visible_height),
        }
    }

    /// Body lines visible at `offset`
    pub fn visible_lines(&self, offset: usize, height: usize) -> Vec<Line<'static>> {
        match self.table_data() {
            Some(data) => build_table_window(data, &self.col_widths, offset, height),
            None => self
                .message_lines()
                .into_iter()
                .skip(offset)
                .take(height)
                .collect(),
        }
    }

    /// Notice lines for every state except a non-empty table
    fn message_lines(&self) -> Vec<Line<'static>> {
        match &self.state {
            FetchState::Loading => vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  Đang tải dữ liệu...",
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    format!("  GET {}", self.client.url_for(self.table.endpoint_path())),
                    Style::default().fg(Color::DarkGray),
                )),
            ],
            FetchState::Failed(message) => {
                let mut lines = vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        "  Không thể tải dữ liệu",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(""),
                ];
                for line in message.lines() {
                    lines.push(Line::from(Span::styled(
                        format!("  {}", line),
                        Style::default().fg(Color::Red),
                    )));
                }
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "  Press r to retry",
                    Style::default().fg(Color::DarkGray),
                )));
                lines
            }
            FetchState::Loaded(_) => vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  Không có dữ liệu",
                    Style::default().fg(Color::Yellow),
                )),
            ],
        }
    }
}

impl Component for DataViewer {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Action::ScrollDown),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::ScrollUp),
            KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::PageUp => Some(Action::PageUp),
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::PageDown)
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::PageUp)
            }
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Esc | KeyCode::Char('x') | KeyCode::Char('q') => Some(Action::ClearSelection),
            _ => None,
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Ok(None);
        }
        let hit = self
            .close_area
            .is_some_and(|area| area.contains(Position::new(mouse.column, mouse.row)));
        Ok(hit.then_some(Action::ClearSelection))
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::Tick => {
                self.poll();
            }
            Action::ScrollUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
            }
            Action::ScrollDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
            }
            Action::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(PAGE_SIZE);
            }
            Action::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(PAGE_SIZE);
            }
            Action::Refresh => self.refresh(),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let visible_height = area.height.saturating_sub(2) as usize;
        let (total, body_height) = self.scroll_extent(visible_height);

        let max_scroll = total.saturating_sub(body_height);
        if self.scroll_offset > max_scroll {
            self.scroll_offset = max_scroll;
        }
        let content = self.visible_lines(self.scroll_offset, body_height);

        let (status_text, status_color) = self.status();
        let title = Line::from(vec![
            Span::styled(
                format!(" {} ", self.table.display_label()),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{} ", self.table.endpoint_path()),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(format!("[{}] ", status_text), Style::default().fg(status_color)),
        ]);

        let close = Line::from(Span::styled(
            CLOSE_LABEL,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
        .right_aligned();

        let paragraph = Paragraph::new(content).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_top(close)
                .border_style(Style::default().fg(status_color)),
        );

        frame.render_widget(paragraph, area);

        // Right-aligned titles end one column left of the corner
        let close_width = CLOSE_LABEL.len() as u16;
        self.close_area = (area.width >= close_width + 2).then(|| Rect {
            x: area.right() - 1 - close_width,
            y: area.y,
            width: close_width,
            height: 1,
        });

        if total > body_height {
            let mut scrollbar_state =
                ScrollbarState::new(max_scroll).position(self.scroll_offset);

            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                area.inner(Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use ratatui::{backend::TestBackend, Terminal};
    use std::thread;
    use std::time::{Duration, Instant};

    fn wait_until_loaded(viewer: &mut DataViewer) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while viewer.is_loading() {
            viewer.update(Action::Tick).unwrap();
            assert!(Instant::now() < deadline, "fetch did not finish in time");
            thread::sleep(Duration::from_millis(5));
        }
    }

    fn client_for(server: &Server) -> ApiClient {
        ApiClient::new(&server.url(), Duration::from_secs(5)).unwrap()
    }

    /// Viewer whose fetch is dropped so tests can set the state directly
    fn offline_viewer(table: TableId) -> DataViewer {
        let client = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        let mut viewer = DataViewer::new(table, client);
        viewer.pending = None;
        viewer
    }

    fn render(viewer: &mut DataViewer, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| viewer.draw(frame, frame.area()).unwrap())
            .unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect())
            .collect()
    }

    #[test]
    fn test_loads_rows() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/api/classes")
            .with_status(200)
            .with_body(r#"[{"class_id": 1, "class_name": "10A1", "teacher_id": 3}]"#)
            .create();

        let mut viewer = DataViewer::new(TableId::Classes, client_for(&server));
        assert_eq!(viewer.state(), &FetchState::Loading);

        wait_until_loaded(&mut viewer);

        match viewer.state() {
            FetchState::Loaded(data) => {
                assert_eq!(data.headers, vec!["class_id", "class_name", "teacher_id"]);
                assert_eq!(data.rows, vec![vec!["1", "10A1", "3"]]);
            }
            other => panic!("unexpected state: {other:?}"),
        }
        assert_eq!(viewer.status().1, Color::Green);
    }

    #[test]
    fn test_failure_is_contained_and_retryable() {
        let mut server = Server::new();
        let failing = server
            .mock("GET", "/api/attendance")
            .with_status(500)
            .with_body(r#"{"detail": "boom"}"#)
            .expect(1)
            .create();

        let mut viewer = DataViewer::new(TableId::Attendance, client_for(&server));
        wait_until_loaded(&mut viewer);

        assert_eq!(
            viewer.state(),
            &FetchState::Failed("server returned 500: boom".to_string())
        );
        failing.assert();
        failing.remove();

        let _ok = server
            .mock("GET", "/api/attendance")
            .with_status(200)
            .with_body("[]")
            .create();

        viewer.update(Action::Refresh).unwrap();
        assert_eq!(viewer.state(), &FetchState::Loading);
        wait_until_loaded(&mut viewer);

        assert_eq!(viewer.state(), &FetchState::Loaded(TableData::default()));
        let text: Vec<String> = viewer
            .visible_lines(0, usize::MAX)
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert!(text.iter().any(|l| l.contains("Không có dữ liệu")));
    }

    #[test]
    fn test_close_keys() {
        let mut server = Server::new();
        let _mock = server.mock("GET", "/api/cameras").with_body("[]").create();
        let mut viewer = DataViewer::new(TableId::Cameras, client_for(&server));

        for code in [KeyCode::Esc, KeyCode::Char('x'), KeyCode::Char('q')] {
            let key = KeyEvent::new(code, KeyModifiers::NONE);
            assert_eq!(
                viewer.handle_key_event(key).unwrap(),
                Some(Action::ClearSelection)
            );
        }
    }

    #[test]
    fn test_scrolls_to_end_of_large_table() {
        let data = TableData {
            headers: vec!["name".to_string()],
            rows: (0..70_000).map(|i| vec![format!("row{i}")]).collect(),
        };
        let mut viewer = offline_viewer(TableId::Attendance);
        viewer.set_loaded(data);
        viewer.scroll_offset = usize::MAX;

        let screen = render(&mut viewer, 40, 12);

        // 10 inner lines: header and separator pinned, then 8 scrolled lines
        assert!(screen[1].contains("name"));
        assert!(screen.iter().any(|l| l.contains("row69999")));
        assert!(screen.iter().any(|l| l.contains("Total rows: 70000")));
        assert!(!screen.iter().any(|l| l.contains("row69993")));
        assert_eq!(viewer.scroll_offset, 70_002 - 8);

        viewer.update(Action::PageUp).unwrap();
        let screen = render(&mut viewer, 40, 12);
        assert!(screen.iter().any(|l| l.contains("row69974")));
        assert!(!screen.iter().any(|l| l.contains("Total rows")));
    }

    #[test]
    fn test_click_close_target_clears_selection() {
        let mut viewer = offline_viewer(TableId::Cameras);
        let screen = render(&mut viewer, 80, 10);

        let top: Vec<char> = screen[0].chars().collect();
        let column = top
            .windows(3)
            .position(|w| *w == ['[', 'x', ']'])
            .expect("close target drawn in the title") as u16;

        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: column + 1,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(
            viewer.handle_mouse_event(click).unwrap(),
            Some(Action::ClearSelection)
        );

        let body_click = MouseEvent { row: 3, ..click };
        assert_eq!(viewer.handle_mouse_event(body_click).unwrap(), None);

        let scroll = MouseEvent {
            kind: MouseEventKind::ScrollDown,
            ..click
        };
        assert_eq!(viewer.handle_mouse_event(scroll).unwrap(), None);
    }
}

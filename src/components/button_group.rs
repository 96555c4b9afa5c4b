//! Table selector - the grid of six table buttons
//!
//! Rendering is a pure function of the catalog and the active table passed
//! in by the App. The only state kept here is keyboard focus and the button
//! rectangles from the last draw, used for mouse hit testing.

use crate::action::Action;
use crate::component::Component;
use crate::components::layout::grid_cells;
use crate::model::{TableDescriptor, TableId, CATALOG};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

/// Buttons per grid row
pub const GRID_COLUMNS: usize = 3;

/// Glyph marking the active table's button
pub const ACTIVE_MARKER: &str = "●";

/// Selector component
#[derive(Default)]
pub struct ButtonGroup {
    /// Catalog index of the keyboard-focused button
    focused: usize,
    /// Button areas from the last draw, in catalog order
    button_areas: Vec<Rect>,
}

impl ButtonGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table under keyboard focus
    pub fn focused(&self) -> TableId {
        CATALOG[self.focused].id
    }

    /// Whether `entry` carries the active marker
    pub fn is_marked(entry: &TableDescriptor, active: Option<TableId>) -> bool {
        active == Some(entry.id)
    }

    fn grid_rows() -> usize {
        CATALOG.len().div_ceil(GRID_COLUMNS)
    }

    fn focus_left(&mut self) {
        if self.focused % GRID_COLUMNS > 0 {
            self.focused -= 1;
        }
    }

    fn focus_right(&mut self) {
        if self.focused % GRID_COLUMNS < GRID_COLUMNS - 1 && self.focused + 1 < CATALOG.len() {
            self.focused += 1;
        }
    }

    fn focus_up(&mut self) {
        if self.focused >= GRID_COLUMNS {
            self.focused -= GRID_COLUMNS;
        }
    }

    fn focus_down(&mut self) {
        if self.focused + GRID_COLUMNS < CATALOG.len() {
            self.focused += GRID_COLUMNS;
        }
    }

    fn focus_next(&mut self) {
        self.focused = (self.focused + 1) % CATALOG.len();
    }

    /// Table whose button contains the given terminal cell
    pub fn button_at(&self, column: u16, row: u16) -> Option<TableId> {
        self.button_areas
            .iter()
            .position(|r| {
                column >= r.x && column < r.x + r.width && row >= r.y && row < r.y + r.height
            })
            .and_then(TableId::from_index)
    }

    /// Draw the selector grid with `active` marked
    pub fn draw_with_active(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        active: Option<TableId>,
    ) -> Result<()> {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Chọn bảng để xem ")
            .title_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        self.button_areas = grid_cells(inner, Self::grid_rows(), GRID_COLUMNS);

        for (i, (entry, cell)) in CATALOG.iter().zip(self.button_areas.iter()).enumerate() {
            let marked = Self::is_marked(entry, active);
            let focused = i == self.focused;

            let (text_style, border_style) = if marked {
                (
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                    Style::default().fg(Color::Cyan),
                )
            } else if focused {
                (
                    Style::default().fg(Color::Yellow),
                    Style::default().fg(Color::Yellow),
                )
            } else {
                (
                    Style::default().fg(Color::White),
                    Style::default().fg(Color::DarkGray),
                )
            };

            let mut spans = Vec::new();
            if marked {
                spans.push(Span::styled(format!("{} ", ACTIVE_MARKER), text_style));
            }
            spans.push(Span::styled(format!("{} ", i + 1), text_style.fg(Color::DarkGray)));
            spans.push(Span::styled(entry.display_label, text_style));

            let button = Paragraph::new(Line::from(spans))
                .alignment(Alignment::Center)
                .style(if marked { text_style } else { Style::default() })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(if marked {
                            BorderType::Thick
                        } else {
                            BorderType::Rounded
                        })
                        .border_style(border_style),
                );
            frame.render_widget(button, *cell);
        }

        Ok(())
    }
}

impl Component for ButtonGroup {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                TableId::from_index(index).map(Action::SelectTable)
            }
            KeyCode::Char('h') | KeyCode::Left => Some(Action::FocusLeft),
            KeyCode::Char('l') | KeyCode::Right => Some(Action::FocusRight),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::FocusUp),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::FocusDown),
            KeyCode::Tab => Some(Action::FocusNext),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Action::ActivateFocused),
            _ => None,
        };
        Ok(action)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Ok(None);
        }
        Ok(self
            .button_at(mouse.column, mouse.row)
            .map(Action::SelectTable))
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::FocusLeft => self.focus_left(),
            Action::FocusRight => self.focus_right(),
            Action::FocusUp => self.focus_up(),
            Action::FocusDown => self.focus_down(),
            Action::FocusNext => self.focus_next(),
            Action::ActivateFocused => return Ok(Some(Action::SelectTable(self.focused()))),
            // Clicking or using a number key also moves focus there
            Action::SelectTable(table) => self.focused = table.index(),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, _frame: &mut Frame, _area: Rect) -> Result<()> {
        // Needs the active table from the App, so we use draw_with_active
        Ok(())
    }
}

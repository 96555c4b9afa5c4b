//! Help dialog component
//!
//! Lists the keyboard shortcuts for the selector and the viewer.

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use crate::model::CATALOG;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

/// Help dialog showing all keyboard shortcuts
#[derive(Default)]
pub struct HelpDialog {
    pub scroll_offset: usize,
}

impl Component for HelpDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_offset = self.scroll_offset.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                None
            }
            KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(10);
                None
            }
            KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(10);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let dialog_area = centered_popup(area, 64, area.height.saturating_sub(4));

        let content = build_help_content();
        let total = content.len();
        let visible_height = dialog_area.height.saturating_sub(2) as usize;

        let max_scroll = total.saturating_sub(visible_height);
        if self.scroll_offset > max_scroll {
            self.scroll_offset = max_scroll;
        }

        let paragraph = Paragraph::new(content)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Keyboard Shortcuts ")
                    .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .scroll((self.scroll_offset as u16, 0));

        frame.render_widget(Clear, dialog_area);
        frame.render_widget(paragraph, dialog_area);

        if total > visible_height {
            let mut scrollbar_state =
                ScrollbarState::new(max_scroll).position(self.scroll_offset);

            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight)
                    .begin_symbol(Some("↑"))
                    .end_symbol(Some("↓")),
                dialog_area.inner(ratatui::layout::Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut scrollbar_state,
            );
        }

        Ok(())
    }
}

/// Build the help content with all keyboard shortcuts
fn build_help_content() -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let add_section = |lines: &mut Vec<Line<'static>>, title: &str| {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {} ", title),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("  {}", "─".repeat(title.chars().count() + 2)),
            Style::default().fg(Color::DarkGray),
        )));
    };

    let add_shortcut = |lines: &mut Vec<Line<'static>>, key: &str, description: &str| {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:14}", key),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(description.to_string(), Style::default().fg(Color::White)),
        ]));
    };

    add_section(&mut lines, "Tables");
    for (i, entry) in CATALOG.iter().enumerate() {
        add_shortcut(
            &mut lines,
            &(i + 1).to_string(),
            &format!("{}  ({})", entry.display_label, entry.endpoint_path),
        );
    }

    add_section(&mut lines, "Selector");
    add_shortcut(&mut lines, "h j k l / ←↓↑→", "Move focus between buttons");
    add_shortcut(&mut lines, "h l / ←→", "Move focus while a table is open");
    add_shortcut(&mut lines, "Tab", "Focus next button");
    add_shortcut(&mut lines, "Enter / Space", "Open focused table");
    add_shortcut(&mut lines, "Mouse click", "Open clicked table");

    add_section(&mut lines, "Viewer");
    add_shortcut(&mut lines, "j / ↓", "Scroll down one line");
    add_shortcut(&mut lines, "k / ↑", "Scroll up one line");
    add_shortcut(&mut lines, "PgDn / Ctrl+d", "Scroll down one page");
    add_shortcut(&mut lines, "PgUp / Ctrl+u", "Scroll up one page");
    add_shortcut(&mut lines, "r", "Fetch the table again");
    add_shortcut(&mut lines, "Esc / x / q", "Close the viewer");
    add_shortcut(&mut lines, "Click [x]", "Close the viewer");

    add_section(&mut lines, "General");
    add_shortcut(&mut lines, "?", "Show this help");
    add_shortcut(&mut lines, "q / Esc", "Quit (when no table is open)");
    add_shortcut(&mut lines, "Ctrl+c", "Quit immediately");

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Press q, Esc, or ? to close",
        Style::default().fg(Color::DarkGray),
    )));

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_lists_every_table() {
        let text: Vec<String> = build_help_content()
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();

        for entry in CATALOG.iter() {
            assert!(text.iter().any(|l| l.contains(entry.display_label)));
        }
    }

    #[test]
    fn test_close_keys() {
        let mut dialog = HelpDialog::default();
        for code in [KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('?')] {
            let key = KeyEvent::new(code, crossterm::event::KeyModifiers::NONE);
            assert_eq!(dialog.handle_key_event(key).unwrap(), Some(Action::CloseModal));
        }
    }

    #[test]
    fn test_help_describes_open_viewer_keys() {
        let text: Vec<String> = build_help_content()
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();

        assert!(text.iter().any(|l| l.contains("q / Esc") && l.contains("Quit")));
        assert!(text.iter().any(|l| l.contains("while a table is open")));
        assert!(text.iter().any(|l| l.contains("Click [x]")));
    }
}

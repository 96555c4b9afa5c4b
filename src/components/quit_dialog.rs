//! Quit confirmation dialog component

use crate::action::Action;
use crate::component::Component;
use crate::components::centered_popup;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Quit confirmation dialog
#[derive(Default)]
pub struct QuitDialog;

impl Component for QuitDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Some(Action::ForceQuit),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char('q') | KeyCode::Esc => {
                Some(Action::CloseModal)
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let popup_area = centered_popup(area, 40, 7);

        let key_style = |color: Color| Style::default().fg(color).add_modifier(Modifier::BOLD);
        let content = vec![
            Line::from(""),
            Line::from(Span::styled("Thoát chương trình?", key_style(Color::White))),
            Line::from(""),
            Line::from(vec![
                Span::styled(" y/Enter ", key_style(Color::Green)),
                Span::raw("Quit  "),
                Span::styled(" n/Esc ", key_style(Color::Red)),
                Span::raw("Stay"),
            ]),
        ];

        let paragraph = Paragraph::new(content)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow))
                    .title(" Quit ")
                    .title_style(key_style(Color::Yellow)),
            );

        frame.render_widget(Clear, popup_area);
        frame.render_widget(paragraph, popup_area);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_confirm_and_cancel() {
        let mut dialog = QuitDialog;
        let press = |code| KeyEvent::new(code, KeyModifiers::NONE);

        assert_eq!(
            dialog.handle_key_event(press(KeyCode::Char('y'))).unwrap(),
            Some(Action::ForceQuit)
        );
        assert_eq!(
            dialog.handle_key_event(press(KeyCode::Esc)).unwrap(),
            Some(Action::CloseModal)
        );
        assert_eq!(dialog.handle_key_event(press(KeyCode::Char('z'))).unwrap(), None);
    }
}

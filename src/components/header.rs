//! Header bar - app title, subtitle and backend status

use crate::services::HealthStatus;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub const TITLE: &str = "Hệ thống Quản lý Điểm danh";
pub const SUBTITLE: &str = "Xem chi tiết thông tin các bảng trong database";

/// Result of the startup health probe
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BackendStatus {
    #[default]
    Checking,
    Online(HealthStatus),
    Offline(String),
}

impl BackendStatus {
    pub fn offline_reason(&self) -> Option<&str> {
        match self {
            BackendStatus::Offline(reason) => Some(reason),
            _ => None,
        }
    }

    fn label(&self) -> (String, Color) {
        match self {
            BackendStatus::Checking => ("checking backend...".to_string(), Color::Yellow),
            BackendStatus::Online(health) if health.is_healthy() => {
                (format!("backend online · db {}", health.database), Color::Green)
            }
            BackendStatus::Online(health) => {
                (format!("backend {} · db {}", health.status, health.database), Color::Red)
            }
            BackendStatus::Offline(_) => ("backend offline".to_string(), Color::Red),
        }
    }
}

pub fn draw_header(frame: &mut Frame, area: Rect, base_url: &str, status: &BackendStatus) {
    let (status_text, status_color) = status.label();

    let content = vec![
        Line::from(Span::styled(
            TITLE,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(SUBTITLE, Style::default().fg(Color::DarkGray))),
    ];

    let header = Paragraph::new(content)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(Line::from(vec![
                    Span::raw(" "),
                    Span::styled(base_url.to_string(), Style::default().fg(Color::DarkGray)),
                    Span::raw(" "),
                ]))
                .title(
                    Line::from(Span::styled(
                        format!(" {} ", status_text),
                        Style::default().fg(status_color),
                    ))
                    .alignment(Alignment::Right),
                ),
        );

    frame.render_widget(header, area);
}

//! Text table rendering for fetched rows
//!
//! Renders headers, a separator and aligned rows as styled lines. Widths are
//! measured in terminal columns so Vietnamese text and wide glyphs line up.

use crate::model::TableData;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Widest a column may grow before cells are truncated
pub const MAX_COLUMN_WIDTH: usize = 50;

const COLUMN_SEPARATOR: &str = " │ ";

/// Header and separator lines, pinned above the scrolled rows
pub const PINNED_LINES: usize = 2;

/// Lines that scroll under the pinned header: every row, a blank line and
/// the footer
pub fn scroll_len(data: &TableData) -> usize {
    data.row_count() + 2
}

/// Build the pinned header plus `height` scrolled lines starting at `offset`
///
/// Only the visible rows are rendered, so the cost does not grow with the
/// size of the table. `col_widths` comes from [`column_widths`].
pub fn build_table_window(
    data: &TableData,
    col_widths: &[usize],
    offset: usize,
    height: usize,
) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(PINNED_LINES + height);

    let header_spans: Vec<Span> = data
        .headers
        .iter()
        .zip(col_widths)
        .flat_map(|(h, &width)| {
            vec![
                Span::styled(
                    fit_width(h, width),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(COLUMN_SEPARATOR),
            ]
        })
        .collect();
    lines.push(Line::from(header_spans));

    let separator: String = col_widths
        .iter()
        .map(|w| "─".repeat(*w))
        .collect::<Vec<_>>()
        .join("─┼─");
    lines.push(Line::from(Span::styled(
        separator,
        Style::default().fg(Color::DarkGray),
    )));

    let start = offset.min(scroll_len(data));
    let end = start.saturating_add(height).min(scroll_len(data));
    let row_end = end.min(data.row_count());

    for row in data.rows.get(start..row_end).unwrap_or_default() {
        let row_spans: Vec<Span> = row
            .iter()
            .zip(col_widths)
            .flat_map(|(cell, &width)| {
                vec![
                    Span::styled(fit_width(cell, width), Style::default().fg(Color::White)),
                    Span::raw(COLUMN_SEPARATOR),
                ]
            })
            .collect();
        lines.push(Line::from(row_spans));
    }

    for index in start.max(data.row_count())..end {
        if index == data.row_count() {
            lines.push(Line::from(""));
        } else {
            lines.push(Line::from(Span::styled(
                format!("Total rows: {}", data.row_count()),
                Style::default().fg(Color::Yellow),
            )));
        }
    }

    lines
}

/// Display width of each column, capped at `MAX_COLUMN_WIDTH`
pub fn column_widths(data: &TableData) -> Vec<usize> {
    let mut widths: Vec<usize> = data.headers.iter().map(|h| display_width(h)).collect();
    for row in &data.rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(display_width(cell));
        }
    }
    for width in &mut widths {
        *width = (*width).min(MAX_COLUMN_WIDTH);
    }
    widths
}

fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(single_line(text).as_str())
}

fn single_line(text: &str) -> String {
    text.replace(['\n', '\r', '\t'], " ")
}

/// Pad or truncate `text` to exactly `width` terminal columns
pub fn fit_width(text: &str, width: usize) -> String {
    let text = single_line(text);
    let text_width = UnicodeWidthStr::width(text.as_str());

    if text_width <= width {
        return format!("{}{}", text, " ".repeat(width - text_width));
    }

    // Leave one column for the ellipsis
    let budget = width.saturating_sub(1);
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(c);
        used += w;
    }
    if width > 0 {
        out.push('…');
        used += 1;
    }
    out.push_str(&" ".repeat(width.saturating_sub(used)));
    out
}

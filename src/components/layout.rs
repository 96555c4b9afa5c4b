//! Layout calculations for the UI

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Height of the header block (title + subtitle + borders)
pub const HEADER_HEIGHT: u16 = 4;
/// Height of the selector block (two rows of buttons + borders)
pub const SELECTOR_HEIGHT: u16 = 8;

/// Main screen layout areas
pub struct MainLayout {
    pub header: Rect,
    pub selector: Rect,
    pub content: Rect,
    pub help: Rect,
}

/// Calculate centered popup area
pub fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let popup_x = area.x + (area.width.saturating_sub(width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect::new(
        popup_x,
        popup_y,
        width.min(area.width),
        height.min(area.height),
    )
}

/// Calculate main screen layout: header, selector, content panel, help bar
pub fn calculate_main_layout(area: Rect) -> MainLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Length(SELECTOR_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    MainLayout {
        header: chunks[0],
        selector: chunks[1],
        content: chunks[2],
        help: chunks[3],
    }
}

/// Split `area` into a grid of `rows` x `columns` equally sized cells,
/// returned in row-major order
pub fn grid_cells(area: Rect, rows: usize, columns: usize) -> Vec<Rect> {
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(area);

    row_areas
        .iter()
        .flat_map(|row| {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
                .split(*row)
                .to_vec()
        })
        .collect()
}

use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::Book;

/// Numbered list row: `3. Title by Author (1999) - Genre - Read - Rating: 4`,
/// with the read marker colored.
pub(crate) fn book_line(number: usize, book: &Book) -> Line<'static> {
    let read_style = if book.read_status {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Line::from(vec![
        Span::raw(format!(
            "{number}. {} by {} ({}) - {} - ",
            book.title, book.author, book.publication_year, book.genre
        )),
        Span::styled(book.read_label(), read_style),
        Span::raw(format!(" - Rating: {}", book.rating_label())),
    ])
}

/// `1 book`, `3 books`.
pub(crate) fn count_books(count: usize) -> String {
    if count == 1 {
        "1 book".to_string()
    } else {
        format!("{count} books")
    }
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Error text for the footer. Persistence errors already embed their cause,
/// so only the outermost message is shown.
pub(crate) fn surface_error(err: &Error) -> String {
    err.to_string()
}

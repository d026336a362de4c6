pub mod empty_state;
pub mod movie_card;
pub mod pagination;

pub use empty_state::EmptyState;
pub use movie_card::movie_card;
pub use pagination::Pagination;

use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders};

/// A bordered section, highlighted while it has focus.
pub fn section(title: &str, focused: bool) -> Block<'_> {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border)
}

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

use cinefav_core::models::MovieItem;

use crate::poster::PosterState;

/// Shown instead of the poster when there is none or it failed to load.
pub const POSTER_PLACEHOLDER: &str = "[ no poster ]";

/// A two-line movie card, ready to wrap in a `ListItem`.
///
/// ```text
///  1. Batman (1989) [movie]  ☆ add to favorites
///     [ no poster ]
/// ```
///
/// `poster` is the load state of the item's poster, `None` when the item has
/// no usable poster URL.
pub fn movie_card<'a>(
    number: usize,
    item: &'a MovieItem,
    is_favorite: bool,
    poster: Option<PosterState>,
) -> Text<'a> {
    let toggle = if is_favorite {
        Span::styled("★ remove from favorites", Style::default().fg(Color::Yellow))
    } else {
        Span::styled("☆ add to favorites", Style::default().fg(Color::Gray))
    };
    let headline = Line::from(vec![
        Span::raw(format!("{number:>2}. ")),
        Span::styled(item.title.as_str(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(" ({}) ", item.year)),
        Span::styled(format!("[{}]", item.kind), Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        toggle,
    ]);
    let poster = Line::from(vec![
        Span::raw("    "),
        Span::styled(
            poster_line(item, poster),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);
    Text::from(vec![headline, poster])
}

fn poster_line(item: &MovieItem, poster: Option<PosterState>) -> &str {
    match (item.poster_url(), poster) {
        (Some(url), Some(PosterState::Loaded)) => url,
        (Some(_), Some(PosterState::Loading)) => "[ loading poster… ]",
        _ => POSTER_PLACEHOLDER,
    }
}

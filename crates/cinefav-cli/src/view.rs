//! Full-screen ratatui rendering of the session view.

use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use cinefav_core::models::MovieItem;
use cinefav_runtime::ViewState;

use crate::commands::{Mode, Pane, COMMAND_HELP, HELP};
use crate::poster::PosterCache;
use crate::toast::{ToastKind, Toasts};
use crate::widgets::{movie_card, section, EmptyState, Pagination};

pub const START_TYPING: &str = "Start typing to search for movies";
pub const NO_RESULTS: &str = "No movies found. Try a different keyword";
pub const NO_FAVORITES: &str = "No favorites yet. Add movies to build your list!";

/// Highlighted row in each list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub results: usize,
    pub favorites: usize,
}

/// Everything the renderer reads, borrowed from the app.
pub struct Screen<'a> {
    pub view: &'a ViewState,
    pub query: &'a str,
    pub command: &'a str,
    pub mode: Mode,
    pub cursor: Cursor,
    pub search_pager: &'a Pagination,
    pub favorites_pager: &'a Pagination,
    pub posters: &'a PosterCache,
    pub toasts: &'a Toasts,
}

pub fn draw(frame: &mut Frame, screen: &Screen<'_>) {
    let toast_rows = screen.toasts.iter().count() as u16;
    let [header, input, body, toasts, footer] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(toast_rows),
            Constraint::Length(1),
        ])
        .areas(frame.area());

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("cinefav", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("  {}", screen.view.location)),
        ])),
        header,
    );

    let editing_query = screen.mode == Mode::Query;
    frame.render_widget(
        Paragraph::new(screen.query).block(section("Search", editing_query)),
        input,
    );
    if editing_query {
        let x = input.x + 1 + screen.query.chars().count() as u16;
        frame.set_cursor_position(Position::new(x.min(input.right().saturating_sub(2)), input.y + 1));
    }

    let [results, favorites] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .areas(body);
    draw_results(frame, results, screen);
    draw_favorites(frame, favorites, screen);

    if !screen.toasts.is_empty() {
        let lines: Vec<Line> = screen
            .toasts
            .iter()
            .map(|toast| {
                let color = match toast.kind {
                    ToastKind::Success => Color::Green,
                    ToastKind::Error => Color::Red,
                };
                Line::styled(toast.render(), Style::default().fg(color))
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), toasts);
    }

    let footer_line = match screen.mode {
        Mode::Command(_) => Line::from(vec![
            Span::raw(format!(":{}", screen.command)),
            Span::styled(format!("   {COMMAND_HELP}"), Style::default().add_modifier(Modifier::DIM)),
        ]),
        _ => Line::styled(HELP, Style::default().add_modifier(Modifier::DIM)),
    };
    frame.render_widget(Paragraph::new(footer_line), footer);
}

fn draw_results(frame: &mut Frame, area: Rect, screen: &Screen<'_>) {
    let view = screen.view;
    let focused = matches!(screen.mode, Mode::Browse(Pane::Results) | Mode::Jump(Pane::Results));
    let block = section("Results", focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if view.search_loading {
        frame.render_widget(Paragraph::new("searching…"), inner);
        return;
    }
    if view.debounced_query.is_empty() {
        if view.recent.is_empty() {
            frame.render_widget(EmptyState::new("?", START_TYPING), inner);
        } else {
            let chips: Vec<Span> = view
                .recent
                .iter()
                .enumerate()
                .map(|(i, q)| Span::raw(format!("[{}] {q}  ", i + 1)))
                .collect();
            let mut line = vec![Span::styled("recent: ", Style::default().add_modifier(Modifier::DIM))];
            line.extend(chips);
            frame.render_widget(Paragraph::new(Line::from(line)), inner);
        }
        return;
    }
    if view.search.items.is_empty() {
        frame.render_widget(EmptyState::new("∅", NO_RESULTS), inner);
        return;
    }

    draw_list(
        frame,
        inner,
        &view.search.items,
        |item| view.is_favorite(&item.id),
        screen.posters,
        focused.then_some(screen.cursor.results),
        screen.search_pager,
        screen.mode == Mode::Jump(Pane::Results),
    );
}

fn draw_favorites(frame: &mut Frame, area: Rect, screen: &Screen<'_>) {
    let view = screen.view;
    let focused = matches!(
        screen.mode,
        Mode::Browse(Pane::Favorites) | Mode::Jump(Pane::Favorites)
    );
    let block = section("Favorites", focused);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if view.favorites_loading {
        frame.render_widget(Paragraph::new("loading…"), inner);
        return;
    }
    if view.favorites.items.is_empty() {
        frame.render_widget(EmptyState::new("★", NO_FAVORITES), inner);
        return;
    }

    draw_list(
        frame,
        inner,
        &view.favorites.items,
        |_| true,
        screen.posters,
        focused.then_some(screen.cursor.favorites),
        screen.favorites_pager,
        screen.mode == Mode::Jump(Pane::Favorites),
    );
}

/// Cards with the pagination control underneath when it is shown.
#[allow(clippy::too_many_arguments)]
fn draw_list(
    frame: &mut Frame,
    area: Rect,
    items: &[MovieItem],
    is_favorite: impl Fn(&MovieItem) -> bool,
    posters: &PosterCache,
    selected: Option<usize>,
    pager: &Pagination,
    editing_jump: bool,
) {
    let pager_rows = if pager.visible(items.len()) { 1 } else { 0 };
    let [list_area, pager_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(pager_rows)])
        .areas(area);

    let cards: Vec<ListItem> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            ListItem::new(movie_card(i + 1, item, is_favorite(item), posters.state_for(item)))
        })
        .collect();
    let list = List::new(cards).highlight_style(Style::default().bg(Color::DarkGray));
    let mut state = ListState::default().with_selected(selected);
    frame.render_stateful_widget(list, list_area, &mut state);

    if pager_rows > 0 {
        frame.render_widget(Paragraph::new(pager.line(editing_jump)), pager_area);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use cinefav_core::location::Location;
    use cinefav_core::models::PageState;

    use super::*;

    fn batman() -> MovieItem {
        MovieItem {
            id: "tt0096895".into(),
            title: "Batman".into(),
            year: "1989".into(),
            poster: Some("N/A".into()),
            kind: "movie".into(),
        }
    }

    struct Fixture {
        view: ViewState,
        mode: Mode,
        search_pager: Pagination,
        favorites_pager: Pagination,
        posters: PosterCache,
        toasts: Toasts,
    }

    impl Fixture {
        fn new(view: ViewState) -> Self {
            Self {
                search_pager: Pagination::new(view.search.current_page, view.search.total_pages),
                favorites_pager: Pagination::new(
                    view.favorites.current_page,
                    view.favorites.total_pages,
                ),
                view,
                mode: Mode::Query,
                posters: PosterCache::default(),
                toasts: Toasts::new(Duration::from_secs(2)),
            }
        }

        /// Draw into a 120x30 test terminal and return the rows.
        fn render(&self) -> String {
            let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
            let screen = Screen {
                view: &self.view,
                query: &self.view.query,
                command: "",
                mode: self.mode,
                cursor: Cursor::default(),
                search_pager: &self.search_pager,
                favorites_pager: &self.favorites_pager,
                posters: &self.posters,
                toasts: &self.toasts,
            };
            terminal.draw(|frame| draw(frame, &screen)).unwrap();

            let buffer = terminal.backend().buffer();
            (0..buffer.area.height)
                .map(|y| {
                    (0..buffer.area.width)
                        .map(|x| buffer[(x, y)].symbol())
                        .collect::<String>()
                })
                .collect::<Vec<_>>()
                .join("\n")
        }
    }

    #[test]
    fn test_batman_first_page() {
        let view = ViewState {
            location: Location::new("batman", 1),
            query: "batman".into(),
            debounced_query: "batman".into(),
            search: PageState {
                current_page: 1,
                total_pages: 3,
                items: vec![batman()],
            },
            ..Default::default()
        };
        let fixture = Fixture::new(view);
        let screen = fixture.render();

        assert!(screen.starts_with("cinefav  ?q=batman&page=1"));
        assert!(screen.contains(" 1. Batman (1989) [movie]"));
        assert!(screen.contains("[ no poster ]"));
        assert!(screen.contains("(  Prev)  1 / 3  [Next >]   go to: [1]"));
        assert!(!screen.contains(NO_RESULTS));
        assert!(!screen.contains(START_TYPING));
        assert!(screen.contains(NO_FAVORITES));
    }

    #[test]
    fn test_empty_query_prompts() {
        let fixture = Fixture::new(ViewState::default());
        let screen = fixture.render();
        assert!(screen.contains(START_TYPING));
        assert!(!screen.contains("recent:"));
        assert!(!screen.contains("go to:"));
    }

    #[test]
    fn test_recent_chips_replace_prompt() {
        let fixture = Fixture::new(ViewState {
            recent: vec!["alien".into(), "batman".into()],
            ..Default::default()
        });
        let screen = fixture.render();
        assert!(screen.contains("recent: [1] alien  [2] batman"));
        assert!(!screen.contains(START_TYPING));
    }

    #[test]
    fn test_no_results_after_search() {
        let fixture = Fixture::new(ViewState {
            query: "zzzz".into(),
            debounced_query: "zzzz".into(),
            ..Default::default()
        });
        let screen = fixture.render();
        assert!(screen.contains(NO_RESULTS));
        assert!(!screen.contains("go to:"));
    }

    #[test]
    fn test_loading_hides_empty_states() {
        let fixture = Fixture::new(ViewState {
            query: "batman".into(),
            debounced_query: "batman".into(),
            search_loading: true,
            favorites_loading: true,
            ..Default::default()
        });
        let screen = fixture.render();
        assert!(screen.contains("searching…"));
        assert!(screen.contains("loading…"));
        assert!(!screen.contains(NO_RESULTS));
        assert!(!screen.contains(NO_FAVORITES));
    }

    #[test]
    fn test_favorites_and_toasts() {
        let mut view = ViewState {
            query: "batman".into(),
            debounced_query: "batman".into(),
            ..Default::default()
        };
        view.search.items = vec![batman()];
        view.favorites.items = vec![batman()];
        let mut fixture = Fixture::new(view);
        fixture.toasts.push("Added to favorites!", ToastKind::Success);
        fixture.toasts.push("Removed from favorites!", ToastKind::Error);

        let screen = fixture.render();
        assert_eq!(screen.matches("★ remove from favorites").count(), 2);
        assert!(screen.contains("[✓] Added to favorites!"));
        assert!(screen.contains("[✗] Removed from favorites!"));
        assert!(!screen.contains(NO_FAVORITES));
    }

    #[test]
    fn test_command_line_replaces_help() {
        let mut fixture = Fixture::new(ViewState::default());
        assert!(fixture.render().contains("Ctrl+C quit"));

        fixture.mode = Mode::Command(Pane::Results);
        let screen = fixture.render();
        assert!(screen.contains(":   fav N"));
        assert!(!screen.contains("Ctrl+C quit"));
    }
}

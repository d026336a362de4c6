use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Widget};

/// A centered "nothing here" message with a leading symbol.
///
/// Used by both lists for their empty and prompt states.
#[derive(Debug, Clone, Copy)]
pub struct EmptyState<'a> {
    symbol: &'a str,
    title: &'a str,
}

impl<'a> EmptyState<'a> {
    pub fn new(symbol: &'a str, title: &'a str) -> Self {
        Self { symbol, title }
    }
}

impl Widget for EmptyState<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let middle = Rect {
            y: area.y + area.height / 2,
            height: 1,
            ..area
        };
        Paragraph::new(Line::from(format!("{}  {}", self.symbol, self.title)))
            .style(Style::default().add_modifier(Modifier::DIM))
            .alignment(Alignment::Center)
            .render(middle, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    #[test]
    fn test_centers_message() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 40, 3));
        EmptyState::new("*", "No favorites yet").render(buf.area, &mut buf);

        assert_eq!(row(&buf, 0).trim(), "");
        let line = row(&buf, 1);
        assert_eq!(line.trim(), "*  No favorites yet");
        let pad = line.len() - line.trim_start().len();
        assert_eq!(pad, (40 - 19) / 2);
    }

    #[test]
    fn test_long_message_is_clipped() {
        let title = "x".repeat(80);
        let mut buf = Buffer::empty(Rect::new(0, 0, 20, 1));
        EmptyState::new("*", &title).render(buf.area, &mut buf);
        assert_eq!(row(&buf, 0).trim().len(), 20);
    }
}

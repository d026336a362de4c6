use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// A pagination control: `[< Prev]  current / total  [Next >]  go to: [input]`
///
/// Holds a text buffer for the jump input so a half-typed page number never
/// becomes a request. The buffer follows the current page whenever the page
/// changes underneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    current: u32,
    total: u32,
    input: String,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl Pagination {
    pub fn new(current: u32, total: u32) -> Self {
        Self {
            current,
            total: total.max(1),
            input: current.to_string(),
        }
    }

    /// Follow the list's cursor. Resets the input when the page moved.
    pub fn sync(&mut self, current: u32, total: u32) {
        if current != self.current {
            self.input = current.to_string();
        }
        self.current = current;
        self.total = total.max(1);
    }

    /// Whether the control is shown at all for a list of `len` items.
    pub fn visible(&self, len: usize) -> bool {
        self.total > 1 && len > 0
    }

    pub fn label(&self) -> String {
        format!("{} / {}", self.current, self.total)
    }

    pub fn has_prev(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total
    }

    pub fn prev(&self) -> Option<u32> {
        self.has_prev().then(|| self.current - 1)
    }

    pub fn next(&self) -> Option<u32> {
        self.has_next().then(|| self.current + 1)
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Page the input buffer points at, if it is a valid target.
    pub fn jump(&self) -> Option<u32> {
        self.input
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|page| (1..=self.total).contains(page))
    }

    pub fn push_input(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_input(&mut self) {
        self.input.pop();
    }

    /// Discard whatever was typed and show the current page again.
    pub fn reset_input(&mut self) {
        self.input = self.current.to_string();
    }

    /// Type `text` into the input and submit it.
    pub fn jump_to(&mut self, text: &str) -> Option<u32> {
        self.set_input(text.trim());
        self.jump()
    }

    /// The control as one line. Empty when there is only one page.
    ///
    /// `editing` highlights the jump buffer while it has the keyboard.
    pub fn line(&self, editing: bool) -> Line<'static> {
        if self.total <= 1 {
            return Line::default();
        }
        let enabled = Style::default().fg(Color::Cyan);
        let disabled = Style::default().add_modifier(Modifier::DIM);
        let (prev, prev_style) = if self.has_prev() {
            ("[< Prev]", enabled)
        } else {
            ("(  Prev)", disabled)
        };
        let (next, next_style) = if self.has_next() {
            ("[Next >]", enabled)
        } else {
            ("(Next  )", disabled)
        };
        let input_style = if editing {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::styled(prev, prev_style),
            Span::raw(format!("  {}  ", self.label())),
            Span::styled(next, next_style),
            Span::raw("   go to: ["),
            Span::styled(self.input.clone(), input_style),
            Span::raw("]"),
        ])
    }
}

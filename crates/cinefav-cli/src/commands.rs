//! Key bindings and the `:` command line.
//!
//! Keys map to an [`Action`] depending on the current [`Mode`]. Typing `:`
//! while browsing opens a command line whose text is parsed into a
//! [`Command`] on Enter.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use cinefav_core::location::Location;

/// One-line summary shown under the screen.
pub const HELP: &str =
    "type to search · Tab lists · Enter/f toggle · ←→ page · g go to page · : command · Esc back · Ctrl+C quit";

/// Commands available after `:`.
pub const COMMAND_HELP: &str =
    "fav N · ffav N · next · prev · page N · fnext · fprev · fpage N · recent N · open ?q=..&page=.. · clear · quit";

/// Which list a key acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Results,
    Favorites,
}

/// Where keystrokes go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Typing edits the search query.
    Query,
    /// Arrow keys move through a list.
    Browse(Pane),
    /// Typing into a list's "go to" page buffer.
    Jump(Pane),
    /// Typing into the `:` command line, returning to the pane afterwards.
    Command(Pane),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Insert(char),
    Backspace,
    ClearInput,
    Submit,
    Cancel,
    FocusNext,
    FocusPrev,
    FocusQuery,
    Up,
    Down,
    Toggle,
    PrevPage,
    NextPage,
    StartJump,
    StartCommand,
}

/// Map a key press to an action for the given mode.
pub fn key_action(mode: Mode, key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match mode {
        Mode::Query | Mode::Jump(_) | Mode::Command(_) => match key.code {
            KeyCode::Char('u') if ctrl => Some(Action::ClearInput),
            KeyCode::Char(_) if ctrl => None,
            KeyCode::Char(c) => Some(Action::Insert(c)),
            KeyCode::Backspace => Some(Action::Backspace),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Tab if mode == Mode::Query => Some(Action::FocusNext),
            KeyCode::BackTab if mode == Mode::Query => Some(Action::FocusPrev),
            KeyCode::Down if mode == Mode::Query => Some(Action::FocusNext),
            _ => None,
        },
        Mode::Browse(_) => match key.code {
            KeyCode::Char(_) if ctrl => None,
            KeyCode::Up | KeyCode::Char('k') => Some(Action::Up),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::Down),
            KeyCode::Enter | KeyCode::Char('f') | KeyCode::Char(' ') => Some(Action::Toggle),
            KeyCode::Left | KeyCode::PageUp | KeyCode::Char('h') => Some(Action::PrevPage),
            KeyCode::Right | KeyCode::PageDown | KeyCode::Char('l') => Some(Action::NextPage),
            KeyCode::Char('g') => Some(Action::StartJump),
            KeyCode::Char(':') => Some(Action::StartCommand),
            KeyCode::Char('/') | KeyCode::Esc => Some(Action::FocusQuery),
            KeyCode::Tab => Some(Action::FocusNext),
            KeyCode::BackTab => Some(Action::FocusPrev),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Toggle the Nth search result (1-based).
    ToggleResult(usize),
    /// Toggle the Nth listed favorite (1-based).
    ToggleFavorite(usize),
    NextPage,
    PrevPage,
    /// Jump the search list to the page typed in the argument.
    JumpPage(String),
    NextFavoritesPage,
    PrevFavoritesPage,
    JumpFavoritesPage(String),
    /// Re-run the Nth recent search (1-based).
    Recent(usize),
    Open(Location),
    Clear,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command :{0}")]
    Unknown(String),
    #[error(":{0} needs an argument")]
    MissingArgument(&'static str),
    #[error("not a list number: {0}")]
    BadNumber(String),
}

/// Parse the text typed after `:`.
pub fn parse(line: &str) -> Result<Command, CommandError> {
    let rest = line.trim();
    let rest = rest.strip_prefix(':').unwrap_or(rest).trim_start();
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name {
        "fav" => number(arg, "fav").map(Command::ToggleResult),
        "ffav" => number(arg, "ffav").map(Command::ToggleFavorite),
        "next" | "n" => Ok(Command::NextPage),
        "prev" | "p" => Ok(Command::PrevPage),
        "page" => required(arg, "page").map(|a| Command::JumpPage(a.to_string())),
        "fnext" => Ok(Command::NextFavoritesPage),
        "fprev" => Ok(Command::PrevFavoritesPage),
        "fpage" => required(arg, "fpage").map(|a| Command::JumpFavoritesPage(a.to_string())),
        "recent" | "r" => number(arg, "recent").map(Command::Recent),
        "open" => required(arg, "open").map(|a| Command::Open(Location::from_query(a))),
        "clear" => Ok(Command::Clear),
        "quit" | "q" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn required<'a>(arg: &'a str, name: &'static str) -> Result<&'a str, CommandError> {
    if arg.is_empty() {
        Err(CommandError::MissingArgument(name))
    } else {
        Ok(arg)
    }
}

/// A 1-based list number.
fn number(arg: &str, name: &'static str) -> Result<usize, CommandError> {
    let arg = required(arg, name)?;
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::BadNumber(arg.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_query_mode_types_every_character() {
        for c in ['b', 'j', 'q', 'g', ':', ' '] {
            assert_eq!(key_action(Mode::Query, press(KeyCode::Char(c))), Some(Action::Insert(c)));
        }
        assert_eq!(key_action(Mode::Query, press(KeyCode::Backspace)), Some(Action::Backspace));
        assert_eq!(key_action(Mode::Query, ctrl('u')), Some(Action::ClearInput));
        assert_eq!(key_action(Mode::Query, press(KeyCode::Esc)), Some(Action::Cancel));
        assert_eq!(key_action(Mode::Query, press(KeyCode::Down)), Some(Action::FocusNext));
        assert_eq!(key_action(Mode::Query, press(KeyCode::Tab)), Some(Action::FocusNext));
    }

    #[test]
    fn test_ctrl_c_quits_everywhere() {
        for mode in [
            Mode::Query,
            Mode::Browse(Pane::Results),
            Mode::Jump(Pane::Favorites),
            Mode::Command(Pane::Results),
        ] {
            assert_eq!(key_action(mode, ctrl('c')), Some(Action::Quit));
        }
    }

    #[test]
    fn test_browse_bindings() {
        let mode = Mode::Browse(Pane::Results);
        assert_eq!(key_action(mode, press(KeyCode::Char('j'))), Some(Action::Down));
        assert_eq!(key_action(mode, press(KeyCode::Up)), Some(Action::Up));
        assert_eq!(key_action(mode, press(KeyCode::Enter)), Some(Action::Toggle));
        assert_eq!(key_action(mode, press(KeyCode::Char('f'))), Some(Action::Toggle));
        assert_eq!(key_action(mode, press(KeyCode::Left)), Some(Action::PrevPage));
        assert_eq!(key_action(mode, press(KeyCode::PageDown)), Some(Action::NextPage));
        assert_eq!(key_action(mode, press(KeyCode::Char('g'))), Some(Action::StartJump));
        assert_eq!(key_action(mode, press(KeyCode::Char(':'))), Some(Action::StartCommand));
        assert_eq!(key_action(mode, press(KeyCode::Esc)), Some(Action::FocusQuery));
        assert_eq!(key_action(mode, press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_jump_buffer_takes_raw_input() {
        let mode = Mode::Jump(Pane::Results);
        assert_eq!(key_action(mode, press(KeyCode::Char('9'))), Some(Action::Insert('9')));
        assert_eq!(key_action(mode, press(KeyCode::Char('j'))), Some(Action::Insert('j')));
        assert_eq!(key_action(mode, press(KeyCode::Enter)), Some(Action::Submit));
        assert_eq!(key_action(mode, press(KeyCode::Tab)), None);
    }

    #[test]
    fn test_toggles_take_list_numbers() {
        assert_eq!(parse("fav 2"), Ok(Command::ToggleResult(2)));
        assert_eq!(parse(":ffav  1 "), Ok(Command::ToggleFavorite(1)));
        assert_eq!(parse("fav 0"), Err(CommandError::BadNumber("0".into())));
        assert_eq!(parse("fav x"), Err(CommandError::BadNumber("x".into())));
        assert_eq!(parse("fav"), Err(CommandError::MissingArgument("fav")));
    }

    #[test]
    fn test_page_jumps_keep_raw_argument() {
        assert_eq!(parse("page 99"), Ok(Command::JumpPage("99".into())));
        assert_eq!(parse("fpage two"), Ok(Command::JumpFavoritesPage("two".into())));
        assert_eq!(parse("page"), Err(CommandError::MissingArgument("page")));
    }

    #[test]
    fn test_navigation_commands() {
        assert_eq!(parse("next"), Ok(Command::NextPage));
        assert_eq!(parse("p"), Ok(Command::PrevPage));
        assert_eq!(parse("fnext"), Ok(Command::NextFavoritesPage));
        assert_eq!(parse("fprev"), Ok(Command::PrevFavoritesPage));
        assert_eq!(parse("recent 1"), Ok(Command::Recent(1)));
        assert_eq!(parse("clear"), Ok(Command::Clear));
        assert_eq!(parse("q"), Ok(Command::Quit));
    }

    #[test]
    fn test_open_parses_location() {
        assert_eq!(
            parse("open ?q=batman&page=2"),
            Ok(Command::Open(Location::new("batman", 2)))
        );
        assert_eq!(
            parse("open http://localhost:3000/?q=alien"),
            Ok(Command::Open(Location::new("alien", 1)))
        );
    }

    #[test]
    fn test_unknown_command() {
        let err = parse("frobnicate now").unwrap_err();
        assert_eq!(err, CommandError::Unknown("frobnicate".into()));
        assert_eq!(err.to_string(), "unknown command :frobnicate");
    }
}

// Line-oriented terminal surface for the tracker
//
// Each input line is one command. Form values are taken verbatim: whatever
// follows the command word and a single space becomes the field value.

mod terminal;

pub use terminal::run_terminal;

use crate::session::view::Action;
use crate::session::{Field, Session, ViewModel};

pub const HELP: &str = "\
Commands:
  name <text>       set your name
  location <text>   set your location
  email <address>   set your email address
  login             log in and start the timer
  logout            log out and send the elapsed time
  status            show the form and timer
  help              show this help
  quit              exit (logs out first if needed)";

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set(Field, String),
    Login,
    Logout,
    Status,
    Help,
    Quit,
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        // Leading blanks before the command word are ignored; the value after it is not
        let line = line.trim_start();
        let (word, rest) = match line.split_once(' ') {
            Some((word, rest)) => (word, Some(rest)),
            None => (line, None),
        };

        let field = match word.to_ascii_lowercase().as_str() {
            "" => return Ok(Command::Empty),
            "name" => Field::Name,
            "location" => Field::Location,
            "email" => Field::Email,
            "login" => return Ok(Command::Login),
            "logout" => return Ok(Command::Logout),
            "status" => return Ok(Command::Status),
            "help" | "?" => return Ok(Command::Help),
            "quit" | "exit" => return Ok(Command::Quit),
            other => return Err(format!("Unknown command: {:?} (type 'help')", other)),
        };

        Ok(Command::Set(field, rest.unwrap_or_default().to_string()))
    }
}

/// Render the widget as text
pub fn render(session: &Session, view: &ViewModel) -> String {
    let lock = if view.inputs_enabled { "" } else { "  [locked]" };
    let mut out = String::new();

    for (label, field) in [
        ("Name:    ", Field::Name),
        ("Location:", Field::Location),
        ("Email:   ", Field::Email),
    ] {
        out.push_str(&format!("{} {}{}\n", label, session.field(field), lock));
    }

    let button = if view.action_enabled {
        format!("[ {} ]", view.action_label)
    } else {
        format!("( {} )", view.action_label)
    };
    let command = match view.action {
        Action::LogIn => "login",
        Action::LogOut => "logout",
    };
    out.push_str(&format!("{}  (type '{}')\n", button, command));

    if let Some(duration) = &view.duration {
        out.push_str(&format!("Duration: {}\n", duration));
    }

    out
}

//! Line commands understood by the interactive loop.

use bookshelf_core::BookId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const HELP_TEXT: &str = "\
commands:
  list              show both shelves
  add               add a book (prompts for fields)
  edit <id>         edit a book (enter keeps the current value)
  cancel            leave edit mode
  complete <id>     move a book to the finished shelf
  undo <id>         move a book back to the unfinished shelf
  delete <id>       remove a book
  search [text]     filter by title; empty text shows everything
  clear             remove every book
  help              show this text
  quit              exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Add,
    Edit(BookId),
    Cancel,
    Complete(BookId),
    Undo(BookId),
    Delete(BookId),
    Search(String),
    Clear,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    Unknown(String),
    MissingId(&'static str),
    InvalidId(String),
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "empty command"),
            Self::Unknown(name) => write!(f, "unknown command `{name}`; type `help`"),
            Self::MissingId(name) => write!(f, "`{name}` needs a book id"),
            Self::InvalidId(value) => write!(f, "`{value}` is not a book id"),
        }
    }
}

impl Error for CommandError {}

impl Command {
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        match name.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "list" | "ls" => Ok(Self::List),
            "add" => Ok(Self::Add),
            "edit" => parse_id("edit", rest).map(Self::Edit),
            "cancel" => Ok(Self::Cancel),
            "complete" | "done" => parse_id("complete", rest).map(Self::Complete),
            "undo" => parse_id("undo", rest).map(Self::Undo),
            "delete" | "rm" => parse_id("delete", rest).map(Self::Delete),
            "search" | "find" => Ok(Self::Search(rest.to_string())),
            "clear" => Ok(Self::Clear),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn parse_id(name: &'static str, value: &str) -> Result<BookId, CommandError> {
    if value.is_empty() {
        return Err(CommandError::MissingId(name));
    }
    value
        .parse::<BookId>()
        .map_err(|_| CommandError::InvalidId(value.to_string()))
}

//! Terminal host for the bookshelf manager.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the durable store.
//! - Feed console commands into the shelf controller until `quit` or EOF.

mod command;
mod config;
mod terminal;

use bookshelf_core::{
    core_version, init_logging, BookStorage, FormMode, ShelfController,
    SqliteKeyValueStore,
};
use clap::Parser;
use command::{Command, CommandError, HELP_TEXT};
use config::{AppConfig, CliArgs};
use log::{error, info};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use terminal::{Console, TerminalRenderer};

type Controller<R, W> = ShelfController<TerminalRenderer<io::Stdout>, Console<R, W>>;

fn main() -> ExitCode {
    let config = match AppConfig::resolve(CliArgs::parse()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("bookshelf: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("bookshelf: logging disabled: {err}");
    }
    info!(
        "event=cli_start module=cli status=ok version={} memory_only={}",
        core_version(),
        config.memory_only
    );

    let mut controller = ShelfController::new(
        open_storage(&config),
        TerminalRenderer::stdout(),
        Console::stdio(),
    );
    controller.start();
    controller.notifier_mut().print("Type `help` for commands.");

    match run(&mut controller) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_exit module=cli status=error error={err}");
            eprintln!("bookshelf: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Opens the durable store, falling back to a memory-only session.
fn open_storage(config: &AppConfig) -> BookStorage {
    if config.memory_only {
        return BookStorage::unavailable();
    }
    match SqliteKeyValueStore::open(&config.db_path) {
        Ok(store) => BookStorage::new(Box::new(store)),
        Err(err) => {
            error!(
                "event=storage_open module=cli status=error error_code=store_open_failed error={err}"
            );
            BookStorage::unavailable()
        }
    }
}

fn run<R: BufRead, W: Write>(controller: &mut Controller<R, W>) -> io::Result<()> {
    loop {
        let prompt = match controller.mode() {
            FormMode::Create => "bookshelf> ".to_string(),
            FormMode::Edit { book_id } => format!("bookshelf (editing {book_id})> "),
        };
        let console = controller.notifier_mut();
        write!(console.out(), "{prompt}")?;
        console.out().flush()?;

        let Some(line) = console.read_line()? else {
            return Ok(());
        };

        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(CommandError::Empty) => continue,
            Err(err) => {
                controller.notifier_mut().print(&err.to_string());
                continue;
            }
        };

        match command {
            Command::Quit => return Ok(()),
            Command::Help => controller.notifier_mut().print(HELP_TEXT),
            Command::List => controller.refresh(),
            Command::Add => {
                if matches!(controller.mode(), FormMode::Edit { .. }) {
                    controller.cancel_edit();
                }
                if fill_form(controller, true)? {
                    controller.submit();
                }
            }
            Command::Edit(book_id) => {
                if !controller.begin_edit(book_id) {
                    controller
                        .notifier_mut()
                        .print(&format!("no book with id {book_id}"));
                    continue;
                }
                if fill_form(controller, false)? {
                    controller.submit();
                }
            }
            Command::Cancel => controller.cancel_edit(),
            Command::Complete(book_id) => controller.complete(book_id),
            Command::Undo(book_id) => controller.undo(book_id),
            Command::Delete(book_id) => {
                controller.delete(book_id);
            }
            Command::Search(query) => {
                let hits = controller.search(&query);
                controller
                    .notifier_mut()
                    .print(&format!("{} matching book(s)", hits.len()));
            }
            Command::Clear => {
                controller.clear_all();
            }
        }
    }
}

/// Prompts for every form field. Returns `false` when input ended.
///
/// In edit mode the current values are offered as defaults.
fn fill_form<R: BufRead, W: Write>(
    controller: &mut Controller<R, W>,
    creating: bool,
) -> io::Result<bool> {
    let current = controller.form().clone();
    let defaults = |value: &str| (!creating).then(|| value.to_string());
    let title_default = defaults(&current.title);
    let author_default = defaults(&current.author);
    let year_default = defaults(&current.year);

    let console = controller.notifier_mut();
    let Some(title) = console.prompt("Title", title_default.as_deref())? else {
        return Ok(false);
    };
    let Some(author) = console.prompt("Author", author_default.as_deref())? else {
        return Ok(false);
    };
    let Some(year) = console.prompt("Year", year_default.as_deref())? else {
        return Ok(false);
    };
    let is_complete = if creating {
        let Some(answer) = console.prompt("Finished reading? [y/N]", None)? else {
            return Ok(false);
        };
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    } else {
        current.is_complete
    };

    let form = controller.form_mut();
    form.title = title;
    form.author = author;
    form.year = year;
    form.is_complete = is_complete;
    Ok(true)
}

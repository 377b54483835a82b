//! Terminal implementations of the rendering and notification collaborators.

use bookshelf_core::{BookItemView, Notice, Notifier, ShelfCounts, ShelfRenderer, ShelfView};
use log::warn;
use std::io::{self, BufRead, Write};

/// Prints shelves and counts as plain text.
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_shelf(&mut self, heading: &str, items: &[BookItemView]) -> io::Result<()> {
        writeln!(self.out, "== {heading} ({}) ==", items.len())?;
        if items.is_empty() {
            writeln!(self.out, "  (empty)")?;
        }
        for item in items {
            let actions: Vec<&str> = item.actions.iter().map(|action| action.as_str()).collect();
            writeln!(
                self.out,
                "  [{}] {}\n      Author: {} | Year: {} | {}",
                item.id,
                item.title,
                item.author,
                item.year,
                actions.join(" ")
            )?;
        }
        Ok(())
    }

    fn write_view(&mut self, view: &ShelfView) -> io::Result<()> {
        self.write_shelf("Unfinished", &view.incomplete)?;
        self.write_shelf("Finished", &view.complete)?;
        self.out.flush()
    }
}

impl<W: Write> ShelfRenderer for TerminalRenderer<W> {
    fn render(&mut self, view: &ShelfView) {
        if let Err(err) = self.write_view(view) {
            warn!("event=render module=cli status=error error={err}");
        }
    }

    fn render_counts(&mut self, counts: ShelfCounts) {
        let written = writeln!(
            self.out,
            "Total: {} | Unfinished: {} | Finished: {}",
            counts.total, counts.incomplete, counts.complete
        )
        .and_then(|()| self.out.flush());
        if let Err(err) = written {
            warn!("event=render_counts module=cli status=error error={err}");
        }
    }
}

/// Line-oriented console: reads commands and field input, prints notices.
pub struct Console<R: BufRead, W: Write> {
    input: R,
    out: W,
}

impl Console<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }

    /// Reads one line without its terminator. `None` at end of input.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    /// Prints `label` and reads the answer.
    ///
    /// With a `current` value, an empty answer keeps it.
    pub fn prompt(&mut self, label: &str, current: Option<&str>) -> io::Result<Option<String>> {
        match current {
            Some(value) => write!(self.out, "{label} [{value}]: ")?,
            None => write!(self.out, "{label}: ")?,
        }
        self.out.flush()?;

        let Some(answer) = self.read_line()? else {
            return Ok(None);
        };
        match current {
            Some(value) if answer.trim().is_empty() => Ok(Some(value.to_string())),
            _ => Ok(Some(answer)),
        }
    }

    pub fn print(&mut self, text: &str) {
        if let Err(err) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            warn!("event=print module=cli status=error error={err}");
        }
    }
}

impl<R: BufRead, W: Write> Notifier for Console<R, W> {
    fn notify(&mut self, notice: &Notice) {
        self.print(&format!("* {notice}"));
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        match self.prompt(&format!("{prompt} [y/N]"), None) {
            Ok(Some(answer)) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Ok(None) => false,
            Err(err) => {
                warn!("event=confirm module=cli status=error error={err}");
                false
            }
        }
    }
}

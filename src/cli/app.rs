//! Interactive Session Module
//! Line-oriented drill-down session: read a command, update navigation,
//! render the active view.

use crate::agg::DatasetSummary;
use crate::cli::view;
use crate::data::LoadOutcome;
use crate::nav::{Navigator, Scene};
use std::io::{self, BufRead, Write};
use tracing::debug;

const HELP: &str = "\
Commands:
  drill <name>   drill into a city (at the overview) or a product (in a city)
  back           pop one level off the navigation stack
  reset          return to the overview and clear the stack
  summary        reprint the dataset summary
  export         print the current view as JSON
  help           show this message
  quit           exit";

/// One user action, parsed from an input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Drill(String),
    Back,
    Reset,
    Summary,
    Export,
    Help,
    Quit,
}

impl Command {
    /// Parse a line; the drill target is the rest of the line, so names
    /// with spaces need no quoting.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };
        match head {
            "drill" | "d" => {
                if rest.is_empty() {
                    Err("drill needs a name, e.g. `drill Paris`".to_string())
                } else {
                    Ok(Command::Drill(rest.to_string()))
                }
            }
            "back" | "b" => Ok(Command::Back),
            "reset" => Ok(Command::Reset),
            "summary" => Ok(Command::Summary),
            "export" => Ok(Command::Export),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(format!("unknown command `{other}` (try `help`)")),
        }
    }
}

/// Interactive drill-down session over a loaded dataset.
pub struct Session {
    navigator: Navigator,
    summary: DatasetSummary,
    top_limit: usize,
}

impl Session {
    pub fn new(outcome: LoadOutcome, top_limit: usize) -> Self {
        let summary = DatasetSummary::compute(&outcome.records, outcome.skipped.len());
        Self {
            navigator: Navigator::new(outcome.records),
            summary,
            top_limit,
        }
    }

    /// Run the read-dispatch-render loop until `quit` or end of input.
    pub fn run(&mut self) -> anyhow::Result<()> {
        let stdin = io::stdin();
        let mut out = io::stdout();

        writeln!(out, "{}", view::summary_lines(&self.summary))?;
        writeln!(out)?;
        self.render(&mut out)?;

        loop {
            write!(out, "> ")?;
            out.flush()?;

            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                break; // end of input
            }
            if line.trim().is_empty() {
                continue;
            }

            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(message) => {
                    writeln!(out, "{message}")?;
                    continue;
                }
            };
            debug!(?command, "dispatch");

            match command {
                Command::Quit => break,
                Command::Help => writeln!(out, "{HELP}")?,
                Command::Summary => writeln!(out, "{}", view::summary_lines(&self.summary))?,
                Command::Export => {
                    let agg = self.navigator.current_aggregation();
                    writeln!(out, "{}", view::export_json(self.navigator.scene(), &agg)?)?;
                }
                Command::Drill(name) => {
                    self.drill(&mut out, &name)?;
                }
                Command::Back => {
                    if self.navigator.can_go_back() {
                        self.navigator.go_back();
                        self.render(&mut out)?;
                    } else {
                        writeln!(out, "Already at the overview.")?;
                    }
                }
                Command::Reset => {
                    self.navigator.reset();
                    self.render(&mut out)?;
                }
            }
        }
        Ok(())
    }

    /// Scene-dependent drill: city names at the overview, product names in
    /// a city view, nothing below that.
    fn drill(&mut self, out: &mut impl Write, name: &str) -> anyhow::Result<()> {
        let result = match self.navigator.scene().clone() {
            Scene::Overview => self.navigator.drill_to_city(name),
            Scene::City { city } => self.navigator.drill_to_product(&city, name),
            Scene::Product { .. } => {
                writeln!(out, "Already at the deepest level; `back` to go up.")?;
                return Ok(());
            }
        };
        match result {
            Ok(()) => self.render(out)?,
            Err(err) => writeln!(out, "{err}")?,
        }
        Ok(())
    }

    fn render(&self, out: &mut impl Write) -> anyhow::Result<()> {
        let agg = self.navigator.current_aggregation();
        write!(
            out,
            "{}",
            view::render(self.navigator.scene(), &agg, self.top_limit)
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Record;

    #[test]
    fn commands_parse_with_aliases() {
        assert_eq!(
            Command::parse("drill Paris"),
            Ok(Command::Drill("Paris".to_string()))
        );
        assert_eq!(
            Command::parse("d New York"),
            Ok(Command::Drill("New York".to_string()))
        );
        assert_eq!(Command::parse("  back "), Ok(Command::Back));
        assert_eq!(Command::parse("b"), Ok(Command::Back));
        assert_eq!(Command::parse("reset"), Ok(Command::Reset));
        assert_eq!(Command::parse("export"), Ok(Command::Export));
        assert_eq!(Command::parse("q"), Ok(Command::Quit));
    }

    #[test]
    fn bad_input_yields_messages_not_panics() {
        assert!(Command::parse("drill").is_err());
        assert!(Command::parse("fly Paris").is_err());
    }

    #[test]
    fn session_drills_through_all_levels() {
        let outcome = LoadOutcome {
            records: vec![
                Record::new(
                    "Paris".to_string(),
                    "Burger".to_string(),
                    Some("Delivery".to_string()),
                    5.0,
                    2,
                    None,
                ),
                Record::new(
                    "Paris".to_string(),
                    "Burger".to_string(),
                    Some("Delivery".to_string()),
                    5.0,
                    3,
                    None,
                ),
            ],
            skipped: Vec::new(),
        };
        let mut session = Session::new(outcome, 10);
        let mut sink = Vec::new();

        session.drill(&mut sink, "Paris").unwrap();
        session.drill(&mut sink, "Burger").unwrap();

        let agg = session.navigator.current_aggregation();
        assert_eq!(agg.get("Delivery").unwrap().quantity, 5);

        // A third drill is rejected with a message, state untouched.
        session.drill(&mut sink, "Delivery").unwrap();
        assert_eq!(session.navigator.scene().product(), Some("Burger"));

        let text = String::from_utf8(sink).unwrap();
        assert!(text.contains("Burger Details"));
        assert!(text.contains("Already at the deepest level"));
    }
}

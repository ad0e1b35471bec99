//! Line commands accepted by `loandash watch`.

use std::fmt;

use crate::filters::FilterEvent;
use crate::view::chart::{ChartSlot, ChartTarget};

pub const HELP: &str = "\
Commands:
  click <chart> <label|#n>   select a category (clicking it again deselects)
  toggle <Dimension> <value> toggle a filter directly
  rm <Dimension>             dismiss one filter badge
  reset                      clear every filter
  refresh | r                fetch again with the current filters
  help                       show this text
  quit | q                   leave

Charts: sex, property, education, purpose (avg-sex and avg-education are read-only)";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Click { slot: ChartSlot, target: ChartTarget },
    Filter(FilterEvent),
    Dismiss(String),
    Reset,
    Refresh,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    Unknown(String),
    Usage(&'static str),
    UnknownChart(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty command"),
            Self::Unknown(word) => write!(f, "unknown command '{word}' (try 'help')"),
            Self::Usage(usage) => write!(f, "usage: {usage}"),
            Self::UnknownChart(name) => {
                let names: Vec<_> = ChartSlot::ALL.iter().map(|s| s.name()).collect();
                write!(f, "unknown chart '{name}', expected one of: {}", names.join(", "))
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse one input line.
///
/// Labels and values may contain spaces: everything after the leading
/// arguments is taken verbatim (trimmed).
pub fn parse(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    let (word, rest) = split_word(line);
    if word.is_empty() {
        return Err(ParseError::Empty);
    }

    match word.to_ascii_lowercase().as_str() {
        "click" => {
            let (chart, target) = split_word(rest);
            if chart.is_empty() || target.is_empty() {
                return Err(ParseError::Usage("click <chart> <label|#n>"));
            }
            let slot =
                ChartSlot::from_name(chart).ok_or_else(|| ParseError::UnknownChart(chart.into()))?;
            Ok(Command::Click {
                slot,
                target: ChartTarget::parse(target),
            })
        }
        "toggle" => {
            let (dimension, value) = split_word(rest);
            if dimension.is_empty() || value.is_empty() {
                return Err(ParseError::Usage("toggle <Dimension> <value>"));
            }
            Ok(Command::Filter(FilterEvent::Toggled {
                dimension: dimension.to_string(),
                value: value.to_string(),
            }))
        }
        "rm" | "remove" => {
            if rest.is_empty() {
                return Err(ParseError::Usage("rm <Dimension>"));
            }
            Ok(Command::Dismiss(rest.to_string()))
        }
        "reset" => Ok(Command::Reset),
        "refresh" | "r" => Ok(Command::Refresh),
        "help" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        _ => Err(ParseError::Unknown(word.to_string())),
    }
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (s, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_with_label_and_index() {
        assert_eq!(
            parse("click education Laureato"),
            Ok(Command::Click {
                slot: ChartSlot::Education,
                target: ChartTarget::Label("Laureato".to_string()),
            })
        );
        assert_eq!(
            parse("  CLICK sex #2 "),
            Ok(Command::Click {
                slot: ChartSlot::Sex,
                target: ChartTarget::Index(1),
            })
        );
    }

    #[test]
    fn labels_keep_inner_spaces() {
        assert_eq!(
            parse("click purpose Acquisto auto"),
            Ok(Command::Click {
                slot: ChartSlot::Purpose,
                target: ChartTarget::Label("Acquisto auto".to_string()),
            })
        );
        assert_eq!(
            parse("toggle ScopoFinanziamento Acquisto  auto"),
            Ok(Command::Filter(FilterEvent::Toggled {
                dimension: "ScopoFinanziamento".to_string(),
                value: "Acquisto  auto".to_string(),
            }))
        );
    }

    #[test]
    fn short_forms() {
        assert_eq!(parse("r"), Ok(Command::Refresh));
        assert_eq!(parse("q"), Ok(Command::Quit));
        assert_eq!(parse("reset"), Ok(Command::Reset));
        assert_eq!(parse("rm Sesso"), Ok(Command::Dismiss("Sesso".to_string())));
    }

    #[test]
    fn errors() {
        assert_eq!(parse("   "), Err(ParseError::Empty));
        assert_eq!(parse("zoom"), Err(ParseError::Unknown("zoom".to_string())));
        assert!(matches!(parse("click sex"), Err(ParseError::Usage(_))));
        assert!(matches!(parse("toggle Sesso"), Err(ParseError::Usage(_))));
        assert!(matches!(parse("rm"), Err(ParseError::Usage(_))));
        let err = parse("click pie A").unwrap_err();
        assert!(err.to_string().contains("avg-education"));
    }
}

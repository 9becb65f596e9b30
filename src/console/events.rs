//! The closed set of events the console reacts to, and the command parser
//! that produces them from operator input lines.

use thiserror::Error;

use super::state::Section;

/// Everything that can happen to the console.
///
/// Keeping this set closed makes the refresh races of the event loop explicit
/// and testable without a real terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Navigate(Section),
    /// The periodic stats timer fired.
    RefreshTick,
    /// Operator asked for an immediate refresh of the active section.
    ManualRefresh,
    /// Operator changed the filter term for the active list; an empty term
    /// clears the filter.
    FilterChanged { term: String },
    ViewDetail { key: String },
    CloseDetail,
    /// Flush entries under `prefix`; empty prefix flushes everything.
    FlushRequested { prefix: String },
    DeleteRequested { key: String },
    /// Delete the key currently shown in the detail view.
    DeleteSelected,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command `{0}`; try `help`")]
    UnknownCommand(String),
    #[error("`{0}` requires an argument")]
    MissingArgument(&'static str),
}

pub const HELP_TEXT: &str = "commands:\n  \
    dashboard | keys | miss-urls   switch section\n  \
    refresh                        refetch the active section\n  \
    filter [term]                  filter the visible list (no term clears)\n  \
    view <key>                     open entry detail\n  \
    close                          close entry detail\n  \
    delete [key]                   delete a key (no key: the one in detail)\n  \
    flush <prefix>                 flush keys under a prefix\n  \
    flush-all                      flush the entire cache\n  \
    quit";

impl Event {
    /// Parse one operator input line. The caller trims and skips empty lines.
    pub fn parse(line: &str) -> Result<Event, ParseError> {
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb {
            "dashboard" => Ok(Event::Navigate(Section::Dashboard)),
            "keys" => Ok(Event::Navigate(Section::Keys)),
            "miss-urls" => Ok(Event::Navigate(Section::MissUrls)),
            "refresh" => Ok(Event::ManualRefresh),
            "filter" => Ok(Event::FilterChanged {
                term: rest.to_string(),
            }),
            "view" => {
                if rest.is_empty() {
                    Err(ParseError::MissingArgument("view"))
                } else {
                    Ok(Event::ViewDetail {
                        key: rest.to_string(),
                    })
                }
            }
            "close" => Ok(Event::CloseDetail),
            "delete" => {
                if rest.is_empty() {
                    Ok(Event::DeleteSelected)
                } else {
                    Ok(Event::DeleteRequested {
                        key: rest.to_string(),
                    })
                }
            }
            "flush" => {
                if rest.is_empty() {
                    // A bare `flush` wiping the whole cache would be too easy
                    // to type by accident; flushing everything is its own verb.
                    Err(ParseError::MissingArgument("flush"))
                } else {
                    Ok(Event::FlushRequested {
                        prefix: rest.to_string(),
                    })
                }
            }
            "flush-all" => Ok(Event::FlushRequested {
                prefix: String::new(),
            }),
            "help" => Ok(Event::Help),
            "quit" | "exit" => Ok(Event::Quit),
            other => Err(ParseError::UnknownCommand(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_commands_parse() {
        assert_eq!(
            Event::parse("dashboard"),
            Ok(Event::Navigate(Section::Dashboard))
        );
        assert_eq!(Event::parse("keys"), Ok(Event::Navigate(Section::Keys)));
        assert_eq!(
            Event::parse("miss-urls"),
            Ok(Event::Navigate(Section::MissUrls))
        );
    }

    #[test]
    fn view_keeps_the_whole_key_including_spaces() {
        assert_eq!(
            Event::parse("view session token:abc 123"),
            Ok(Event::ViewDetail {
                key: "session token:abc 123".to_string()
            })
        );
    }

    #[test]
    fn bare_filter_clears_the_term() {
        assert_eq!(
            Event::parse("filter"),
            Ok(Event::FilterChanged {
                term: String::new()
            })
        );
    }

    #[test]
    fn bare_delete_targets_the_detail_selection() {
        assert_eq!(Event::parse("delete"), Ok(Event::DeleteSelected));
        assert_eq!(
            Event::parse("delete user:1"),
            Ok(Event::DeleteRequested {
                key: "user:1".to_string()
            })
        );
    }

    #[test]
    fn bare_flush_is_rejected() {
        assert_eq!(
            Event::parse("flush"),
            Err(ParseError::MissingArgument("flush"))
        );
        assert_eq!(
            Event::parse("flush-all"),
            Ok(Event::FlushRequested {
                prefix: String::new()
            })
        );
    }

    #[test]
    fn unknown_commands_are_reported() {
        assert_eq!(
            Event::parse("frobnicate"),
            Err(ParseError::UnknownCommand("frobnicate".to_string()))
        );
    }
}

//! Command line and runtime configuration.
//!
//! Nothing is persisted: the whole configuration lives for a single process
//! run and comes from the flags below.

use clap::Parser;

/// Simple push to talk binding for X / PulseAudio in user mode
/// (command line only).
#[derive(Debug, Parser)]
#[command(name = "pulsetalk", version)]
pub struct Cli {
    /// Print debug output
    #[arg(long)]
    pub debug: bool,

    /// Choose key/mouse code(s) to bind (multiple choices allowed)
    #[arg(long = "event_code", num_args = 1..)]
    pub event_code: Vec<String>,

    /// Do not show the recording indicator
    #[arg(long = "no_indicator")]
    pub no_indicator: bool,

    /// Operate only on the given PulseAudio sources
    #[arg(long, num_args = 1..)]
    pub sources: Vec<String>,

    /// Disable ctrl+trigger recording lock
    #[arg(long = "no_lock")]
    pub no_lock: bool,
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub debug: bool,
    /// Trigger codes; empty means bind the first observed event.
    pub event_codes: Vec<String>,
    pub no_indicator: bool,
    /// Source allow-list; `None` means all non-monitor sources.
    pub sources: Option<Vec<String>>,
    /// Ctrl+trigger toggles a recording lock when enabled.
    pub lock_mode: bool,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            debug: cli.debug,
            event_codes: cli
                .event_code
                .into_iter()
                .map(|code| code.to_lowercase())
                .collect(),
            no_indicator: cli.no_indicator,
            sources: if cli.sources.is_empty() {
                None
            } else {
                Some(cli.sources)
            },
            lock_mode: !cli.no_lock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::from(Cli::try_parse_from(args).unwrap())
    }

    #[test]
    fn defaults() {
        let config = parse(&["pulsetalk"]);
        assert!(!config.debug);
        assert!(config.event_codes.is_empty());
        assert!(!config.no_indicator);
        assert_eq!(config.sources, None);
        assert!(config.lock_mode);
    }

    #[test]
    fn event_codes_take_multiple_values_lowercased() {
        let config = parse(&["pulsetalk", "--event_code", "Space", "mouse_left"]);
        assert_eq!(config.event_codes, vec!["space", "mouse_left"]);
    }

    #[test]
    fn empty_sources_means_all() {
        let config = parse(&["pulsetalk", "--sources", "alsa_input.usb_mic"]);
        assert_eq!(config.sources, Some(vec!["alsa_input.usb_mic".to_string()]));
        let config = parse(&["pulsetalk"]);
        assert_eq!(config.sources, None);
    }

    #[test]
    fn no_lock_disables_lock_mode() {
        let config = parse(&["pulsetalk", "--no_lock"]);
        assert!(!config.lock_mode);
    }

    #[test]
    fn original_flag_spelling_is_preserved() {
        // The historical flags use underscores, not dashes.
        assert!(Cli::try_parse_from(["pulsetalk", "--no_indicator", "--debug"]).is_ok());
        assert!(Cli::try_parse_from(["pulsetalk", "--no-indicator"]).is_err());
    }
}

//! Environment-driven configuration
//!
//! - `GITLET_COMMIT_DATE`: fixed timestamp for new commits (RFC 2822 or `%Y-%m-%d %H:%M:%S %z`)
//! - `NO_PAGER`: never page `log`/`global-log` output
//! - `GITLET_LOG`: `tracing` filter directive (defaults to `warn`)

use chrono::{DateTime, FixedOffset};

pub const COMMIT_DATE_VAR: &str = "GITLET_COMMIT_DATE";
pub const NO_PAGER_VAR: &str = "NO_PAGER";
pub const LOG_FILTER_VAR: &str = "GITLET_LOG";

const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, Default)]
pub struct Config {
    commit_date: Option<DateTime<FixedOffset>>,
    no_pager: bool,
    log_filter: Option<String>,
}

impl Config {
    pub fn load_from_env() -> Self {
        let commit_date = std::env::var(COMMIT_DATE_VAR)
            .ok()
            .and_then(|date_str| match Self::parse_date(&date_str) {
                Some(date) => Some(date),
                None => {
                    tracing::warn!(value = %date_str, "ignoring unparsable {}", COMMIT_DATE_VAR);
                    None
                }
            });

        Config {
            commit_date,
            no_pager: std::env::var_os(NO_PAGER_VAR).is_some(),
            log_filter: std::env::var(LOG_FILTER_VAR).ok(),
        }
    }

    pub fn with_commit_date(mut self, commit_date: DateTime<FixedOffset>) -> Self {
        self.commit_date = Some(commit_date);
        self
    }

    fn parse_date(date_str: &str) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc2822(date_str)
            .or_else(|_| DateTime::parse_from_str(date_str, "%Y-%m-%d %H:%M:%S %z"))
            .ok()
    }

    /// Timestamp to stamp on a commit created now
    pub fn commit_timestamp(&self) -> DateTime<FixedOffset> {
        self.commit_date
            .unwrap_or_else(|| chrono::Local::now().fixed_offset())
    }

    pub fn use_pager(&self) -> bool {
        use is_terminal::IsTerminal;

        !self.no_pager && std::io::stdout().is_terminal()
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_supported_date_formats() {
        let iso = Config::parse_date("2023-01-01 12:00:00 +0000").expect("iso-like date");
        let rfc = Config::parse_date("Sun, 01 Jan 2023 12:00:00 +0000").expect("rfc2822 date");

        assert_eq!(iso, rfc);
    }

    #[test]
    fn fixed_commit_date_wins_over_clock() {
        let date = Config::parse_date("2023-01-01 12:00:00 +0200").expect("valid date");
        let config = Config::default().with_commit_date(date);

        assert_eq!(config.commit_timestamp(), date);
    }
}

//! Command-line arguments for the console.

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use teachers_admin::infrastructure::{LogConfig, LogFormat};

#[derive(Debug, Parser)]
#[command(
    name = "teachers-admin",
    version,
    about = "Terminal console for managing teachers and their subjects"
)]
pub struct Cli {
    /// Base URL of the backend API.
    #[arg(
        long = "api-url",
        env = "TEACHERS_API_URL",
        value_name = "URL",
        default_value = "http://localhost:3000/api"
    )]
    pub api_url: String,

    /// Increase log verbosity (-v for debug, -vv for trace).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Write logs to a file. Without it logs are discarded.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormat,
}

impl Cli {
    pub fn log_config(&self) -> LogConfig {
        LogConfig::from_verbosity(self.verbose)
            .with_format(self.log_format)
            .with_log_file(self.log_file.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["teachers-admin", "--api-url", "http://example.test/api"]).unwrap();
        assert_eq!(cli.api_url, "http://example.test/api");
        assert_eq!(cli.verbose, 0);
        assert!(cli.log_file.is_none());
        assert_eq!(cli.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_log_flags() {
        let cli = Cli::try_parse_from([
            "teachers-admin",
            "-vv",
            "--log-file",
            "console.log",
            "--log-format",
            "json",
        ])
        .unwrap();

        let config = cli.log_config();
        assert_eq!(config.level, Level::TRACE);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.log_file, Some(PathBuf::from("console.log")));
    }
}

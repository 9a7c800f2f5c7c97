//! Command-line surface and the runtime configuration built from it.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use skinsight_client::{ClientConfig, DEFAULT_BASE_URL};

use crate::session::DEFAULT_LINGER;

#[derive(Debug, Parser)]
#[command(name = "skinsight", version, about = "Classify skin images with the SkinSight service")]
pub struct Cli {
    /// Base URL of the classification service.
    #[arg(long, env = "SKINSIGHT_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub api_url: String,

    /// Request timeout in seconds.
    #[arg(long, env = "SKINSIGHT_TIMEOUT", default_value_t = 30, global = true)]
    pub timeout: u64,

    /// Milliseconds the classifying view stays up after a response.
    #[arg(long, env = "SKINSIGHT_LINGER_MS", default_value_t = DEFAULT_LINGER.as_millis() as u64, global = true)]
    pub linger_ms: u64,

    /// Print raw JSON instead of formatted cards.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check that the service is reachable.
    Ping,
    /// Classify a single image and show the result with history.
    Classify {
        /// Image file to submit.
        file: PathBuf,
    },
    /// List previous classifications, newest first.
    History {
        /// Show at most this many entries.
        #[arg(long)]
        limit: Option<usize>,
        /// Save each classified image into this directory.
        #[arg(long)]
        download: Option<PathBuf>,
    },
    /// Interactive session: open, classify, clear, browse history.
    Session,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub client: ClientConfig,
    pub linger: Duration,
    pub json: bool,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            client: ClientConfig {
                base_url: cli.api_url.clone(),
                timeout: Duration::from_secs(cli.timeout),
            },
            linger: Duration::from_millis(cli.linger_ms),
            json: cli.json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    fn default_of(id: &str) -> String {
        let cmd = Cli::command();
        let arg = cmd
            .get_arguments()
            .find(|a| a.get_id() == id)
            .unwrap_or_else(|| panic!("no argument {id}"));
        arg.get_default_values()[0].to_string_lossy().into_owned()
    }

    #[test]
    fn defaults() {
        assert_eq!(default_of("api_url"), "http://127.0.0.1:8000");
        assert_eq!(default_of("timeout"), "30");
        assert_eq!(default_of("linger_ms"), "1000");
    }

    #[test]
    fn explicit_flags_build_config() {
        let cli = Cli::try_parse_from([
            "skinsight",
            "--api-url",
            "http://10.0.0.5:8000",
            "--timeout",
            "5",
            "ping",
        ])
        .unwrap();
        let config = Config::from_cli(&cli);
        assert_eq!(config.client.base_url, "http://10.0.0.5:8000");
        assert_eq!(config.client.timeout, Duration::from_secs(5));
        assert!(!config.json);
        assert!(matches!(cli.command, Command::Ping));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "skinsight",
            "history",
            "--limit",
            "3",
            "--api-url",
            "http://inference.local:9000",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.api_url, "http://inference.local:9000");
        assert!(cli.json);
        match cli.command {
            Command::History { limit, download } => {
                assert_eq!(limit, Some(3));
                assert!(download.is_none());
            }
            other => panic!("expected history, got {other:?}"),
        }
    }

    #[test]
    fn classify_requires_file() {
        assert!(Cli::try_parse_from(["skinsight", "classify"]).is_err());
        let cli = Cli::try_parse_from(["skinsight", "classify", "arm.jpg"]).unwrap();
        assert!(matches!(cli.command, Command::Classify { ref file } if file == &PathBuf::from("arm.jpg")));
    }

    #[test]
    fn linger_is_configurable() {
        let cli = Cli::try_parse_from(["skinsight", "--linger-ms", "0", "session"]).unwrap();
        assert!(Config::from_cli(&cli).linger.is_zero());
    }
}

//! Command-line arguments.
//!
//! Settings are layered: built-in defaults, then the catalog file's
//! `settings` block, then environment variables and flags.

use std::path::PathBuf;

use clap::Parser;
use restcheck_domain::HarnessSettings;

/// Runs contract tests against a posts/comments REST API.
#[derive(Debug, Parser)]
#[command(name = "restcheck", version)]
#[command(about = "Contract-test harness for a posts/comments REST API")]
pub struct Args {
    /// Base URL every request path is resolved against.
    #[arg(long, env = "RESTCHECK_BASE_URL")]
    pub base_url: Option<String>,

    /// Per-request timeout in seconds.
    #[arg(long, env = "RESTCHECK_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Maximum number of read-only cases in flight at once.
    #[arg(long, env = "RESTCHECK_MAX_CONCURRENT_READS")]
    pub max_concurrent_reads: Option<usize>,

    /// Print each case's response body.
    #[arg(long, env = "RESTCHECK_ECHO")]
    pub echo: bool,

    /// YAML or JSON catalog to run instead of the built-in one.
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Run only the named scenario. Repeatable.
    #[arg(long = "scenario", value_name = "NAME")]
    pub scenarios: Vec<String>,

    /// List scenario names and exit.
    #[arg(long)]
    pub list: bool,
}

impl Args {
    /// Applies flag and environment overrides on top of `settings`.
    #[must_use]
    pub fn apply(&self, mut settings: HarnessSettings) -> HarnessSettings {
        if let Some(base_url) = &self.base_url {
            settings.base_url.clone_from(base_url);
        }
        if let Some(timeout_secs) = self.timeout_secs {
            settings.timeout_secs = timeout_secs;
        }
        if let Some(max) = self.max_concurrent_reads {
            settings.max_concurrent_reads = max;
        }
        if self.echo {
            settings.echo_bodies = true;
        }
        settings
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_flags_override_settings() {
        let args = Args::try_parse_from([
            "restcheck",
            "--base-url",
            "http://localhost:3000",
            "--timeout-secs",
            "5",
            "--echo",
            "--scenario",
            "GET posts",
            "--scenario",
            "DELETE post",
        ])
        .unwrap();

        let settings = args.apply(HarnessSettings::default());
        assert_eq!(settings.base_url, "http://localhost:3000");
        assert_eq!(settings.timeout_secs, 5);
        assert_eq!(settings.max_concurrent_reads, 4);
        assert!(settings.echo_bodies);
        assert_eq!(args.scenarios, vec!["GET posts", "DELETE post"]);
    }

    #[test]
    fn test_unset_flags_keep_file_settings() {
        let args = Args::try_parse_from(["restcheck", "--list"]).unwrap();
        let from_file = HarnessSettings {
            timeout_secs: 7,
            ..HarnessSettings::default()
        };
        assert!(args.list);
        assert_eq!(args.apply(from_file.clone()).timeout_secs, from_file.timeout_secs);
    }
}

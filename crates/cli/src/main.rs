mod commands;
mod logging;

use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "site-kit")]
#[command(version, about = "Contact endpoint and navigation data for the company website", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Serve the contact endpoint (and optionally the built site)
    ///
    /// Discord forwarding reads DISCORD_CHANNEL_ID and DISCORD_BOT_TOKEN
    /// from the environment. Without a channel id submissions are still
    /// accepted, just not forwarded.
    Serve {
        /// Path to site.toml
        #[arg(short, long, default_value = "site.toml")]
        config: PathBuf,

        /// Port to serve on
        #[arg(short, long, default_value = "8888")]
        port: u16,

        /// Directory with the built static site
        #[arg(long)]
        site_dir: Option<PathBuf>,
    },

    /// Check site configuration and Discord secrets
    Check {
        /// Path to site.toml
        #[arg(short, long, default_value = "site.toml")]
        config: PathBuf,
    },

    /// Print header and footer navigation as JSON
    Navigation {
        /// Path to site.toml
        #[arg(short, long, default_value = "site.toml")]
        config: PathBuf,

        /// Year shown in the footer note (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_logger(cli.verbose, cli.log_json);

    match cli.command {
        Command::Serve {
            config,
            port,
            site_dir,
        } => commands::serve::run(config, port, site_dir).await,
        Command::Check { config } => commands::check::run(config).await,
        Command::Navigation { config, year } => commands::navigation::run(config, year).await,
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "site-kit", &mut io::stdout());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["site-kit", "serve"]).unwrap();
        match cli.command {
            Command::Serve {
                config,
                port,
                site_dir,
            } => {
                assert_eq!(config, PathBuf::from("site.toml"));
                assert_eq!(port, 8888);
                assert!(site_dir.is_none());
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["site-kit", "check", "--log-json", "-v"]).unwrap();
        assert!(cli.log_json);
        assert!(cli.verbose);
    }
}

//! `rv serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use rv_config::{CliSettings, Config};
use rv_server::{run_server, server_config_from_rv_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Deck to open.
    file: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover rv.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Deck root directory (overrides config).
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Open a browser once the server is listening.
    #[arg(long)]
    open: bool,

    /// Open the editor instead of the presentation.
    #[arg(long)]
    edit: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = self.cli_settings();
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        output.info(&format!(
            "Deck root: {}",
            config.deck_resolved.root.display()
        ));
        if let Some(filename) = &config.deck_resolved.filename {
            output.info(&format!("Deck: {}", filename.display()));
        }

        let server_config = server_config_from_rv_config(&config);
        output.link("Serving on", &server_config.start_url());
        run_server(server_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }

    /// CLI overrides; unset flags leave the config file's values.
    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            host: self.host.clone(),
            port: self.port,
            root: self.root.clone(),
            filename: self.file.clone(),
            edit: self.edit.then_some(true),
            open: self.open.then_some(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: ServeArgs,
    }

    #[test]
    fn test_cli_settings_from_flags() {
        let cli = TestCli::parse_from(["rv", "talk.md", "--port", "9000", "--open"]);
        let settings = cli.args.cli_settings();

        assert_eq!(settings.filename, Some(PathBuf::from("talk.md")));
        assert_eq!(settings.port, Some(9000));
        assert_eq!(settings.open, Some(true));
        assert_eq!(settings.edit, None);
        assert_eq!(settings.host, None);
    }
}

//! `rv.toml` loading.
//!
//! The file is looked up in the working directory and then in each parent;
//! without one, defaults rooted at the working directory apply. Command-line
//! values ([`CliSettings`]) win over the file.
//!
//! ```toml
//! [server]
//! host = "127.0.0.1"
//! port = 7979
//!
//! [deck]
//! root = "talks"
//! edit = false
//!
//! [reveal]
//! controls = false
//! transition = "fade"
//!
//! [assets]
//! cdn = "${RV_CDN:-https://cdn.jsdelivr.net/npm/reveal.js@3.8.0/}"
//! ```
//!
//! `server.host`, `deck.root`, `deck.filename` and `assets.cdn` accept
//! `${VAR}` and `${VAR:-default}` references.

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

use expand::{expand_env, expand_opt};

/// File name searched for when no explicit path is given.
const CONFIG_FILENAME: &str = "rv.toml";

/// Command-line overrides; `None` keeps the file's value.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub root: Option<PathBuf>,
    /// Deck to open.
    pub filename: Option<PathBuf>,
    pub edit: Option<bool>,
    /// Open a browser on start.
    pub open: Option<bool>,
}

impl CliSettings {
    fn apply_to(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host.clone_from(host);
        }
        config.server.port = self.port.unwrap_or(config.server.port);

        let deck = &mut config.deck_resolved;
        if let Some(root) = &self.root {
            deck.root.clone_from(root);
        }
        if self.filename.is_some() {
            deck.filename.clone_from(&self.filename);
        }
        deck.edit = self.edit.unwrap_or(deck.edit);
        deck.open = self.open.unwrap_or(deck.open);
    }
}

/// Loaded configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    /// `[deck]` as written; see [`Config::deck_resolved`].
    deck: DeckConfigRaw,
    /// Presentation options applied over every deck's front matter.
    pub reveal: toml::Table,
    pub assets: AssetsConfig,

    /// `[deck]` with paths made absolute and flags defaulted.
    #[serde(skip)]
    pub deck_resolved: DeckConfig,
    /// File the configuration came from, if any.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::rooted_at(Path::new("."))
    }
}

/// `[server]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DeckConfigRaw {
    root: Option<String>,
    filename: Option<String>,
    edit: Option<bool>,
    open: Option<bool>,
}

/// Resolved `[deck]` section.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeckConfig {
    /// Directory that `~/` names and names without an open deck resolve against.
    pub root: PathBuf,
    /// Deck opened at startup.
    pub filename: Option<PathBuf>,
    /// Open the editor instead of the presentation.
    pub edit: bool,
    /// Open a browser once the server is listening.
    pub open: bool,
}

/// `[assets]` section.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct AssetsConfig {
    /// Base URL of the presentation engine's assets; `None` uses the built-in CDN.
    pub cdn: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No config file at {}", .0.display())]
    NotFound(PathBuf),
    #[error("Cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid TOML in config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Validation(String),
    /// `${VAR}` without a default and `VAR` unset.
    #[error("Cannot expand {field}: {message}")]
    EnvVar { field: String, message: String },
}

impl Config {
    /// Load `config_path`, or the nearest `rv.toml`, then apply `cli_settings`.
    ///
    /// An explicit path that does not exist is an error; a missing
    /// discovered file is not.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().unwrap_or_default();
        let file = match config_path {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => find_upwards(&cwd),
        };

        let mut config = match file {
            Some(path) => Self::from_file(&path)?,
            None => Self::rooted_at(&cwd),
        };
        if let Some(settings) = cli_settings {
            settings.apply_to(&mut config);
        }
        Ok(config)
    }

    /// Defaults with the deck root at `base`.
    fn rooted_at(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            deck: DeckConfigRaw::default(),
            reveal: toml::Table::new(),
            assets: AssetsConfig::default(),
            deck_resolved: DeckConfig {
                root: base.to_path_buf(),
                ..DeckConfig::default()
            },
            config_path: None,
        }
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(&std::fs::read_to_string(path)?)?;

        config.server.host = expand_env(&config.server.host, "server.host")?;
        expand_opt(&mut config.deck.root, "deck.root")?;
        expand_opt(&mut config.deck.filename, "deck.filename")?;
        expand_opt(&mut config.assets.cdn, "assets.cdn")?;

        config.resolve_deck(path.parent().unwrap_or(Path::new(".")));
        config.config_path = Some(path.to_path_buf());
        config.validate()?;
        Ok(config)
    }

    /// Check value constraints the TOML types cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.host.is_empty() {
            return Err(invalid("server.host is empty"));
        }
        // 0 would bind a random port the browser cannot be pointed at
        if self.server.port == 0 {
            return Err(invalid("server.port is 0"));
        }
        if let Some(cdn) = &self.assets.cdn
            && !(cdn.starts_with("http://") || cdn.starts_with("https://"))
        {
            return Err(invalid("assets.cdn is not an http(s) URL"));
        }
        Ok(())
    }

    /// Make `[deck]` paths absolute against `dir` and default its flags.
    fn resolve_deck(&mut self, dir: &Path) {
        self.deck_resolved = DeckConfig {
            root: dir.join(self.deck.root.as_deref().unwrap_or(".")),
            filename: self.deck.filename.as_deref().map(|f| dir.join(f)),
            edit: self.deck.edit.unwrap_or_default(),
            open: self.deck.open.unwrap_or_default(),
        };
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::Validation(message.to_owned())
}

/// Nearest `rv.toml` in `start` or its ancestors.
fn find_upwards(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILENAME))
        .find(|candidate| candidate.is_file())
}

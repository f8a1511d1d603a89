//! Bot configuration loaded from CLI, environment, and files.
//!
//! Values are merged with ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in defaults (`neomutt/neomutt`, port 6667, ...)
//! 2. **Configuration file** – `.neobot.toml` in the current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `NEOBOT_SERVER`, `NEOBOT_CHANNEL`, ...
//! 4. **Command-line arguments** – `--server`/`-s`, `--channel`/`-c`, ...
//!
//! # Configuration File
//!
//! ```toml
//! server = "irc.libera.chat"
//! channel = "#neomutt"
//! nickname = "neobot"
//! token_path = "/etc/neobot/token"
//! max_age_days = 365
//! cooldown_minutes = 5
//! ```

use std::time::Duration;

use camino::Utf8PathBuf;
use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::chat::{DEFAULT_PORT, IrcSettings};
use crate::github::{DEFAULT_API_BASE, LookupError, RepositoryDefaults};

const DEFAULT_OWNER: &str = "neomutt";
const DEFAULT_REPO: &str = "neomutt";
const DEFAULT_MAX_AGE_DAYS: u64 = 365;
const DEFAULT_COOLDOWN_MINUTES: u64 = 5;
const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 5;

/// Bot configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use neobot::NeobotConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = NeobotConfig::load().expect("failed to load configuration");
/// let channel = config.require_channel().expect("channel required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "NEOBOT",
    discovery(
        dotfile_name = ".neobot.toml",
        config_file_name = "neobot.toml",
        app_name = "neobot"
    )
)]
pub struct NeobotConfig {
    /// IRC server host name.
    ///
    /// Can be provided via:
    /// - CLI: `--server <HOST>` or `-s <HOST>`
    /// - Environment: `NEOBOT_SERVER`
    /// - Config file: `server = "..."`
    #[ortho_config(cli_short = 's')]
    pub server: Option<String>,

    /// IRC server port. Defaults to 6667.
    #[ortho_config(cli_short = 'p')]
    pub port: u16,

    /// Channel to join. A leading `#` is added when missing.
    ///
    /// Can be provided via:
    /// - CLI: `--channel <NAME>` or `-c <NAME>`
    /// - Environment: `NEOBOT_CHANNEL`
    /// - Config file: `channel = "..."`
    #[ortho_config(cli_short = 'c')]
    pub channel: Option<String>,

    /// Nickname requested at registration.
    #[ortho_config(cli_short = 'n')]
    pub nickname: Option<String>,

    /// Owner used when a reference names none.
    #[ortho_config(cli_short = 'u')]
    pub owner: String,

    /// Repository used when a reference names none.
    #[ortho_config(cli_short = 'r')]
    pub repo: String,

    /// Entities older than this many days are only reported when the bot is
    /// addressed directly.
    #[ortho_config(cli_short = 'm')]
    pub max_age_days: u64,

    /// Minutes during which a reported number is not reported again.
    #[ortho_config(cli_short = 'C')]
    pub cooldown_minutes: u64,

    /// File whose first line holds the GitHub personal access token.
    ///
    /// Can be provided via:
    /// - CLI: `--token-path <PATH>` or `-k <PATH>`
    /// - Environment: `NEOBOT_TOKEN_PATH`
    /// - Config file: `token_path = "..."`
    #[ortho_config(cli_short = 'k')]
    pub token_path: Option<String>,

    /// Upper bound on a single lookup, in seconds.
    #[ortho_config(cli_short = 'T')]
    pub request_timeout_seconds: u64,

    /// GitHub API root. Override for GitHub Enterprise.
    #[ortho_config(cli_short = 'b')]
    pub api_base: String,
}

impl Default for NeobotConfig {
    fn default() -> Self {
        Self {
            server: None,
            port: DEFAULT_PORT,
            channel: None,
            nickname: None,
            owner: DEFAULT_OWNER.to_owned(),
            repo: DEFAULT_REPO.to_owned(),
            max_age_days: DEFAULT_MAX_AGE_DAYS,
            cooldown_minutes: DEFAULT_COOLDOWN_MINUTES,
            token_path: None,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            api_base: DEFAULT_API_BASE.to_owned(),
        }
    }
}

fn missing(what: &str, flag: &str) -> LookupError {
    LookupError::Configuration {
        message: format!("{what} is required (use --{flag})"),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

impl NeobotConfig {
    /// Returns the IRC server.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Configuration`] when no server is configured.
    pub fn require_server(&self) -> Result<&str, LookupError> {
        non_empty(self.server.as_deref()).ok_or_else(|| missing("IRC server", "server"))
    }

    /// Returns the channel, prefixed with `#` when it lacks one.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Configuration`] when no channel is configured.
    pub fn require_channel(&self) -> Result<String, LookupError> {
        let channel =
            non_empty(self.channel.as_deref()).ok_or_else(|| missing("channel", "channel"))?;
        if channel.starts_with('#') {
            Ok(channel.to_owned())
        } else {
            Ok(format!("#{channel}"))
        }
    }

    /// Returns the nickname.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Configuration`] when no nickname is configured.
    pub fn require_nickname(&self) -> Result<&str, LookupError> {
        non_empty(self.nickname.as_deref()).ok_or_else(|| missing("nickname", "nickname"))
    }

    /// Returns the credential file path.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Configuration`] when no path is configured.
    pub fn require_token_path(&self) -> Result<Utf8PathBuf, LookupError> {
        non_empty(self.token_path.as_deref())
            .map(Utf8PathBuf::from)
            .ok_or_else(|| missing("token file", "token-path"))
    }

    /// Maximum entity age for passive reports.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Configuration`] when the value overflows.
    pub fn max_age(&self) -> Result<TimeDelta, LookupError> {
        i64::try_from(self.max_age_days)
            .ok()
            .and_then(TimeDelta::try_days)
            .ok_or_else(|| LookupError::Configuration {
                message: format!("max_age_days {} is out of range", self.max_age_days),
            })
    }

    /// Cooldown window per entity number.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Configuration`] when the value overflows.
    pub fn cooldown(&self) -> Result<TimeDelta, LookupError> {
        i64::try_from(self.cooldown_minutes)
            .ok()
            .and_then(TimeDelta::try_minutes)
            .ok_or_else(|| LookupError::Configuration {
                message: format!("cooldown_minutes {} is out of range", self.cooldown_minutes),
            })
    }

    /// Upper bound on a single lookup.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Owner and repository applied to unqualified references.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::InvalidReference`] when either is empty.
    pub fn repository_defaults(&self) -> Result<RepositoryDefaults, LookupError> {
        RepositoryDefaults::new(self.owner.trim(), self.repo.trim())
    }

    /// Connection settings for the IRC transport.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Configuration`] when the server, channel, or
    /// nickname is missing.
    pub fn irc_settings(&self) -> Result<IrcSettings, LookupError> {
        Ok(IrcSettings {
            server: self.require_server()?.to_owned(),
            port: self.port,
            nickname: self.require_nickname()?.to_owned(),
            channel: self.require_channel()?,
        })
    }
}

//! Neobot entrypoint: connects to IRC and answers GitHub references forever.

use std::io::{self, Write};
use std::process::ExitCode;

use neobot::telemetry::init_tracing;
use neobot::{
    Bot, ChatTransport, ConnectionError, EntityResolver, IrcTransport, LookupError, NeobotConfig,
    OctocrabGateway, PersonalAccessToken, PolicyChain, SystemClock, TokioSleeper,
};
use ortho_config::OrthoConfig;
use thiserror::Error;
use tracing::info;

/// Failures that stop the bot before its event loop starts.
#[derive(Debug, Error)]
enum StartupError {
    /// Configuration, credential, or client construction failed.
    #[error(transparent)]
    Setup(#[from] LookupError),

    /// The first connection to the chat server failed.
    #[error("initial connection failed: {0}")]
    Connection(#[from] ConnectionError),
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    let config = load_config()?;
    let _installed = init_tracing();

    let token = PersonalAccessToken::from_file(&config.require_token_path()?)?;
    let gateway = OctocrabGateway::for_token(&token, &config.api_base, config.request_timeout())?;
    let resolver = EntityResolver::new(gateway, config.repository_defaults()?);
    let policies = PolicyChain::standard(config.max_age()?, config.cooldown()?, SystemClock);

    let settings = config.irc_settings()?;
    let channel = settings.channel.clone();
    let mut transport = IrcTransport::new(settings);
    transport.reconnect().await?;
    info!(%channel, nickname = %transport.nickname(), "neobot started");

    Bot::new(resolver, transport, policies, channel, TokioSleeper)
        .run()
        .await;
    Ok(())
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`LookupError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<NeobotConfig, LookupError> {
    NeobotConfig::load().map_err(|error| LookupError::Configuration {
        message: error.to_string(),
    })
}

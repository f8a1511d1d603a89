//! Neobot library crate: a chat bot that answers references to GitHub
//! issues, pull requests, and discussions.
//!
//! Messages are scanned for `owner/repo#number` references, each reference
//! is resolved through GitHub's GraphQL API, and the policy chain decides
//! whether the result is worth announcing. Connection losses are recovered
//! with capped exponential backoff.

pub mod bot;
pub mod chat;
pub mod config;
pub mod github;
pub mod policy;
pub mod reconnect;
pub mod scanner;
pub mod telemetry;
pub mod time;
pub mod ttl_set;

pub use bot::Bot;
pub use chat::{ChatEvent, ChatTransport, ConnectionError, IrcSettings, IrcTransport};
pub use config::NeobotConfig;
pub use github::{
    Entity, EntityGateway, EntityLocator, EntityResolver, LookupError, OctocrabGateway,
    PersonalAccessToken, RepositoryDefaults,
};
pub use policy::{PolicyChain, Verdict};
pub use reconnect::{Backoff, ReconnectSupervisor};
pub use scanner::{Reference, scan};
pub use time::{Clock, Sleeper, SystemClock, TokioSleeper};
pub use ttl_set::TtlSet;

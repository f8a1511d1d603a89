//! GitHub entity lookup and token handling.
//!
//! This module wraps Octocrab to resolve `owner/repo#number` references to
//! issues, pull requests, or discussions with a single GraphQL query. Errors
//! are mapped into the variants the bot distinguishes when logging a failed
//! lookup.

pub mod error;
mod error_mapping;
pub mod gateway;
pub mod locator;
pub mod models;
pub mod query;
pub mod resolver;

pub use error::LookupError;
pub use gateway::{DEFAULT_API_BASE, EntityGateway, OctocrabGateway, decode_lookup_response};
pub use locator::{
    EntityLocator, EntityNumber, PersonalAccessToken, RepositoryName, RepositoryOwner,
};
pub use models::{DiscussionSummary, Entity, EntitySummary};
pub use resolver::{EntityResolver, RepositoryDefaults};

#[cfg(test)]
pub use gateway::MockEntityGateway;

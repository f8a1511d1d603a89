//! Gateways for resolving entities through Octocrab.
//!
//! The trait-based design enables mocking in tests while the Octocrab
//! implementation handles the real GraphQL request.

use std::time::Duration;

use async_trait::async_trait;
use http::Uri;
use octocrab::Octocrab;
use serde_json::{Value, json};

use super::error::LookupError;
use super::error_mapping::{map_decode_error, map_octocrab_error};
use super::locator::{EntityLocator, PersonalAccessToken};
use super::models::{ApiLookupResponse, Entity};
use super::query::FIND_ENTITY_BY_NUMBER;

/// Public GitHub API root.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const OPERATION: &str = "entity lookup";

/// Builds an Octocrab client for the given token and API base URL.
///
/// # Errors
///
/// Returns `LookupError::Configuration` when the base URI cannot be parsed
/// or `LookupError::Api` when Octocrab fails to construct a client.
fn build_octocrab_client(
    token: &PersonalAccessToken,
    api_base: &str,
) -> Result<Octocrab, LookupError> {
    let base_uri: Uri = api_base
        .parse::<Uri>()
        .map_err(|error| LookupError::Configuration {
            message: format!("invalid API base '{api_base}': {error}"),
        })?;

    Octocrab::builder()
        .personal_token(token.as_ref())
        .base_uri(base_uri)
        .map_err(|error| LookupError::Configuration {
            message: format!("build client failed: {error}"),
        })?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}

/// Gateway that can resolve an entity by number.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntityGateway: Send + Sync {
    /// Fetch whichever issue, pull request, or discussion has the number.
    ///
    /// Returns `Ok(None)` when nothing exists at that number.
    async fn find_entity(&self, locator: &EntityLocator) -> Result<Option<Entity>, LookupError>;
}

/// Octocrab-backed gateway issuing one GraphQL query per lookup.
pub struct OctocrabGateway {
    client: Octocrab,
    timeout: Duration,
}

impl OctocrabGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Builds an authorised gateway for the given API root.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::Configuration` when the base URI cannot be
    /// parsed or the client cannot be constructed.
    pub fn for_token(
        token: &PersonalAccessToken,
        api_base: &str,
        timeout: Duration,
    ) -> Result<Self, LookupError> {
        let octocrab = build_octocrab_client(token, api_base)?;
        Ok(Self::new(octocrab, timeout))
    }
}

#[async_trait]
impl EntityGateway for OctocrabGateway {
    async fn find_entity(&self, locator: &EntityLocator) -> Result<Option<Entity>, LookupError> {
        let payload = json!({
            "query": FIND_ENTITY_BY_NUMBER,
            "variables": locator.variables(),
        });

        let response = tokio::time::timeout(self.timeout, self.client.graphql::<Value>(&payload))
            .await
            .map_err(|_elapsed| LookupError::Network {
                message: format!(
                    "{OPERATION} for {locator} timed out after {}s",
                    self.timeout.as_secs()
                ),
            })?
            .map_err(|error| map_octocrab_error(OPERATION, &error))?;

        decode_lookup_response(response)
    }
}

/// Decodes the raw GraphQL body into an entity.
///
/// # Errors
///
/// Returns [`LookupError::MalformedResponse`] when the body does not match
/// the lookup query's shape and [`LookupError::Api`] when GitHub returned
/// only errors.
pub fn decode_lookup_response(body: Value) -> Result<Option<Entity>, LookupError> {
    serde_json::from_value::<ApiLookupResponse>(body)
        .map_err(|error| map_decode_error(OPERATION, &error))?
        .into_entity()
}

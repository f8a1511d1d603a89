//! Resolution facade that turns scanned references into entities.

use super::error::LookupError;
use super::gateway::EntityGateway;
use super::locator::{EntityLocator, EntityNumber, RepositoryName, RepositoryOwner};
use super::models::Entity;
use crate::scanner::Reference;

/// Owner and repository substituted when a reference omits them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryDefaults {
    owner: RepositoryOwner,
    repository: RepositoryName,
}

impl RepositoryDefaults {
    /// Validates the configured defaults.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::InvalidReference`] when either value is empty.
    pub fn new(owner: &str, repository: &str) -> Result<Self, LookupError> {
        Ok(Self {
            owner: RepositoryOwner::new(owner)?,
            repository: RepositoryName::new(repository)?,
        })
    }
}

/// Resolves references using a gateway and repository defaults.
pub struct EntityResolver<Gateway>
where
    Gateway: EntityGateway,
{
    gateway: Gateway,
    defaults: RepositoryDefaults,
}

impl<Gateway> EntityResolver<Gateway>
where
    Gateway: EntityGateway,
{
    /// Create a new resolver using the provided gateway.
    #[must_use]
    pub const fn new(gateway: Gateway, defaults: RepositoryDefaults) -> Self {
        Self { gateway, defaults }
    }

    /// Qualifies a scanned reference, filling in the owner and repository
    /// independently when they were omitted.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::InvalidReference`] when the captured number is
    /// not a positive integer.
    pub fn locate(&self, reference: &Reference) -> Result<EntityLocator, LookupError> {
        let owner = if reference.owner.is_empty() {
            self.defaults.owner.clone()
        } else {
            RepositoryOwner::new(&reference.owner)?
        };
        let repository = if reference.repo.is_empty() {
            self.defaults.repository.clone()
        } else {
            RepositoryName::new(&reference.repo)?
        };
        let number = EntityNumber::parse(&reference.number)?;
        Ok(EntityLocator::new(owner, repository, number))
    }

    /// Load the entity the locator points at.
    ///
    /// # Errors
    ///
    /// Propagates any failure from the underlying gateway, including
    /// authentication errors, malformed responses, or network problems.
    pub async fn resolve(&self, locator: &EntityLocator) -> Result<Option<Entity>, LookupError> {
        self.gateway.find_entity(locator).await
    }
}

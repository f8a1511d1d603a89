//! Identity wrappers for entity lookups and the bearer credential.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::Serialize;

use super::error::LookupError;

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    /// Validates that the owner is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::InvalidReference`] when the value is blank.
    pub fn new(value: &str) -> Result<Self, LookupError> {
        if value.is_empty() {
            return Err(LookupError::InvalidReference {
                message: "repository owner is empty".to_owned(),
            });
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Validates that the repository name is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::InvalidReference`] when the value is blank.
    pub fn new(value: &str) -> Result<Self, LookupError> {
        if value.is_empty() {
            return Err(LookupError::InvalidReference {
                message: "repository name is empty".to_owned(),
            });
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Issue, pull request, or discussion number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityNumber(u64);

impl EntityNumber {
    /// Rejects zero, which GitHub never assigns.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::InvalidReference`] for zero.
    pub fn new(value: u64) -> Result<Self, LookupError> {
        if value == 0 {
            return Err(LookupError::InvalidReference {
                message: "entity number must be positive".to_owned(),
            });
        }
        Ok(Self(value))
    }

    /// Parses the digits captured from a chat message.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::InvalidReference`] when the digits do not
    /// form a positive integer that fits in a `u64`.
    pub fn parse(digits: &str) -> Result<Self, LookupError> {
        let value = digits
            .parse::<u64>()
            .map_err(|error| LookupError::InvalidReference {
                message: format!("#{digits} is not a usable number: {error}"),
            })?;
        Self::new(value).map_err(|_| LookupError::InvalidReference {
            message: format!("#{digits} is not a positive number"),
        })
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Fully qualified reference to a single entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityLocator {
    owner: RepositoryOwner,
    repository: RepositoryName,
    number: EntityNumber,
}

/// Variables sent with the combined lookup query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupVariables<'locator> {
    /// Entity number.
    pub number: u64,
    /// Repository owner login.
    pub owner: &'locator str,
    /// Repository name.
    pub repo: &'locator str,
}

impl EntityLocator {
    /// Builds a locator from validated parts.
    #[must_use]
    pub const fn new(
        owner: RepositoryOwner,
        repository: RepositoryName,
        number: EntityNumber,
    ) -> Self {
        Self {
            owner,
            repository,
            number,
        }
    }

    /// Entity number.
    #[must_use]
    pub const fn number(&self) -> EntityNumber {
        self.number
    }

    /// Returns the GraphQL variables for this locator.
    #[must_use]
    pub const fn variables(&self) -> LookupVariables<'_> {
        LookupVariables {
            number: self.number.get(),
            owner: self.owner.as_str(),
            repo: self.repository.as_str(),
        }
    }
}

impl std::fmt::Display for EntityLocator {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "{}/{}#{}",
            self.owner.as_str(),
            self.repository.as_str(),
            self.number.get()
        )
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `LookupError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, LookupError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(LookupError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Loads the token from the first line of a credential file.
    ///
    /// Any further lines are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Io`] when the file cannot be read and
    /// [`LookupError::MissingToken`] when its first line is blank.
    pub fn from_file(path: &Utf8Path) -> Result<Self, LookupError> {
        let parent = path
            .parent()
            .filter(|parent| !parent.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let file_name = path.file_name().ok_or_else(|| LookupError::Io {
            message: format!("invalid token path '{path}': no file name"),
        })?;

        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|error| {
            LookupError::Io {
                message: format!("failed to open token directory '{parent}': {error}"),
            }
        })?;
        let content = dir
            .read_to_string(file_name)
            .map_err(|error| LookupError::Io {
                message: format!("failed to read token file '{path}': {error}"),
            })?;

        Self::new(content.lines().next().unwrap_or_default())
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

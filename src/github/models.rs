//! Entities resolved from chat references and the GraphQL shapes they are
//! decoded from.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::error::LookupError;

/// Login GitHub shows for content whose author account was deleted.
pub const GHOST_LOGIN: &str = "ghost";

/// Fields shared by every entity kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySummary {
    /// Number within the repository.
    pub number: u64,
    /// Title as shown on GitHub.
    pub title: String,
    /// HTML URL for displaying to a user.
    pub url: String,
    /// Author login.
    pub author: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Discussion-specific details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscussionSummary {
    /// Fields shared with issues and pull requests.
    pub summary: EntitySummary,
    /// Number of top-level comments.
    pub comment_count: u64,
    /// Category emoji extracted from the category markup.
    pub category: String,
}

/// A resolved work item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    /// An issue.
    Issue(EntitySummary),
    /// A pull request.
    PullRequest(EntitySummary),
    /// A discussion.
    Discussion(DiscussionSummary),
}

impl Entity {
    /// Shared fields regardless of kind.
    #[must_use]
    pub const fn summary(&self) -> &EntitySummary {
        match self {
            Self::Issue(summary) | Self::PullRequest(summary) => summary,
            Self::Discussion(discussion) => &discussion.summary,
        }
    }

    /// Entity number.
    #[must_use]
    pub const fn number(&self) -> u64 {
        self.summary().number
    }

    /// Creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.summary().created_at
    }
}

/// Renders the one-line chat reply for the entity.
impl fmt::Display for Entity {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Issue(summary) => write!(
                formatter,
                "Issue by @{} \"{}\": {}",
                summary.author, summary.title, summary.url
            ),
            Self::PullRequest(summary) => write!(
                formatter,
                "PR by @{} \"{}\": {}",
                summary.author, summary.title, summary.url
            ),
            Self::Discussion(discussion) => {
                let noun = if discussion.comment_count == 1 {
                    "comment"
                } else {
                    "comments"
                };
                write!(
                    formatter,
                    "{} discussion by @{} \"{}\" with {} {noun}: {}",
                    discussion.category,
                    discussion.summary.author,
                    discussion.summary.title,
                    discussion.comment_count,
                    discussion.summary.url
                )
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiLookupResponse {
    pub(super) data: Option<ApiLookupData>,
    #[serde(default)]
    pub(super) errors: Vec<ApiGraphQlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiGraphQlError {
    pub(super) message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiLookupData {
    pub(super) repository: Option<ApiRepository>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ApiRepository {
    pub(super) issue: Option<ApiItem>,
    pub(super) pull_request: Option<ApiItem>,
    pub(super) discussion: Option<ApiDiscussion>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ApiItem {
    pub(super) number: u64,
    pub(super) title: String,
    pub(super) url: String,
    pub(super) created_at: DateTime<Utc>,
    pub(super) author: Option<ApiActor>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiDiscussion {
    #[serde(flatten)]
    pub(super) item: ApiItem,
    pub(super) comments: ApiCount,
    pub(super) category: ApiCategory,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiActor {
    pub(super) login: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ApiCount {
    pub(super) total_count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiCategory {
    #[serde(rename = "emojiHTML")]
    pub(super) emoji_html: Option<String>,
}

impl From<ApiItem> for EntitySummary {
    fn from(value: ApiItem) -> Self {
        Self {
            number: value.number,
            title: value.title,
            url: value.url,
            author: value
                .author
                .map_or_else(|| GHOST_LOGIN.to_owned(), |actor| actor.login),
            created_at: value.created_at,
        }
    }
}

impl TryFrom<ApiDiscussion> for DiscussionSummary {
    type Error = LookupError;

    fn try_from(value: ApiDiscussion) -> Result<Self, Self::Error> {
        let markup = value
            .category
            .emoji_html
            .ok_or_else(|| LookupError::MalformedResponse {
                message: format!("discussion {} has no category markup", value.item.number),
            })?;
        let category = emoji_from_markup(&markup)?.to_owned();
        Ok(Self {
            summary: value.item.into(),
            comment_count: value.comments.total_count,
            category,
        })
    }
}

impl ApiRepository {
    /// Picks the populated node, preferring issue, then pull request, then
    /// discussion.
    pub(super) fn into_entity(self) -> Result<Option<Entity>, LookupError> {
        if let Some(issue) = self.issue {
            return Ok(Some(Entity::Issue(issue.into())));
        }
        if let Some(pull_request) = self.pull_request {
            return Ok(Some(Entity::PullRequest(pull_request.into())));
        }
        self.discussion
            .map(|discussion| DiscussionSummary::try_from(discussion).map(Entity::Discussion))
            .transpose()
    }
}

impl ApiLookupResponse {
    /// Interprets a decoded GraphQL response.
    ///
    /// A missing repository is reported as "not found", matching how a
    /// missing entity inside an existing repository is reported.
    pub(super) fn into_entity(self) -> Result<Option<Entity>, LookupError> {
        match self.data {
            Some(ApiLookupData {
                repository: Some(repository),
            }) => repository.into_entity(),
            Some(ApiLookupData { repository: None }) => Ok(None),
            None if self.errors.is_empty() => Err(LookupError::MalformedResponse {
                message: "response carries neither data nor errors".to_owned(),
            }),
            None => Err(LookupError::Api {
                message: self
                    .errors
                    .iter()
                    .map(|error| error.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; "),
            }),
        }
    }
}

/// Extracts the emoji from GitHub's category markup.
///
/// The markup looks like
/// `<div><g-emoji class="g-emoji" alias="wrench">🔧</g-emoji></div>`; the
/// inner text of the last `g-emoji` element is returned.
///
/// # Errors
///
/// Returns [`LookupError::MalformedResponse`] when the markup has no closed
/// `g-emoji` element.
pub fn emoji_from_markup(markup: &str) -> Result<&str, LookupError> {
    const CLOSING_TAG: &str = "</g-emoji>";

    let malformed = || LookupError::MalformedResponse {
        message: format!("category markup has no emoji element: {markup:?}"),
    };

    let (before_close, _) = markup.rsplit_once(CLOSING_TAG).ok_or_else(malformed)?;
    let (opening, inner) = before_close.rsplit_once('>').ok_or_else(malformed)?;
    if !opening.contains("<g-emoji") {
        return Err(malformed());
    }
    Ok(inner)
}

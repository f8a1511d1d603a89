//! Extraction of `owner/repo#number` references from chat text.

use std::sync::LazyLock;

use regex::Regex;

/// A reference as captured from a message, before defaults are applied.
///
/// Groups that did not participate in the match are empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Owner login, or empty.
    pub owner: String,
    /// Repository name, or empty.
    pub repo: String,
    /// The digits following `#`.
    pub number: String,
}

impl Reference {
    /// Builds a reference from raw captures.
    #[must_use]
    pub fn new(owner: &str, repo: &str, number: &str) -> Self {
        Self {
            owner: owner.to_owned(),
            repo: repo.to_owned(),
            number: number.to_owned(),
        }
    }
}

#[expect(
    clippy::expect_used,
    reason = "the pattern is a literal covered by unit tests"
)]
static REFERENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        (?:^|\s)                      # start of message or whitespace
        (?:
            (?:(?P<owner>[\w.\-]+)/)? # optional owner, ends in a slash
            (?P<repo>[\w.\-]+)        # repository
        )?                            # both optional
        \#(?P<number>[0-9]+)
        \b",
    )
    .expect("reference pattern should compile")
});

/// Returns every reference in the message, in order of appearance.
///
/// Repeated references are all returned.
#[must_use]
pub fn scan(message: &str) -> Vec<Reference> {
    REFERENCE_PATTERN
        .captures_iter(message)
        .map(|captures| {
            let group = |name: &str| captures.name(name).map_or("", |found| found.as_str());
            Reference::new(group("owner"), group("repo"), group("number"))
        })
        .collect()
}

//! GraphQL document for the combined entity lookup.

/// Requests the issue, pull request, and discussion at one number in a
/// single round trip. At most one of the three nodes is normally non-null.
pub const FIND_ENTITY_BY_NUMBER: &str = r"
query ($number: Int!, $owner: String!, $repo: String!) {
  repository(owner: $owner, name: $repo) {
    issue(number: $number) {
      number
      title
      url
      createdAt
      author {
        login
      }
    }
    pullRequest(number: $number) {
      number
      title
      url
      createdAt
      author {
        login
      }
    }
    discussion(number: $number) {
      number
      title
      url
      createdAt
      author {
        login
      }
      comments(first: 0) {
        totalCount
      }
      category {
        emojiHTML
      }
    }
  }
}
";

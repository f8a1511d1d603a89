//! Parsing of raw IRC protocol lines.

/// One IRC protocol message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrcMessage {
    /// Source of the message (`nick!user@host` or a server name).
    pub prefix: Option<String>,
    /// Command word or three-digit numeric.
    pub command: String,
    /// Middle parameters followed by the trailing parameter, if any.
    pub params: Vec<String>,
}

impl IrcMessage {
    /// Parses one line, ignoring message tags and the line terminator.
    ///
    /// Returns `None` for lines without a command.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let mut rest = line.trim_end_matches(['\r', '\n']);

        if let Some(tagged) = rest.strip_prefix('@') {
            rest = tagged.split_once(' ')?.1;
        }

        let mut prefix = None;
        if let Some(prefixed) = rest.strip_prefix(':') {
            let (source, remainder) = prefixed.split_once(' ')?;
            prefix = Some(source.to_owned());
            rest = remainder;
        }

        let command_text = rest.trim_start_matches(' ');
        let (command, mut params_text) = command_text.split_once(' ').unwrap_or((command_text, ""));
        if command.is_empty() {
            return None;
        }

        let mut params = Vec::new();
        loop {
            params_text = params_text.trim_start_matches(' ');
            if params_text.is_empty() {
                break;
            }
            if let Some(trailing) = params_text.strip_prefix(':') {
                params.push(trailing.to_owned());
                break;
            }
            let (param, remainder) = params_text.split_once(' ').unwrap_or((params_text, ""));
            params.push(param.to_owned());
            params_text = remainder;
        }

        Some(Self {
            prefix,
            command: command.to_ascii_uppercase(),
            params,
        })
    }

    /// Nick portion of the prefix, if the message came from a user.
    #[must_use]
    pub fn source_nick(&self) -> Option<&str> {
        let prefix = self.prefix.as_deref()?;
        Some(prefix.split_once('!').map_or(prefix, |(nick, _)| nick))
    }

    /// Parameter at `index`.
    #[must_use]
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }
}

const CTCP_DELIMITER: char = '\u{1}';

/// Returns the body of a CTCP `ACTION` (`/me`) message.
#[must_use]
pub fn ctcp_action(text: &str) -> Option<&str> {
    text.strip_prefix(CTCP_DELIMITER)?
        .strip_prefix("ACTION ")
        .map(|body| body.trim_end_matches(CTCP_DELIMITER))
}

/// Returns true for any CTCP request, including actions.
#[must_use]
pub fn is_ctcp(text: &str) -> bool {
    text.starts_with(CTCP_DELIMITER)
}

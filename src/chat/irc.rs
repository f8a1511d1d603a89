//! Minimal IRC client: registration, keepalive, and the events the bot
//! consumes.

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tracing::{debug, info, trace, warn};

use super::message::{self, IrcMessage};
use super::{ChatEvent, ChatTransport, ConnectionError};

/// Default plaintext IRC port.
pub const DEFAULT_PORT: u16 = 6667;

/// Longest inbound line accepted, message tags included.
const MAX_LINE_BYTES: u64 = 8192;

/// Where to connect and who to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrcSettings {
    /// Server host name or address.
    pub server: String,
    /// Server port.
    pub port: u16,
    /// Nickname requested at registration.
    pub nickname: String,
    /// Channel joined after registration.
    pub channel: String,
}

struct Connection {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

/// IRC connection that joins one channel and reports its traffic.
pub struct IrcTransport {
    settings: IrcSettings,
    nickname: String,
    connection: Option<Connection>,
}

impl IrcTransport {
    /// Creates an unconnected transport. The first [`ChatTransport::next_event`]
    /// reports a disconnection until [`ChatTransport::reconnect`] succeeds.
    #[must_use]
    pub fn new(settings: IrcSettings) -> Self {
        let nickname = settings.nickname.clone();
        Self {
            settings,
            nickname,
            connection: None,
        }
    }

    /// Writes one line. A failed write discards the connection so later
    /// calls report [`ConnectionError::Closed`].
    async fn send_line(&mut self, line: &str) -> Result<(), ConnectionError> {
        let connection = self.connection.as_mut().ok_or(ConnectionError::Closed)?;
        trace!(line, "irc send");
        let written = connection
            .writer
            .write_all(format!("{line}\r\n").as_bytes())
            .await;
        written.map_err(|error| {
            self.connection = None;
            ConnectionError::Io {
                message: error.to_string(),
            }
        })
    }

    async fn read_line(&mut self) -> Result<String, ConnectionError> {
        let connection = self.connection.as_mut().ok_or(ConnectionError::Closed)?;
        let mut buffer = Vec::new();
        // One byte past the limit tells an overlong line from one that fits.
        let mut bounded = (&mut connection.reader).take(MAX_LINE_BYTES + 1);
        let read = bounded
            .read_until(b'\n', &mut buffer)
            .await
            .map_err(|error| ConnectionError::Io {
                message: error.to_string(),
            })?;
        if read == 0 {
            return Err(ConnectionError::Io {
                message: "server closed the connection".to_owned(),
            });
        }
        if buffer.len() > usize::try_from(MAX_LINE_BYTES).unwrap_or(usize::MAX) {
            return Err(ConnectionError::Protocol {
                message: format!("line exceeds {MAX_LINE_BYTES} bytes"),
            });
        }
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Handles protocol housekeeping and returns any event for the bot.
    async fn dispatch(&mut self, message: IrcMessage) -> Result<Option<ChatEvent>, ConnectionError> {
        match message.command.as_str() {
            "PING" => {
                let token = message.param(0).unwrap_or_default();
                self.send_line(&format!("PONG :{token}")).await?;
                Ok(None)
            }
            "001" => {
                info!(nickname = %self.nickname, "registered with server");
                let channel = self.settings.channel.clone();
                self.join(&channel).await?;
                Ok(None)
            }
            "433" => {
                let fallback = format!("{}_", self.nickname);
                warn!(nickname = %self.nickname, %fallback, "nickname in use");
                self.set_nickname(&fallback).await?;
                Ok(None)
            }
            "ERROR" => Err(ConnectionError::Protocol {
                message: message.param(0).unwrap_or("server closed the link").to_owned(),
            }),
            "PRIVMSG" => Ok(self.message_event(&message)),
            "KICK" => Ok(self.kick_event(&message)),
            _ => Ok(None),
        }
    }

    fn message_event(&self, message: &IrcMessage) -> Option<ChatEvent> {
        let target = message.param(0)?;
        let body = message.param(1)?;
        let text = match message::ctcp_action(body) {
            Some(action) => action,
            None if message::is_ctcp(body) => return None,
            None => body,
        };
        // Private messages are answered in private.
        let reply_to = if target.eq_ignore_ascii_case(&self.nickname) {
            message.source_nick()?
        } else {
            target
        };
        Some(ChatEvent::Message {
            reply_to: reply_to.to_owned(),
            text: text.to_owned(),
        })
    }

    fn kick_event(&self, message: &IrcMessage) -> Option<ChatEvent> {
        let channel = message.param(0)?;
        let kicked = message.param(1)?;
        kicked
            .eq_ignore_ascii_case(&self.nickname)
            .then(|| ChatEvent::Kicked {
                channel: channel.to_owned(),
            })
    }

    fn drop_connection(&mut self, reason: String) -> ChatEvent {
        self.connection = None;
        ChatEvent::Disconnected { reason }
    }
}

#[async_trait]
impl ChatTransport for IrcTransport {
    async fn next_event(&mut self) -> ChatEvent {
        loop {
            let line = match self.read_line().await {
                Ok(line) => line,
                Err(error) => return self.drop_connection(error.to_string()),
            };
            trace!(line = line.trim_end(), "irc recv");

            let Some(message) = IrcMessage::parse(&line) else {
                debug!(line = line.trim_end(), "ignoring unparsable line");
                continue;
            };

            match self.dispatch(message).await {
                Ok(Some(event)) => return event,
                Ok(None) => {}
                Err(error) => return self.drop_connection(error.to_string()),
            }
        }
    }

    async fn join(&mut self, channel: &str) -> Result<(), ConnectionError> {
        self.send_line(&format!("JOIN {channel}")).await
    }

    async fn send_message(&mut self, target: &str, text: &str) -> Result<(), ConnectionError> {
        let single_line = text.replace(['\r', '\n'], " ");
        self.send_line(&format!("PRIVMSG {target} :{single_line}"))
            .await
    }

    async fn set_nickname(&mut self, name: &str) -> Result<(), ConnectionError> {
        self.nickname = name.to_owned();
        self.send_line(&format!("NICK {name}")).await
    }

    async fn reconnect(&mut self) -> Result<(), ConnectionError> {
        self.connection = None;
        let stream = TcpStream::connect((self.settings.server.as_str(), self.settings.port))
            .await
            .map_err(|error| ConnectionError::Io {
                message: format!(
                    "connect to {}:{} failed: {error}",
                    self.settings.server, self.settings.port
                ),
            })?;
        let (read_half, write_half) = stream.into_split();
        self.connection = Some(Connection {
            reader: BufReader::new(read_half),
            writer: write_half,
        });
        info!(server = %self.settings.server, port = self.settings.port, "connected");

        let nickname = self.nickname.clone();
        self.send_line(&format!("NICK {nickname}")).await?;
        self.send_line(&format!("USER {nickname} 0 * :{nickname}"))
            .await
    }

    fn nickname(&self) -> String {
        self.nickname.clone()
    }
}

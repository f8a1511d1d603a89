//! Integration tests for kick and disconnection recovery driven through the
//! bot's event loop.

mod support {
    #[path = "../support/transport.rs"]
    pub mod transport;
}

use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use neobot::github::EntitySummary;
use neobot::time::{ManualClock, RecordingSleeper};
use neobot::{
    Bot, ChatEvent, ChatTransport, Entity, EntityGateway, EntityLocator, EntityResolver,
    IrcSettings, IrcTransport, LookupError, PolicyChain, RepositoryDefaults,
};
use rstest::{fixture, rstest};
use support::transport::ScriptedTransport;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;
use tokio::time::timeout;

/// Gateway that reports every number as a fresh issue.
struct FreshIssues;

#[async_trait]
impl EntityGateway for FreshIssues {
    async fn find_entity(&self, locator: &EntityLocator) -> Result<Option<Entity>, LookupError> {
        let number = locator.number().get();
        Ok(Some(Entity::Issue(EntitySummary {
            number,
            title: "Sidebar flickers".to_owned(),
            url: format!("https://github.com/neomutt/neomutt/issues/{number}"),
            author: "flatcap".to_owned(),
            created_at: Utc::now(),
        })))
    }
}

type TestBot<Transport = ScriptedTransport> = Bot<FreshIssues, Transport, RecordingSleeper>;

#[fixture]
fn sleeper() -> RecordingSleeper {
    RecordingSleeper::default()
}

fn bot<Transport: ChatTransport>(
    transport: Transport,
    sleeper: &RecordingSleeper,
) -> TestBot<Transport> {
    let defaults = RepositoryDefaults::new("neomutt", "neomutt").expect("defaults are valid");
    let clock = ManualClock::new(Utc::now());
    Bot::new(
        EntityResolver::new(FreshIssues, defaults),
        transport,
        PolicyChain::standard(TimeDelta::days(365), TimeDelta::minutes(5), clock),
        "#neomutt".to_owned(),
        sleeper.clone(),
    )
}

fn secs(values: &[u64]) -> Vec<Duration> {
    values.iter().copied().map(Duration::from_secs).collect()
}

#[rstest]
#[case::first_attempt_succeeds(0, &[10])]
#[case::two_failures(2, &[10, 20, 40])]
#[case::reaches_the_cap(6, &[10, 20, 40, 80, 160, 300, 300])]
#[tokio::test]
async fn kick_rejoins_with_backoff(
    sleeper: RecordingSleeper,
    #[case] failures: usize,
    #[case] expected: &[u64],
) {
    let mut transport = ScriptedTransport::new("neobot");
    transport.push_event(ChatEvent::Kicked {
        channel: "#neomutt".to_owned(),
    });
    transport.fail_next(failures);
    let mut bot = bot(transport, &sleeper);

    bot.step().await;

    assert_eq!(bot.transport().joins(), ["#neomutt".to_owned()]);
    assert_eq!(sleeper.delays(), secs(expected));
}

#[rstest]
#[tokio::test]
async fn disconnection_reconnects_once_recovered(sleeper: RecordingSleeper) {
    let mut transport = ScriptedTransport::new("neobot");
    transport.push_event(ChatEvent::Disconnected {
        reason: "server closed the connection".to_owned(),
    });
    transport.fail_next(3);
    let mut bot = bot(transport, &sleeper);

    bot.step().await;

    assert_eq!(bot.transport().reconnects(), 1);
    assert_eq!(sleeper.delays(), secs(&[10, 20, 40, 80]));
}

#[rstest]
#[tokio::test]
async fn each_episode_restarts_at_base_delay(sleeper: RecordingSleeper) {
    let mut transport = ScriptedTransport::new("neobot");
    transport.push_event(ChatEvent::Disconnected {
        reason: "first".to_owned(),
    });
    transport.fail_next(2);
    let mut bot = bot(transport, &sleeper);

    bot.step().await;
    // An empty script reports another disconnection.
    bot.step().await;

    assert_eq!(bot.transport().reconnects(), 2);
    assert_eq!(sleeper.delays(), secs(&[10, 20, 40, 10]));
}

#[rstest]
#[tokio::test]
async fn messages_are_answered_after_a_rejoin(sleeper: RecordingSleeper) {
    let mut transport = ScriptedTransport::new("neobot");
    transport.push_event(ChatEvent::Kicked {
        channel: "#neomutt".to_owned(),
    });
    transport.push_event(ChatEvent::Message {
        reply_to: "#neomutt".to_owned(),
        text: "back again, see #12".to_owned(),
    });
    let mut bot = bot(transport, &sleeper);

    bot.step().await;
    bot.step().await;

    assert_eq!(
        bot.transport().sent(),
        [(
            "#neomutt".to_owned(),
            "Issue by @flatcap \"Sidebar flickers\": https://github.com/neomutt/neomutt/issues/12"
                .to_owned(),
        )]
    );
}

#[rstest]
#[tokio::test]
async fn kick_on_a_dead_socket_reconnects(sleeper: RecordingSleeper) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let port = listener
        .local_addr()
        .expect("listener should have an address")
        .port();
    let mut transport = IrcTransport::new(IrcSettings {
        server: "127.0.0.1".to_owned(),
        port,
        nickname: "neobot".to_owned(),
        channel: "#neomutt".to_owned(),
    });
    let (connect, accept) = tokio::join!(transport.reconnect(), listener.accept());
    connect.expect("transport should connect");
    // Closing with the registration lines unread resets the connection.
    drop(accept.expect("listener should accept"));
    let mut bot = bot(transport, &sleeper);

    let kicked = ChatEvent::Kicked {
        channel: "#neomutt".to_owned(),
    };
    timeout(Duration::from_secs(5), bot.handle_event(kicked))
        .await
        .expect("kick recovery should finish");

    let (stream, _) = timeout(Duration::from_secs(5), listener.accept())
        .await
        .expect("bot should reconnect")
        .expect("listener should accept");
    let mut lines = BufReader::new(stream).lines();
    assert_eq!(
        lines.next_line().await.expect("server should read"),
        Some("NICK neobot".to_owned())
    );
}

use std::sync::Arc;
use std::time::Duration;

use omikuji::{
    config::BotConfig,
    event_bus::{Event, EventReceiver},
    message::{ConversationId, InboundMessage, Markup, OutboundMessage},
    random::RandomSource,
    system::System,
};
use tokio::time::timeout;

fn seeded_system(config: &BotConfig) -> System {
    System::with_random(config, Arc::new(RandomSource::from_seed(42)))
}

async fn send(system: &System, conversation: &str, text: &str) -> InboundMessage {
    let message = InboundMessage::new(ConversationId::new(conversation), text);
    system
        .event_bus()
        .publish(Event::Inbound(message.clone()))
        .await
        .expect("failed to publish inbound message");
    message
}

async fn next_outbound(events: &mut EventReceiver) -> OutboundMessage {
    loop {
        let event = timeout(Duration::from_secs(2), events.recv())
            .await
            .expect("timed out waiting for outbound message")
            .expect("event bus closed");
        if let Event::Outbound(outbound) = event {
            return outbound;
        }
    }
}

async fn expect_no_outbound(events: &mut EventReceiver) {
    loop {
        match timeout(Duration::from_millis(300), events.recv()).await {
            Err(_) => return,
            Ok(Ok(Event::Inbound(_))) => continue,
            Ok(Ok(Event::Outbound(outbound))) => {
                panic!("unexpected outbound message: {:?}", outbound)
            }
            Ok(Err(_)) => return,
        }
    }
}

#[tokio::test]
async fn test_range_command_round_trip() {
    let system = seeded_system(&BotConfig::default());
    system.start();
    let (mut events, _) = system.event_bus().subscribe();

    let inbound = send(&system, "c1", "/random 1-10").await;
    let reply = next_outbound(&mut events).await;

    assert_eq!(reply.conversation, ConversationId::new("c1"));
    assert_eq!(reply.reply_to, Some(inbound.message_id));
    assert_eq!(reply.markup, Markup::LightweightEmphasis);

    let mut lines = reply.text.lines();
    assert_eq!(lines.next(), Some("_Random number between 1 and 10:_"));
    let value: u64 = lines
        .next()
        .expect("missing value line")
        .trim_matches('*')
        .parse()
        .expect("value line is not a number");
    assert!((1..10).contains(&value));
}

#[tokio::test]
async fn test_help_round_trip() {
    let system = seeded_system(&BotConfig::default());
    system.start();
    let (mut events, _) = system.event_bus().subscribe();

    send(&system, "c1", "/help").await;
    let reply = next_outbound(&mut events).await;

    assert!(reply.text.starts_with("Usage examples:"));
    assert!(reply.text.contains("`1-10`"));
    assert!(reply.text.contains("`apple|pear|lemon`"));
}

#[tokio::test]
async fn test_prompt_then_resolve() {
    let system = seeded_system(&BotConfig::default());
    system.start();
    let (mut events, _) = system.event_bus().subscribe();

    send(&system, "c1", "/random").await;
    let prompt = next_outbound(&mut events).await;
    assert_eq!(prompt.text, "Enter the pattern:");
    assert_eq!(prompt.markup, Markup::Plain);

    send(&system, "c1", "apple|pear").await;
    let reply = next_outbound(&mut events).await;
    assert!(reply.text.starts_with("_Random item:_"));
    let value = reply.text.lines().nth(1).unwrap().trim_matches('*');
    assert!(["apple", "pear"].contains(&value));
}

#[tokio::test]
async fn test_two_conversations_resolve_independently() {
    let system = seeded_system(&BotConfig::default());
    system.start();
    let (mut events, _) = system.event_bus().subscribe();

    send(&system, "c1", "/random").await;
    next_outbound(&mut events).await;
    send(&system, "c2", "/random").await;
    next_outbound(&mut events).await;

    send(&system, "c2", "red|blue").await;
    let second = next_outbound(&mut events).await;
    assert_eq!(second.conversation, ConversationId::new("c2"));
    assert!(second.text.starts_with("_Random item:_"));

    send(&system, "c1", "1-6").await;
    let first = next_outbound(&mut events).await;
    assert_eq!(first.conversation, ConversationId::new("c1"));
    assert!(first.text.starts_with("_Random number between 1 and 6:_"));
}

#[tokio::test]
async fn test_invalid_pattern_gets_notice_and_usage() {
    let system = seeded_system(&BotConfig::default());
    system.start();
    let (mut events, _) = system.event_bus().subscribe();

    send(&system, "c1", "/random singleword").await;
    let reply = next_outbound(&mut events).await;
    assert!(reply.text.starts_with("Invalid pattern"));
    assert!(reply.text.contains("Usage examples:"));
}

#[tokio::test]
async fn test_non_command_text_is_ignored() {
    let system = seeded_system(&BotConfig::default());
    system.start();
    let (mut events, _) = system.event_bus().subscribe();

    send(&system, "c1", "just chatting").await;
    expect_no_outbound(&mut events).await;
}

#[tokio::test]
async fn test_expired_pending_interaction_lapses() {
    let config = BotConfig {
        pending_ttl: Duration::ZERO,
        ..BotConfig::default()
    };
    let system = seeded_system(&config);
    system.start();
    let (mut events, _) = system.event_bus().subscribe();

    send(&system, "c1", "/random").await;
    let prompt = next_outbound(&mut events).await;
    assert_eq!(prompt.text, "Enter the pattern:");

    // The entry expired immediately, so the follow-up is plain ignored text.
    send(&system, "c1", "apple|pear").await;
    expect_no_outbound(&mut events).await;
}

#[tokio::test]
async fn test_shutdown_stops_the_handler() {
    let system = seeded_system(&BotConfig::default());
    system.start();
    let (mut events, _) = system.event_bus().subscribe();

    send(&system, "c1", "/help").await;
    next_outbound(&mut events).await;

    system.shutdown().expect("shutdown failed");
    tokio::time::sleep(Duration::from_millis(100)).await;

    send(&system, "c1", "/help").await;
    expect_no_outbound(&mut events).await;
}

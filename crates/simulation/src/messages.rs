//! Player messaging: systems emit `ChatMessage` events addressed to a single
//! actor or to everyone riding a craft; delivery resolves the audience,
//! records each line in the `MessageLog`, and mirrors it to the log output.

use bevy::prelude::*;

use crate::craft::Craft;
use crate::riders::Player;

/// Who a chat line is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// One specific actor.
    Actor(Entity),
    /// Every player currently riding the given craft.
    Riders(Entity),
}

/// A chat line queued for delivery.
#[derive(Event, Debug, Clone)]
pub struct ChatMessage {
    pub recipient: Recipient,
    pub text: String,
}

impl ChatMessage {
    pub fn to_actor(actor: Entity, text: impl Into<String>) -> Self {
        Self {
            recipient: Recipient::Actor(actor),
            text: text.into(),
        }
    }

    pub fn to_riders(craft: Entity, text: impl Into<String>) -> Self {
        Self {
            recipient: Recipient::Riders(craft),
            text: text.into(),
        }
    }
}

/// A line after audience resolution, one entry per receiving player.
#[derive(Debug, Clone)]
pub struct DeliveredMessage {
    pub to: Entity,
    pub text: String,
}

/// Everything delivered so far, oldest first.
#[derive(Resource, Default)]
pub struct MessageLog {
    pub lines: Vec<DeliveredMessage>,
}

impl MessageLog {
    /// All line texts delivered to `actor`, in order.
    pub fn for_actor(&self, actor: Entity) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|line| line.to == actor)
            .map(|line| line.text.as_str())
            .collect()
    }
}

/// Resolve each `ChatMessage` to its receiving players and record the lines.
pub fn deliver_chat_messages(
    mut messages: EventReader<ChatMessage>,
    mut log: ResMut<MessageLog>,
    crafts: Query<&Craft>,
    players: Query<(), With<Player>>,
) {
    for message in messages.read() {
        match message.recipient {
            Recipient::Actor(actor) => {
                info!("[chat -> {actor:?}] {}", message.text);
                log.lines.push(DeliveredMessage {
                    to: actor,
                    text: message.text.clone(),
                });
            }
            Recipient::Riders(craft_entity) => {
                let Ok(craft) = crafts.get(craft_entity) else {
                    continue;
                };
                for &rider in &craft.passengers {
                    if players.get(rider).is_ok() {
                        info!("[chat -> {rider:?}] {}", message.text);
                        log.lines.push(DeliveredMessage {
                            to: rider,
                            text: message.text.clone(),
                        });
                    }
                }
            }
        }
    }
}

pub struct MessagesPlugin;

impl Plugin for MessagesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MessageLog>()
            .add_event::<ChatMessage>()
            .add_systems(Update, deliver_chat_messages);
    }
}

//! Out-of-band notifications the Room hands to the transport layer
//! alongside the per-tick state payload: joins, leaves, deaths and join
//! failures. These are the `player-joined` / `player-left` / `player-died`
//! / `error` events from the spec's external interface; the actual socket
//! emission is the transport's job, not ours.

use serde::{Deserialize, Serialize};
use worm_core::room::RoomEvent;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    PlayerJoined {
        player_id: u64,
        player_name: String,
        worm_id: u64,
    },
    PlayerLeft {
        player_id: u64,
        reason: String,
    },
    PlayerDied {
        player_id: u64,
    },
    Error {
        code: &'static str,
        message: String,
    },
}

impl From<RoomEvent> for ServerEvent {
    fn from(event: RoomEvent) -> Self {
        match event {
            RoomEvent::PlayerJoined { player_id, player_name, worm_id } => {
                ServerEvent::PlayerJoined { player_id, player_name, worm_id }
            }
            RoomEvent::PlayerLeft { player_id, reason } => ServerEvent::PlayerLeft { player_id, reason },
            RoomEvent::PlayerDied { player_id } => ServerEvent::PlayerDied { player_id },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_event_maps_onto_the_matching_wire_event() {
        let wire: ServerEvent = RoomEvent::PlayerDied { player_id: 7 }.into();
        assert_eq!(wire, ServerEvent::PlayerDied { player_id: 7 });
    }
}

//! Player input commands and the per-player admission pipeline: shape
//! validation, timestamp-skew rejection, and a sliding one-second rate
//! limit, feeding a small bounded FIFO the room drains once per tick.

use crate::constants::*;
use crate::error::RejectReason;
use crate::player::Player;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    SetDirection {
        direction: f64,
        client_time_ms: i64,
    },
    SetBoost {
        boosting: bool,
        client_time_ms: i64,
    },
}

impl Command {
    fn client_time_ms(&self) -> i64 {
        match self {
            Command::SetDirection { client_time_ms, .. } => *client_time_ms,
            Command::SetBoost { client_time_ms, .. } => *client_time_ms,
        }
    }

    fn is_valid_shape(&self) -> bool {
        match self {
            Command::SetDirection { direction, .. } => direction.is_finite(),
            Command::SetBoost { .. } => true,
        }
    }
}

/// A bounded per-player FIFO of accepted commands, drained once per tick.
pub struct InputQueue {
    queue: VecDeque<Command>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::with_capacity(INPUT_BUFFER_SIZE),
        }
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    fn push(&mut self, cmd: Command) {
        if self.queue.len() >= INPUT_BUFFER_SIZE {
            self.queue.pop_front();
        }
        self.queue.push_back(cmd);
    }

    /// Remove and return every queued command, oldest first.
    pub fn drain(&mut self) -> Vec<Command> {
        self.queue.drain(..).collect()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate and admit one command on behalf of `player`. Rejections are
/// never surfaced to the client; callers should log them at debug level.
pub fn accept(
    queue: &mut InputQueue,
    player: &mut Player,
    cmd: Command,
    now_ms: i64,
) -> Result<(), RejectReason> {
    if !cmd.is_valid_shape() {
        return Err(RejectReason::InvalidDirection);
    }
    if (now_ms - cmd.client_time_ms()).abs() > T_SKEW_MS {
        return Err(RejectReason::TimestampSkew);
    }

    if now_ms - player.window_start_ms >= 1000 {
        player.window_start_ms = now_ms;
        player.inputs_this_window = 0;
    }
    if player.inputs_this_window >= MAX_INPUT_RATE {
        return Err(RejectReason::RateLimited);
    }

    player.inputs_this_window += 1;
    queue.push(cmd);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn direction_cmd(now_ms: i64) -> Command {
        Command::SetDirection {
            direction: 1.0,
            client_time_ms: now_ms,
        }
    }

    #[test]
    fn valid_command_is_admitted() {
        let mut queue = InputQueue::new();
        let mut player = Player::new(1, "a".to_string(), 0);
        assert!(accept(&mut queue, &mut player, direction_cmd(0), 0).is_ok());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn non_finite_direction_is_rejected() {
        let mut queue = InputQueue::new();
        let mut player = Player::new(1, "a".to_string(), 0);
        let cmd = Command::SetDirection {
            direction: f64::NAN,
            client_time_ms: 0,
        };
        assert_eq!(accept(&mut queue, &mut player, cmd, 0), Err(RejectReason::InvalidDirection));
    }

    #[test]
    fn timestamp_skew_is_rejected() {
        let mut queue = InputQueue::new();
        let mut player = Player::new(1, "a".to_string(), 0);
        let cmd = direction_cmd(T_SKEW_MS + 1000);
        assert_eq!(accept(&mut queue, &mut player, cmd, 0), Err(RejectReason::TimestampSkew));
    }

    #[test]
    fn exceeding_rate_limit_is_rejected() {
        let mut queue = InputQueue::new();
        let mut player = Player::new(1, "a".to_string(), 0);
        for _ in 0..MAX_INPUT_RATE {
            accept(&mut queue, &mut player, direction_cmd(0), 0).unwrap();
        }
        let over = direction_cmd(0);
        assert_eq!(accept(&mut queue, &mut player, over, 0), Err(RejectReason::RateLimited));
    }

    #[test]
    fn queue_drops_oldest_when_full() {
        let mut queue = InputQueue::new();
        let mut player = Player::new(1, "a".to_string(), 0);
        for i in 0..(INPUT_BUFFER_SIZE as i64 + 3) {
            let _ = accept(&mut queue, &mut player, direction_cmd(i), 0);
        }
        assert_eq!(queue.len(), INPUT_BUFFER_SIZE);
        let drained = queue.drain();
        assert_eq!(drained.first().unwrap().client_time_ms(), 3);
    }
}

//! A connected player: identity and persistent-for-the-session state that
//! outlives any one worm (score, name, the currently piloted worm, and
//! input bookkeeping used by [`crate::input::InputQueue`]).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub player_id: u64,
    pub name: String,
    pub score: i64,
    pub worm_id: Option<u64>,
    pub joined_at_ms: i64,
    pub is_spectator: bool,

    /// Count of accepted inputs within the current rate-limit window.
    pub inputs_this_window: u32,
    /// Start of the current one-second rate-limit window, in ms.
    pub window_start_ms: i64,
}

impl Player {
    pub fn new(player_id: u64, name: String, joined_at_ms: i64) -> Self {
        Self {
            player_id,
            name,
            score: 0,
            worm_id: None,
            joined_at_ms,
            is_spectator: false,
            inputs_this_window: 0,
            window_start_ms: joined_at_ms,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.worm_id.is_some()
    }

    pub fn award(&mut self, points: i64) {
        self.score += points;
    }

    pub fn enter_spectator(&mut self) {
        self.worm_id = None;
        self.is_spectator = true;
    }

    pub fn assign_worm(&mut self, worm_id: u64) {
        self.worm_id = Some(worm_id);
        self.is_spectator = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_player_has_no_worm_and_zero_score() {
        let p = Player::new(1, "alice".to_string(), 1000);
        assert!(!p.is_alive());
        assert_eq!(p.score, 0);
    }

    #[test]
    fn award_accumulates_score() {
        let mut p = Player::new(1, "alice".to_string(), 0);
        p.award(2);
        p.award(100);
        assert_eq!(p.score, 102);
    }

    #[test]
    fn entering_spectator_clears_worm() {
        let mut p = Player::new(1, "alice".to_string(), 0);
        p.assign_worm(42);
        assert!(p.is_alive());
        p.enter_spectator();
        assert!(!p.is_alive());
        assert!(p.is_spectator);
    }
}

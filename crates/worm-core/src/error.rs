//! Error taxonomy for the tick loop and input pipeline. See spec §7:
//! malformed/rate-limited input is rejected silently, join failures are
//! surfaced to the offending client only, and a simulation exception
//! within a tick is caught at the tick boundary and logged, never
//! propagated to other players.

use thiserror::Error;

/// Why an input command was rejected by [`crate::input::InputQueue`].
/// Never surfaced to the client; logged at debug level only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("malformed input")]
    Malformed,
    #[error("unknown command type")]
    UnknownType,
    #[error("direction is not finite")]
    InvalidDirection,
    #[error("timestamp skew exceeds T_skew")]
    TimestampSkew,
    #[error("per-player input rate exceeded")]
    RateLimited,
}

/// Why a `join-room` attempt failed. Surfaced to the client as
/// `error { code, message }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum JoinError {
    #[error("INVALID_NAME")]
    InvalidName,
    #[error("JOIN_FAILED")]
    JoinFailed,
}

impl JoinError {
    pub fn code(&self) -> &'static str {
        match self {
            JoinError::InvalidName => "INVALID_NAME",
            JoinError::JoinFailed => "JOIN_FAILED",
        }
    }
}

/// A fault raised while advancing a single tick. Caught at the tick
/// boundary: the tick is dropped (world state from the prior tick is
/// retained) and the loop continues on the next scheduled tick.
#[derive(Debug, Error)]
pub enum TickError {
    #[error("physics phase failed: {0}")]
    Physics(String),
    #[error("collision phase failed: {0}")]
    Collision(String),
    #[error("food phase failed: {0}")]
    Food(String),
}

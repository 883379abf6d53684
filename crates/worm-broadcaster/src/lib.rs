pub mod broadcaster;
pub mod cache;
pub mod event;
pub mod interest;
pub mod payload;

pub use broadcaster::Broadcaster;
pub use event::ServerEvent;
pub use payload::{DeltaUpdate, FullSnapshot, Payload, WorldSize, WormDelta};

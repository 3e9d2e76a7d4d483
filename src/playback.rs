//! Shared playback state.
//!
//! [`PlaybackStore`] owns the engine and the one [`PlaybackSession`]; the
//! catalog, detail page, player bar and MPRIS surface only read snapshots and
//! call store operations.

mod drag;
mod session;
mod store;

pub use drag::DragCoordinator;
pub use session::{PlayState, PlaybackSession};
pub use store::PlaybackStore;

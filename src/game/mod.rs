//! Game layer - phases, notifications, snapshots and the shared handle

pub mod events;
pub mod handle;
pub mod phase;
pub mod snapshot;
pub mod state;

pub use events::{ChannelSink, EventSink, GameEvent, NullSink, RecordingSink};
pub use handle::GameHandle;
pub use phase::Phase;
pub use snapshot::{AuctionView, GameSnapshot, PlayerView};
pub use state::{GameState, STOPPED_MESSAGE};

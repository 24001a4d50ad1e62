//! The interrupt-style event pipeline.
//!
//! ```text
//! timer ──try_send──▶ dispatch ──queue──▶ worker pool ──push──▶ FrameBuffer ──read──▶ consumer
//! (period)            (non-blocking)       (producer lock)      (bounded, lossy)
//! ```
//!
//! - `timer`: periodic ticks on a dedicated thread; disarm is synchronous
//! - `dispatch`: picks the player to move and queues one task per player
//! - `worker`: runs the engine and applies the move under the producer lock
//! - [`FrameBuffer`]: fixed-capacity byte queue with blocking reads
//! - [`Session`]: owns all of the above and their lifecycle

pub mod buffer;
pub(crate) mod dispatch;
pub mod session;
pub(crate) mod state;
pub(crate) mod timer;
pub(crate) mod worker;

pub use buffer::{FrameBuffer, ReadStatus};
pub use session::{Session, SessionHandle};
pub use state::SessionStats;
pub use timer::Tick;

pub mod clock;
pub mod machine;
pub mod queue;
pub mod seek;
pub mod types;

pub use clock::{PlaybackClock, DEFAULT_LATENCY_BUFFER_MS};
pub use machine::{PlaybackMachine, TickLease, Ticker, DEFAULT_TICK_INTERVAL};
pub use queue::QueueStore;
pub use seek::{position_at_column, SeekDrag};
pub use types::{format_time, PlaybackState, QueueSnapshot, Track, TrackDuration};

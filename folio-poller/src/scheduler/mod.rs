//! Scheduler layer for the poller
//!
//! This layer owns the timing and lifecycle of a session: the backoff
//! schedule, the state machine that decides what happens after each poll,
//! the concurrent fetch of terminal artifacts, and the task that ties them
//! together under a single cancellation signal.

pub mod artifacts;
pub mod backoff;
pub mod machine;
pub mod poller;

pub use artifacts::TerminalArtifacts;
pub use backoff::Backoff;
pub use machine::{PollMachine, Tick};
pub use poller::SessionPoller;

//! Keeping local views consistent with an externally replicated store.
//!
//! Replication itself happens elsewhere: a backend applies remote rows to the
//! SQLite store and announces them on the store's [`RemoteChangeFeed`]. The
//! [`SyncMonitor`] turns those announcements, a periodic timer and app
//! foreground events into refresh ticks.

mod monitor;
mod remote;

pub use monitor::{SyncMonitor, SyncSource, SyncState, SyncTick};
pub use remote::{RemoteChange, RemoteChangeFeed};

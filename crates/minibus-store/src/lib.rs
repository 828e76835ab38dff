//! State store for MiniBus.
//!
//! The store holds the current value of every state key and is the only
//! writer of that mapping. A change request runs to completion before it
//! returns:
//!
//! 1. authorization against the [`PermissionRegistry`](minibus_permissions::PermissionRegistry)
//! 2. equality check (an unchanged value is a no-op)
//! 3. copy-on-write commit of a new [`StateSnapshot`]
//! 4. the external effect through the [`ChangeSink`]
//! 5. watcher notification in registration order
//!
//! # Modules
//!
//! - [`error`] — [`StoreError`] and [`WatcherError`]
//! - [`snapshot`] — Immutable [`StateSnapshot`] of the whole mapping
//! - [`sink`] — [`ChangeSink`], the store's outbound effect interface
//! - [`store`] — [`StateStore`] and [`ChangeOutcome`]

pub mod error;
pub mod sink;
pub mod snapshot;
pub mod store;

pub use error::{Result, StoreError, WatcherError};
pub use sink::{ChangeSink, NullSink};
pub use snapshot::StateSnapshot;
pub use store::{ChangeOutcome, StateStore};

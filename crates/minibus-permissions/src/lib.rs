//! Permission registry for MiniBus.
//!
//! Every state key is owned by the element named in its prefix. The owner may
//! always change its own state. Anyone else needs a grant, and a grant can
//! only be issued to an element that is an ancestor-or-self of the key's
//! owner: permission flows from containers down to their children, never
//! sideways or upwards.

pub mod decision;
pub mod error;
pub mod registry;

pub use decision::{AccessDecision, GrantOutcome};
pub use error::{PermissionError, Result};
pub use registry::PermissionRegistry;

//! Core data types for the stable-marriage engine.
//!
//! ## Types
//!
//! - [`Side`]: which group an agent belongs to
//! - [`Instance`]: immutable preference lists for both groups
//! - [`Matching`]: the mutable state deferred acceptance works on, and the
//!   stable results it returns
//! - [`FreeList`]: the free side-A agents of a [`Matching`]
//!
//! Agents are plain `usize` indices in `0..N` on each side; ranks are
//! positions in a preference list, 0 being the most preferred.

mod side;
mod instance;
mod matching;

pub use side::Side;
pub use instance::Instance;
pub use matching::{FreeList, Matching};

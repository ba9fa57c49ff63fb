//! Build cache: bundle identity -> build result, single-flight.

mod build;
mod slot;

pub use build::{BuildCache, BuildGuard, Claim};
pub use slot::{BuildSlot, BuildState};

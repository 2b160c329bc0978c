//! Multi-record workflows built on the stores.

mod allocation;
mod lookup;

pub use allocation::{allocate, Allocation};
pub use lookup::{lookup_eligible_features, patta_features, PattaProperties};

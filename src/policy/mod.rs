//! Policy records and loading

mod data;
mod loader;

pub use data::{Policy, PolicyStatus, PolicyType};
pub use loader::{load_policies, load_policies_from_reader};

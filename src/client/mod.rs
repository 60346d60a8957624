//! Client records and loading

mod data;
mod loader;

pub use data::{Client, ClientStatus};
pub use loader::{load_clients, load_clients_from_reader};

pub mod connection;
pub mod service;
pub mod store;

pub use connection::{get_connection, DbPool};
pub use store::{open_store, DuckDbStore, MemoryStore, SessionStore, StoreError, SESSION_KEY};

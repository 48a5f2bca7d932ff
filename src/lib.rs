pub mod config;
pub mod error;
pub mod gateway;
pub mod replication;
pub mod server;

mod utils;

pub use error::MobdbError;

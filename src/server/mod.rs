pub mod router;
pub mod routes;

pub use router::{MobdbState, mobdb_router};

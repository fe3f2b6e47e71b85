pub mod assistant;
pub mod routes;

pub use routes::*;

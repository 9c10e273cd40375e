pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod validation;

pub use models::*;
pub use router::*;

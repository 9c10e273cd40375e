pub mod postgres;
pub mod schema;
pub mod state;

pub use state::AppState;

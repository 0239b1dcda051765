pub mod inspect;
pub mod output;
pub mod server;

pub use server::{build_router, AppState};

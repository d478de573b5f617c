mod auth;
mod calendar;
pub mod dto;
mod habits;
mod logs;
pub mod response;
mod router;
pub mod validation;

pub use auth::auth_router;
pub use habits::habit_router;
pub use router::{AppState, create_router};

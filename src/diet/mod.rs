pub mod dto;
pub mod flow;
pub mod handlers;
pub mod services;
pub mod session;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::diet_routes()
}

//! API routes module

pub mod health;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Routes mounted under `/api`
pub fn routes(state: &AppState) -> Router {
    Router::new().nest("/users", users::router(state))
}

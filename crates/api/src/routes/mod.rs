//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth_middleware};

pub mod activities;
pub mod auth;
pub mod branches;
pub mod dashboard;
pub mod health;
pub mod performance;
pub mod reports;
pub mod resources;
pub mod schedules;
pub mod users;
pub mod workers;

/// Creates the API router: public health and token routes plus everything
/// else behind [`auth_middleware`].
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(branches::routes())
        .merge(users::routes(state.storage.max_upload_bytes))
        .merge(activities::routes())
        .merge(resources::routes())
        .merge(schedules::routes())
        .merge(performance::routes())
        .merge(workers::routes())
        .merge(dashboard::routes())
        .merge(reports::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

//! Route registration.
//!
//! `/health` is public; every register and report route sits behind the
//! bearer-token middleware.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod cash_register;
pub mod health;
pub mod reports;

/// Assembles the `/api/v1` router. The state is needed up front because
/// the auth middleware validates tokens with it.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .merge(cash_register::routes())
        .merge(reports::routes())
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new().merge(health::routes()).merge(protected)
}

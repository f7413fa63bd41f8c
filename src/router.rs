use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::shared::AppState;
use crate::{room, session, user};

/// Builds the full HTTP API
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/user", get(user::get_current_user))
        .route("/api/score", post(user::update_score))
        .route("/api/game/create", post(room::create_game))
        .route("/api/game/join", post(room::join_game))
        .route("/api/game/move", post(room::make_move))
        .route("/api/game/leave", post(room::leave_game))
        .route("/api/game/emote", post(room::emote))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session::require_auth,
        ));

    let public = Router::new()
        .route("/api/register", post(session::register))
        .route("/api/login", post(session::login))
        .route("/api/logout", post(session::logout))
        .route("/api/leaderboard", get(user::leaderboard))
        .route("/api/game/state", get(room::game_state));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

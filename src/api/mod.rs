//! HTTP API
//!
//! Routes are split into public and authenticated endpoints. Track reads
//! are open; everything that mutates or is user-scoped requires a valid
//! bearer access token.

use axum::{
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::auth::require_auth;
use crate::AppState;

pub mod auth;
pub mod dto;
pub mod library;
pub mod playlists;
pub mod social;
pub mod tracks;

/// Create the API router
pub fn api_router(state: AppState) -> Router<AppState> {
    // Public endpoints (no authentication required)
    let public_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/refresh", post(auth::refresh))
        // Open read access to tracks
        .route("/tracks", get(tracks::list_tracks))
        .route("/tracks/:id", get(tracks::get_track));

    // Authenticated endpoints (require valid access token)
    let authenticated_routes = Router::new()
        .route("/me", get(auth::me))
        // Track mutation
        .route("/tracks", post(tracks::create_track))
        .route("/tracks/:id", put(tracks::update_track))
        .route("/tracks/:id", delete(tracks::delete_track))
        // Playlists
        .route("/playlists", get(playlists::list_playlists))
        .route("/playlists", post(playlists::create_playlist))
        .route("/playlists/:id", get(playlists::get_playlist))
        .route("/playlists/:id/add-track", post(playlists::add_track))
        .route(
            "/playlists/:id/remove-track/:track_id",
            delete(playlists::remove_track),
        )
        .route("/playlists/:id/update", patch(playlists::rename_playlist))
        .route("/playlists/:id/delete", delete(playlists::delete_playlist))
        // Likes and history
        .route("/tracks/:id/like", post(library::like_track))
        .route("/tracks/:id/history", post(library::add_to_history))
        .route("/likes", get(library::liked_tracks))
        .route("/history", get(library::get_history))
        .route("/recommendations", get(library::recommendations))
        // Social graph and feed
        .route("/follow/:user_id", post(social::follow_user))
        .route("/unfollow/:user_id", delete(social::unfollow_user))
        .route("/following/tracks", get(social::following_tracks))
        .route("/users/:id/followers", get(social::get_followers))
        .route("/users/:id/following", get(social::get_following))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    public_routes.merge(authenticated_routes)
}

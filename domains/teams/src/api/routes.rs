//! Route definitions for the Teams domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::teams;
use super::TeamsState;

/// Create all Teams domain API routes
pub fn routes() -> Router<TeamsState> {
    Router::new()
        .route("/v1/teams", get(teams::list_teams).post(teams::create_team))
        .route(
            "/v1/teams/{id}",
            get(teams::get_team)
                .patch(teams::update_team)
                .delete(teams::delete_team),
        )
        .route(
            "/v1/teams/{id}/members/{user_id}",
            post(teams::add_member).delete(teams::remove_member),
        )
}

//! services/api/src/web/friends.rs
//!
//! Friendship endpoints. A friendship is a single row per pair of users;
//! it starts pending when one side sends a request and becomes accepted
//! or rejected when the other side answers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use study_tracker_core::domain::{Friend, FriendRequest, Friendship};
use utoipa::ToSchema;

use crate::web::middleware::AuthUser;
use crate::web::port_error_response;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SendFriendRequestBody {
    /// The username of the person to befriend.
    pub username: String,
}

#[derive(Deserialize, ToSchema)]
pub struct RespondRequestBody {
    /// true accepts the request, false rejects it.
    pub accept: bool,
}

#[derive(Serialize, ToSchema)]
pub struct FriendshipResponse {
    pub friendship_id: i64,
    pub requester_id: i64,
    pub addressee_id: i64,
    pub status: String,
    pub requested_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl From<Friendship> for FriendshipResponse {
    fn from(f: Friendship) -> Self {
        Self {
            friendship_id: f.friendship_id,
            requester_id: f.requester_id,
            addressee_id: f.addressee_id,
            status: f.status.as_str().to_string(),
            requested_at: f.requested_at,
            responded_at: f.responded_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct FriendRequestResponse {
    pub friendship_id: i64,
    pub username: String,
    pub requested_at: DateTime<Utc>,
}

impl From<FriendRequest> for FriendRequestResponse {
    fn from(r: FriendRequest) -> Self {
        Self {
            friendship_id: r.friendship_id,
            username: r.username,
            requested_at: r.requested_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct FriendResponse {
    pub user_id: i64,
    pub username: String,
    pub friends_since: DateTime<Utc>,
}

impl From<Friend> for FriendResponse {
    fn from(f: Friend) -> Self {
        Self {
            user_id: f.user_id,
            username: f.username,
            friends_since: f.friends_since,
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /friends/requests - Send a friend request by username
#[utoipa::path(
    post,
    path = "/friends/requests",
    request_body = SendFriendRequestBody,
    responses(
        (status = 201, description = "Request sent", body = FriendshipResponse),
        (status = 400, description = "Cannot befriend yourself"),
        (status = 404, description = "No such user"),
        (status = 409, description = "Already friends or a request is pending"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn send_friend_request_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<SendFriendRequestBody>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let friendship = state
        .store
        .send_friend_request(auth.user_id, &req.username)
        .await
        .map_err(port_error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(FriendshipResponse::from(friendship)),
    ))
}

/// POST /friends/requests/{id}/respond - Accept or reject a request
#[utoipa::path(
    post,
    path = "/friends/requests/{id}/respond",
    params(("id" = i64, Path, description = "The friendship")),
    request_body = RespondRequestBody,
    responses(
        (status = 200, description = "Request answered", body = FriendshipResponse),
        (status = 404, description = "No pending request addressed to this user"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn respond_friend_request_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    Json(req): Json<RespondRequestBody>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let friendship = state
        .store
        .respond_to_friend_request(auth.user_id, id, req.accept)
        .await
        .map_err(port_error_response)?;

    Ok(Json(FriendshipResponse::from(friendship)))
}

/// GET /friends/requests - Pending requests addressed to this user
#[utoipa::path(
    get,
    path = "/friends/requests",
    responses(
        (status = 200, description = "Pending requests, newest first", body = Vec<FriendRequestResponse>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn pending_requests_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let requests = state
        .store
        .pending_friend_requests(auth.user_id)
        .await
        .map_err(port_error_response)?;

    Ok(Json(
        requests
            .into_iter()
            .map(FriendRequestResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// GET /friends - The user's accepted friends
#[utoipa::path(
    get,
    path = "/friends",
    responses(
        (status = 200, description = "Friends ordered by username", body = Vec<FriendResponse>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_friends_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let friends = state
        .store
        .list_friends(auth.user_id)
        .await
        .map_err(port_error_response)?;

    Ok(Json(
        friends
            .into_iter()
            .map(FriendResponse::from)
            .collect::<Vec<_>>(),
    ))
}

/// DELETE /friends/{id} - Remove an accepted friend
#[utoipa::path(
    delete,
    path = "/friends/{id}",
    params(("id" = i64, Path, description = "The friend's user id")),
    responses(
        (status = 204, description = "Friendship removed"),
        (status = 404, description = "Not friends with that user"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn remove_friend_handler(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    state
        .store
        .remove_friend(auth.user_id, id)
        .await
        .map_err(port_error_response)?;

    Ok(StatusCode::NO_CONTENT)
}

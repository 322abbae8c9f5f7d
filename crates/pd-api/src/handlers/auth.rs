//! Magic-link sign-in flow
//!
//! The `next` destination is resolved on the way in (login) and again on the
//! way back (callback), because the callback URL is user-reachable too.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use pd_auth::{callback_url, resolve_next_path, IdentityError, Session, SessionError};
use pd_models::validate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::extractors::{AppState, CurrentSession};

/// Where a failed callback sends the browser
pub const CALLBACK_FAILED_PATH: &str = "/login?error=auth_callback_failed";

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    pub next: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Callback the magic link will land on
    pub redirect_to: String,
}

/// Request a magic link
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    validate(&request)?;

    let next = resolve_next_path(request.next.as_deref());
    let redirect_to = callback_url(&state.config.server.site_url, &next);

    match state.identity.send_magic_link(&request.email, &redirect_to).await {
        Ok(()) => tracing::info!(email = %request.email, %next, "Magic link requested"),
        // Unknown addresses get the same response as known ones.
        Err(IdentityError::UnknownUser(email)) => {
            tracing::warn!(%email, "Magic link requested for unknown user");
        }
        Err(e) => return Err(ApiError::BadGateway(e.to_string())),
    }

    Ok((StatusCode::ACCEPTED, Json(LoginResponse { redirect_to })))
}

#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub next: Option<String>,
}

/// Complete sign-in from a magic link
///
/// GET /auth/callback?code=&next=
pub async fn callback(
    State(state): State<AppState>,
    Query(params): Query<CallbackParams>,
) -> Response {
    let next = resolve_next_path(params.next.as_deref());

    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        tracing::warn!("Auth callback without code");
        return Redirect::to(CALLBACK_FAILED_PATH).into_response();
    };

    let identity = match state.identity.exchange_code(&code).await {
        Ok(identity) => identity,
        Err(e) => {
            tracing::warn!(error = %e, "Auth callback code exchange failed");
            return Redirect::to(CALLBACK_FAILED_PATH).into_response();
        }
    };

    let session = Session::new(
        identity.user_id,
        identity.email,
        identity.role,
        state.config.auth.session_lifetime_seconds,
        state.clock.as_ref(),
    );
    let cookie = state.cookies.build_cookie(&session.id);

    if let Err(e) = state.sessions.insert(session) {
        return ApiError::internal(e.to_string()).into_response();
    }

    tracing::info!(user_id = %identity.user_id, role = %identity.role, %next, "Signed in");
    ([(header::SET_COOKIE, cookie)], Redirect::to(&next)).into_response()
}

/// End the current session
///
/// POST /auth/logout
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let cookie = headers.get(header::COOKIE).and_then(|v| v.to_str().ok());
    if let Ok(session) = state.authenticate(cookie) {
        match state.sessions.delete(&session.id) {
            // Swept between lookup and delete; already signed out.
            Ok(()) | Err(SessionError::NotFound) => {
                tracing::info!(user_id = %session.user_id, "Signed out")
            }
        }
    }

    (
        [(header::SET_COOKIE, state.cookies.build_clear_cookie())],
        Redirect::to("/login"),
    )
        .into_response()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user_id: String,
    pub email: String,
    pub role: pd_models::Role,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

/// The signed-in user
///
/// GET /auth/me
pub async fn me(session: CurrentSession) -> Json<SessionResponse> {
    Json(SessionResponse {
        user_id: session.user_id.to_string(),
        email: session.email.clone(),
        role: session.role,
        expires_at: session.expires_at,
    })
}

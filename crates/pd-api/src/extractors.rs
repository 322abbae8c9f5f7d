//! Application state and axum extractors

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, OriginalUri},
    http::{header, request::Parts},
};
use pd_auth::{
    extract_session_id, login_url, resolve_next_path, AuthError, CookieConfig, IdentityProvider,
    Session, SessionStore,
};
use pd_core::clock::Clock;
use pd_core::config::AppConfig;
use std::sync::Arc;

use crate::error::ApiError;
use crate::store::ProjectStore;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub clock: Arc<dyn Clock>,
    pub sessions: Arc<dyn SessionStore>,
    pub identity: Arc<dyn IdentityProvider>,
    pub projects: Arc<dyn ProjectStore>,
    pub cookies: CookieConfig,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        clock: Arc<dyn Clock>,
        sessions: Arc<dyn SessionStore>,
        identity: Arc<dyn IdentityProvider>,
        projects: Arc<dyn ProjectStore>,
    ) -> Self {
        let cookies = CookieConfig::from_config(&config.auth);
        Self {
            config: Arc::new(config),
            clock,
            sessions,
            identity,
            projects,
            cookies,
        }
    }

    /// Live session named by the request's cookie.
    ///
    /// `Required` when no session cookie was sent, `Expired` when the cookie
    /// names a session that has lapsed or been signed out.
    pub fn authenticate(&self, cookie_header: Option<&str>) -> Result<Session, AuthError> {
        let session_id = cookie_header
            .and_then(|header| extract_session_id(header, &self.cookies.name))
            .ok_or(AuthError::Required)?;
        self.sessions.get(&session_id).ok_or(AuthError::Expired)
    }
}

/// The signed-in user's session
pub struct CurrentSession(pub Session);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let cookie = parts
            .headers
            .get(header::COOKIE)
            .and_then(|value| value.to_str().ok());

        let err = match app_state.authenticate(cookie) {
            Ok(session) => return Ok(CurrentSession(session)),
            Err(err) => err,
        };

        // Nested routers see a stripped URI; come back to the full one.
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|original| &original.0)
            .unwrap_or(&parts.uri);
        let here = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
        let next = resolve_next_path(Some(here));

        Err(ApiError::from(err).with_login_url(login_url(&next)))
    }
}

impl std::ops::Deref for CurrentSession {
    type Target = Session;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

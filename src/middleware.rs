// src/middleware.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use crate::errors::AppError;
use crate::sessions::{PageSession, SESSION_COOKIE};
use crate::state::AppState;

/// Przypisuje żądanie do sesji strony na podstawie ciasteczka; nowym
/// odwiedzającym ustawia ciasteczko sesyjne.
pub async fn page_session_middleware(
    State(app_state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let requested = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());
    let session = app_state.sessions.resolve(requested);
    let session_id = session.id;
    let is_new = session.is_new;

    request.extensions_mut().insert(session);
    let response = next.run(request).await;

    if !is_new {
        return response;
    }

    // Ciasteczko sesyjne (bez max_age): szkic nie przeżywa zamknięcia przeglądarki
    let cookie = Cookie::build((SESSION_COOKIE, session_id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    (jar.add(cookie), response).into_response()
}

impl FromRequestParts<AppState> for PageSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<PageSession>().cloned().ok_or_else(|| {
            tracing::error!("Żądanie nie przeszło przez middleware sesji strony");
            AppError::InternalServerError("Brak sesji strony".to_string())
        })
    }
}

use crate::cookies::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::header::SET_COOKIE,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};

/// Resolve the caller's identity from the session cookies and store it in the
/// request extensions.
///
/// A reissued access token is appended to whatever response the handler
/// produced, unless the handler already set an access token cookie itself.
pub async fn resolve_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let resolution = state
        .session_resolver
        .resolve(
            jar.get(ACCESS_TOKEN_COOKIE).map(Cookie::value),
            jar.get(REFRESH_TOKEN_COOKIE).map(Cookie::value),
        )
        .await;

    request.extensions_mut().insert(resolution.identity);
    let response = next.run(request).await;

    match resolution.reissued_access_token {
        Some(token) if !sets_access_cookie(&response) => {
            let jar = CookieJar::new().add(state.cookie_policy.access_cookie(token));
            (jar, response).into_response()
        }
        _ => response,
    }
}

fn sets_access_cookie(response: &Response) -> bool {
    let prefix = format!("{}=", ACCESS_TOKEN_COOKIE);
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.starts_with(&prefix))
}

use axum::{
    Router,
    extract::Request,
    middleware::{self, Next},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};

use crate::{middleware::auth::session_from_headers, state::AppState};

/// Back-office page shell. The real UI is served elsewhere; these handlers
/// exist to carry the session redirect contract.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(admin_home))
        .route("/admin/login", get(admin_login))
        .layer(middleware::from_fn(guard_admin_pages))
}

/// Unauthenticated admin pages bounce to the login page; an authenticated
/// visit to the login page bounces back to the dashboard.
async fn guard_admin_pages(request: Request, next: Next) -> Response {
    let signed_in = session_from_headers(request.headers()).is_some();
    let at_login = request.uri().path() == "/admin/login";

    if at_login && signed_in {
        return Redirect::temporary("/admin").into_response();
    }
    if !at_login && !signed_in {
        return Redirect::temporary("/admin/login").into_response();
    }

    next.run(request).await
}

async fn admin_home() -> Html<&'static str> {
    Html(
        "<!doctype html><html><head><title>Heritage Wala Admin</title></head>\
         <body><h1>Heritage Wala admin</h1>\
         <p>Signed in. The admin API lives under <code>/api/admin</code>.</p>\
         </body></html>",
    )
}

async fn admin_login() -> Html<&'static str> {
    Html(
        "<!doctype html><html><head><title>Sign in - Heritage Wala</title></head>\
         <body><h1>Sign in</h1>\
         <p>POST credentials to <code>/api/auth/login</code> to receive the session cookie.</p>\
         </body></html>",
    )
}

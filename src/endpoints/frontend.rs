//! Admin shell
//!
//! Router fallback for everything outside `/api`. Each request mounts the
//! status gate once, waits for it within the configured budget and either
//! renders one of the gate pages or hands the request to the static SPA
//! bundle, with `index.html` answering client-side routes.

use axum::{
    extract::{Request, State},
    http::{Method, StatusCode},
    response::{Html, IntoResponse, Response},
    Router,
};
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

use crate::error::AppError;
use crate::gate::{pages, GateHandle, GateView};
use crate::state::AppState;

pub async fn admin_shell(State(state): State<AppState>, request: Request) -> Response {
    let path = request.uri().path().to_string();

    if path == "/api" || path.starts_with("/api/") {
        return AppError::NotFound(format!("No API route for {}", path)).into_response();
    }

    if request.method() != Method::GET && request.method() != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let mut gate = GateHandle::mount(state.gate_probe.clone());
    let gate_state = gate.settled(state.gate_timeout).await;

    match gate_state.view(&path) {
        GateView::Loading => Html(pages::loading_page()).into_response(),
        GateView::ErrorCard { message } => Html(pages::error_page(message)).into_response(),
        GateView::Shutdown { message } => (
            StatusCode::SERVICE_UNAVAILABLE,
            Html(pages::shutdown_page(message)),
        )
            .into_response(),
        GateView::Route { .. } => serve_spa(&state, request).await,
    }
}

async fn serve_spa(state: &AppState, request: Request) -> Response {
    let index = state.static_dir.join("index.html");
    let spa = ServeDir::new(&state.static_dir).fallback(ServeFile::new(index));

    match spa.oneshot(request).await {
        Ok(response) => response.into_response(),
        // ServeDir with a ServeFile fallback is infallible
        Err(never) => match never {},
    }
}

/// Fallback service carrying its own state, mounted under every other route
pub fn shell_routes(state: AppState) -> Router {
    Router::new().fallback(admin_shell).with_state(state)
}

// src/lib.rs

pub mod config;
pub mod controller;
pub mod errors;
pub mod form;
pub mod htmx_handlers;
pub mod list_view;
pub mod middleware;
pub mod models;
pub mod previews;
pub mod product_service;
pub mod response;
pub mod sessions;
pub mod state;
pub mod views;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{delete, get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::htmx_handlers::*;
use crate::middleware::page_session_middleware;
use crate::state::AppState;

/// Maksymalny rozmiar żądania (obrazki produktów trafiają przez multipart).
const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

/// Buduje router całej aplikacji panelu produktów.
pub fn build_router(app_state: AppState) -> Router {
    let static_dir = app_state.static_dir.clone();

    Router::new()
        .route("/", get(catalog_page_handler))
        .route("/htmx/products", get(list_products_htmx_handler))
        .route("/htmx/products/new", get(new_product_form_htmx_handler))
        .route(
            "/htmx/products/{id}/edit",
            get(edit_product_form_htmx_handler),
        )
        .route("/htmx/products/{id}", delete(delete_product_htmx_handler))
        .route(
            "/htmx/products/form/fields",
            post(update_form_fields_htmx_handler),
        )
        .route("/htmx/products/form/image", post(select_image_htmx_handler))
        .route("/htmx/products/form/submit", post(submit_form_htmx_handler))
        .route("/htmx/products/form/cancel", post(cancel_form_htmx_handler))
        .route("/previews/{preview_id}", get(preview_handler))
        // Pliki statyczne są poza sesją (warstwa obejmuje tylko trasy powyżej)
        .layer(from_fn_with_state(app_state.clone(), page_session_middleware))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(app_state)
}

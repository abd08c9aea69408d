// src/htmx_handlers.rs

use axum::{
    Form,
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, HeaderValue, header},
    response::{IntoResponse, Response},
};
use maud::Markup;
use serde::Deserialize;
use uuid::Uuid;

use crate::controller::PageController;
use crate::errors::AppError;
use crate::form::FormFields;
use crate::list_view::Confirmation;
use crate::models::ImageUpload;
use crate::response::build_response;
use crate::sessions::PageSession;
use crate::state::AppState;
use crate::views;

fn render_page(app_state: &AppState, page: &PageController) -> Markup {
    let snapshot = page.snapshot();
    views::render_catalog(&snapshot, &app_state.card_settings)
}

fn form_not_open() -> AppError {
    AppError::UnprocessableEntity("Formularz produktu nie jest otwarty".to_string())
}

pub async fn catalog_page_handler(
    State(app_state): State<AppState>,
    session: PageSession,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    tracing::info!("MAUD: / - aktywacja widoku produktów (sesja {})", session.id);
    session.page.activate();
    build_response(&headers, &app_state.static_dir, views::render_catalog_shell()).await
}

/// Pobranie listy przy aktywacji oraz ręczne "Retry".
pub async fn list_products_htmx_handler(
    State(app_state): State<AppState>,
    session: PageSession,
) -> Markup {
    tracing::info!("MAUD: /htmx/products - pobieranie listy");
    session.page.refresh().await;
    render_page(&app_state, &session.page)
}

pub async fn new_product_form_htmx_handler(
    State(app_state): State<AppState>,
    session: PageSession,
) -> Markup {
    session.page.open_create();
    render_page(&app_state, &session.page)
}

pub async fn edit_product_form_htmx_handler(
    State(app_state): State<AppState>,
    session: PageSession,
    Path(id): Path<String>,
) -> Markup {
    tracing::info!("MAUD: /htmx/products/{}/edit", id);
    session.page.open_edit(&id).await;
    render_page(&app_state, &session.page)
}

/// Odświeża tylko przyciski formularza; oczekujący komunikat zostaje dla pełnego widoku.
pub async fn update_form_fields_htmx_handler(
    session: PageSession,
    Form(fields): Form<FormFields>,
) -> Result<Markup, AppError> {
    session.page.update_fields(fields);
    let status = session.page.form_status().ok_or_else(form_not_open)?;
    Ok(views::render_form_actions(
        status.is_edit,
        status.can_submit,
        status.busy,
    ))
}

pub async fn select_image_htmx_handler(
    session: PageSession,
    mut multipart: Multipart,
) -> Result<Markup, AppError> {
    let mut upload: Option<ImageUpload> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("image") {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| "image".to_string());
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let bytes = field.bytes().await?;
        if bytes.is_empty() {
            tracing::warn!("Odebrano puste pole pliku: {}", file_name);
            continue;
        }
        tracing::info!(
            "Wybrano obrazek: {}, typ: {}, rozmiar: {} bajtów",
            file_name,
            content_type,
            bytes.len()
        );
        upload = Some(ImageUpload {
            file_name,
            content_type,
            bytes,
        });
    }

    let upload = upload.ok_or_else(|| {
        AppError::UnprocessableEntity("Brak pliku obrazka w polu 'image'".to_string())
    })?;
    if !upload.is_previewable_image() {
        tracing::warn!(
            "Odrzucono plik '{}' o typie {}",
            upload.file_name,
            upload.content_type
        );
        return Err(AppError::UnprocessableEntity(format!(
            "Nieobsługiwany typ pliku: {}",
            upload.content_type
        )));
    }

    let preview = session.page.select_image(upload).ok_or_else(form_not_open)?;
    Ok(views::render_preview(Some(&preview)))
}

pub async fn submit_form_htmx_handler(
    State(app_state): State<AppState>,
    session: PageSession,
    Form(fields): Form<FormFields>,
) -> Markup {
    session.page.update_fields(fields);
    let outcome = session.page.submit_form().await;
    tracing::info!("MAUD: wysłanie formularza produktu: {:?}", outcome);
    render_page(&app_state, &session.page)
}

pub async fn cancel_form_htmx_handler(
    State(app_state): State<AppState>,
    session: PageSession,
) -> Markup {
    session.page.cancel_form();
    render_page(&app_state, &session.page)
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    pub confirmed: bool,
}

/// Przycisk wysyła `confirmed=true` dopiero po `hx-confirm`; bez tego
/// żądanie traktujemy jak odmowę.
pub async fn delete_product_htmx_handler(
    State(app_state): State<AppState>,
    session: PageSession,
    Path(id): Path<String>,
    Query(params): Query<DeleteParams>,
) -> Markup {
    let outcome = session
        .page
        .delete_product(&id, Confirmation::from(params.confirmed))
        .await;
    tracing::info!("MAUD: usuwanie produktu {}: {:?}", id, outcome);
    render_page(&app_state, &session.page)
}

pub async fn preview_handler(
    session: PageSession,
    Path(preview_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let upload = session
        .page
        .preview(&preview_id)
        .ok_or(AppError::NotFound)?;
    let content_type = HeaderValue::from_str(&upload.mime_essence())
        .map_err(|_| AppError::NotFound)?;
    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ),
        ],
        upload.bytes,
    )
        .into_response())
}

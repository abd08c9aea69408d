// src/response.rs

use axum::body::Body;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use lol_html::{HtmlRewriter, Settings, element};
use maud::Markup;
use std::path::Path;
use tokio::fs;
use tokio_util::bytes::Bytes;

use crate::errors::AppError;

/// Wczytuje szablon `index.html` i wstawia w `#content` wyrenderowany fragment.
/// Atrybuty HTMX inicjujące ładowanie są usuwane z placeholdera, żeby HTMX nie
/// nadpisał treści po załadowaniu strony.
async fn serve_full_page(static_dir: &str, content_markup: Markup) -> Result<Response, AppError> {
    let shell_path = Path::new(static_dir).join("index.html");
    let shell_content = match fs::read(&shell_path).await {
        Ok(bytes) => Bytes::from(bytes),
        Err(e) => {
            tracing::error!(
                "Nie można wczytać pliku szablonu {}: {}",
                shell_path.display(),
                e
            );
            return Err(AppError::InternalServerError(
                "Błąd wczytywania szablonu strony".to_string(),
            ));
        }
    };

    let content_string = content_markup.into_string();
    let mut response_body = Vec::new();

    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: vec![element!("#content", |el| {
                el.set_inner_content(&content_string, lol_html::html_content::ContentType::Html);
                el.remove_attribute("hx-trigger");
                el.remove_attribute("hx-get");
                Ok(())
            })],
            ..Settings::default()
        },
        |c: &[u8]| response_body.extend_from_slice(c),
    );

    rewriter.write(&shell_content).map_err(|e| {
        AppError::InternalServerError(format!("Błąd przetwarzania szablonu strony: {}", e))
    })?;
    rewriter.end().map_err(|e| {
        AppError::InternalServerError(format!("Błąd przetwarzania szablonu strony: {}", e))
    })?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .body(Body::from(response_body))
        .map_err(|e| AppError::InternalServerError(format!("Błąd budowania odpowiedzi: {}", e)))
}

/// Dla żądań HTMX zwraca sam fragment, dla pełnych odświeżeń (F5) całą stronę.
pub async fn build_response(
    headers: &HeaderMap,
    static_dir: &str,
    page_content: Markup,
) -> Result<Response, AppError> {
    if headers.contains_key("HX-Request") {
        Ok(page_content.into_response())
    } else {
        serve_full_page(static_dir, page_content).await
    }
}

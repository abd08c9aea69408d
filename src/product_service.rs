// src/product_service.rs

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, multipart};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::errors::{ServiceError, ServiceResult};
use crate::models::{ApiEnvelope, ProductDraft, Product};

/// Kontrakt warstwy danych: jedno wywołanie API na jedno żądanie, bez ponowień.
#[async_trait]
pub trait ProductService: Send + Sync {
    async fn list_products(&self) -> ServiceResult<Vec<Product>>;
    async fn get_product(&self, id: &str) -> ServiceResult<Product>;
    async fn create_product(&self, draft: &ProductDraft) -> ServiceResult<Product>;
    async fn update_product(&self, id: &str, draft: &ProductDraft) -> ServiceResult<Product>;
    async fn delete_product(&self, id: &str) -> ServiceResult<()>;
}

#[derive(Debug, Clone, Copy)]
enum ApiCall {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl ApiCall {
    fn reports_not_found(self) -> bool {
        matches!(self, ApiCall::Get | ApiCall::Update | ApiCall::Delete)
    }

    fn reports_validation(self) -> bool {
        matches!(self, ApiCall::Create | ApiCall::Update)
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Klient REST zewnętrznego API produktów.
#[derive(Debug, Clone)]
pub struct HttpProductService {
    client: Client,
    base_url: String,
}

impl HttpProductService {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        HttpProductService {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/products", self.base_url)
    }

    fn product_url(&self, id: &str) -> String {
        format!("{}/products/{}", self.base_url, urlencoding::encode(id))
    }
}

/// Koduje szkic produktu jako multipart: cztery pola tekstowe i opcjonalny plik `image`.
pub fn build_product_form(draft: &ProductDraft) -> multipart::Form {
    let form = multipart::Form::new()
        .text("name", draft.name.clone())
        .text("description", draft.description.clone())
        .text("price", draft.price.to_string())
        .text("stock", draft.stock.to_string());

    match &draft.image {
        Some(upload) => {
            let part = multipart::Part::bytes(upload.bytes.to_vec()).file_name(upload.file_name.clone());
            let part = match part.mime_str(&upload.content_type) {
                Ok(part) => part,
                Err(e) => {
                    tracing::warn!(
                        "Nieprawidłowy typ MIME '{}' dla pliku '{}': {}",
                        upload.content_type,
                        upload.file_name,
                        e
                    );
                    multipart::Part::bytes(upload.bytes.to_vec())
                        .file_name(upload.file_name.clone())
                }
            };
            form.part("image", part)
        }
        None => form,
    }
}

fn network_error(call: ApiCall, err: reqwest::Error) -> ServiceError {
    tracing::error!("Błąd sieci podczas wywołania {:?}: {:?}", call, err);
    ServiceError::Network(err)
}

fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message.or(parsed.error))
        .unwrap_or_else(|| body.trim().to_string())
}

async fn check_status(call: ApiCall, response: Response) -> ServiceResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Brak treści błędu".to_string());
    let message = extract_error_message(&body);
    tracing::error!(
        "API produktów odpowiedziało błędem ({:?}): Status={}, Treść={}",
        call,
        status,
        body
    );

    Err(match status {
        StatusCode::NOT_FOUND if call.reports_not_found() => ServiceError::NotFound,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY if call.reports_validation() => {
            ServiceError::Validation(message)
        }
        _ => ServiceError::Server { status, message },
    })
}

async fn decode_envelope<T: DeserializeOwned>(call: ApiCall, response: Response) -> ServiceResult<T> {
    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .map_err(|e| network_error(call, e))?;

    serde_json::from_slice::<ApiEnvelope<T>>(&bytes)
        .map(|envelope| envelope.data)
        .map_err(|e| {
            tracing::error!("Błąd deserializacji odpowiedzi API ({:?}): {}", call, e);
            ServiceError::Server {
                status,
                message: format!("Nie można przetworzyć odpowiedzi API: {}", e),
            }
        })
}

#[async_trait]
impl ProductService for HttpProductService {
    async fn list_products(&self) -> ServiceResult<Vec<Product>> {
        let call = ApiCall::List;
        tracing::debug!("GET {}", self.collection_url());
        let response = self
            .client
            .get(self.collection_url())
            .send()
            .await
            .map_err(|e| network_error(call, e))?;
        let products: Vec<Product> = decode_envelope(call, check_status(call, response).await?).await?;
        tracing::info!("Pobrano {} produktów z API", products.len());
        Ok(products)
    }

    async fn get_product(&self, id: &str) -> ServiceResult<Product> {
        let call = ApiCall::Get;
        tracing::debug!("GET {}", self.product_url(id));
        let response = self
            .client
            .get(self.product_url(id))
            .send()
            .await
            .map_err(|e| network_error(call, e))?;
        decode_envelope(call, check_status(call, response).await?).await
    }

    async fn create_product(&self, draft: &ProductDraft) -> ServiceResult<Product> {
        let call = ApiCall::Create;
        tracing::debug!(
            "POST {} (obrazek: {})",
            self.collection_url(),
            draft.image.is_some()
        );
        let response = self
            .client
            .post(self.collection_url())
            .multipart(build_product_form(draft))
            .send()
            .await
            .map_err(|e| network_error(call, e))?;
        let created: Product = decode_envelope(call, check_status(call, response).await?).await?;
        tracing::info!("Utworzono produkt {} ('{}')", created.id, created.name);
        Ok(created)
    }

    async fn update_product(&self, id: &str, draft: &ProductDraft) -> ServiceResult<Product> {
        let call = ApiCall::Update;
        tracing::debug!(
            "PUT {} (obrazek: {})",
            self.product_url(id),
            draft.image.is_some()
        );
        let response = self
            .client
            .put(self.product_url(id))
            .multipart(build_product_form(draft))
            .send()
            .await
            .map_err(|e| network_error(call, e))?;
        let updated: Product = decode_envelope(call, check_status(call, response).await?).await?;
        tracing::info!("Zaktualizowano produkt {}", updated.id);
        Ok(updated)
    }

    async fn delete_product(&self, id: &str) -> ServiceResult<()> {
        let call = ApiCall::Delete;
        tracing::debug!("DELETE {}", self.product_url(id));
        let response = self
            .client
            .delete(self.product_url(id))
            .send()
            .await
            .map_err(|e| network_error(call, e))?;
        check_status(call, response).await?;
        tracing::info!("Usunięto produkt {}", id);
        Ok(())
    }
}

// src/models.rs
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_util::bytes::Bytes;

/// Identyfikator produktu nadawany przez backend (nieprzezroczysty string).
pub type ProductId = String;

/// Produkt w postaci zwracanej przez zewnętrzne API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub stock: i64,
    // Gotowy do użycia adres obrazka (URL lub ścieżka), bez rekonstrukcji po stronie klienta
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(
        rename = "createdAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Zwraca referencję obrazka, pomijając puste wartości zwracane przez backend.
    pub fn image_ref(&self) -> Option<&str> {
        self.image.as_deref().filter(|image| !image.trim().is_empty())
    }
}

/// Wartość liczbowa z formularza. Niesparsowane wejście jest przekazywane
/// dalej jako `NaN`, tak jak robi to przeglądarka.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric<T> {
    Value(T),
    NotANumber,
}

impl<T: fmt::Display> fmt::Display for Numeric<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Value(value) => value.fmt(f),
            Numeric::NotANumber => f.write_str("NaN"),
        }
    }
}

/// Typy rastrowe, które podgląd może bezpiecznie odesłać z własnej domeny.
pub const PREVIEW_IMAGE_TYPES: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/webp",
    "image/avif",
    "image/bmp",
];

/// Plik obrazka wybrany lokalnie w edytorze.
#[derive(Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    /// Typ MIME bez parametrów, małymi literami (`"Image/PNG; q=1"` -> `"image/png"`).
    pub fn mime_essence(&self) -> String {
        self.content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }

    pub fn is_previewable_image(&self) -> bool {
        PREVIEW_IMAGE_TYPES.contains(&self.mime_essence().as_str())
    }
}

/// Znormalizowany payload wysyłany przez edytor (tworzenie i edycja).
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Numeric<f64>,
    pub stock: Numeric<i64>,
    pub image: Option<ImageUpload>,
}

/// Koperta `{ "data": ... }` używana przez wszystkie odpowiedzi API.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: T,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_decodes_backend_field_names() {
        let json = r#"{
            "_id": "66f1c0",
            "name": "Widget",
            "description": "A widget",
            "price": 9.99,
            "stock": 5,
            "image": "https://cdn.example.com/widget.png",
            "createdAt": "2024-05-01T10:00:00Z"
        }"#;

        let product: Product = serde_json::from_str(json).expect("valid product json");

        assert_eq!(product.id, "66f1c0");
        assert_eq!(product.stock, 5);
        assert_eq!(product.image_ref(), Some("https://cdn.example.com/widget.png"));
        assert!(product.created_at.is_some());
    }

    #[test]
    fn product_without_optional_fields_decodes() {
        let json = r#"{ "_id": "1", "name": "Bare", "price": 1, "stock": 0 }"#;

        let product: Product = serde_json::from_str(json).expect("valid product json");

        assert_eq!(product.description, "");
        assert_eq!(product.image_ref(), None);
        assert_eq!(product.created_at, None);
    }

    #[test]
    fn blank_image_is_treated_as_missing() {
        let json = r#"{ "_id": "1", "name": "Bare", "price": 1, "stock": 0, "image": "" }"#;
        let product: Product = serde_json::from_str(json).expect("valid product json");
        assert_eq!(product.image_ref(), None);
    }

    fn upload(content_type: &str) -> ImageUpload {
        ImageUpload {
            file_name: "file".to_string(),
            content_type: content_type.to_string(),
            bytes: Bytes::from_static(b"data"),
        }
    }

    #[test]
    fn only_raster_images_are_previewable() {
        assert!(upload("image/png").is_previewable_image());
        assert!(upload("Image/JPEG; charset=binary").is_previewable_image());
        assert!(!upload("text/html").is_previewable_image());
        assert!(!upload("image/svg+xml").is_previewable_image());
        assert!(!upload("application/octet-stream").is_previewable_image());
    }

    #[test]
    fn not_a_number_renders_as_nan() {
        assert_eq!(Numeric::<f64>::NotANumber.to_string(), "NaN");
        assert_eq!(Numeric::Value(9.99_f64).to_string(), "9.99");
        assert_eq!(Numeric::Value(5_i64).to_string(), "5");
    }
}

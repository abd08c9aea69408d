// src/form.rs

use serde::Deserialize;
use strum::{EnumIter, IntoEnumIterator};
use strum_macros::{Display, EnumString};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{ImageUpload, Numeric, Product, ProductDraft};
use crate::previews::PreviewStore;

/// Co zrobić z ceną lub stanem, których nie da się sparsować jako liczby.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum NumericPolicy {
    /// Przekaż `NaN` do API i pozwól backendowi zdecydować.
    #[default]
    Lenient,
    /// Zablokuj wysłanie formularza.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum FormField {
    Name,
    Description,
    Price,
    Stock,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FormError {
    #[error("pole '{0}' jest wymagane")]
    MissingField(FormField),

    #[error("pole '{field}' nie jest liczbą: '{value}'")]
    InvalidNumber { field: FormField, value: String },
}

/// Surowe wartości pól, dokładnie tak jak wpisał je użytkownik.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormFields {
    pub name: String,
    pub description: String,
    pub price: String,
    pub stock: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    Create,
    Edit(Product),
}

/// Źródło podglądu obrazka w edytorze.
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewSource {
    /// Obrazek istniejącego produktu, użyty bez zmian.
    Remote(String),
    /// Plik wybrany lokalnie, trzymany w `PreviewStore`.
    Local(Uuid),
}

impl PreviewSource {
    pub fn url(&self) -> String {
        match self {
            PreviewSource::Remote(url) => url.clone(),
            PreviewSource::Local(id) => PreviewStore::url_for(id),
        }
    }
}

/// Stan edytora produktu. Nie wie nic o kolekcji ani o tym, czy wynik
/// zostanie utworzony czy zaktualizowany.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductForm {
    mode: FormMode,
    fields: FormFields,
    image: Option<ImageUpload>,
    preview: Option<PreviewSource>,
}

impl ProductForm {
    pub fn open(seed: Option<Product>) -> Self {
        match seed {
            None => ProductForm {
                mode: FormMode::Create,
                fields: FormFields::default(),
                image: None,
                preview: None,
            },
            Some(product) => {
                let fields = FormFields {
                    name: product.name.clone(),
                    description: product.description.clone(),
                    price: product.price.to_string(),
                    stock: product.stock.to_string(),
                };
                let preview = product
                    .image_ref()
                    .map(|image| PreviewSource::Remote(image.to_string()));
                ProductForm {
                    mode: FormMode::Edit(product),
                    fields,
                    image: None,
                    preview,
                }
            }
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit(_))
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn image(&self) -> Option<&ImageUpload> {
        self.image.as_ref()
    }

    pub fn preview(&self) -> Option<&PreviewSource> {
        self.preview.as_ref()
    }

    pub fn set_fields(&mut self, fields: FormFields) {
        self.fields = fields;
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Name => self.fields.name = value,
            FormField::Description => self.fields.description = value,
            FormField::Price => self.fields.price = value,
            FormField::Stock => self.fields.stock = value,
        }
    }

    /// Podmienia wybrany plik i tworzy lokalny podgląd, bez kontaktu z API.
    pub fn select_image(&mut self, upload: ImageUpload, previews: &PreviewStore) -> PreviewSource {
        if let Some(PreviewSource::Local(previous)) = self.preview.take() {
            previews.discard(&previous);
        }
        let preview = PreviewSource::Local(previews.register(&upload));
        self.image = Some(upload);
        self.preview = Some(preview.clone());
        preview
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.fields.name,
            FormField::Description => &self.fields.description,
            FormField::Price => &self.fields.price,
            FormField::Stock => &self.fields.stock,
        }
    }

    /// Pola wymagane, które są puste, w kolejności formularza.
    pub fn missing_fields(&self) -> Vec<FormField> {
        FormField::iter()
            .filter(|field| self.field(*field).is_empty())
            .collect()
    }

    /// Przycisk wysyłki jest aktywny tylko gdy wszystkie wymagane pola są niepuste.
    pub fn can_submit(&self) -> bool {
        self.missing_fields().is_empty()
    }

    pub fn submit(&self, policy: NumericPolicy) -> Result<ProductDraft, FormError> {
        if let Some(field) = self.missing_fields().first() {
            return Err(FormError::MissingField(*field));
        }

        let price = parse_price(&self.fields.price, policy)?;
        let stock = parse_stock(&self.fields.stock, policy)?;

        Ok(ProductDraft {
            name: self.fields.name.clone(),
            description: self.fields.description.clone(),
            price,
            stock,
            image: self.image.clone(),
        })
    }

    /// Zamyka edytor i zwalnia lokalny podgląd.
    pub fn close(self, previews: &PreviewStore) {
        if let Some(PreviewSource::Local(id)) = self.preview {
            previews.discard(&id);
        }
    }
}

fn parse_price(raw: &str, policy: NumericPolicy) -> Result<Numeric<f64>, FormError> {
    let parsed = match policy {
        NumericPolicy::Lenient => leading_decimal(raw.trim_start()),
        NumericPolicy::Strict => {
            let trimmed = raw.trim();
            leading_decimal(trimmed).filter(|literal| literal.len() == trimmed.len())
        }
    }
    .and_then(|literal| literal.parse::<f64>().ok())
    .filter(|value| value.is_finite());

    match (parsed, policy) {
        (Some(value), _) => Ok(Numeric::Value(value)),
        (None, NumericPolicy::Lenient) => Ok(Numeric::NotANumber),
        (None, NumericPolicy::Strict) => Err(FormError::InvalidNumber {
            field: FormField::Price,
            value: raw.to_string(),
        }),
    }
}

fn parse_stock(raw: &str, policy: NumericPolicy) -> Result<Numeric<i64>, FormError> {
    let parsed = match policy {
        NumericPolicy::Lenient => leading_integer(raw.trim_start()),
        NumericPolicy::Strict => {
            let trimmed = raw.trim();
            leading_integer(trimmed).filter(|literal| literal.len() == trimmed.len())
        }
    }
    .and_then(|literal| literal.parse::<i64>().ok());

    match (parsed, policy) {
        (Some(value), _) => Ok(Numeric::Value(value)),
        (None, NumericPolicy::Lenient) => Ok(Numeric::NotANumber),
        (None, NumericPolicy::Strict) => Err(FormError::InvalidNumber {
            field: FormField::Stock,
            value: raw.to_string(),
        }),
    }
}

fn sign_len(bytes: &[u8]) -> usize {
    usize::from(matches!(bytes.first(), Some(b'+' | b'-')))
}

fn digits_from(bytes: &[u8], start: usize) -> usize {
    bytes[start..].iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Najdłuższy prefiks będący liczbą całkowitą ze znakiem (`"12abc"` -> `"12"`).
fn leading_integer(input: &str) -> Option<&str> {
    let bytes = input.as_bytes();
    let start = sign_len(bytes);
    let digits = digits_from(bytes, start);
    (digits > 0).then(|| &input[..start + digits])
}

/// Najdłuższy prefiks będący literałem dziesiętnym (`"9.99 zł"` -> `"9.99"`).
fn leading_decimal(input: &str) -> Option<&str> {
    let bytes = input.as_bytes();
    let mut end = sign_len(bytes);
    let int_digits = digits_from(bytes, end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_from(bytes, end + 1);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let exp_start = end + 1 + sign_len(&bytes[end + 1..]);
        let exp_digits = digits_from(bytes, exp_start);
        if exp_digits > 0 {
            end = exp_start + exp_digits;
        }
    }

    Some(&input[..end])
}

#[cfg(test)]
mod tests {
    use tokio_util::bytes::Bytes;

    use super::*;

    fn widget() -> Product {
        Product {
            id: "p-1".to_string(),
            name: "Widget".to_string(),
            description: "A widget".to_string(),
            price: 9.99,
            stock: 5,
            image: Some("https://cdn.example.com/widget.png".to_string()),
            created_at: None,
        }
    }

    fn filled_form() -> ProductForm {
        let mut form = ProductForm::open(None);
        form.set_fields(FormFields {
            name: "Widget".to_string(),
            description: "A widget".to_string(),
            price: "9.99".to_string(),
            stock: "5".to_string(),
        });
        form
    }

    fn upload(name: &str) -> ImageUpload {
        ImageUpload {
            file_name: name.to_string(),
            content_type: "image/png".to_string(),
            bytes: Bytes::from_static(b"png-bytes"),
        }
    }

    #[test]
    fn open_without_seed_starts_empty_in_create_mode() {
        let form = ProductForm::open(None);

        assert_eq!(form.mode(), &FormMode::Create);
        assert_eq!(form.fields(), &FormFields::default());
        assert!(form.preview().is_none());
        assert!(!form.can_submit());
    }

    #[test]
    fn open_with_seed_copies_product_fields() {
        let product = widget();
        let form = ProductForm::open(Some(product.clone()));

        assert!(form.is_edit());
        assert_eq!(form.fields().name, product.name);
        assert_eq!(form.fields().description, product.description);
        assert_eq!(form.fields().price, "9.99");
        assert_eq!(form.fields().stock, "5");
        assert_eq!(
            form.preview(),
            Some(&PreviewSource::Remote(
                "https://cdn.example.com/widget.png".to_string()
            ))
        );
        assert!(form.can_submit());
    }

    #[test]
    fn submit_is_gated_on_every_required_field() {
        for field in [
            FormField::Name,
            FormField::Description,
            FormField::Price,
            FormField::Stock,
        ] {
            let mut form = filled_form();
            form.set_field(field, "");
            assert!(!form.can_submit(), "{field} left empty should block submit");
            assert_eq!(
                form.submit(NumericPolicy::Lenient),
                Err(FormError::MissingField(field))
            );
        }
    }

    #[test]
    fn image_presence_does_not_affect_the_gate() {
        let previews = PreviewStore::new();
        let mut form = ProductForm::open(None);
        form.select_image(upload("a.png"), &previews);
        assert!(!form.can_submit());

        let form = filled_form();
        assert!(form.image().is_none());
        assert!(form.can_submit());
    }

    #[test]
    fn whitespace_only_values_count_as_present() {
        let mut form = filled_form();
        form.set_field(FormField::Name, " ");
        assert!(form.can_submit());
    }

    #[test]
    fn submit_packages_current_values() {
        let draft = filled_form()
            .submit(NumericPolicy::Lenient)
            .expect("form is complete");

        assert_eq!(draft.name, "Widget");
        assert_eq!(draft.description, "A widget");
        assert_eq!(draft.price, Numeric::Value(9.99));
        assert_eq!(draft.stock, Numeric::Value(5));
        assert!(draft.image.is_none());
    }

    #[test]
    fn lenient_policy_forwards_unparsable_numbers_as_nan() {
        let mut form = filled_form();
        form.set_field(FormField::Price, "cheap");
        form.set_field(FormField::Stock, "many");

        let draft = form.submit(NumericPolicy::Lenient).expect("lenient accepts");

        assert_eq!(draft.price, Numeric::NotANumber);
        assert_eq!(draft.stock, Numeric::NotANumber);
    }

    #[test]
    fn lenient_policy_takes_numeric_prefix() {
        let mut form = filled_form();
        form.set_field(FormField::Price, " 12.5kg");
        form.set_field(FormField::Stock, "5.7");

        let draft = form.submit(NumericPolicy::Lenient).expect("lenient accepts");

        assert_eq!(draft.price, Numeric::Value(12.5));
        assert_eq!(draft.stock, Numeric::Value(5));
    }

    #[test]
    fn strict_policy_rejects_unparsable_numbers() {
        let mut form = filled_form();
        form.set_field(FormField::Stock, "5.7");

        assert_eq!(
            form.submit(NumericPolicy::Strict),
            Err(FormError::InvalidNumber {
                field: FormField::Stock,
                value: "5.7".to_string()
            })
        );

        let mut form = filled_form();
        form.set_field(FormField::Price, "NaN");
        assert!(matches!(
            form.submit(NumericPolicy::Strict),
            Err(FormError::InvalidNumber {
                field: FormField::Price,
                ..
            })
        ));
    }

    #[test]
    fn strict_policy_accepts_clean_numbers() {
        let mut form = filled_form();
        form.set_field(FormField::Price, " 1e3 ");
        let draft = form.submit(NumericPolicy::Strict).expect("clean numbers");
        assert_eq!(draft.price, Numeric::Value(1000.0));
    }

    #[test]
    fn selecting_an_image_creates_a_local_preview() {
        let previews = PreviewStore::new();
        let mut form = ProductForm::open(Some(widget()));

        let preview = form.select_image(upload("new.png"), &previews);

        let PreviewSource::Local(id) = preview else {
            panic!("expected a local preview");
        };
        assert_eq!(previews.get(&id).map(|u| u.file_name), Some("new.png".to_string()));
        assert_eq!(form.image().map(|u| u.file_name.as_str()), Some("new.png"));
    }

    #[test]
    fn reselecting_replaces_the_previous_preview() {
        let previews = PreviewStore::new();
        let mut form = ProductForm::open(None);

        form.select_image(upload("first.png"), &previews);
        form.select_image(upload("second.png"), &previews);

        assert_eq!(previews.len(), 1);
        assert_eq!(form.image().map(|u| u.file_name.as_str()), Some("second.png"));
    }

    #[test]
    fn closing_discards_local_preview() {
        let previews = PreviewStore::new();
        let mut form = ProductForm::open(None);
        form.select_image(upload("a.png"), &previews);

        form.close(&previews);

        assert!(previews.is_empty());
    }

    #[test]
    fn numeric_prefix_scanning() {
        assert_eq!(leading_decimal("9.99"), Some("9.99"));
        assert_eq!(leading_decimal("-.5x"), Some("-.5"));
        assert_eq!(leading_decimal("5."), Some("5."));
        assert_eq!(leading_decimal("2e"), Some("2"));
        assert_eq!(leading_decimal("."), None);
        assert_eq!(leading_decimal("abc"), None);
        assert_eq!(leading_integer("+42 pcs"), Some("+42"));
        assert_eq!(leading_integer("-"), None);
    }

    #[test]
    fn policy_parses_from_config_strings() {
        assert_eq!("lenient".parse::<NumericPolicy>(), Ok(NumericPolicy::Lenient));
        assert_eq!("Strict".parse::<NumericPolicy>(), Ok(NumericPolicy::Strict));
    }
}

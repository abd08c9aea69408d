// src/list_view.rs

use crate::models::Product;

pub const DEFAULT_EXCERPT_CHARS: usize = 100;
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

/// Stan widoku listy produktów.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ListState {
    #[default]
    Loading,
    Failed(String),
    Loaded(Vec<Product>),
}

impl ListState {
    pub fn products(&self) -> Option<&[Product]> {
        match self {
            ListState::Loaded(products) => Some(products),
            _ => None,
        }
    }

    pub fn find(&self, id: &str) -> Option<&Product> {
        self.products()?.iter().find(|product| product.id == id)
    }
}

/// Decyzja użytkownika w oknie potwierdzenia usunięcia.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl From<bool> for Confirmation {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Confirmation::Confirmed
        } else {
            Confirmation::Declined
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockBand {
    OutOfStock,
    Low,
    Normal,
}

impl StockBand {
    pub fn classify(stock: i64, low_threshold: i64) -> Self {
        if stock <= 0 {
            StockBand::OutOfStock
        } else if stock <= low_threshold {
            StockBand::Low
        } else {
            StockBand::Normal
        }
    }

    pub fn badge_classes(&self) -> &'static str {
        match self {
            StockBand::OutOfStock => "bg-red-100 text-red-800",
            StockBand::Low => "bg-yellow-100 text-yellow-800",
            StockBand::Normal => "bg-green-100 text-green-800",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardSettings {
    pub excerpt_chars: usize,
    pub low_stock_threshold: i64,
}

impl Default for CardSettings {
    fn default() -> Self {
        CardSettings {
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }
}

/// Dane jednej karty produktu, gotowe do wyrenderowania.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductCard {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub excerpt: String,
    pub price_label: String,
    pub stock_label: String,
    pub stock_band: StockBand,
}

impl ProductCard {
    pub fn from_product(product: &Product, settings: &CardSettings) -> Self {
        ProductCard {
            id: product.id.clone(),
            name: product.name.clone(),
            image: product.image_ref().map(str::to_string),
            excerpt: truncate_description(&product.description, settings.excerpt_chars),
            price_label: format_price(product.price),
            stock_label: stock_label(product.stock),
            stock_band: StockBand::classify(product.stock, settings.low_stock_threshold),
        }
    }
}

pub fn stock_label(stock: i64) -> String {
    if stock > 0 {
        format!("{} in stock", stock)
    } else {
        "Out of stock".to_string()
    }
}

/// Skraca opis do `max_chars` znaków (nie bajtów), dodając wielokropek.
pub fn truncate_description(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", text[..cut].trim_end()),
        None => text.to_string(),
    }
}

/// Formatuje cenę w rupiach w zapisie `id-ID`: kropka grupuje tysiące,
/// przecinek oddziela część ułamkową (maksymalnie 3 cyfry).
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return format!("Rp {}", price);
    }

    let fixed = format!("{:.3}", price.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let is_zero = integer.chars().all(|c| c == '0') && fraction.is_empty();
    let sign = if price.is_sign_negative() && !is_zero { "-" } else { "" };

    if fraction.is_empty() {
        format!("Rp {}{}", sign, grouped)
    } else {
        format!("Rp {}{},{}", sign, grouped, fraction)
    }
}

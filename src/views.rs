// src/views.rs

use maud::{Markup, html};

use crate::controller::{Notice, NoticeLevel, PageSnapshot};
use crate::form::{FormMode, PreviewSource, ProductForm};
use crate::list_view::{CardSettings, ListState, ProductCard};

const PAGE_TARGET: &str = "#catalog-page";
const DELETE_CONFIRM: &str = "Are you sure you want to delete this product?";

fn product_path(id: &str) -> String {
    format!("/htmx/products/{}", urlencoding::encode(id))
}

fn render_spinner() -> Markup {
    html! {
        div ."flex justify-center items-center h-64" {
            div ."animate-spin rounded-full h-12 w-12 border-b-2 border-blue-500" {}
        }
    }
}

fn render_header() -> Markup {
    html! {
        div ."mb-8 flex justify-between items-center" {
            div {
                h1 ."text-3xl font-bold text-gray-900" { "Product Management" }
                p ."text-gray-600 mt-2" { "Manage your products efficiently" }
            }
            button "hx-get"="/htmx/products/new" "hx-target"=(PAGE_TARGET) "hx-swap"="outerHTML"
                   class="bg-blue-500 hover:bg-blue-600 text-white font-semibold py-3 px-6 rounded-lg transition-colors duration-200 shadow-lg" {
                "+ Add New Product"
            }
        }
    }
}

/// Szkielet strony przy aktywacji: spinner + jednorazowe pobranie listy po załadowaniu.
pub fn render_catalog_shell() -> Markup {
    html! {
        div #catalog-page ."max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-8"
            "hx-get"="/htmx/products" "hx-trigger"="load" "hx-swap"="outerHTML" {
            (render_header())
            section #product-list { (render_spinner()) }
        }
    }
}

pub fn render_catalog(snapshot: &PageSnapshot, settings: &CardSettings) -> Markup {
    html! {
        div #catalog-page ."max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-8" {
            @if let Some(notice) = &snapshot.notice {
                (render_notice(notice))
            }
            (render_header())
            section #product-list { (render_list(&snapshot.list, settings)) }
            div #modal {
                @if let Some(form) = &snapshot.form {
                    (render_form(form, snapshot.busy))
                }
            }
        }
    }
}

pub fn render_notice(notice: &Notice) -> Markup {
    let classes = match notice.level {
        NoticeLevel::Error => "bg-red-100 border border-red-400 text-red-700",
        NoticeLevel::Success => "bg-green-100 border border-green-400 text-green-700",
    };
    html! {
        div role="alert" class=(format!("{} px-4 py-3 rounded mb-6", classes)) {
            (notice.message)
        }
    }
}

pub fn render_list(list: &ListState, settings: &CardSettings) -> Markup {
    html! {
        @match list {
            ListState::Loading => {
                (render_spinner())
            }
            ListState::Failed(message) => {
                div ."bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded" {
                    (message)
                    button "hx-get"="/htmx/products" "hx-target"=(PAGE_TARGET) "hx-swap"="outerHTML"
                           class="ml-4 bg-red-600 text-white px-3 py-1 rounded hover:bg-red-700" {
                        "Retry"
                    }
                }
            }
            ListState::Loaded(products) => {
                @if products.is_empty() {
                    div #empty-state ."text-center py-12" {
                        div ."text-gray-400 text-6xl mb-4" { "📦" }
                        h3 ."text-xl font-semibold text-gray-600 mb-2" { "No products found" }
                        p ."text-gray-500 mb-6" { "Get started by creating your first product" }
                        button "hx-get"="/htmx/products/new" "hx-target"=(PAGE_TARGET) "hx-swap"="outerHTML"
                               class="bg-blue-500 hover:bg-blue-600 text-white font-semibold py-2 px-6 rounded-lg" {
                            "Create Product"
                        }
                    }
                } @else {
                    div #products-container ."grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 xl:grid-cols-4 gap-6" {
                        @for product in products {
                            (render_card(&ProductCard::from_product(product, settings)))
                        }
                    }
                }
            }
        }
    }
}

pub fn render_card(card: &ProductCard) -> Markup {
    html! {
        div ."product-card bg-white rounded-xl shadow-lg overflow-hidden hover:shadow-xl transition-shadow duration-300" {
            div ."relative h-48 w-full" {
                @if let Some(image) = &card.image {
                    img src=(image) alt=(card.name) class="w-full h-full object-cover" loading="lazy";
                } @else {
                    div ."w-full h-full bg-gray-200 flex items-center justify-center" {
                        span ."text-gray-500" { "No Image" }
                    }
                }
            }
            div ."p-6" {
                h3 ."text-xl font-bold text-gray-800 mb-2 line-clamp-1" { (card.name) }
                p ."text-gray-600 text-sm mb-4 line-clamp-2 h-10" { (card.excerpt) }
                div ."flex justify-between items-center mb-4" {
                    span ."text-2xl font-bold text-green-600" { (card.price_label) }
                    span class=(format!("px-3 py-1 rounded-full text-xs font-semibold {}", card.stock_band.badge_classes())) {
                        (card.stock_label)
                    }
                }
                div ."flex space-x-2" {
                    button "hx-get"=(format!("{}/edit", product_path(&card.id)))
                           "hx-target"=(PAGE_TARGET) "hx-swap"="outerHTML"
                           class="flex-1 bg-blue-500 hover:bg-blue-600 text-white py-2 px-4 rounded-lg font-medium" {
                        "Edit"
                    }
                    button "hx-delete"=(product_path(&card.id))
                           "hx-confirm"=(DELETE_CONFIRM)
                           "hx-vals"=r#"{"confirmed": "true"}"#
                           "hx-target"=(PAGE_TARGET) "hx-swap"="outerHTML"
                           class="flex-1 bg-red-500 hover:bg-red-600 text-white py-2 px-4 rounded-lg font-medium" {
                        "Delete"
                    }
                }
            }
        }
    }
}

pub fn render_preview(preview: Option<&PreviewSource>) -> Markup {
    html! {
        div #image-preview ."w-20 h-20 border-2 border-dashed border-gray-300 rounded-lg relative overflow-hidden flex items-center justify-center" {
            @if let Some(preview) = preview {
                img src=(preview.url()) alt="Preview" class="w-full h-full object-cover rounded-lg";
            } @else {
                span ."text-gray-400 text-xs text-center" { "No Image" }
            }
        }
    }
}

pub fn render_form_actions(is_edit: bool, can_submit: bool, busy: bool) -> Markup {
    html! {
        div #form-actions ."flex space-x-3 pt-4" {
            button type="button" "hx-post"="/htmx/products/form/cancel" "hx-target"=(PAGE_TARGET) "hx-swap"="outerHTML"
                   disabled[busy]
                   class="flex-1 bg-gray-300 hover:bg-gray-400 text-gray-800 py-3 px-4 rounded-lg font-medium disabled:opacity-50" {
                "Cancel"
            }
            button type="submit" disabled[!can_submit || busy]
                   class="flex-1 bg-blue-500 hover:bg-blue-600 text-white py-3 px-4 rounded-lg font-medium disabled:opacity-50 disabled:cursor-not-allowed" {
                @if busy {
                    "Loading..."
                } @else if is_edit {
                    "Update"
                } @else {
                    "Create"
                }
            }
        }
    }
}

pub fn render_form(form: &ProductForm, busy: bool) -> Markup {
    let fields = form.fields();
    let title = match form.mode() {
        FormMode::Create => "Create New Product",
        FormMode::Edit(_) => "Edit Product",
    };
    // Każda zmiana pola odświeża tylko przyciski (bramka wymaganych pól)
    let field_sync = "/htmx/products/form/fields";
    let field_trigger = "input changed delay:150ms";

    html! {
        div ."fixed inset-0 bg-black bg-opacity-50 flex items-center justify-center p-4 z-50" {
            div ."bg-white rounded-xl shadow-2xl max-w-md w-full max-h-[90vh] overflow-y-auto" {
                div ."p-6" {
                    h2 ."text-2xl font-bold text-gray-800 mb-6" { (title) }
                    form #product-form "hx-post"="/htmx/products/form/submit" "hx-target"=(PAGE_TARGET) "hx-swap"="outerHTML"
                         class="space-y-4" {
                        div {
                            label ."block text-sm font-medium text-gray-700 mb-2" { "Product Image" }
                            div ."flex items-center space-x-4" {
                                (render_preview(form.preview()))
                                label ."flex-1" {
                                    input type="file" name="image" accept="image/*" class="hidden"
                                          "hx-post"="/htmx/products/form/image" "hx-encoding"="multipart/form-data"
                                          "hx-trigger"="change" "hx-target"="#image-preview" "hx-swap"="outerHTML";
                                    div ."bg-blue-500 hover:bg-blue-600 text-white py-2 px-4 rounded-lg cursor-pointer text-center" {
                                        "Choose Image"
                                    }
                                }
                            }
                        }
                        div {
                            label for="name" ."block text-sm font-medium text-gray-700 mb-1" { "Product Name *" }
                            input type="text" id="name" name="name" value=(fields.name) required
                                  placeholder="Enter product name"
                                  "hx-post"=(field_sync) "hx-trigger"=(field_trigger)
                                  "hx-target"="#form-actions" "hx-swap"="outerHTML"
                                  class="w-full px-3 py-2 border border-gray-300 rounded-lg";
                        }
                        div {
                            label for="description" ."block text-sm font-medium text-gray-700 mb-1" { "Description *" }
                            textarea id="description" name="description" rows="3" required
                                     placeholder="Enter product description"
                                     "hx-post"=(field_sync) "hx-trigger"=(field_trigger)
                                     "hx-target"="#form-actions" "hx-swap"="outerHTML"
                                     class="w-full px-3 py-2 border border-gray-300 rounded-lg" {
                                (fields.description)
                            }
                        }
                        div ."grid grid-cols-2 gap-4" {
                            div {
                                label for="price" ."block text-sm font-medium text-gray-700 mb-1" { "Price *" }
                                input type="number" id="price" name="price" value=(fields.price) min="0" step="0.01" required
                                      placeholder="0.00"
                                      "hx-post"=(field_sync) "hx-trigger"=(field_trigger)
                                      "hx-target"="#form-actions" "hx-swap"="outerHTML"
                                      class="w-full px-3 py-2 border border-gray-300 rounded-lg";
                            }
                            div {
                                label for="stock" ."block text-sm font-medium text-gray-700 mb-1" { "Stock *" }
                                input type="number" id="stock" name="stock" value=(fields.stock) min="0" required
                                      placeholder="0"
                                      "hx-post"=(field_sync) "hx-trigger"=(field_trigger)
                                      "hx-target"="#form-actions" "hx-swap"="outerHTML"
                                      class="w-full px-3 py-2 border border-gray-300 rounded-lg";
                            }
                        }
                        (render_form_actions(form.is_edit(), form.can_submit(), busy))
                    }
                }
            }
        }
    }
}

// src/controller.rs

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use crate::form::{FormError, FormFields, NumericPolicy, PreviewSource, ProductForm};
use crate::list_view::{Confirmation, ListState};
use crate::models::{ImageUpload, Product, ProductId};
use crate::previews::PreviewStore;
use crate::product_service::ProductService;

pub const LOAD_FAILED_MESSAGE: &str = "Error loading products";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Jednorazowy komunikat dla użytkownika (odpowiednik `alert`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }
}

#[derive(Debug, Default)]
struct PageState {
    list: ListState,
    form: Option<ProductForm>,
    editing: Option<ProductId>,
    // Rośnie przy każdym otwarciu i zamknięciu edytora
    form_epoch: u64,
    busy: bool,
    notice: Option<Notice>,
}

impl PageState {
    fn close_form(&mut self, previews: &PreviewStore) {
        if let Some(form) = self.form.take() {
            form.close(previews);
        }
        self.editing = None;
        self.form_epoch += 1;
    }

    fn open_form(
        &mut self,
        form: ProductForm,
        editing: Option<ProductId>,
        previews: &PreviewStore,
    ) {
        self.close_form(previews);
        self.form = Some(form);
        self.editing = editing;
    }
}

/// Kopia stanu strony przekazywana do renderowania.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSnapshot {
    pub list: ListState,
    pub form: Option<ProductForm>,
    pub busy: bool,
    pub notice: Option<Notice>,
}

impl PageSnapshot {
    pub fn can_submit(&self) -> bool {
        !self.busy && self.form.as_ref().is_some_and(ProductForm::can_submit)
    }
}

/// Stan przycisków formularza, odczytywany bez zużywania komunikatu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormStatus {
    pub is_edit: bool,
    pub can_submit: bool,
    pub busy: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Saved(Product),
    Failed,
    Rejected(FormError),
    Busy,
    NoForm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Declined,
    Failed,
}

fn lock_state(state: &Mutex<PageState>) -> MutexGuard<'_, PageState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Flaga zajętości ustawiana na czas tworzenia/aktualizacji; zdejmowana w `Drop`,
/// więc również przy błędzie.
struct BusyGuard<'a> {
    state: &'a Mutex<PageState>,
}

impl<'a> BusyGuard<'a> {
    fn try_acquire(state: &'a Mutex<PageState>) -> Option<Self> {
        let mut guard = lock_state(state);
        if guard.busy {
            return None;
        }
        guard.busy = true;
        Some(BusyGuard { state })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        lock_state(self.state).busy = false;
    }
}

/// Kontroler strony produktów: właściciel kolekcji, stanu formularza
/// i sekwencji "zmiana, potem pełne odświeżenie".
pub struct PageController {
    service: Arc<dyn ProductService>,
    previews: PreviewStore,
    policy: NumericPolicy,
    // Blokada nigdy nie jest trzymana przez `.await`
    state: Mutex<PageState>,
}

impl PageController {
    pub fn new(service: Arc<dyn ProductService>, policy: NumericPolicy) -> Self {
        PageController {
            service,
            previews: PreviewStore::new(),
            policy,
            state: Mutex::new(PageState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PageState> {
        lock_state(&self.state)
    }

    /// Aktywacja widoku (pełne załadowanie strony): szkic i komunikat przepadają,
    /// lista wraca do stanu ładowania, pobranie wykona `refresh`.
    pub fn activate(&self) {
        let mut state = self.lock();
        state.close_form(&self.previews);
        state.notice = None;
        state.list = ListState::Loading;
    }

    /// Pobiera całą kolekcję i zastępuje nią stan. Jedyny mechanizm synchronizacji z API.
    pub async fn refresh(&self) -> bool {
        self.lock().list = ListState::Loading;

        match self.service.list_products().await {
            Ok(products) => {
                tracing::debug!("Odświeżono listę: {} produktów", products.len());
                self.lock().list = ListState::Loaded(products);
                true
            }
            Err(err) => {
                tracing::error!("Error loading products: {:?}", err);
                self.lock().list = ListState::Failed(LOAD_FAILED_MESSAGE.to_string());
                false
            }
        }
    }

    pub fn open_create(&self) {
        self.lock().open_form(ProductForm::open(None), None, &self.previews);
    }

    /// Otwiera edytor dla produktu z kolekcji; gdy go tam nie ma, pobiera go z API.
    pub async fn open_edit(&self, id: &str) -> bool {
        let cached = self.lock().list.find(id).cloned();
        let product = match cached {
            Some(product) => product,
            None => match self.service.get_product(id).await {
                Ok(product) => product,
                Err(err) => {
                    tracing::error!("Error loading product {}: {:?}", id, err);
                    self.lock().notice = Some(Notice::error("Error loading product"));
                    return false;
                }
            },
        };

        let editing = Some(product.id.clone());
        self.lock().open_form(ProductForm::open(Some(product)), editing, &self.previews);
        true
    }

    /// Zapisuje surowe wartości pól; zwraca, czy formularz można wysłać.
    pub fn update_fields(&self, fields: FormFields) -> bool {
        let mut state = self.lock();
        let busy = state.busy;
        match state.form.as_mut() {
            Some(form) => {
                form.set_fields(fields);
                !busy && form.can_submit()
            }
            None => false,
        }
    }

    pub fn form_status(&self) -> Option<FormStatus> {
        let state = self.lock();
        let form = state.form.as_ref()?;
        Some(FormStatus {
            is_edit: form.is_edit(),
            can_submit: !state.busy && form.can_submit(),
            busy: state.busy,
        })
    }

    pub fn select_image(&self, upload: ImageUpload) -> Option<PreviewSource> {
        let mut state = self.lock();
        let form = state.form.as_mut()?;
        Some(form.select_image(upload, &self.previews))
    }

    pub fn cancel_form(&self) {
        self.lock().close_form(&self.previews);
    }

    /// Wysyła szkic: utworzenie lub aktualizacja zależnie od trybu otwarcia,
    /// potem pełne odświeżenie listy i zamknięcie formularza.
    pub async fn submit_form(&self) -> SubmitOutcome {
        let Some(_busy) = BusyGuard::try_acquire(&self.state) else {
            tracing::debug!("Formularz jest już wysyłany, pomijam");
            return SubmitOutcome::Busy;
        };

        let (draft, target, epoch) = {
            let state = self.lock();
            let Some(form) = state.form.as_ref() else {
                return SubmitOutcome::NoForm;
            };
            match form.submit(self.policy) {
                Ok(draft) => (draft, state.editing.clone(), state.form_epoch),
                Err(err) => {
                    tracing::warn!("Formularz odrzucony: {}", err);
                    return SubmitOutcome::Rejected(err);
                }
            }
        };

        let (result, action) = match &target {
            Some(id) => (self.service.update_product(id, &draft).await, "updating"),
            None => (self.service.create_product(&draft).await, "creating"),
        };

        match result {
            Ok(product) => {
                self.refresh().await;
                let mut state = self.lock();
                // Edytor otwarty w trakcie zapisu to już inny szkic
                if state.form_epoch == epoch {
                    state.close_form(&self.previews);
                } else {
                    tracing::debug!("Edytor zmienił się w trakcie zapisu, pozostawiam go otwartego");
                }
                SubmitOutcome::Saved(product)
            }
            Err(err) => {
                tracing::error!("Error {} product: {:?}", action, err);
                self.lock().notice = Some(Notice::error(format!("Error {} product", action)));
                SubmitOutcome::Failed
            }
        }
    }

    /// Usuwa produkt po potwierdzeniu. Bez flagi zajętości: równoległe usunięcia
    /// ścigają się, a uzgadnia je dopiero pełne odświeżenie.
    pub async fn delete_product(&self, id: &str, confirmation: Confirmation) -> DeleteOutcome {
        if confirmation == Confirmation::Declined {
            tracing::debug!("Usunięcie produktu {} anulowane przez użytkownika", id);
            return DeleteOutcome::Declined;
        }

        match self.service.delete_product(id).await {
            Ok(()) => {
                self.refresh().await;
                self.lock().notice = Some(Notice::success("Product deleted"));
                DeleteOutcome::Deleted
            }
            Err(err) => {
                tracing::error!("Error deleting product {}: {:?}", id, err);
                self.lock().notice = Some(Notice::error("Error deleting product"));
                DeleteOutcome::Failed
            }
        }
    }

    /// Zwraca kopię stanu i zużywa oczekujący komunikat.
    pub fn snapshot(&self) -> PageSnapshot {
        let mut state = self.lock();
        PageSnapshot {
            list: state.list.clone(),
            form: state.form.clone(),
            busy: state.busy,
            notice: state.notice.take(),
        }
    }

    pub fn preview(&self, id: &Uuid) -> Option<ImageUpload> {
        self.previews.get(id)
    }
}

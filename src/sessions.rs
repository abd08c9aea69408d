// src/sessions.rs

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::controller::PageController;
use crate::form::NumericPolicy;
use crate::product_service::ProductService;

pub const SESSION_COOKIE: &str = "catalog_session";
pub const DEFAULT_SESSION_IDLE: Duration = Duration::from_secs(2 * 60 * 60);

/// Strona produktów przypisana do jednej przeglądarki.
#[derive(Clone)]
pub struct PageSession {
    pub id: Uuid,
    pub page: Arc<PageController>,
    pub is_new: bool,
}

struct SessionEntry {
    page: Arc<PageController>,
    last_seen: Instant,
}

/// Rejestr sesji: każdy odwiedzający ma własny szkic, komunikaty i podglądy.
/// Nieużywane sesje są usuwane po `idle_ttl`.
pub struct PageSessions {
    service: Arc<dyn ProductService>,
    policy: NumericPolicy,
    idle_ttl: Duration,
    entries: Mutex<HashMap<Uuid, SessionEntry>>,
}

impl PageSessions {
    pub fn new(service: Arc<dyn ProductService>, policy: NumericPolicy, idle_ttl: Duration) -> Self {
        PageSessions {
            service,
            policy,
            idle_ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<Uuid, SessionEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Zwraca stronę dla podanego identyfikatora albo zakłada nową sesję,
    /// gdy identyfikatora brak lub sesja wygasła.
    pub fn resolve(&self, requested: Option<Uuid>) -> PageSession {
        let mut entries = self.entries();

        let idle_ttl = self.idle_ttl;
        entries.retain(|id, entry| {
            let alive = entry.last_seen.elapsed() < idle_ttl;
            if !alive {
                tracing::debug!("Wygasła sesja panelu {}", id);
            }
            alive
        });

        if let Some(id) = requested {
            if let Some(entry) = entries.get_mut(&id) {
                entry.last_seen = Instant::now();
                return PageSession {
                    id,
                    page: entry.page.clone(),
                    is_new: false,
                };
            }
        }

        let id = Uuid::new_v4();
        let page = Arc::new(PageController::new(self.service.clone(), self.policy));
        entries.insert(
            id,
            SessionEntry {
                page: page.clone(),
                last_seen: Instant::now(),
            },
        );
        tracing::info!("Nowa sesja panelu {} (aktywnych: {})", id, entries.len());

        PageSession {
            id,
            page,
            is_new: true,
        }
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

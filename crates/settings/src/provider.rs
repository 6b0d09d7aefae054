//! Localization provider chain.
//!
//! A single [`LocalizationProvider`] owns the string tables and the current
//! language. Windows talk to it through a [`FormLocalization`], a bridge that
//! relays change notifications only while its window is open, so closed
//! windows stop receiving updates and can be dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};

use once_cell::sync::Lazy;

use crate::localization::{
    LocaleSummary, LocalizationError, LocalizationManager, LocalizationParams,
};

/// Receives a notification whenever the UI language changes.
pub trait LocalizationListener: Send + Sync {
    fn localization_changed(&self);
}

impl<F> LocalizationListener for F
where
    F: Fn() + Send + Sync,
{
    fn localization_changed(&self) {
        self()
    }
}

/// Handle returned when registering a listener; used to unregister it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type SharedListener = Arc<dyn LocalizationListener>;

/// Ordered list of listeners.
#[derive(Default)]
pub struct ListenerRegistry {
    listeners: Mutex<Vec<(ListenerId, SharedListener)>>,
    next_id: AtomicU64,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener`. Registering the same listener twice returns the
    /// id of the first registration.
    pub fn add(&self, listener: SharedListener) -> ListenerId {
        let mut listeners = lock(&self.listeners);
        if let Some((id, _)) = listeners
            .iter()
            .find(|(_, existing)| same_listener(existing, &listener))
        {
            return *id;
        }
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        listeners.push((id, listener));
        id
    }

    pub fn remove(&self, id: ListenerId) -> bool {
        let mut listeners = lock(&self.listeners);
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub fn len(&self) -> usize {
        lock(&self.listeners).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Notifies every listener registered when the call starts. Listeners may
    /// add or remove registrations while being notified.
    pub fn fire(&self) {
        let snapshot: Vec<SharedListener> = lock(&self.listeners)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in snapshot {
            listener.localization_changed();
        }
    }
}

fn same_listener(a: &SharedListener, b: &SharedListener) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Source of translated strings that announces language changes.
pub trait Localize: Send + Sync {
    fn add_listener(&self, listener: SharedListener) -> ListenerId;
    fn remove_listener(&self, id: ListenerId) -> bool;
    fn text_with_params(&self, key: &str, params: &LocalizationParams<'_>) -> String;
    fn language(&self) -> String;

    fn text(&self, key: &str) -> String {
        self.text_with_params(key, &LocalizationParams::empty())
    }
}

static GLOBAL: Lazy<Arc<LocalizationProvider>> =
    Lazy::new(|| Arc::new(LocalizationProvider::new(LocalizationManager::builtin())));

/// Owns the string tables and the current language.
pub struct LocalizationProvider {
    tables: RwLock<LocalizationManager>,
    listeners: ListenerRegistry,
}

impl LocalizationProvider {
    pub fn new(tables: LocalizationManager) -> Self {
        Self {
            tables: RwLock::new(tables),
            listeners: ListenerRegistry::new(),
        }
    }

    /// The process-wide provider, starting in English.
    pub fn global() -> Arc<LocalizationProvider> {
        Arc::clone(&GLOBAL)
    }

    /// Switches the language and notifies listeners.
    pub fn set_language(&self, code: &str) -> Result<(), LocalizationError> {
        self.tables
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set_active(code)?;
        tracing::info!(language = code, "UI language changed");
        self.listeners.fire();
        Ok(())
    }

    /// Replaces the string tables, keeping the current language when the new
    /// tables have it, and notifies listeners.
    pub fn replace_tables(&self, mut tables: LocalizationManager) {
        {
            let mut current = self.tables.write().unwrap_or_else(PoisonError::into_inner);
            let language = current.active_code().to_string();
            if tables.has_locale(&language) {
                let _ = tables.set_active(&language);
            }
            *current = tables;
        }
        self.listeners.fire();
    }

    pub fn languages(&self) -> Vec<LocaleSummary> {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .locale_summaries()
    }

    /// Notifies listeners without changing anything.
    pub fn fire(&self) {
        self.listeners.fire();
    }
}

impl Localize for LocalizationProvider {
    fn add_listener(&self, listener: SharedListener) -> ListenerId {
        self.listeners.add(listener)
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    fn text_with_params(&self, key: &str, params: &LocalizationParams<'_>) -> String {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .text_with_params(key, params)
            .into_owned()
    }

    fn language(&self) -> String {
        self.tables
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .active_code()
            .to_string()
    }
}

/// Decorator over another provider. While connected, changes announced by
/// the parent are re-announced to this bridge's own listeners.
pub struct LocalizationBridge {
    parent: Arc<dyn Localize>,
    listeners: Arc<ListenerRegistry>,
    relay: Mutex<Option<ListenerId>>,
}

impl LocalizationBridge {
    pub fn new(parent: Arc<dyn Localize>) -> Self {
        Self {
            parent,
            listeners: Arc::new(ListenerRegistry::new()),
            relay: Mutex::new(None),
        }
    }

    /// Starts relaying parent notifications. Connecting twice is a no-op.
    pub fn connect(&self) {
        let mut relay = lock(&self.relay);
        if relay.is_some() {
            return;
        }
        let listeners: Weak<ListenerRegistry> = Arc::downgrade(&self.listeners);
        let id = self.parent.add_listener(Arc::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                listeners.fire();
            }
        }));
        *relay = Some(id);
    }

    /// Stops relaying. Listeners stay registered on the bridge.
    pub fn disconnect(&self) {
        if let Some(id) = lock(&self.relay).take() {
            self.parent.remove_listener(id);
        }
    }

    pub fn is_connected(&self) -> bool {
        lock(&self.relay).is_some()
    }

    /// Notifies this bridge's listeners directly.
    pub fn fire(&self) {
        self.listeners.fire();
    }
}

impl Drop for LocalizationBridge {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl Localize for LocalizationBridge {
    fn add_listener(&self, listener: SharedListener) -> ListenerId {
        self.listeners.add(listener)
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    fn text_with_params(&self, key: &str, params: &LocalizationParams<'_>) -> String {
        self.parent.text_with_params(key, params)
    }

    fn language(&self) -> String {
        self.parent.language()
    }
}

/// Bridge whose connection follows a window: connected when the window
/// opens, disconnected when it closes.
pub struct FormLocalization {
    bridge: LocalizationBridge,
}

impl FormLocalization {
    pub fn new(parent: Arc<dyn Localize>) -> Self {
        Self {
            bridge: LocalizationBridge::new(parent),
        }
    }

    pub fn window_opened(&self) {
        tracing::debug!("window opened, connecting localization bridge");
        self.bridge.connect();
    }

    pub fn window_closed(&self) {
        tracing::debug!("window closed, disconnecting localization bridge");
        self.bridge.disconnect();
    }

    pub fn is_connected(&self) -> bool {
        self.bridge.is_connected()
    }

    pub fn fire(&self) {
        self.bridge.fire();
    }
}

impl Localize for FormLocalization {
    fn add_listener(&self, listener: SharedListener) -> ListenerId {
        self.bridge.add_listener(listener)
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        self.bridge.remove_listener(id)
    }

    fn text_with_params(&self, key: &str, params: &LocalizationParams<'_>) -> String {
        self.bridge.text_with_params(key, params)
    }

    fn language(&self) -> String {
        self.bridge.language()
    }
}

/// A label bound to a string key; its text is refreshed on every language
/// change. Unregisters itself when dropped.
pub struct LocalizedLabel {
    key: String,
    text: Arc<RwLock<String>>,
    provider: Arc<dyn Localize>,
    listener: ListenerId,
}

impl LocalizedLabel {
    pub fn new(key: impl Into<String>, provider: Arc<dyn Localize>) -> Self {
        let key = key.into();
        let text = Arc::new(RwLock::new(provider.text(&key)));

        let weak_text = Arc::downgrade(&text);
        let weak_provider = Arc::downgrade(&provider);
        let listener_key = key.clone();
        let listener = provider.add_listener(Arc::new(move || {
            if let (Some(text), Some(provider)) = (weak_text.upgrade(), weak_provider.upgrade()) {
                let translated = provider.text(&listener_key);
                *text.write().unwrap_or_else(PoisonError::into_inner) = translated;
            }
        }));

        Self {
            key,
            text,
            provider,
            listener,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn text(&self) -> String {
        self.text
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Drop for LocalizedLabel {
    fn drop(&mut self) {
        self.provider.remove_listener(self.listener);
    }
}

impl std::fmt::Debug for LocalizedLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalizedLabel")
            .field("key", &self.key)
            .field("text", &self.text())
            .finish()
    }
}

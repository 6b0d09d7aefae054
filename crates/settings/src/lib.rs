pub mod localization;
pub mod preferences;
pub mod provider;

pub use localization::{
    LocaleSummary, LocalizationError, LocalizationManager, LocalizationParams, FALLBACK_LOCALE,
};
pub use preferences::{
    Preferences, PreferencesError, PreferencesStore, UiPreferences, WindowPreferences,
    DEFAULT_PREFERENCES_PATH,
};
pub use provider::{
    FormLocalization, ListenerId, ListenerRegistry, LocalizationBridge, LocalizationListener,
    LocalizationProvider, Localize, LocalizedLabel,
};

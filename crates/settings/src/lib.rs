pub mod config;
pub mod language;
pub mod localization;
pub mod preferences;
pub mod storage;

pub use config::{ConfigError, PageConfig};
pub use language::{LanguageCode, LanguageParseError};
pub use localization::{CatalogStats, LocalizationError, Lookup, TextCatalog};
pub use preferences::{
    LanguageChanged, LanguagePreference, PreferenceOutcome, PreferencesError, SubscriptionId,
};
pub use storage::{
    FileStorage, KeyValueStorage, MemoryStorage, StorageError, BILL_LANGUAGE_KEY,
    SYSTEM_LANGUAGE_KEY, USERNAME_KEY,
};

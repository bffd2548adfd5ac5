use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::language::LanguageCode;
use crate::storage::{KeyValueStorage, StorageError};

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("failed to persist language preference '{key}': {source}")]
    Persist {
        key: String,
        #[source]
        source: StorageError,
    },
}

/// Broadcast after the active language actually changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageChanged {
    pub previous: LanguageCode,
    pub current: LanguageCode,
}

/// 寫入偏好的結果。 / Result of a preference write; rejected input is an outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceOutcome {
    Stored {
        previous: LanguageCode,
        current: LanguageCode,
    },
    Unchanged(LanguageCode),
    Ignored {
        rejected: String,
    },
}

impl PreferenceOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self, PreferenceOutcome::Stored { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&LanguageChanged)>;

/// 語言偏好儲存，明確注入給各個使用者。 / Language preference passed explicitly to every consumer.
pub struct LanguagePreference<S: KeyValueStorage> {
    storage: S,
    key: String,
    default: LanguageCode,
    current: LanguageCode,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl<S: KeyValueStorage> fmt::Debug for LanguagePreference<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguagePreference")
            .field("key", &self.key)
            .field("default", &self.default)
            .field("current", &self.current)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<S: KeyValueStorage> LanguagePreference<S> {
    /// 讀取既有偏好；無效或缺少時使用預設值。 / Reads the stored preference, falling back to the default when absent or invalid.
    pub fn load(storage: S, key: impl Into<String>, default: LanguageCode) -> Self {
        let key = key.into();
        let saved = storage.get(&key);
        let current = match saved.as_deref().map(str::parse::<LanguageCode>) {
            Some(Ok(code)) => {
                debug!(key = %key, language = %code, "loaded language preference");
                code
            }
            Some(Err(err)) => {
                debug!(key = %key, rejected = %err.input, default = %default, "stored language invalid, using default");
                default
            }
            None => {
                debug!(key = %key, default = %default, "no saved language, using default");
                default
            }
        };
        Self {
            storage,
            key,
            default,
            current,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Overwrites whatever is stored with `default`, the way the bill page pins English on every load.
    pub fn forced(
        mut storage: S,
        key: impl Into<String>,
        default: LanguageCode,
    ) -> Result<Self, PreferencesError> {
        let key = key.into();
        storage
            .set(&key, default.code())
            .map_err(|source| PreferencesError::Persist {
                key: key.clone(),
                source,
            })?;
        Ok(Self::load(storage, key, default))
    }

    pub fn get(&self) -> LanguageCode {
        self.current
    }

    pub fn default_language(&self) -> LanguageCode {
        self.default
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// 設定語言並持久化。 / Persists `code` and notifies subscribers when it differs.
    pub fn set(&mut self, code: LanguageCode) -> Result<PreferenceOutcome, PreferencesError> {
        self.storage
            .set(&self.key, code.code())
            .map_err(|source| PreferencesError::Persist {
                key: self.key.clone(),
                source,
            })?;
        if code == self.current {
            return Ok(PreferenceOutcome::Unchanged(code));
        }
        let event = LanguageChanged {
            previous: self.current,
            current: code,
        };
        self.current = code;
        debug!(from = %event.previous, to = %event.current, "language preference stored");
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
        Ok(PreferenceOutcome::Stored {
            previous: event.previous,
            current: event.current,
        })
    }

    /// 解析原始字串；不支援的代碼回傳 `Ignored`。 / Parses raw input; unsupported codes are reported as `Ignored`.
    pub fn set_raw(&mut self, raw: &str) -> Result<PreferenceOutcome, PreferencesError> {
        match raw.parse::<LanguageCode>() {
            Ok(code) => self.set(code),
            Err(err) => {
                debug!(rejected = %err.input, "ignoring unsupported language code");
                Ok(PreferenceOutcome::Ignored {
                    rejected: err.input,
                })
            }
        }
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&LanguageChanged) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

use tracing::{debug, info};
use voltbill_dom::Document;
use voltbill_settings::{
    KeyValueStorage, LanguageChanged, LanguageCode, LanguagePreference, PreferenceOutcome,
    PreferencesError, SubscriptionId, TextCatalog,
};

use crate::applicator::{ApplyReport, TextApplicator};
use crate::bindings::BindingRegistry;

/// 切換語言的結果。 / Result of a language switch request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchOutcome {
    Switched {
        from: LanguageCode,
        to: LanguageCode,
        report: ApplyReport,
    },
    Unchanged(LanguageCode),
    /// The request named no supported language; nothing was stored or applied.
    Rejected {
        input: String,
    },
}

impl SwitchOutcome {
    pub fn is_switched(&self) -> bool {
        matches!(self, SwitchOutcome::Switched { .. })
    }
}

/// 語言切換器：偏好、綁定與字串表的組合。 / Owns the preference, bindings and catalog for one page.
#[derive(Debug)]
pub struct LanguageSwitcher<S: KeyValueStorage> {
    preference: LanguagePreference<S>,
    registry: BindingRegistry,
    catalog: TextCatalog,
}

impl<S: KeyValueStorage> LanguageSwitcher<S> {
    /// Scans `doc` once and applies the preferred language.
    pub fn init(
        doc: &mut Document,
        preference: LanguagePreference<S>,
        catalog: TextCatalog,
    ) -> (Self, ApplyReport) {
        let registry = BindingRegistry::scan(doc, &catalog);
        let switcher = Self {
            preference,
            registry,
            catalog,
        };
        let report = switcher.apply(doc);
        (switcher, report)
    }

    pub fn current(&self) -> LanguageCode {
        self.preference.get()
    }

    pub fn preference(&self) -> &LanguagePreference<S> {
        &self.preference
    }

    pub fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &TextCatalog {
        &self.catalog
    }

    pub fn into_preference(self) -> LanguagePreference<S> {
        self.preference
    }

    /// Re-applies the current language.
    pub fn apply(&self, doc: &mut Document) -> ApplyReport {
        TextApplicator::new(&self.registry, &self.catalog).apply(doc, self.preference.get())
    }

    /// 依原始字串切換，如語言選單的值。 / Switches from a raw code such as a `<select>` value.
    pub fn switch(&mut self, doc: &mut Document, raw: &str) -> Result<SwitchOutcome, PreferencesError> {
        match raw.parse::<LanguageCode>() {
            Ok(code) => self.select(doc, code),
            Err(err) => {
                debug!(rejected = %err.input, "ignoring unsupported language");
                Ok(SwitchOutcome::Rejected { input: err.input })
            }
        }
    }

    pub fn select(&mut self, doc: &mut Document, code: LanguageCode) -> Result<SwitchOutcome, PreferencesError> {
        match self.preference.set(code)? {
            PreferenceOutcome::Stored { previous, current } => {
                info!(from = %previous, to = %current, "switching language");
                let report = self.apply(doc);
                Ok(SwitchOutcome::Switched {
                    from: previous,
                    to: current,
                    report,
                })
            }
            PreferenceOutcome::Unchanged(code) => Ok(SwitchOutcome::Unchanged(code)),
            PreferenceOutcome::Ignored { rejected } => Ok(SwitchOutcome::Rejected { input: rejected }),
        }
    }

    /// The language toggle button: flips between the two codes.
    pub fn toggle(&mut self, doc: &mut Document) -> Result<SwitchOutcome, PreferencesError> {
        let next = self.current().other();
        self.select(doc, next)
    }

    /// Listeners run after the new language is stored, before it is applied.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&LanguageChanged) + 'static,
    {
        self.preference.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.preference.unsubscribe(id)
    }

    pub fn rescan(&mut self, doc: &Document) {
        self.registry.rescan(doc, &self.catalog);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use voltbill_settings::{MemoryStorage, SYSTEM_LANGUAGE_KEY};

    const PAGE: &str = r#"<html><head><title data-zh="仪表盘" data-en="Dashboard">Dashboard</title></head><body>
<a class="nav-link" href="dashboard.html" data-zh="仪表盘" data-en="Dashboard">Dashboard</a>
</body></html>"#;

    fn switcher(stored: Option<&str>) -> (Document, LanguageSwitcher<MemoryStorage>) {
        let mut storage = MemoryStorage::new();
        if let Some(stored) = stored {
            storage = storage.with_entry(SYSTEM_LANGUAGE_KEY, stored);
        }
        let preference = LanguagePreference::load(storage, SYSTEM_LANGUAGE_KEY, LanguageCode::En);
        let mut doc = Document::parse(PAGE).unwrap();
        let (switcher, _) = LanguageSwitcher::init(&mut doc, preference, TextCatalog::builtin());
        (doc, switcher)
    }

    #[test]
    fn init_applies_saved_language() {
        let (doc, switcher) = switcher(Some("zh"));
        assert_eq!(switcher.current(), LanguageCode::Zh);
        assert_eq!(doc.title().as_deref(), Some("仪表盘"));
    }

    #[test]
    fn rejected_input_changes_nothing() {
        let (mut doc, mut switcher) = switcher(Some("zh"));
        let outcome = switcher.switch(&mut doc, "fr").unwrap();
        assert_eq!(outcome, SwitchOutcome::Rejected { input: "fr".into() });
        assert_eq!(switcher.current(), LanguageCode::Zh);
        assert_eq!(
            switcher.preference().storage().get(SYSTEM_LANGUAGE_KEY).as_deref(),
            Some("zh")
        );
    }

    #[test]
    fn switch_broadcasts_and_persists() {
        let (mut doc, mut switcher) = switcher(None);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        switcher.subscribe(move |change| sink.borrow_mut().push(change.current));

        assert!(switcher.switch(&mut doc, "zh").unwrap().is_switched());
        assert_eq!(switcher.switch(&mut doc, "zh").unwrap(), SwitchOutcome::Unchanged(LanguageCode::Zh));
        assert!(switcher.toggle(&mut doc).unwrap().is_switched());

        assert_eq!(*seen.borrow(), vec![LanguageCode::Zh, LanguageCode::En]);
        assert_eq!(
            switcher.preference().storage().get(SYSTEM_LANGUAGE_KEY).as_deref(),
            Some("en")
        );
    }
}

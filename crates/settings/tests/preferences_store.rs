use std::fs;

use proptest::prelude::*;
use tempfile::tempdir;
use voltbill_settings::{
    FileStorage, KeyValueStorage, LanguageCode, LanguagePreference, MemoryStorage, PageConfig,
    PreferenceOutcome, SYSTEM_LANGUAGE_KEY,
};

#[test]
fn load_missing_file_returns_defaults() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("storage.json");

    let storage = FileStorage::load(&path).expect("load empty storage");
    let pref = LanguagePreference::load(storage, SYSTEM_LANGUAGE_KEY, LanguageCode::En);
    assert_eq!(pref.get(), LanguageCode::En);
    assert!(!path.exists(), "reading must not create the file");
}

#[test]
fn save_and_reload_roundtrip() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("storage.json");

    let storage = FileStorage::load(&path).expect("load");
    let mut pref = LanguagePreference::load(storage, SYSTEM_LANGUAGE_KEY, LanguageCode::En);
    let outcome = pref.set(LanguageCode::Zh).expect("save");
    assert_eq!(
        outcome,
        PreferenceOutcome::Stored {
            previous: LanguageCode::En,
            current: LanguageCode::Zh
        }
    );

    let reloaded = LanguagePreference::load(
        FileStorage::load(&path).expect("reload"),
        SYSTEM_LANGUAGE_KEY,
        LanguageCode::En,
    );
    assert_eq!(reloaded.get(), LanguageCode::Zh);
}

#[test]
fn invalid_code_leaves_stored_value_unchanged() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("storage.json");

    let mut pref = LanguagePreference::load(
        FileStorage::load(&path).expect("load"),
        SYSTEM_LANGUAGE_KEY,
        LanguageCode::En,
    );
    pref.set(LanguageCode::Zh).expect("store zh");
    let outcome = pref.set_raw("fr").expect("ignored input is not an error");
    assert_eq!(
        outcome,
        PreferenceOutcome::Ignored {
            rejected: "fr".to_string()
        }
    );
    assert_eq!(pref.get(), LanguageCode::Zh);

    let on_disk = FileStorage::load(&path).expect("reload");
    assert_eq!(on_disk.get(SYSTEM_LANGUAGE_KEY).as_deref(), Some("zh"));
}

#[test]
fn legacy_garbage_value_is_ignored_on_load() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("storage.json");
    fs::write(&path, r#"{ "system-lang": "zh-TW" }"#).expect("write legacy state");

    let pref = LanguagePreference::load(
        FileStorage::load(&path).expect("load"),
        SYSTEM_LANGUAGE_KEY,
        LanguageCode::En,
    );
    assert_eq!(
        pref.get(),
        LanguageCode::En,
        "unsupported stored codes should fall back to the default"
    );
}

#[test]
fn page_config_defaults_and_sanitize() {
    let temp = tempdir().expect("tempdir");
    let missing = PageConfig::load(temp.path().join("absent.json")).expect("defaults");
    assert_eq!(missing, PageConfig::default());
    assert_eq!(missing.language_key, "system-lang");

    let path = temp.path().join("page.json");
    fs::write(
        &path,
        r#"{ "language_key": " ", "default_language": "zh", "toast_duration_ms": 0, "notification_duration_ms": 0 }"#,
    )
    .expect("write config");
    let config = PageConfig::load(&path).expect("load config");
    assert_eq!(config.language_key, "system-lang");
    assert_eq!(config.default_language, LanguageCode::Zh);
    assert_eq!(config.toast_duration_ms, 2_000);
    assert_eq!(config.notification_duration_ms, 0);
    assert_eq!(config.battery_interval_ms, 300_000);
}

proptest! {
    #[test]
    fn arbitrary_input_never_corrupts_preference(inputs in proptest::collection::vec("[a-z]{0,3}", 1..12)) {
        let mut pref = LanguagePreference::load(MemoryStorage::new(), SYSTEM_LANGUAGE_KEY, LanguageCode::En);
        for input in &inputs {
            let before = pref.get();
            let outcome = pref.set_raw(input).unwrap();
            match input.parse::<LanguageCode>() {
                Ok(code) => prop_assert_eq!(pref.get(), code),
                Err(_) => {
                    prop_assert!(
                        matches!(outcome, PreferenceOutcome::Ignored { .. }),
                        "expected Ignored for {:?}, got {:?}",
                        input,
                        outcome
                    );
                    prop_assert_eq!(pref.get(), before);
                }
            }
            let stored = pref.storage().get(SYSTEM_LANGUAGE_KEY);
            if let Some(stored) = stored {
                prop_assert!(stored.parse::<LanguageCode>().is_ok());
            }
        }
    }
}

//! Integration tests for language loading, selection and reloading.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use lexis::loader::{self, Loader, MapLoader};
use lexis::{
    Entry, EntryOptions, LanguageContext, LanguageManager, LoadError, LoaderError, RegisterError,
    Resolver, Shape, TranslateError, ValidationIssue,
};

fn constant_language(path: &str, value: &str) -> Arc<dyn Loader> {
    MapLoader::new([(path, value)]).into_shared()
}

fn two_languages(default: &str) -> (Arc<LanguageManager>, Entry) {
    let manager = LanguageManager::new(default);
    let entry = Entry::new(&manager, "test").unwrap();
    manager.load("0", [constant_language("test", "123")]).unwrap();
    manager.load("1", [constant_language("test", "456")]).unwrap();
    (manager, entry)
}

// =========================================================================
// Language Selection
// =========================================================================

#[test]
fn test_default_language_fallback() {
    let (_manager, entry) = two_languages("1");
    assert_eq!(entry.text(None, &Resolver::empty()).unwrap(), "456");
}

#[test]
fn test_context_language_override() {
    let (_manager, entry) = two_languages("1");
    let context = LanguageContext::new("0");
    assert_eq!(entry.text(Some(&context), &Resolver::empty()).unwrap(), "123");
}

#[test]
fn test_context_without_language_uses_default() {
    struct Anonymous;
    impl lexis::Context for Anonymous {}

    let (manager, entry) = two_languages("0");
    assert_eq!(entry.text(Some(&Anonymous), &Resolver::empty()).unwrap(), "123");
    assert_eq!(manager.resolve_language(Some(&Anonymous)).unwrap(), "0");
}

#[test]
fn test_unknown_context_language() {
    let (_manager, entry) = two_languages("0");
    let context = LanguageContext::new("fr");
    let error = entry.get(Some(&context)).unwrap_err();
    assert_eq!(
        error,
        TranslateError::UnknownLanguage {
            language: "fr".into(),
            suggestions: vec![],
        }
    );
}

#[test]
fn test_unknown_language_suggestions() {
    let manager = LanguageManager::new("en");
    let entry = Entry::new(&manager, "test").unwrap();
    manager.load("en", [constant_language("test", "Hi")]).unwrap();
    manager.load("de", [constant_language("test", "Hallo")]).unwrap();

    let error = entry.get(Some(&LanguageContext::new("eng"))).unwrap_err();
    match &error {
        TranslateError::UnknownLanguage { suggestions, .. } => {
            assert_eq!(suggestions, &vec!["en".to_string()]);
        }
        other => panic!("expected UnknownLanguage, got {other:?}"),
    }
    assert!(error.to_string().contains("did you mean: en?"));
}

#[test]
fn test_default_language_checked_lazily() {
    let manager = LanguageManager::new("missing");
    let entry = Entry::new(&manager, "test").unwrap();
    manager.load("en", [constant_language("test", "Hi")]).unwrap();

    assert!(matches!(
        entry.get(None),
        Err(TranslateError::UnknownLanguage { language, .. }) if language == "missing"
    ));
    let context = LanguageContext::new("en");
    assert_eq!(entry.text(Some(&context), &Resolver::empty()).unwrap(), "Hi");
}

#[test]
fn test_missing_translation() {
    let manager = LanguageManager::new("en");
    let present = Entry::new(&manager, "present").unwrap();
    let absent = Entry::new(&manager, "absent").unwrap();
    manager.load("en", [constant_language("present", "here")]).unwrap();

    assert!(present.get(None).is_ok());
    assert_eq!(
        absent.get(None).unwrap_err(),
        TranslateError::MissingTranslation {
            language: "en".into(),
            path: "absent".into(),
        }
    );
}

#[test]
fn test_entry_registered_after_load_needs_reload() {
    let manager = LanguageManager::new("en");
    manager
        .load("en", [MapLoader::new([("late", "value")]).into_shared()])
        .unwrap();
    let late = Entry::new(&manager, "late").unwrap();

    assert!(matches!(
        late.get(None),
        Err(TranslateError::MissingTranslation { .. })
    ));
    manager.reload().unwrap();
    assert_eq!(late.text(None, &Resolver::empty()).unwrap(), "value");
}

// =========================================================================
// Registration
// =========================================================================

#[test]
fn test_duplicate_language() {
    let (manager, _entry) = two_languages("0");
    let error = manager.load("0", [constant_language("test", "x")]).unwrap_err();
    assert!(matches!(
        error,
        LoadError::Register(RegisterError::DuplicateLanguage { language }) if language == "0"
    ));
}

#[test]
fn test_empty_language_identifier() {
    let manager = LanguageManager::new("en");
    let error = manager.load("", Vec::<Arc<dyn Loader>>::new()).unwrap_err();
    assert!(matches!(error, LoadError::Register(RegisterError::EmptyIdentifier)));
}

#[test]
fn test_duplicate_path() {
    let manager = LanguageManager::new("en");
    Entry::new(&manager, "menu.title").unwrap();
    let error = Entry::register(
        &manager,
        "menu.title",
        EntryOptions::builder().shape(Shape::array()).build(),
    )
    .unwrap_err();
    assert_eq!(
        error,
        RegisterError::DuplicatePath {
            path: "menu.title".into()
        }
    );
}

#[test]
fn test_invalid_path() {
    let manager = LanguageManager::new("en");
    assert!(matches!(
        Entry::new(&manager, "menu..title"),
        Err(RegisterError::InvalidPath { .. })
    ));
    assert!(manager.paths().is_empty());
}

#[test]
fn test_failed_load_registers_nothing() {
    let manager = LanguageManager::new("en");
    Entry::new(&manager, "test").unwrap();
    let failing = loader::from_fn(|_| Err(LoaderError::Other("broken source".into())));
    let error = manager.load("en", [failing.into_shared()]).unwrap_err();

    assert!(matches!(&error, LoadError::Loader { language, .. } if language == "en"));
    assert!(manager.languages().is_empty());
    manager.load("en", [constant_language("test", "ok")]).unwrap();
}

// =========================================================================
// Reload
// =========================================================================

#[test]
fn test_reload_picks_up_new_values() {
    let manager = LanguageManager::new("en");
    let entry = Entry::new(&manager, "count").unwrap();
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    let counting = loader::from_fn(move |values| {
        let run = counter.fetch_add(1, Ordering::SeqCst) + 1;
        values.put("count", format!("run {run}"))?;
        Ok(())
    });
    manager.load("en", [counting.into_shared()]).unwrap();

    assert_eq!(entry.text(None, &Resolver::empty()).unwrap(), "run 1");
    manager.reload().unwrap();
    assert_eq!(entry.cache_len(), 0);
    assert_eq!(entry.text(None, &Resolver::empty()).unwrap(), "run 2");
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

#[test]
fn test_failed_reload_keeps_languages_and_caches() {
    let manager = LanguageManager::new("a");
    let entry = Entry::new(&manager, "test").unwrap();

    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    let changing = loader::from_fn(move |values| {
        let run = counter.fetch_add(1, Ordering::SeqCst) + 1;
        values.put("test", format!("a{run}"))?;
        Ok(())
    });
    let fail = Arc::new(AtomicBool::new(false));
    let should_fail = Arc::clone(&fail);
    let flaky = loader::from_fn(move |values| {
        if should_fail.load(Ordering::SeqCst) {
            return Err(LoaderError::Other("source unavailable".into()));
        }
        values.put("test", "b")?;
        Ok(())
    });
    manager.load("a", [changing.into_shared()]).unwrap();
    manager.load("b", [flaky.into_shared()]).unwrap();

    let a_before = entry.get(None).unwrap();
    let b_before = entry.get(Some(&LanguageContext::new("b"))).unwrap();
    assert_eq!(entry.cache_len(), 2);

    fail.store(true, Ordering::SeqCst);
    assert!(manager.reload().is_err());

    assert_eq!(entry.cache_len(), 2);
    assert!(Arc::ptr_eq(&entry.get(None).unwrap(), &a_before));
    assert!(Arc::ptr_eq(
        &entry.get(Some(&LanguageContext::new("b"))).unwrap(),
        &b_before
    ));
    assert_eq!(entry.text(None, &Resolver::empty()).unwrap(), "a1");

    fail.store(false, Ordering::SeqCst);
    manager.reload().unwrap();
    assert_eq!(entry.cache_len(), 0);
    assert_eq!(entry.text(None, &Resolver::empty()).unwrap(), "a3");
}

#[test]
fn test_reload_without_languages() {
    let manager = LanguageManager::new("en");
    manager.reload().unwrap();
    assert!(manager.languages().is_empty());
}

// =========================================================================
// Introspection and Validation
// =========================================================================

#[test]
fn test_introspection() {
    let (manager, _entry) = two_languages("1");
    Entry::new(&manager, "a.first").unwrap();
    assert_eq!(manager.languages(), vec!["0", "1"]);
    assert_eq!(manager.paths(), vec!["a.first", "test"]);
    assert_eq!(manager.default_language(), "1");
}

#[test]
fn test_validate_reports_missing_and_invalid() {
    let manager = LanguageManager::new("en");
    Entry::new(&manager, "greeting").unwrap();
    Entry::register(
        &manager,
        "days",
        EntryOptions::builder().shape(Shape::array()).build(),
    )
    .unwrap();
    manager
        .load(
            "en",
            [MapLoader::new([("greeting", "Hello")])
                .insert("days", ["Mon", "Tue"])
                .into_shared()],
        )
        .unwrap();
    manager
        .load("de", [MapLoader::new([("days", "Montag")]).into_shared()])
        .unwrap();

    assert_eq!(
        manager.validate(),
        vec![
            ValidationIssue::InvalidType {
                language: "de".into(),
                path: "days".into(),
                expected: "array".into(),
                found: "string".into(),
            },
            ValidationIssue::Missing {
                language: "de".into(),
                path: "greeting".into(),
            },
        ]
    );
}

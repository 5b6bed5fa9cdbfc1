//! Integration tests for the per-language translation cache.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use lexis::loader::{Loader, MapLoader};
use lexis::{Entry, EntryOptions, LanguageContext, LanguageManager, Placeholder, Resolver};

/// A resolver that counts how often each key is looked up.
fn counting_resolver(lookups: &Arc<Mutex<Vec<String>>>) -> Resolver {
    let lookups = Arc::clone(lookups);
    Resolver::from_fn(move |key| {
        lookups.lock().unwrap().push(key.to_string());
        (key == "local").then(|| Placeholder::constant("local", "L"))
    })
}

#[test]
fn test_translation_is_built_once_per_language() {
    let lookups = Arc::new(Mutex::new(Vec::new()));
    let manager = LanguageManager::new("en");
    let entry = Entry::register(
        &manager,
        "test",
        EntryOptions::builder()
            .resolver(counting_resolver(&lookups))
            .build(),
    )
    .unwrap();
    manager
        .load("en", [MapLoader::new([("test", "<local> <caller>")]).into_shared()])
        .unwrap();

    let caller = Resolver::constant("caller", "C");
    for _ in 0..3 {
        assert_eq!(entry.text(None, &caller).unwrap(), "L C");
    }
    assert_eq!(*lookups.lock().unwrap(), vec!["local", "caller"]);
}

#[test]
fn test_repeated_get_returns_same_translation() {
    let manager = LanguageManager::new("en");
    let entry = Entry::new(&manager, "test").unwrap();
    manager
        .load("en", [MapLoader::new([("test", "x")]).into_shared()])
        .unwrap();

    let first = entry.get(None).unwrap();
    let second = entry.get(None).unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(entry.cache_len(), 1);
}

#[test]
fn test_cache_is_per_language() {
    let manager = LanguageManager::new("en");
    let entry = Entry::new(&manager, "test").unwrap();
    manager
        .load("en", [MapLoader::new([("test", "Hello")]).into_shared()])
        .unwrap();
    manager
        .load("de", [MapLoader::new([("test", "Hallo")]).into_shared()])
        .unwrap();

    let english = entry.get(None).unwrap();
    let german = entry.get(Some(&LanguageContext::new("de"))).unwrap();
    assert!(!Arc::ptr_eq(&english, &german));
    assert_eq!(entry.cache_len(), 2);
}

#[test]
fn test_caller_resolver_is_consulted_every_evaluation() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let caller = Resolver::builder()
        .variable("tick", move || counter.fetch_add(1, Ordering::SeqCst).to_string())
        .build();

    let manager = LanguageManager::new("en");
    let entry = Entry::new(&manager, "test").unwrap();
    manager
        .load("en", [MapLoader::new([("test", "<tick>")]).into_shared()])
        .unwrap();

    assert_eq!(entry.text(None, &caller).unwrap(), "0");
    assert_eq!(entry.text(None, &caller).unwrap(), "1");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_reload_rebuilds_translation() {
    let lookups = Arc::new(Mutex::new(Vec::new()));
    let manager = LanguageManager::new("en");
    let entry = Entry::register(
        &manager,
        "test",
        EntryOptions::builder()
            .resolver(counting_resolver(&lookups))
            .build(),
    )
    .unwrap();
    manager
        .load("en", [MapLoader::new([("test", "<local>")]).into_shared()])
        .unwrap();

    let before = entry.get(None).unwrap();
    manager.reload().unwrap();
    let after = entry.get(None).unwrap();

    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(lookups.lock().unwrap().len(), 2);
}

#[test]
fn test_concurrent_readers_during_reload() {
    let manager = LanguageManager::new("en");
    let entry = Entry::new(&manager, "test").unwrap();
    manager
        .load("en", [MapLoader::new([("test", "stable")]).into_shared()])
        .unwrap();

    thread::scope(|scope| {
        for _ in 0..4 {
            let entry = entry.clone();
            scope.spawn(move || {
                for _ in 0..200 {
                    assert_eq!(entry.text(None, &Resolver::empty()).unwrap(), "stable");
                }
            });
        }
        for _ in 0..20 {
            manager.reload().unwrap();
        }
    });
}

extern crate satchel;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use satchel::errors::Error;
use satchel::prelude::*;

trait Audit: Send + Sync {
    fn sink(&self) -> &'static str;
}

struct ConsoleAudit;

impl Audit for ConsoleAudit {
    fn sink(&self) -> &'static str {
        "console"
    }
}

struct FileAudit;

impl Audit for FileAudit {
    fn sink(&self) -> &'static str {
        "file"
    }
}

struct Limits {
    max_entities: usize,
}

#[test]
fn singletons_are_reference_stable() {
    let mut container = Container::new();
    container
        .register::<dyn Audit>(Arc::new(ConsoleAudit))
        .unwrap();

    let first = container.resolve::<dyn Audit>().unwrap();
    let second = container.resolve::<dyn Audit>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.sink(), "console");
}

#[test]
fn concrete_capabilities_work_too() {
    let mut container = Container::new();
    container
        .register(Arc::new(Limits { max_entities: 4096 }))
        .unwrap();

    let limits = container.resolve::<Limits>().unwrap();
    assert_eq!(limits.max_entities, 4096);
}

#[test]
fn unnamed_resolve_rejects_ambiguity() {
    let mut container = Container::new();
    container
        .register_named::<dyn Audit>("console", Arc::new(ConsoleAudit))
        .unwrap();
    container
        .register_named::<dyn Audit>("file", Arc::new(FileAudit))
        .unwrap();

    match container.resolve::<dyn Audit>() {
        Err(Error::AmbiguousRegistration(_)) => {}
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }

    // Each name still resolves to its own registration.
    assert_eq!(
        container.resolve_named::<dyn Audit>("console").unwrap().sink(),
        "console"
    );
    assert_eq!(
        container.resolve_named::<dyn Audit>("file").unwrap().sink(),
        "file"
    );
}

#[test]
fn missing_registrations_never_default() {
    let container = Container::new();

    match container.resolve::<dyn Audit>() {
        Err(Error::UnresolvedCapability(_)) => {}
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }

    let mut container = Container::new();
    container
        .register_named::<dyn Audit>("console", Arc::new(ConsoleAudit))
        .unwrap();
    match container.resolve_named::<dyn Audit>("syslog") {
        Err(Error::UnresolvedCapability(_)) => {}
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}

#[test]
fn conflicting_registrations_fail_eagerly() {
    let mut container = Container::new();
    container
        .register_named::<dyn Audit>("console", Arc::new(ConsoleAudit))
        .unwrap();

    // Rejected at registration time, before anything resolves.
    match container.register_named::<dyn Audit>("console", Arc::new(FileAudit)) {
        Err(Error::DuplicateRegistration(_, Some(ref name))) => assert_eq!(name, "console"),
        other => panic!("unexpected result: {:?}", other),
    }

    container.register::<dyn Audit>(Arc::new(ConsoleAudit)).unwrap();
    match container.register::<dyn Audit>(Arc::new(FileAudit)) {
        Err(Error::DuplicateRegistration(_, None)) => {}
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn resolve_all_spans_every_name() {
    let mut container = Container::new();
    container.register::<dyn Audit>(Arc::new(ConsoleAudit)).unwrap();
    container
        .register_named::<dyn Audit>("console", Arc::new(ConsoleAudit))
        .unwrap();
    container
        .register_named::<dyn Audit>("file", Arc::new(FileAudit))
        .unwrap();

    assert_eq!(container.resolve_all::<dyn Audit>().count(), 3);
    assert_eq!(container.resolve_all::<Limits>().count(), 0);
}

#[test]
fn deferred_bindings_construct_once() {
    let built = Arc::new(AtomicUsize::new(0));
    let counter = built.clone();

    let mut container = Container::new();
    container
        .register_with::<dyn Audit, _>(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Arc::new(ConsoleAudit) as Arc<dyn Audit>
        })
        .unwrap();

    // Nothing runs until the first resolution.
    assert_eq!(built.load(Ordering::SeqCst), 0);

    let first = container.resolve::<dyn Audit>().unwrap();
    let second = container.resolve::<dyn Audit>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(built.load(Ordering::SeqCst), 1);
}

#[test]
fn contexts_are_isolated() {
    let mut first = Context::new();
    first
        .container_mut()
        .register::<dyn Audit>(Arc::new(ConsoleAudit))
        .unwrap();
    assert!(first.container().resolve::<dyn Audit>().is_ok());

    // A fresh context is the test-isolation story; nothing leaks across.
    let second = Context::new();
    assert!(second.container().resolve::<dyn Audit>().is_err());
}

#[test]
fn contexts_wire_loaders_into_libraries() {
    let mut store = MemoryLoader::new("asset", &["txt"]);
    store.insert("asset:motd.txt", "welcome back");

    let mut context = Context::new();
    context
        .container_mut()
        .register::<dyn ResourceLoader>(Arc::new(store))
        .unwrap();

    let mut library = context.build_library(FailurePolicy::Propagate).unwrap();
    assert_eq!(
        format!("{}", library.get_dyn("asset:motd.txt").unwrap()),
        "welcome back"
    );
}

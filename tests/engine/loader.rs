//! Integration tests for resource loading
//!
//! Tests handle caching, commits, reloads, and supersession.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use lette_engine::{CancelToken, FnLoader, LoaderConfig, LoaderSystem, ResourceHandle, Sprite};
use lette_foundation::{Error, Result};

use crate::settle;

fn immediate() -> LoaderConfig {
    LoaderConfig::default().with_reload_debounce(Duration::ZERO)
}

/// A loader that counts its calls and returns `src#n`.
fn counting(calls: Arc<AtomicUsize>) -> FnLoader<impl Fn(&str, &CancelToken) -> Result<String> + Send + Sync> {
    FnLoader::new("img", move |src: &str, _: &CancelToken| -> Result<String> {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("{src}#{n}"))
    })
}

#[test]
fn one_load_per_key() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut system = LoaderSystem::with_config(counting(Arc::clone(&calls)), immediate());
    let mut sprites: Vec<_> = (0..10).map(|_| Sprite::new("hero")).collect();

    system.run(sprites.iter_mut());
    settle(&mut system);

    assert!(sprites.windows(2).all(|w| w[0].idx == w[1].idx));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(system.get(sprites[0].idx).map(String::as_str), Some("hero#0"));
}

#[test]
fn consumers_see_absent_until_committed() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut system = LoaderSystem::with_config(counting(calls), immediate());

    let idx = system.resolve("hero");
    // Nothing is committed without a poll, however long the worker takes.
    std::thread::sleep(Duration::from_millis(10));
    assert!(system.get(idx).is_none());

    settle(&mut system);
    assert!(system.get(idx).is_some());
}

#[test]
fn reload_replaces_the_value_in_place() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut system = LoaderSystem::with_config(counting(calls), immediate());
    let idx = system.resolve("hero");
    settle(&mut system);

    assert!(system.on_changed("img/hero/sheet.json"));
    settle(&mut system);

    assert_eq!(system.handle("hero"), Some(idx));
    assert_eq!(system.get(idx).map(String::as_str), Some("hero#1"));
    assert_eq!(system.revision(idx), Some(2));
}

#[test]
fn failures_are_not_retried() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);
    let loader = FnLoader::new("img", move |src: &str, _: &CancelToken| -> Result<u32> {
        seen.fetch_add(1, Ordering::SeqCst);
        Err(Error::load_failed(src, "corrupt"))
    });
    let mut system = LoaderSystem::with_config(loader, immediate());
    let mut sprite = Sprite::new("hero");

    system.run(std::iter::once(&mut sprite));
    settle(&mut system);
    system.run(std::iter::once(&mut sprite));
    settle(&mut system);

    assert!(system.get(sprite.idx).is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn released_handles_go_stale() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut system = LoaderSystem::with_config(counting(calls), immediate());
    let mut sprite = Sprite::new("hero");
    system.run(std::iter::once(&mut sprite));
    settle(&mut system);

    assert!(system.release("hero"));
    assert!(system.get(sprite.idx).is_none());

    // The component still holds the old handle; retargeting re-resolves.
    sprite.retarget("hero");
    system.run(std::iter::once(&mut sprite));
    settle(&mut system);
    assert_eq!(system.get(sprite.idx).map(String::as_str), Some("hero#1"));
}

#[test]
fn dropping_the_system_cancels_workers() {
    let started = Arc::new(AtomicUsize::new(0));
    let cancelled = Arc::new(AtomicUsize::new(0));
    let (entered, seen) = (Arc::clone(&started), Arc::clone(&cancelled));
    let loader = FnLoader::new("img", move |_: &str, token: &CancelToken| -> Result<u8> {
        entered.fetch_add(1, Ordering::SeqCst);
        while !token.is_cancelled() {
            std::thread::sleep(Duration::from_millis(1));
        }
        seen.fetch_add(1, Ordering::SeqCst);
        Err(Error::cancelled())
    });

    let mut system = LoaderSystem::with_config(loader, immediate());
    system.resolve("a");
    system.resolve("b");
    wait_for(&started, 2, "workers did not start");

    drop(system);
    wait_for(&cancelled, 2, "workers were not cancelled");
}

fn wait_for(counter: &AtomicUsize, target: usize, message: &str) {
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while counter.load(Ordering::SeqCst) < target {
        assert!(std::time::Instant::now() < deadline, "{message}");
        std::thread::sleep(Duration::from_millis(1));
    }
}

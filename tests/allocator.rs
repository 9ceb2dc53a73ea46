use std::ptr::NonNull;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use flatcfg::{Config, ConfigError, ConfigStore, SystemAllocator, TextAllocator};

/// Counts live bytes and can be switched off to simulate exhaustion.
#[derive(Debug, Default)]
struct CountingAllocator {
    live_bytes: AtomicUsize,
    allocations: AtomicUsize,
    exhausted: AtomicBool,
}

unsafe impl TextAllocator for CountingAllocator {
    fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
        if self.exhausted.load(Ordering::SeqCst) {
            return None;
        }
        let ptr = SystemAllocator.allocate(size)?;
        self.live_bytes.fetch_add(size, Ordering::SeqCst);
        self.allocations.fetch_add(1, Ordering::SeqCst);
        Some(ptr)
    }

    unsafe fn release(&self, ptr: NonNull<u8>, size: usize) {
        self.live_bytes.fetch_sub(size, Ordering::SeqCst);
        unsafe { SystemAllocator.release(ptr, size) }
    }
}

#[test]
fn entry_text_goes_through_the_injected_allocator() {
    let counter = Arc::new(CountingAllocator::default());
    let mut store = ConfigStore::with_allocator(counter.clone());

    store.set("db", "host", "localhost");
    assert_eq!(counter.allocations.load(Ordering::SeqCst), 1);
    assert_eq!(
        counter.live_bytes.load(Ordering::SeqCst),
        "db.host".len() + "localhost".len()
    );
}

#[test]
fn overwrites_and_drop_release_everything() {
    let counter = Arc::new(CountingAllocator::default());
    let mut store = ConfigStore::with_allocator(counter.clone());

    store
        .load_from_handle("a.b=1\na.b=22\nc.d=3\n".as_bytes())
        .unwrap();
    assert_eq!(counter.allocations.load(Ordering::SeqCst), 3);
    assert_eq!(
        counter.live_bytes.load(Ordering::SeqCst),
        "a.b22".len() + "c.d3".len()
    );

    drop(store);
    assert_eq!(counter.live_bytes.load(Ordering::SeqCst), 0);
}

#[test]
fn frozen_config_releases_when_last_clone_drops() {
    let counter = Arc::new(CountingAllocator::default());
    let config = Config::builder()
        .with_allocator(counter.clone())
        .with_default("a", "b", "c")
        .build()
        .unwrap();

    let clone = config.clone();
    drop(config);
    assert!(counter.live_bytes.load(Ordering::SeqCst) > 0);
    drop(clone);
    assert_eq!(counter.live_bytes.load(Ordering::SeqCst), 0);
}

#[test]
fn exhaustion_is_reported_by_try_set_and_absorbed_by_set() {
    let counter = Arc::new(CountingAllocator::default());
    let mut store = ConfigStore::with_allocator(counter.clone());
    store.set("a", "b", "old");

    counter.exhausted.store(true, Ordering::SeqCst);
    assert!(matches!(
        store.try_set("x", "y", "z"),
        Err(ConfigError::AllocationFailed(key)) if key == "x.y"
    ));

    store.set("a", "b", "new");
    assert_eq!(store.get_string("a", "b"), Some("old"));
    assert_eq!(store.len(), 1);
}

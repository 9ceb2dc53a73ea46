//! Pluggable storage for entry text.
//!
//! The store keeps each entry's key and value in a single block obtained
//! from a [`TextAllocator`]. Embedders that want the configuration text in
//! their own arena pass an allocator to
//! [`ConfigStore::with_allocator`](crate::ConfigStore::with_allocator);
//! everyone else gets [`SystemAllocator`].

use std::alloc::{self, Layout};
use std::fmt;
use std::ptr::{self, NonNull};
use std::slice;
use std::sync::Arc;

/// An allocate/release pair for byte blocks.
///
/// # Safety
///
/// Implementors must return either `None` or a pointer valid for reads and
/// writes of `size` bytes that stays valid until passed back to
/// [`release`](Self::release) with the same `size`. Distinct live blocks
/// must not overlap.
pub unsafe trait TextAllocator: Send + Sync + fmt::Debug {
    /// Allocates `size` bytes (alignment 1). `None` signals exhaustion.
    ///
    /// Never called with `size == 0`.
    fn allocate(&self, size: usize) -> Option<NonNull<u8>>;

    /// Returns a block to the allocator.
    ///
    /// # Safety
    ///
    /// `ptr` must come from [`allocate`](Self::allocate) on this allocator
    /// with the same `size`, and must not be used afterwards.
    unsafe fn release(&self, ptr: NonNull<u8>, size: usize);
}

/// The platform allocator.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAllocator;

// SAFETY: blocks come straight from the global allocator with a layout of
// `size` bytes and are released with the identical layout.
unsafe impl TextAllocator for SystemAllocator {
    fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
        let layout = Layout::array::<u8>(size).ok()?;
        if layout.size() == 0 {
            return Some(NonNull::dangling());
        }
        // SAFETY: the layout has a non-zero size.
        NonNull::new(unsafe { alloc::alloc(layout) })
    }

    unsafe fn release(&self, ptr: NonNull<u8>, size: usize) {
        if size == 0 {
            return;
        }
        // SAFETY: `allocate` built this exact layout for `size`, so it is valid.
        let layout = unsafe { Layout::from_size_align_unchecked(size, 1) };
        // SAFETY: caller guarantees `ptr` came from `allocate(size)`.
        unsafe { alloc::dealloc(ptr.as_ptr(), layout) };
    }
}

/// Returns the shared default allocator handle.
pub(crate) fn system() -> Arc<dyn TextAllocator> {
    Arc::new(SystemAllocator)
}

/// One allocation holding an entry's key bytes followed by its value bytes.
pub(crate) struct TextBlock {
    ptr: NonNull<u8>,
    key_len: usize,
    value_len: usize,
    allocator: Arc<dyn TextAllocator>,
}

// SAFETY: the block is uniquely owned, only read through `&self`, and the
// allocator handle is itself `Send + Sync`.
unsafe impl Send for TextBlock {}
unsafe impl Sync for TextBlock {}

impl TextBlock {
    /// Copies `key` and `value` into a fresh block.
    ///
    /// Returns `None` when the allocator refuses the request.
    pub(crate) fn new(
        allocator: &Arc<dyn TextAllocator>,
        key: &str,
        value: &str,
    ) -> Option<Self> {
        let size = key.len().checked_add(value.len())?;
        let ptr = if size == 0 {
            NonNull::dangling()
        } else {
            allocator.allocate(size)?
        };

        // SAFETY: `ptr` is valid for `size` bytes and cannot overlap the
        // borrowed inputs, which live in memory we did not just allocate.
        unsafe {
            ptr::copy_nonoverlapping(key.as_ptr(), ptr.as_ptr(), key.len());
            ptr::copy_nonoverlapping(
                value.as_ptr(),
                ptr.as_ptr().add(key.len()),
                value.len(),
            );
        }

        Some(Self {
            ptr,
            key_len: key.len(),
            value_len: value.len(),
            allocator: Arc::clone(allocator),
        })
    }

    fn size(&self) -> usize {
        self.key_len + self.value_len
    }

    fn bytes(&self) -> &[u8] {
        // SAFETY: the block holds `size()` initialized bytes until drop.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.size()) }
    }

    pub(crate) fn key(&self) -> &str {
        // SAFETY: the first `key_len` bytes were copied from a `&str`.
        unsafe { std::str::from_utf8_unchecked(&self.bytes()[..self.key_len]) }
    }

    pub(crate) fn value(&self) -> &str {
        // SAFETY: the trailing `value_len` bytes were copied from a `&str`.
        unsafe { std::str::from_utf8_unchecked(&self.bytes()[self.key_len..]) }
    }
}

impl Drop for TextBlock {
    fn drop(&mut self) {
        let size = self.size();
        if size > 0 {
            // SAFETY: `ptr` was obtained from `allocate(size)` on this allocator.
            unsafe { self.allocator.release(self.ptr, size) };
        }
    }
}

impl fmt::Debug for TextBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextBlock")
            .field("key", &self.key())
            .field("value", &self.value())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct Tally {
        live: AtomicUsize,
        calls: AtomicUsize,
    }

    unsafe impl TextAllocator for Tally {
        fn allocate(&self, size: usize) -> Option<NonNull<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.live.fetch_add(size, Ordering::SeqCst);
            SystemAllocator.allocate(size)
        }

        unsafe fn release(&self, ptr: NonNull<u8>, size: usize) {
            self.live.fetch_sub(size, Ordering::SeqCst);
            unsafe { SystemAllocator.release(ptr, size) }
        }
    }

    #[derive(Debug)]
    struct Exhausted;

    unsafe impl TextAllocator for Exhausted {
        fn allocate(&self, _size: usize) -> Option<NonNull<u8>> {
            None
        }

        unsafe fn release(&self, _ptr: NonNull<u8>, _size: usize) {}
    }

    #[test]
    fn test_block_exposes_key_and_value() {
        let allocator = system();
        let block = TextBlock::new(&allocator, "db.port", "5432").unwrap();
        assert_eq!(block.key(), "db.port");
        assert_eq!(block.value(), "5432");
    }

    #[test]
    fn test_block_handles_multibyte_text() {
        let allocator = system();
        let block = TextBlock::new(&allocator, "ui.greeting", "héllo wörld").unwrap();
        assert_eq!(block.value(), "héllo wörld");
    }

    #[test]
    fn test_block_releases_on_drop() {
        let tally = Arc::new(Tally::default());
        let allocator: Arc<dyn TextAllocator> = tally.clone();

        let block = TextBlock::new(&allocator, "a.b", "value").unwrap();
        assert_eq!(tally.live.load(Ordering::SeqCst), 8);
        drop(block);
        assert_eq!(tally.live.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_empty_block_skips_allocator() {
        let tally = Arc::new(Tally::default());
        let allocator: Arc<dyn TextAllocator> = tally.clone();

        let block = TextBlock::new(&allocator, "", "").unwrap();
        assert_eq!(block.key(), "");
        assert_eq!(tally.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_exhausted_allocator_yields_none() {
        let allocator: Arc<dyn TextAllocator> = Arc::new(Exhausted);
        assert!(TextBlock::new(&allocator, "a", "b").is_none());
    }
}

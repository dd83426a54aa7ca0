//! In-memory content-addressed store.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use roastduel_core::content::ContentAddress;
use roastduel_core::error::DuelError;
use roastduel_core::ports::ContentStore;

/// A content store backed by a `HashMap`, addressing blobs by their SHA-256
/// digest.
///
/// Optionally simulates propagation delay: after a fresh upload the first
/// `propagation_reads` reads of the address report
/// [`DuelError::NotYetResolvable`].
#[derive(Debug, Default)]
pub struct InMemoryContentStore {
    blobs: Mutex<HashMap<ContentAddress, Vec<u8>>>,
    pending_reads: Mutex<HashMap<ContentAddress, u32>>,
    propagation_reads: u32,
    puts: AtomicUsize,
    gets: AtomicUsize,
}

impl InMemoryContentStore {
    /// Creates an empty store whose uploads resolve immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store whose uploads stay unresolvable for the first
    /// `reads` reads.
    #[must_use]
    pub fn with_propagation_delay(reads: u32) -> Self {
        Self {
            propagation_reads: reads,
            ..Self::default()
        }
    }

    /// Stores `bytes` as immediately resolvable content and returns the
    /// address.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn seed(&self, bytes: &[u8]) -> ContentAddress {
        let address = ContentAddress::of(bytes);
        self.blobs
            .lock()
            .unwrap()
            .insert(address.clone(), bytes.to_vec());
        address
    }

    /// Whether content exists for `address`, ignoring propagation.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn contains(&self, address: &ContentAddress) -> bool {
        self.blobs.lock().unwrap().contains_key(address)
    }

    /// Number of `put` calls served.
    #[must_use]
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// Number of `get` calls served.
    #[must_use]
    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn put(&self, bytes: &[u8]) -> Result<ContentAddress, DuelError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        let address = ContentAddress::of(bytes);
        let mut blobs = self.blobs.lock().unwrap();
        if !blobs.contains_key(&address) {
            blobs.insert(address.clone(), bytes.to_vec());
            if self.propagation_reads > 0 {
                self.pending_reads
                    .lock()
                    .unwrap()
                    .insert(address.clone(), self.propagation_reads);
            }
        }
        Ok(address)
    }

    async fn get(&self, address: &ContentAddress) -> Result<Vec<u8>, DuelError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        {
            let mut pending = self.pending_reads.lock().unwrap();
            if let Some(remaining) = pending.get_mut(address) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(DuelError::NotYetResolvable(address.clone()));
                }
            }
        }
        self.blobs
            .lock()
            .unwrap()
            .get(address)
            .cloned()
            .ok_or_else(|| DuelError::ContentNotFound(address.clone()))
    }
}

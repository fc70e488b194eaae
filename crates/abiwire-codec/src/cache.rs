//! Signature hash cache
//!
//! Maps canonical signatures to their keccak256 hash. Keys are content
//! addressed and values never change, so entries are never invalidated.

use std::sync::atomic::{AtomicU64, Ordering};

use abiwire_crypto::keccak256;
use abiwire_primitives::{Selector, H256};
use dashmap::DashMap;

/// Thread-safe memo of signature hashes
#[derive(Debug)]
pub struct SignatureCache {
    hashes: DashMap<String, H256>,
    enabled: bool,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl SignatureCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            hashes: DashMap::new(),
            enabled: true,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Create a pass-through cache that hashes on every call
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// keccak256 of a canonical signature
    pub fn hash(&self, signature: &str) -> H256 {
        if !self.enabled {
            self.misses.fetch_add(1, Ordering::Relaxed);
            return keccak256(signature);
        }

        if let Some(hash) = self.hashes.get(signature) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!(signature, "signature cache hit");
            return *hash;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(signature, "signature cache miss");
        *self
            .hashes
            .entry(signature.to_string())
            .or_insert_with(|| keccak256(signature))
    }

    /// Function or error selector of a canonical signature
    pub fn selector(&self, signature: &str) -> Selector {
        self.hash(signature).selector()
    }

    /// Event topic of a canonical signature
    pub fn topic(&self, signature: &str) -> H256 {
        self.hash(signature)
    }

    /// Lookups answered from the cache
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Lookups that had to hash
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Number of cached signatures
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// True if nothing has been cached
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}

impl Default for SignatureCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_selector_memoized() {
        let cache = SignatureCache::new();
        assert_eq!(cache.selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(cache.selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn test_disabled_cache() {
        let cache = SignatureCache::disabled();
        cache.hash("balanceOf(address)");
        cache.hash("balanceOf(address)");
        assert!(cache.is_empty());
        assert_eq!(cache.hits(), 0);
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn test_matches_direct_hash() {
        let cache = SignatureCache::new();
        let sig = "Transfer(address,address,uint256)";
        assert_eq!(cache.topic(sig), keccak256(sig));
    }

    #[test]
    fn test_shared_across_threads() {
        let cache = Arc::new(SignatureCache::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    let sig = format!("f{}(uint256)", i % 2);
                    cache.hash(&sig)
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.hits() + cache.misses(), 8);
        assert_eq!(cache.topic("f0(uint256)"), keccak256("f0(uint256)"));
    }
}

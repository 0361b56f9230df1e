//! Bounded LRU cache for query embeddings.
//!
//! Embedding a query is the only network call on the retrieval path, so
//! repeated queries should not pay for it twice. The cache is an explicit
//! object with a stated capacity — the [`crate::search::RetrievalEngine`]
//! owns one behind a mutex rather than relying on any ambient memoization.
//!
//! Keys are the literal query string: `"foo"` and `"Foo"` are distinct
//! entries. Entries are immutable once inserted.

use std::collections::{HashMap, VecDeque};

/// Exact-string → embedding-vector cache with least-recently-used eviction.
pub struct QueryCache {
    capacity: usize,
    entries: HashMap<String, Vec<f32>>,
    /// Recency order, least recent at the front. Holds exactly the keys of
    /// `entries`.
    recency: VecDeque<String>,
}

impl QueryCache {
    /// Create an empty cache holding at most `capacity` entries.
    /// A zero capacity is treated as one to keep the bookkeeping trivial
    /// (config validation rejects zero anyway).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            recency: VecDeque::new(),
        }
    }

    /// Look up `query`, promoting it to most-recently-used on a hit.
    pub fn get(&mut self, query: &str) -> Option<Vec<f32>> {
        if let Some(vector) = self.entries.get(query) {
            let vector = vector.clone();
            self.touch(query);
            Some(vector)
        } else {
            None
        }
    }

    /// Insert a freshly computed embedding, evicting the least-recently-used
    /// entry if the cache is full. Re-inserting an existing key replaces its
    /// vector and promotes it.
    pub fn insert(&mut self, query: String, vector: Vec<f32>) {
        if self.entries.insert(query.clone(), vector).is_some() {
            self.touch(&query);
            return;
        }

        self.recency.push_back(query);

        if self.entries.len() > self.capacity {
            if let Some(oldest) = self.recency.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn touch(&mut self, query: &str) {
        if let Some(pos) = self.recency.iter().position(|q| q == query) {
            let key = self.recency.remove(pos).unwrap_or_else(|| query.to_string());
            self.recency.push_back(key);
        }
    }
}

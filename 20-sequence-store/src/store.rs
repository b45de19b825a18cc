//! Thread-safe ordered sequence of strings.
//!
//! The store is the only shared mutable state in this crate. Workers append
//! to it concurrently, the driver swaps its contents wholesale, and readers
//! take snapshots. Every operation is one short critical section under a
//! single `Mutex`, so all of them are linearizable against each other.

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Thread-safe sequence of strings supporting append, replace and snapshot.
///
/// Share it between threads or tasks with `Arc<SequenceStore>`.
///
/// Values crossing the boundary are always copied. [`replace_all`] reads
/// from a borrowed slice and allocates its own storage, and [`snapshot`]
/// returns a freshly owned `Vec`, so no caller ever holds a reference into
/// the live sequence.
///
/// [`replace_all`]: SequenceStore::replace_all
/// [`snapshot`]: SequenceStore::snapshot
#[derive(Debug, Default)]
pub struct SequenceStore {
    items: Mutex<Vec<String>>,
}

impl SequenceStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }

    /// Creates a store that takes ownership of an initial sequence.
    pub fn with_items(items: Vec<String>) -> Self {
        Self {
            items: Mutex::new(items),
        }
    }

    /// Appends `item` to the end of the sequence.
    pub fn append(&self, item: impl Into<String>) {
        // Convert before locking so the critical section is just the push.
        let item = item.into();
        self.lock().push(item);
    }

    /// Replaces the whole sequence with a copy of `new_items`.
    ///
    /// The copy is built before the lock is taken, then swapped in. Readers
    /// observe either the old sequence or the new one, never a mix.
    pub fn replace_all<S: AsRef<str>>(&self, new_items: &[S]) {
        let replacement: Vec<String> = new_items
            .iter()
            .map(|item| item.as_ref().to_owned())
            .collect();
        let previous = std::mem::replace(&mut *self.lock(), replacement);
        // Old contents are freed here, after the guard is gone.
        drop(previous);
    }

    /// Returns an independent copy of the sequence at a single point in time.
    pub fn snapshot(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Returns the number of items at the moment the lock was held.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns whether the store was empty at the moment the lock was held.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Acquires the lock, recovering from poisoning.
    ///
    /// Every critical section is a single `Vec` operation, so a panic on
    /// another thread cannot leave the sequence half-written.
    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<Vec<String>> for SequenceStore {
    fn from(items: Vec<String>) -> Self {
        Self::with_items(items)
    }
}

impl<S: Into<String>> FromIterator<S> for SequenceStore {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::with_items(iter.into_iter().map(Into::into).collect())
    }
}

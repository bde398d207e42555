//! # Document Store
//!
//! In-memory document collections, one per resource. Each collection is a
//! `RwLock`-guarded vector of typed documents; uniqueness checks run inside
//! the write lock so a check-then-insert cannot race. The store provides no
//! cross-collection transactions; multi-step handler sequences are
//! best-effort and derived-field recomputation failures are logged by the
//! caller rather than surfaced.

pub mod errors;

pub use errors::{StoreError, StoreResult};

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::model::{Bootcamp, Course, Review, User};

/// A stored document with identity and creation time
pub trait Document: Clone + Serialize {
    /// Resource name used in error messages
    const RESOURCE: &'static str;

    fn id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
}

/// A single in-memory collection of documents
pub struct Collection<T: Document> {
    items: RwLock<Vec<T>>,
}

impl<T: Document> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Document> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, Vec<T>>> {
        self.items
            .read()
            .map_err(|_| StoreError::Storage("Lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, Vec<T>>> {
        self.items
            .write()
            .map_err(|_| StoreError::Storage("Lock poisoned".to_string()))
    }

    /// Insert a document without any uniqueness constraint
    pub fn insert(&self, item: T) -> StoreResult<T> {
        let mut items = self.write()?;
        items.push(item.clone());
        Ok(item)
    }

    /// Insert a document, rejecting it if `conflict` names a duplicate.
    ///
    /// `conflict` is called against each existing document inside the write
    /// lock and returns the duplicated (field, value) pair on a clash.
    pub fn insert_unique<F>(&self, item: T, conflict: F) -> StoreResult<T>
    where
        F: Fn(&T) -> Option<(&'static str, String)>,
    {
        let mut items = self.write()?;
        if let Some((field, value)) = items.iter().find_map(&conflict) {
            return Err(StoreError::Duplicate { field, value });
        }
        items.push(item.clone());
        Ok(item)
    }

    /// Find a document by id
    pub fn get(&self, id: Uuid) -> StoreResult<Option<T>> {
        Ok(self.read()?.iter().find(|item| item.id() == id).cloned())
    }

    /// Find a document by id or fail with NotFound
    pub fn get_required(&self, id: Uuid) -> StoreResult<T> {
        self.get(id)?.ok_or_else(|| StoreError::NotFound {
            resource: T::RESOURCE,
            id: id.to_string(),
        })
    }

    /// First document matching the predicate
    pub fn find<F>(&self, pred: F) -> StoreResult<Option<T>>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.read()?.iter().find(|item| pred(item)).cloned())
    }

    /// All documents, in insertion order
    pub fn all(&self) -> StoreResult<Vec<T>> {
        Ok(self.read()?.clone())
    }

    /// All documents matching the predicate
    pub fn filter<F>(&self, pred: F) -> StoreResult<Vec<T>>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.read()?.iter().filter(|item| pred(item)).cloned().collect())
    }

    /// Whether any document matches the predicate
    pub fn any<F>(&self, pred: F) -> StoreResult<bool>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.read()?.iter().any(|item| pred(item)))
    }

    /// Number of documents in the collection
    pub fn count(&self) -> StoreResult<usize> {
        Ok(self.read()?.len())
    }

    /// Apply a mutation to the document with the given id, returning the
    /// updated document
    pub fn update<F>(&self, id: Uuid, mutate: F) -> StoreResult<T>
    where
        F: FnOnce(&mut T),
    {
        let mut items = self.write()?;
        let item = items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| StoreError::NotFound {
                resource: T::RESOURCE,
                id: id.to_string(),
            })?;
        mutate(item);
        Ok(item.clone())
    }

    /// Replace an existing document wholesale
    pub fn replace(&self, item: T) -> StoreResult<T> {
        let mut items = self.write()?;
        let existing = items
            .iter_mut()
            .find(|candidate| candidate.id() == item.id())
            .ok_or_else(|| StoreError::NotFound {
                resource: T::RESOURCE,
                id: item.id().to_string(),
            })?;
        *existing = item.clone();
        Ok(item)
    }

    /// Delete a document by id, returning the removed document
    pub fn delete(&self, id: Uuid) -> StoreResult<T> {
        let mut items = self.write()?;
        let position = items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| StoreError::NotFound {
                resource: T::RESOURCE,
                id: id.to_string(),
            })?;
        Ok(items.remove(position))
    }

    /// Delete every document matching the predicate, returning how many went
    pub fn delete_where<F>(&self, pred: F) -> StoreResult<usize>
    where
        F: Fn(&T) -> bool,
    {
        let mut items = self.write()?;
        let before = items.len();
        items.retain(|item| !pred(item));
        Ok(before - items.len())
    }
}

/// The four resource collections behind the API
#[derive(Default)]
pub struct Db {
    pub bootcamps: Collection<Bootcamp>,
    pub courses: Collection<Course>,
    pub reviews: Collection<Review>,
    pub users: Collection<User>,
}

impl Db {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Review, User};

    fn review(title: &str, bootcamp: Uuid, user: Uuid) -> Review {
        Review {
            id: Uuid::new_v4(),
            title: title.to_string(),
            text: "Great course".to_string(),
            rating: 8.0,
            bootcamp,
            user,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_insert_and_get() {
        let collection: Collection<Review> = Collection::new();
        let item = review("Learned a lot", Uuid::new_v4(), Uuid::new_v4());
        let id = item.id;

        collection.insert(item).unwrap();
        assert_eq!(collection.get(id).unwrap().unwrap().title, "Learned a lot");
        assert_eq!(collection.count().unwrap(), 1);
    }

    #[test]
    fn test_insert_unique_rejects_duplicates() {
        let collection: Collection<Review> = Collection::new();
        let bootcamp = Uuid::new_v4();
        let user = Uuid::new_v4();

        let conflict = |existing: &Review| {
            (existing.bootcamp == bootcamp && existing.user == user)
                .then(|| ("review", format!("user {} on bootcamp {}", user, bootcamp)))
        };

        collection
            .insert_unique(review("First", bootcamp, user), conflict)
            .unwrap();
        let err = collection
            .insert_unique(review("Second", bootcamp, user), conflict)
            .unwrap_err();

        assert!(matches!(err, StoreError::Duplicate { field: "review", .. }));
        assert_eq!(collection.count().unwrap(), 1);
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let collection: Collection<User> = Collection::new();
        let err = collection
            .update(Uuid::new_v4(), |user| user.name = "x".to_string())
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { resource: "User", .. }));
    }

    #[test]
    fn test_delete_where_counts_removals() {
        let collection: Collection<Review> = Collection::new();
        let bootcamp = Uuid::new_v4();
        for i in 0..3 {
            collection
                .insert(review(&format!("r{}", i), bootcamp, Uuid::new_v4()))
                .unwrap();
        }
        collection
            .insert(review("other", Uuid::new_v4(), Uuid::new_v4()))
            .unwrap();

        let removed = collection.delete_where(|r| r.bootcamp == bootcamp).unwrap();
        assert_eq!(removed, 3);
        assert_eq!(collection.count().unwrap(), 1);
    }
}

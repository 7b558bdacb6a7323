use anyhow::Result;
use async_trait::async_trait;

use crate::{DeleteSummary, Person, PersonChange, PersonId, PersonQuery, PersonSummary};

#[async_trait]
pub trait Query<T> {
    type Filter;
    async fn query(&self, filter: &Self::Filter) -> Result<Vec<T>>;
}

#[async_trait]
pub trait Insert<T> {
    async fn insert(&self, item: T) -> Result<T>;

    /// Insert all items as one ordered batch. When an item is
    /// rejected, the ones before it stay inserted.
    async fn insert_many(&self, items: Vec<T>) -> Result<Vec<T>>;
}

#[async_trait]
pub trait Retrieve<T> {
    type Key;
    async fn retrieve(&self, key: Self::Key) -> Result<Option<T>>;
}

/// Find the first record matching the filter and apply the change
/// to it in a single store operation. Yields the record as it is
/// after the change.
#[async_trait]
pub trait Modify<T> {
    type Filter;
    type Change;
    async fn modify(&self, filter: &Self::Filter, change: Self::Change) -> Result<Option<T>>;
}

/// Remove a single record, yielding it if it existed.
#[async_trait]
pub trait Delete<T> {
    type Key;
    async fn delete(&self, key: Self::Key) -> Result<Option<T>>;
}

#[async_trait]
pub trait DeleteMany<T> {
    type Filter;
    async fn delete_many(&self, filter: &Self::Filter) -> Result<DeleteSummary>;
}

/// Everything a backend needs to serve the person facade.
pub trait PersonStore:
    Query<Person, Filter = PersonQuery>
    + Query<PersonSummary, Filter = PersonQuery>
    + Insert<Person>
    + Retrieve<Person, Key = PersonId>
    + Modify<Person, Filter = PersonQuery, Change = PersonChange>
    + Delete<Person, Key = PersonId>
    + DeleteMany<Person, Filter = PersonQuery>
    + Send
    + Sync
{
}

impl<DB> PersonStore for DB where
    DB: Query<Person, Filter = PersonQuery>
        + Query<PersonSummary, Filter = PersonQuery>
        + Insert<Person>
        + Retrieve<Person, Key = PersonId>
        + Modify<Person, Filter = PersonQuery, Change = PersonChange>
        + Delete<Person, Key = PersonId>
        + DeleteMany<Person, Filter = PersonQuery>
        + Send
        + Sync
{
}

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use log::trace;
use tokio::sync::Mutex;

use crate::{
    Delete, DeleteMany, DeleteSummary, Insert, Modify, Person, PersonChange, PersonId,
    PersonQuery, PersonSummary, Query, Retrieve, SortOrder, StoreError,
};

/// In-process person store with the same semantics as the
/// document store backend: records keep insertion order, email
/// is unique when present.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    people: Arc<Mutex<Vec<Person>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.people.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.people.lock().await.is_empty()
    }
}

/// Reject a person whose id or email is already taken
fn check_unique(people: &[Person], person: &Person) -> Result<()> {
    if people.iter().any(|p| p.id == person.id) {
        return Err(StoreError::Duplicate(format!("_id `{}`", person.id)).into());
    }
    if let Some(email) = &person.email {
        if people.iter().any(|p| p.email.as_ref() == Some(email)) {
            return Err(StoreError::Duplicate(format!("email `{}`", email)).into());
        }
    }
    Ok(())
}

/// Apply filter, ordering and limit of a query
fn select(people: &[Person], query: &PersonQuery) -> Vec<Person> {
    let mut selected: Vec<Person> = people
        .iter()
        .filter(|p| query.filter.matches(p))
        .cloned()
        .collect();
    match query.sort_by_name {
        Some(SortOrder::Ascending) => selected.sort_by(|a, b| a.name.cmp(&b.name)),
        Some(SortOrder::Descending) => selected.sort_by(|a, b| b.name.cmp(&a.name)),
        None => {}
    }
    if let Some(limit) = query.effective_limit() {
        selected.truncate(limit);
    }
    selected
}

#[async_trait]
impl Query<Person> for MemoryStore {
    type Filter = PersonQuery;
    async fn query(&self, query: &Self::Filter) -> Result<Vec<Person>> {
        let people = self.people.lock().await;
        Ok(select(&people, query))
    }
}

#[async_trait]
impl Query<PersonSummary> for MemoryStore {
    type Filter = PersonQuery;
    async fn query(&self, query: &Self::Filter) -> Result<Vec<PersonSummary>> {
        let people = self.people.lock().await;
        Ok(select(&people, query)
            .into_iter()
            .map(PersonSummary::from)
            .collect())
    }
}

#[async_trait]
impl Insert<Person> for MemoryStore {
    async fn insert(&self, person: Person) -> Result<Person> {
        let mut people = self.people.lock().await;
        check_unique(&people, &person)?;
        trace!("storing person {}", person.id);
        people.push(person.clone());
        Ok(person)
    }

    async fn insert_many(&self, batch: Vec<Person>) -> Result<Vec<Person>> {
        let mut people = self.people.lock().await;
        for person in &batch {
            check_unique(&people, person)?;
            people.push(person.clone());
        }
        trace!("stored batch of {} people", batch.len());
        Ok(batch)
    }
}

#[async_trait]
impl Retrieve<Person> for MemoryStore {
    type Key = PersonId;
    async fn retrieve(&self, id: Self::Key) -> Result<Option<Person>> {
        let people = self.people.lock().await;
        Ok(people.iter().find(|p| p.id == id).cloned())
    }
}

#[async_trait]
impl Modify<Person> for MemoryStore {
    type Filter = PersonQuery;
    type Change = PersonChange;
    async fn modify(&self, query: &Self::Filter, change: Self::Change) -> Result<Option<Person>> {
        let mut people = self.people.lock().await;
        let Some(id) = select(&people, &query.clone().limit(1)).pop().map(|p| p.id) else {
            return Ok(None);
        };
        let person = people.iter_mut().find(|p| p.id == id);
        Ok(person.map(|person| {
            change.apply(person);
            person.clone()
        }))
    }
}

#[async_trait]
impl Delete<Person> for MemoryStore {
    type Key = PersonId;
    async fn delete(&self, id: Self::Key) -> Result<Option<Person>> {
        let mut people = self.people.lock().await;
        let index = people.iter().position(|p| p.id == id);
        Ok(index.map(|index| people.remove(index)))
    }
}

#[async_trait]
impl DeleteMany<Person> for MemoryStore {
    type Filter = PersonQuery;
    async fn delete_many(&self, query: &Self::Filter) -> Result<DeleteSummary> {
        let mut people = self.people.lock().await;
        let before = people.len();
        people.retain(|p| !query.filter.matches(p));
        Ok(DeleteSummary {
            deleted_count: (before - people.len()) as u64,
        })
    }
}

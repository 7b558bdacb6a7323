use anyhow::Result;
use async_trait::async_trait;
use futures::TryStreamExt;
use log::trace;
use mongodb::{
    bson::{doc, Document},
    options::ReturnDocument,
    Collection,
};
use serde::de::DeserializeOwned;

use roster_data::{
    Delete, DeleteMany, DeleteSummary, Insert, Modify, Person, PersonChange, PersonFilter,
    PersonId, PersonQuery, PersonSummary, Query, Retrieve,
};

use crate::{results::classify, Connection};

/// Build the filter document, one condition per set field
fn filter_document(filter: &PersonFilter) -> Document {
    let mut qry = Document::new();
    if let Some(id) = filter.id {
        qry.insert("_id", id.object_id());
    }
    if let Some(name) = filter.name.clone() {
        qry.insert("name", name);
    }
    // Matches when the array contains the value
    if let Some(food) = filter.favorite_food.clone() {
        qry.insert("favoriteFoods", food);
    }
    qry
}

fn sort_document(query: &PersonQuery) -> Option<Document> {
    query.sort_by_name.map(|order| {
        let direction = order.direction();
        doc! { "name": direction }
    })
}

fn change_document(change: PersonChange) -> Document {
    match change {
        PersonChange::SetAge(age) => doc! { "$set": { "age": age } },
        PersonChange::AddFavoriteFood(food) => doc! { "$push": { "favoriteFoods": food } },
    }
}

/// Run a find with the query's filter, order and limit
async fn find<T>(
    collection: &Collection<T>,
    query: &PersonQuery,
    projection: Option<Document>,
) -> Result<Vec<T>>
where
    T: DeserializeOwned + Send + Sync + Unpin,
{
    let mut find = collection.find(filter_document(&query.filter));
    if let Some(sort) = sort_document(query) {
        find = find.sort(sort);
    }
    if let Some(limit) = query.effective_limit() {
        find = find.limit(limit as i64);
    }
    if let Some(projection) = projection {
        find = find.projection(projection);
    }
    let items: Vec<T> = find.await.map_err(classify)?.try_collect().await?;
    Ok(items)
}

#[async_trait]
impl Query<Person> for Connection {
    type Filter = PersonQuery;
    async fn query(&self, query: &Self::Filter) -> Result<Vec<Person>> {
        trace!("query people: {:?}", query);
        find(&self.people(), query, None).await
    }
}

#[async_trait]
impl Query<PersonSummary> for Connection {
    type Filter = PersonQuery;
    async fn query(&self, query: &Self::Filter) -> Result<Vec<PersonSummary>> {
        trace!("query people without age: {:?}", query);
        find(&self.people_summaries(), query, Some(doc! { "age": 0 })).await
    }
}

#[async_trait]
impl Insert<Person> for Connection {
    async fn insert(&self, person: Person) -> Result<Person> {
        self.people()
            .insert_one(&person)
            .await
            .map_err(classify)?;
        Ok(person)
    }

    async fn insert_many(&self, batch: Vec<Person>) -> Result<Vec<Person>> {
        if batch.is_empty() {
            // The server refuses empty batches
            return Ok(batch);
        }
        self.people()
            .insert_many(&batch)
            .await
            .map_err(classify)?;
        Ok(batch)
    }
}

#[async_trait]
impl Retrieve<Person> for Connection {
    type Key = PersonId;
    async fn retrieve(&self, id: Self::Key) -> Result<Option<Person>> {
        let oid = id.object_id();
        let person = self
            .people()
            .find_one(doc! { "_id": oid })
            .await
            .map_err(classify)?;
        Ok(person)
    }
}

#[async_trait]
impl Modify<Person> for Connection {
    type Filter = PersonQuery;
    type Change = PersonChange;
    async fn modify(&self, query: &Self::Filter, change: Self::Change) -> Result<Option<Person>> {
        let people = self.people();
        let mut update = people
            .find_one_and_update(filter_document(&query.filter), change_document(change))
            .return_document(ReturnDocument::After);
        if let Some(sort) = sort_document(query) {
            update = update.sort(sort);
        }
        let person = update.await.map_err(classify)?;
        Ok(person)
    }
}

#[async_trait]
impl Delete<Person> for Connection {
    type Key = PersonId;
    async fn delete(&self, id: Self::Key) -> Result<Option<Person>> {
        let oid = id.object_id();
        let person = self
            .people()
            .find_one_and_delete(doc! { "_id": oid })
            .await
            .map_err(classify)?;
        Ok(person)
    }
}

#[async_trait]
impl DeleteMany<Person> for Connection {
    type Filter = PersonQuery;
    async fn delete_many(&self, query: &Self::Filter) -> Result<DeleteSummary> {
        let result = self
            .people()
            .delete_many(filter_document(&query.filter))
            .await
            .map_err(classify)?;
        Ok(DeleteSummary {
            deleted_count: result.deleted_count,
        })
    }
}

//! One function per person operation.
//!
//! Every function issues a single store operation (validation
//! aside) and hands back its result or failure. Outcomes are
//! logged, failures are never swallowed.

use log::{debug, error};

use crate::{
    Delete, DeleteMany, DeleteSummary, FacadeError, Insert, Modify, NewPerson, Person,
    PersonChange, PersonId, PersonQuery, PersonSummary, Query, Retrieve, SortOrder,
    ValidationError,
};

/// Food added by [`update_person_food`]
pub const FAVORITE_FOOD: &str = "hamburger";
/// Age set by [`update_person_age`]
pub const DEFAULT_AGE: i32 = 20;
/// Food searched by [`find_burrito_lovers`]
pub const BURRITOS: &str = "burritos";
pub const BURRITO_LOVERS_LIMIT: u32 = 2;

/// Log a failed operation and pass the error on
fn log_failure<T>(op: &str, result: Result<T, FacadeError>) -> Result<T, FacadeError> {
    if let Err(err) = &result {
        error!("{} failed: {}", op, err);
    }
    result
}

/// Validate and store a single person
pub async fn create_and_save_person<DB>(db: &DB, new: NewPerson) -> Result<Person, FacadeError>
where
    DB: Insert<Person>,
{
    let result = async {
        let person = new.into_person()?;
        let person = db.insert(person).await?;
        debug!("person saved: {:?}", person);
        Ok::<_, FacadeError>(person)
    }
    .await;
    log_failure("create person", result)
}

/// Validate all payloads, then store them as one batch
pub async fn create_many_people<DB>(
    db: &DB,
    batch: Vec<NewPerson>,
) -> Result<Vec<Person>, FacadeError>
where
    DB: Insert<Person>,
{
    let result = async {
        let people = batch
            .into_iter()
            .enumerate()
            .map(|(index, new)| {
                new.into_person()
                    .map_err(|err| ValidationError::InvalidEntry {
                        index,
                        source: Box::new(err),
                    })
            })
            .collect::<Result<Vec<Person>, ValidationError>>()?;
        let people = db.insert_many(people).await?;
        debug!("{} people created", people.len());
        Ok::<_, FacadeError>(people)
    }
    .await;
    log_failure("create people", result)
}

pub async fn find_people_by_name<DB>(db: &DB, name: &str) -> Result<Vec<Person>, FacadeError>
where
    DB: Query<Person, Filter = PersonQuery>,
{
    let result = db
        .query(&PersonQuery::by_name(name))
        .await
        .map_err(FacadeError::from);
    if let Ok(people) = &result {
        debug!("{} people named {:?} found", people.len(), name);
    }
    log_failure("find people by name", result)
}

/// First person whose favorite foods contain `food`
pub async fn find_one_person_by_food<DB>(
    db: &DB,
    food: &str,
) -> Result<Option<Person>, FacadeError>
where
    DB: Query<Person, Filter = PersonQuery>,
{
    let result = db
        .query(&PersonQuery::by_food(food).limit(1))
        .await
        .map(|people| people.into_iter().next())
        .map_err(FacadeError::from);
    if let Ok(person) = &result {
        debug!("person liking {:?}: {:?}", food, person);
    }
    log_failure("find person by food", result)
}

pub async fn find_person_by_id<DB>(db: &DB, id: PersonId) -> Result<Option<Person>, FacadeError>
where
    DB: Retrieve<Person, Key = PersonId>,
{
    let result = db.retrieve(id).await.map_err(FacadeError::from);
    if let Ok(person) = &result {
        debug!("person {}: {:?}", id, person);
    }
    log_failure("find person by id", result)
}

/// Add [`FAVORITE_FOOD`] to a person's favorite foods
pub async fn update_person_food<DB>(db: &DB, id: PersonId) -> Result<Person, FacadeError>
where
    DB: Modify<Person, Filter = PersonQuery, Change = PersonChange>,
{
    add_favorite_food(db, id, FAVORITE_FOOD).await
}

/// Append `food` to a person's favorite foods. The append happens
/// in the store, so concurrent appends are not lost.
pub async fn add_favorite_food<DB>(
    db: &DB,
    id: PersonId,
    food: &str,
) -> Result<Person, FacadeError>
where
    DB: Modify<Person, Filter = PersonQuery, Change = PersonChange>,
{
    let result = db
        .modify(
            &PersonQuery::by_id(id),
            PersonChange::AddFavoriteFood(food.to_string()),
        )
        .await
        .map_err(FacadeError::from)
        .and_then(|person| person.ok_or(FacadeError::NotFound(id)));
    if let Ok(person) = &result {
        debug!("person updated: {:?}", person);
    }
    log_failure("update person food", result)
}

/// Set the age of the first person named `name` to [`DEFAULT_AGE`]
pub async fn update_person_age<DB>(db: &DB, name: &str) -> Result<Option<Person>, FacadeError>
where
    DB: Modify<Person, Filter = PersonQuery, Change = PersonChange>,
{
    set_person_age(db, name, DEFAULT_AGE).await
}

pub async fn set_person_age<DB>(
    db: &DB,
    name: &str,
    age: i32,
) -> Result<Option<Person>, FacadeError>
where
    DB: Modify<Person, Filter = PersonQuery, Change = PersonChange>,
{
    let result = db
        .modify(&PersonQuery::by_name(name), PersonChange::SetAge(age))
        .await
        .map_err(FacadeError::from);
    if let Ok(person) = &result {
        debug!("person age updated: {:?}", person);
    }
    log_failure("update person age", result)
}

/// Remove a person. Nothing to remove is not an error.
pub async fn remove_person_by_id<DB>(
    db: &DB,
    id: PersonId,
) -> Result<Option<Person>, FacadeError>
where
    DB: Delete<Person, Key = PersonId>,
{
    let result = db.delete(id).await.map_err(FacadeError::from);
    if let Ok(person) = &result {
        debug!("person removed: {:?}", person);
    }
    log_failure("remove person", result)
}

pub async fn remove_all_people_by_name<DB>(
    db: &DB,
    name: &str,
) -> Result<DeleteSummary, FacadeError>
where
    DB: DeleteMany<Person, Filter = PersonQuery>,
{
    let result = db
        .delete_many(&PersonQuery::by_name(name))
        .await
        .map_err(FacadeError::from);
    if let Ok(summary) = &result {
        debug!("{} people named {:?} removed", summary.deleted_count, name);
    }
    log_failure("remove people", result)
}

/// Up to [`BURRITO_LOVERS_LIMIT`] people liking [`BURRITOS`]
pub async fn find_burrito_lovers<DB>(db: &DB) -> Result<Vec<PersonSummary>, FacadeError>
where
    DB: Query<PersonSummary, Filter = PersonQuery>,
{
    find_food_lovers(db, BURRITOS, BURRITO_LOVERS_LIMIT).await
}

/// People liking `food`, ordered by name, without their age
pub async fn find_food_lovers<DB>(
    db: &DB,
    food: &str,
    limit: u32,
) -> Result<Vec<PersonSummary>, FacadeError>
where
    DB: Query<PersonSummary, Filter = PersonQuery>,
{
    let query = PersonQuery::by_food(food)
        .sort_by_name(SortOrder::Ascending)
        .limit(limit);
    let result = db.query(&query).await.map_err(FacadeError::from);
    if let Ok(people) = &result {
        debug!("{} people liking {:?} found", people.len(), food);
    }
    log_failure("find food lovers", result)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::MemoryStore;

    fn sample_people() -> Vec<NewPerson> {
        vec![
            NewPerson::new("Alice")
                .with_age(28)
                .with_favorite_foods(&["sushi", "burritos", "pizza"]),
            NewPerson::new("Bob")
                .with_age(30)
                .with_favorite_foods(&["burritos", "tacos"]),
            NewPerson::new("Charlie")
                .with_age(26)
                .with_favorite_foods(&["hamburger", "burritos"]),
            NewPerson::new("Mary")
                .with_age(35)
                .with_favorite_foods(&["salad", "pasta"]),
        ]
    }

    #[tokio::test]
    async fn test_create_without_name_fails() {
        let db = MemoryStore::new();
        let err = create_and_save_person(&db, NewPerson::default().with_age(3))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FacadeError::Validation(ValidationError::MissingName)
        ));
        assert!(db.is_empty().await);
    }

    #[tokio::test]
    async fn test_create_with_only_name() {
        let db = MemoryStore::new();
        let a = create_and_save_person(&db, NewPerson::new("Solo")).await.unwrap();
        let b = create_and_save_person(&db, NewPerson::new("Solo")).await.unwrap();
        assert_eq!(a.name, "Solo");
        assert_eq!(a.age, None);
        assert!(a.favorite_foods.is_empty());
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_create_many_assigns_distinct_ids() {
        let db = MemoryStore::new();
        let people = create_many_people(&db, sample_people()).await.unwrap();
        assert_eq!(people.len(), 4);

        let ids: HashSet<PersonId> = people.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), 4);
        assert_eq!(db.len().await, 4);
    }

    #[tokio::test]
    async fn test_create_many_rejects_invalid_entry_before_storing() {
        let db = MemoryStore::new();
        let mut batch = sample_people();
        batch.insert(2, NewPerson::new(" "));

        let err = create_many_people(&db, batch).await.unwrap_err();
        match err {
            FacadeError::Validation(ValidationError::InvalidEntry { index, source }) => {
                assert_eq!(index, 2);
                assert_eq!(*source, ValidationError::MissingName);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(db.is_empty().await);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_distinguishable() {
        let db = MemoryStore::new();
        create_and_save_person(&db, NewPerson::new("A").with_email("a@example.org"))
            .await
            .unwrap();
        let err = create_and_save_person(&db, NewPerson::new("B").with_email("a@example.org"))
            .await
            .unwrap_err();
        assert!(matches!(err, FacadeError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_find_people_by_name() {
        let db = MemoryStore::new();
        create_many_people(&db, sample_people()).await.unwrap();
        let alice = create_and_save_person(&db, NewPerson::new("Alicia")).await.unwrap();

        let found = find_people_by_name(&db, "Alicia").await.unwrap();
        assert_eq!(found, vec![alice]);

        let found = find_people_by_name(&db, "Nobody").await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_name_filters_are_trimmed_like_stored_names() {
        let db = MemoryStore::new();
        create_many_people(&db, sample_people()).await.unwrap();

        let found = find_people_by_name(&db, "  Alice ").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Alice");

        let bob = set_person_age(&db, " Bob", 33).await.unwrap().unwrap();
        assert_eq!(bob.name, "Bob");
        assert_eq!(bob.age, Some(33));

        let summary = remove_all_people_by_name(&db, "Mary  ").await.unwrap();
        assert_eq!(summary.deleted_count, 1);
    }

    #[tokio::test]
    async fn test_find_one_person_by_food() {
        let db = MemoryStore::new();
        create_and_save_person(&db, NewPerson::new("Mary").with_favorite_foods(&["salad"]))
            .await
            .unwrap();
        assert_eq!(find_one_person_by_food(&db, "pizza").await.unwrap(), None);

        create_many_people(&db, sample_people()).await.unwrap();
        let person = find_one_person_by_food(&db, "pizza").await.unwrap().unwrap();
        assert!(person.likes("pizza"));
    }

    #[tokio::test]
    async fn test_find_by_id_round_trip_keeps_food_order() {
        let db = MemoryStore::new();
        let created = create_and_save_person(
            &db,
            NewPerson::new("John Doe")
                .with_age(25)
                .with_favorite_foods(&["pizza", "pasta", "salad", "pizza"]),
        )
        .await
        .unwrap();

        let found = find_person_by_id(&db, created.id).await.unwrap().unwrap();
        assert_eq!(found.favorite_foods, vec!["pizza", "pasta", "salad", "pizza"]);
        assert_eq!(found, created);

        assert_eq!(find_person_by_id(&db, PersonId::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_person_food_appends_hamburger() {
        let db = MemoryStore::new();
        let created = create_and_save_person(
            &db,
            NewPerson::new("John Doe").with_favorite_foods(&["pizza"]),
        )
        .await
        .unwrap();

        let updated = update_person_food(&db, created.id).await.unwrap();
        assert_eq!(updated.favorite_foods, vec!["pizza", "hamburger"]);

        let stored = find_person_by_id(&db, created.id).await.unwrap().unwrap();
        assert_eq!(stored.favorite_foods, vec!["pizza", "hamburger"]);
    }

    #[tokio::test]
    async fn test_update_person_food_unknown_id_is_not_found() {
        let db = MemoryStore::new();
        let id = PersonId::new();
        let err = update_person_food(&db, id).await.unwrap_err();
        assert!(matches!(err, FacadeError::NotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn test_concurrent_food_updates_are_not_lost() {
        let db = MemoryStore::new();
        let created = create_and_save_person(&db, NewPerson::new("Busy")).await.unwrap();

        let (a, b) = tokio::join!(
            add_favorite_food(&db, created.id, "soup"),
            add_favorite_food(&db, created.id, "bread"),
        );
        a.unwrap();
        b.unwrap();

        let stored = find_person_by_id(&db, created.id).await.unwrap().unwrap();
        assert_eq!(stored.favorite_foods.len(), 2);
    }

    #[tokio::test]
    async fn test_update_person_age() {
        let db = MemoryStore::new();
        assert_eq!(update_person_age(&db, "Bob").await.unwrap(), None);

        create_many_people(&db, sample_people()).await.unwrap();
        let bob = update_person_age(&db, "Bob").await.unwrap().unwrap();
        assert_eq!(bob.name, "Bob");
        assert_eq!(bob.age, Some(DEFAULT_AGE));

        let bob = set_person_age(&db, "Bob", 41).await.unwrap().unwrap();
        assert_eq!(bob.age, Some(41));
        let stored = find_people_by_name(&db, "Bob").await.unwrap();
        assert_eq!(stored[0].age, Some(41));
    }

    #[tokio::test]
    async fn test_remove_person_by_id() {
        let db = MemoryStore::new();
        let created = create_and_save_person(&db, NewPerson::new("Gone")).await.unwrap();

        let removed = remove_person_by_id(&db, created.id).await.unwrap();
        assert_eq!(removed, Some(created.clone()));
        assert_eq!(remove_person_by_id(&db, created.id).await.unwrap(), None);
        assert_eq!(find_person_by_id(&db, created.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_all_people_by_name() {
        let db = MemoryStore::new();
        create_many_people(&db, sample_people()).await.unwrap();
        create_many_people(&db, vec![NewPerson::new("Mary"), NewPerson::new("Mary")])
            .await
            .unwrap();

        let summary = remove_all_people_by_name(&db, "Mary").await.unwrap();
        assert_eq!(summary.deleted_count, 3);
        assert!(find_people_by_name(&db, "Mary").await.unwrap().is_empty());

        let summary = remove_all_people_by_name(&db, "Mary").await.unwrap();
        assert_eq!(summary.deleted_count, 0);
        assert_eq!(db.len().await, 3);
    }

    #[tokio::test]
    async fn test_find_burrito_lovers() {
        let db = MemoryStore::new();
        create_many_people(&db, sample_people()).await.unwrap();

        let lovers = find_burrito_lovers(&db).await.unwrap();
        let names: Vec<&str> = lovers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob"]);

        for lover in &lovers {
            let value = serde_json::to_value(lover).unwrap();
            assert!(value.get("age").is_none());
        }
    }

    #[tokio::test]
    async fn test_find_food_lovers_parameters() {
        let db = MemoryStore::new();
        create_many_people(&db, sample_people()).await.unwrap();

        let lovers = find_food_lovers(&db, "burritos", 5).await.unwrap();
        let names: Vec<&str> = lovers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob", "Charlie"]);

        assert!(find_food_lovers(&db, "caviar", 2).await.unwrap().is_empty());
    }
}

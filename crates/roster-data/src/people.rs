use std::fmt;
use std::str::FromStr;

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Name of the collection holding person documents
pub const PEOPLE: &str = "people";

/// Store assigned identifier of a person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(ObjectId);

impl PersonId {
    /// Generate a fresh identifier. Every call yields a new one.
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for PersonId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl FromStr for PersonId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s.trim())
            .map(Self)
            .map_err(|err| ValidationError::InvalidId {
                value: s.to_string(),
                reason: err.to_string(),
            })
    }
}

/// Payload for creating a person. Nothing is checked until
/// `validate` is called.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPerson {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(default)]
    pub favorite_foods: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl NewPerson {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_age(mut self, age: i32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_favorite_foods(mut self, foods: &[&str]) -> Self {
        self.favorite_foods = foods.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }

    /// Trim name and email. A blank name is rejected, a blank
    /// email counts as no email.
    pub fn validate(self) -> Result<Self, ValidationError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }
        let email = self
            .email
            .map(|email| email.trim().to_string())
            .filter(|email| !email.is_empty());

        Ok(Self {
            name,
            age: self.age,
            favorite_foods: self.favorite_foods,
            email,
        })
    }

    /// Validate the payload and assign it a new identifier
    pub fn into_person(self) -> Result<Person, ValidationError> {
        let new = self.validate()?;
        Ok(Person {
            id: PersonId::new(),
            name: new.name,
            age: new.age,
            favorite_foods: new.favorite_foods,
            email: new.email,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(rename = "_id")]
    pub id: PersonId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(default)]
    pub favorite_foods: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Person {
    pub fn likes(&self, food: &str) -> bool {
        self.favorite_foods.iter().any(|f| f == food)
    }
}

/// A person as returned by queries that leave out the age
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonSummary {
    #[serde(rename = "_id")]
    pub id: PersonId,
    pub name: String,
    #[serde(default)]
    pub favorite_foods: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<Person> for PersonSummary {
    fn from(person: Person) -> Self {
        Self {
            id: person.id,
            name: person.name,
            favorite_foods: person.favorite_foods,
            email: person.email,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonFilter {
    pub id: Option<PersonId>,
    pub name: Option<String>,
    pub favorite_food: Option<String>,
}

impl PersonFilter {
    /// Check a person against every set criterion
    pub fn matches(&self, person: &Person) -> bool {
        if let Some(id) = &self.id {
            if person.id != *id {
                return false;
            }
        }
        if let Some(name) = &self.name {
            if person.name != *name {
                return false;
            }
        }
        if let Some(food) = &self.favorite_food {
            if !person.likes(food) {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// Direction as used in store sort documents
    pub fn direction(self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }
}

/// A filter with optional ordering and limit, built up by chaining
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PersonQuery {
    pub filter: PersonFilter,
    pub sort_by_name: Option<SortOrder>,
    /// A limit of zero means no limit, as in the store.
    pub limit: Option<u32>,
}

impl PersonQuery {
    pub fn new(filter: PersonFilter) -> Self {
        Self {
            filter,
            ..Default::default()
        }
    }

    pub fn by_id(id: PersonId) -> Self {
        Self::new(PersonFilter {
            id: Some(id),
            ..Default::default()
        })
    }

    /// Stored names are trimmed, so the filter is too
    pub fn by_name(name: &str) -> Self {
        Self::new(PersonFilter {
            name: Some(name.trim().to_string()),
            ..Default::default()
        })
    }

    pub fn by_food(food: &str) -> Self {
        Self::new(PersonFilter {
            favorite_food: Some(food.to_string()),
            ..Default::default()
        })
    }

    pub fn sort_by_name(mut self, order: SortOrder) -> Self {
        self.sort_by_name = Some(order);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The limit to apply, if any
    pub fn effective_limit(&self) -> Option<usize> {
        self.limit.filter(|l| *l > 0).map(|l| l as usize)
    }
}

/// Targeted change applied by a find-and-update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonChange {
    SetAge(i32),
    AddFavoriteFood(String),
}

impl PersonChange {
    pub fn apply(&self, person: &mut Person) {
        match self {
            PersonChange::SetAge(age) => person.age = Some(*age),
            PersonChange::AddFavoriteFood(food) => person.favorite_foods.push(food.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteSummary {
    pub deleted_count: u64,
}

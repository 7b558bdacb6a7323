//! Walk through every person operation once, feeding results of
//! earlier steps into later ones.

use std::fmt;

use log::{info, warn};

use roster_data::{facade, FacadeError, NewPerson, Person, PersonStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    CreatePerson,
    CreatePeople,
    FindByName,
    FindOneByFood,
    FindById,
    UpdateFood,
    UpdateAge,
    FindBurritoLovers,
    RemoveById,
    RemoveAllByName,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::CreatePerson => "create and save a person",
            Step::CreatePeople => "create many people",
            Step::FindByName => "find people by name",
            Step::FindOneByFood => "find one person by food",
            Step::FindById => "find person by id",
            Step::UpdateFood => "update person food",
            Step::UpdateAge => "update person age",
            Step::FindBurritoLovers => "find burrito lovers",
            Step::RemoveById => "remove person by id",
            Step::RemoveAllByName => "remove all people by name",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// A step this one depends on failed or found nothing
    Skipped,
    Failed(String),
}

#[derive(Debug, Default)]
pub struct ExerciseReport {
    pub steps: Vec<(Step, Outcome)>,
}

impl ExerciseReport {
    pub fn outcome(&self, step: Step) -> Option<&Outcome> {
        self.steps
            .iter()
            .find(|(s, _)| *s == step)
            .map(|(_, outcome)| outcome)
    }

    pub fn is_success(&self) -> bool {
        self.steps.iter().all(|(_, outcome)| *outcome == Outcome::Done)
    }

    /// Record a step result and hand back its value, if any
    fn record<T>(&mut self, step: Step, result: Result<T, FacadeError>) -> Option<T> {
        match result {
            Ok(value) => {
                info!("{}: done", step);
                self.steps.push((step, Outcome::Done));
                Some(value)
            }
            Err(err) => {
                warn!("{}: failed: {}", step, err);
                self.steps.push((step, Outcome::Failed(err.to_string())));
                None
            }
        }
    }

    fn skip(&mut self, step: Step) {
        warn!("{}: skipped", step);
        self.steps.push((step, Outcome::Skipped));
    }
}

pub fn sample_person() -> NewPerson {
    NewPerson::new("John Doe")
        .with_age(25)
        .with_favorite_foods(&["pizza", "pasta", "salad"])
}

pub fn sample_people() -> Vec<NewPerson> {
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

/// Run all steps in order. A step whose input comes from an
/// earlier step is skipped when that step produced nothing.
pub async fn run<DB: PersonStore>(db: &DB) -> ExerciseReport {
    let mut report = ExerciseReport::default();

    let john = report.record(
        Step::CreatePerson,
        facade::create_and_save_person(db, sample_person()).await,
    );

    report.record(
        Step::CreatePeople,
        facade::create_many_people(db, sample_people()).await,
    );

    report.record(
        Step::FindByName,
        facade::find_people_by_name(db, "Alice").await,
    );

    let pizza_lover: Option<Person> = report
        .record(
            Step::FindOneByFood,
            facade::find_one_person_by_food(db, "pizza").await,
        )
        .flatten();

    let found = match pizza_lover {
        Some(person) => report
            .record(Step::FindById, facade::find_person_by_id(db, person.id).await)
            .flatten(),
        None => {
            report.skip(Step::FindById);
            None
        }
    };

    match found {
        Some(person) => {
            report.record(
                Step::UpdateFood,
                facade::update_person_food(db, person.id).await,
            );
        }
        None => report.skip(Step::UpdateFood),
    }

    report.record(Step::UpdateAge, facade::update_person_age(db, "Bob").await);

    report.record(
        Step::FindBurritoLovers,
        facade::find_burrito_lovers(db).await,
    );

    match john {
        Some(person) => {
            report.record(
                Step::RemoveById,
                facade::remove_person_by_id(db, person.id).await,
            );
        }
        None => report.skip(Step::RemoveById),
    }

    report.record(
        Step::RemoveAllByName,
        facade::remove_all_people_by_name(db, "Mary").await,
    );

    report
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use inquire::Confirm;
use log::info;

use roster_data::{facade, NewPerson, PersonId, PersonStore};

use crate::formatting::PrintFormatted;

/// Ask before destructive operations unless `yes` is set
fn confirm(message: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    let confirm = Confirm::new(message).with_default(true);
    Ok(confirm.prompt()?)
}

#[derive(Args, Debug)]
pub struct CreatePerson {
    #[clap(short, long)]
    pub name: String,
    #[clap(short, long)]
    pub age: Option<i32>,
    /// Favorite food, repeat for more than one
    #[clap(short, long = "food")]
    pub foods: Vec<String>,
    #[clap(short, long)]
    pub email: Option<String>,
}

impl CreatePerson {
    /// Run the command and add a person to the database
    pub async fn run<DB: PersonStore>(self, db: &DB) -> Result<()> {
        let new = NewPerson {
            name: self.name,
            age: self.age,
            favorite_foods: self.foods,
            email: self.email,
        };
        let person = facade::create_and_save_person(db, new).await?;
        info!("person added with id {}", person.id);

        println!();
        person.print_formatted();
        println!();
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct CreatePeople {
    /// JSON file holding an array of people
    #[clap(short, long)]
    pub file: PathBuf,
}

impl CreatePeople {
    pub async fn run<DB: PersonStore>(self, db: &DB) -> Result<()> {
        let data = tokio::fs::read_to_string(&self.file)
            .await
            .with_context(|| format!("reading {}", self.file.display()))?;
        let batch: Vec<NewPerson> = serde_json::from_str(&data)
            .with_context(|| format!("parsing {}", self.file.display()))?;

        let people = facade::create_many_people(db, batch).await?;
        info!("{} people added", people.len());
        people.print_formatted();
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct FindPeople {
    #[clap(short, long)]
    pub name: String,
}

impl FindPeople {
    pub async fn run<DB: PersonStore>(self, db: &DB) -> Result<()> {
        let people = facade::find_people_by_name(db, &self.name).await?;
        people.print_formatted();
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct FindOnePerson {
    #[clap(short, long)]
    pub food: String,
}

impl FindOnePerson {
    pub async fn run<DB: PersonStore>(self, db: &DB) -> Result<()> {
        let person = facade::find_one_person_by_food(db, &self.food).await?;
        println!();
        person.print_formatted();
        println!();
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ShowPerson {
    #[clap(short, long)]
    pub id: PersonId,
}

impl ShowPerson {
    /// Run the command and show a person
    pub async fn run<DB: PersonStore>(self, db: &DB) -> Result<()> {
        let person = facade::find_person_by_id(db, self.id).await?;
        println!();
        person.print_formatted();
        println!();
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct AddFood {
    #[clap(short, long)]
    pub id: PersonId,
    #[clap(short, long, default_value = facade::FAVORITE_FOOD)]
    pub food: String,
}

impl AddFood {
    pub async fn run<DB: PersonStore>(self, db: &DB) -> Result<()> {
        let person = facade::add_favorite_food(db, self.id, &self.food).await?;
        println!();
        person.print_formatted();
        println!();
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct SetAge {
    #[clap(short, long)]
    pub name: String,
    #[clap(short, long, default_value_t = facade::DEFAULT_AGE)]
    pub age: i32,
}

impl SetAge {
    pub async fn run<DB: PersonStore>(self, db: &DB) -> Result<()> {
        let person = facade::set_person_age(db, &self.name, self.age).await?;
        println!();
        person.print_formatted();
        println!();
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct DeletePerson {
    #[clap(short, long)]
    pub id: PersonId,
    /// Do not ask for confirmation
    #[clap(short, long)]
    pub yes: bool,
}

impl DeletePerson {
    pub async fn run<DB: PersonStore>(self, db: &DB) -> Result<()> {
        let Some(person) = facade::find_person_by_id(db, self.id).await? else {
            println!("No person with id {}.", self.id);
            return Ok(());
        };
        println!();
        person.print_formatted();
        println!();
        if !confirm("Delete person from database?", self.yes)? {
            return Ok(());
        }
        let removed = facade::remove_person_by_id(db, self.id).await?;
        if removed.is_some() {
            info!("person {} removed", self.id);
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct DeletePeople {
    #[clap(short, long)]
    pub name: String,
    /// Do not ask for confirmation
    #[clap(short, long)]
    pub yes: bool,
}

impl DeletePeople {
    pub async fn run<DB: PersonStore>(self, db: &DB) -> Result<()> {
        let message = format!("Delete everyone named {:?}?", self.name);
        if !confirm(&message, self.yes)? {
            return Ok(());
        }
        let summary = facade::remove_all_people_by_name(db, &self.name).await?;
        summary.print_formatted();
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct FoodLovers {
    #[clap(short, long, default_value = facade::BURRITOS)]
    pub food: String,
    #[clap(short, long, default_value_t = facade::BURRITO_LOVERS_LIMIT)]
    pub limit: u32,
}

impl FoodLovers {
    pub async fn run<DB: PersonStore>(self, db: &DB) -> Result<()> {
        let people = facade::find_food_lovers(db, &self.food, self.limit).await?;
        people.print_formatted();
        Ok(())
    }
}

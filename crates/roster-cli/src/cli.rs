
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};

use roster_data::PersonStore;

use crate::commands::{
    AddFood,
    CreatePeople,
    CreatePerson,
    DeletePeople,
    DeletePerson,
    Exercise,
    FindOnePerson,
    FindPeople,
    FoodLovers,
    SetAge,
    ShowPerson,
};

#[derive(Parser, Debug)]
#[clap(name = "roster", version=env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Connection string of the document store
    #[clap(long, env = "MONGO_URI", hide_env_values = true)]
    pub mongo_uri: Option<String>,

    /// Keep people in memory instead of connecting to a store.
    /// Takes precedence over a connection string.
    #[clap(long)]
    pub in_memory: bool,

    #[clap(subcommand)]
    pub command: Command,
}

/// Where people are kept for this run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    Memory,
    Mongo(String),
}

impl Cli {
    pub fn init() -> Self {
        Self::parse()
    }

    /// `--in-memory` wins over any connection string
    pub fn backend(&self) -> Result<Backend> {
        if self.in_memory {
            return Ok(Backend::Memory);
        }
        self.mongo_uri
            .clone()
            .map(Backend::Mongo)
            .ok_or_else(|| anyhow!("no connection string, set MONGO_URI or pass --mongo-uri"))
    }
}


#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a person
    #[clap(name = "create")]
    Create(CreatePerson),
    /// Add all people from a JSON file
    #[clap(name = "create-many")]
    CreateMany(CreatePeople),
    /// List people with a name
    #[clap(name = "find")]
    Find(FindPeople),
    /// Show one person who likes a food
    #[clap(name = "find-one")]
    FindOne(FindOnePerson),
    /// Show a person
    #[clap(name = "show")]
    Show(ShowPerson),
    /// Add a favorite food to a person
    #[clap(name = "add-food")]
    AddFood(AddFood),
    /// Set the age of the first person with a name
    #[clap(name = "set-age")]
    SetAge(SetAge),
    /// Delete a person
    #[clap(name = "delete")]
    Delete(DeletePerson),
    /// Delete everyone with a name
    #[clap(name = "delete-all")]
    DeleteAll(DeletePeople),
    /// List people who like a food, by name, without age
    #[clap(name = "food-lovers")]
    FoodLovers(FoodLovers),
    /// Run every operation once against the store
    #[clap(name = "exercise")]
    Exercise(Exercise),
}

impl Command {
    pub async fn run<DB: PersonStore>(self, db: &DB) -> Result<()> {
        match self {
            Command::Create(cmd) => cmd.run(db).await,
            Command::CreateMany(cmd) => cmd.run(db).await,
            Command::Find(cmd) => cmd.run(db).await,
            Command::FindOne(cmd) => cmd.run(db).await,
            Command::Show(cmd) => cmd.run(db).await,
            Command::AddFood(cmd) => cmd.run(db).await,
            Command::SetAge(cmd) => cmd.run(db).await,
            Command::Delete(cmd) => cmd.run(db).await,
            Command::DeleteAll(cmd) => cmd.run(db).await,
            Command::FoodLovers(cmd) => cmd.run(db).await,
            Command::Exercise(cmd) => cmd.run(db).await,
        }
    }
}

use anyhow::{anyhow, Result};
use clap::Args;

use roster_data::PersonStore;

use crate::exercise::{self, Outcome};

#[derive(Args, Debug)]
pub struct Exercise {}

impl Exercise {
    /// Run every operation once and print how each went
    pub async fn run<DB: PersonStore>(self, db: &DB) -> Result<()> {
        let report = exercise::run(db).await;

        println!();
        for (step, outcome) in &report.steps {
            match outcome {
                Outcome::Done => println!("ok\t{}", step),
                Outcome::Skipped => println!("skip\t{}", step),
                Outcome::Failed(err) => println!("FAIL\t{}\t{}", step, err),
            }
        }
        println!();

        if !report.is_success() {
            return Err(anyhow!("exercise did not complete"));
        }
        Ok(())
    }
}

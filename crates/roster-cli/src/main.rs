
use anyhow::Result;
use env_logger::Env;

use roster_cli::cli::{Backend, Cli};
use roster_data::MemoryStore;
use roster_db::Connection;

#[tokio::main]
async fn main() -> Result<()> {
    // Settings from .env count as environment variables
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::init();

    let uri = match cli.backend()? {
        Backend::Memory => {
            let db = MemoryStore::new();
            return cli.command.run(&db).await;
        }
        Backend::Mongo(uri) => uri,
    };
    let conn = Connection::open(&uri).await?;
    let result = cli.command.run(&conn).await;
    conn.close().await;

    result
}

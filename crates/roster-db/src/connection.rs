use anyhow::Result;
use log::{debug, info, warn};
use mongodb::{Client, Collection, Database};

use roster_data::{Person, PersonSummary, PEOPLE};

use crate::schema;

/// Database used when the connection string does not name one
pub const DEFAULT_DATABASE: &str = "test";

/// Environment variable holding the connection string for tests
pub const TEST_URI_VAR: &str = "MONGO_URI";

/// A connection to the document store. Cloning is cheap and
/// shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Connection {
    client: Client,
    db: Database,
}

impl Connection {
    /// Open a connection to the store and install the schema
    pub async fn open(uri: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        let db = client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DATABASE));
        let conn = Self { client, db };

        schema::install(&conn).await?;
        info!("connected to database `{}`", conn.db.name());

        Ok(conn)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn people(&self) -> Collection<Person> {
        self.db.collection(PEOPLE)
    }

    /// The people collection, read without the age field
    pub fn people_summaries(&self) -> Collection<PersonSummary> {
        self.db.collection(PEOPLE)
    }

    /// Close the connection, waiting for in-flight operations
    pub async fn close(self) {
        debug!("closing connection to `{}`", self.db.name());
        self.client.shutdown().await;
    }

    /// Open a connection to a fresh test database.
    /// Returns `None` when no test server is configured.
    pub async fn open_test() -> Option<(TestHandle, Connection)> {
        let uri = std::env::var(TEST_URI_VAR).ok()?;
        let name = format!("roster_test_{}", rand::random::<u64>());
        let handle = TestHandle {
            uri: uri.clone(),
            name: name.clone(),
        };

        let client = Client::with_uri_str(&uri).await.unwrap();
        let db = client.database(&name);
        let conn = Self { client, db };

        // Install the schema
        schema::install(&conn).await.unwrap();

        Some((handle, conn))
    }
}

/// Drops its test database when it goes out of scope,
/// even when the test panicked.
pub struct TestHandle {
    uri: String,
    name: String,
}

impl TestHandle {
    pub fn database_name(&self) -> &str {
        &self.name
    }

    /// Drop the database from a fresh client on its own runtime,
    /// the test runtime may already be shutting down.
    fn drop_database(&self) -> Result<()> {
        let uri = self.uri.clone();
        let name = self.name.clone();
        let dropped = std::thread::spawn(move || -> Result<()> {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            rt.block_on(async {
                let client = Client::with_uri_str(&uri).await?;
                client.database(&name).drop().await?;
                client.shutdown().await;
                Ok::<_, anyhow::Error>(())
            })
        })
        .join();
        match dropped {
            Ok(result) => result,
            Err(_) => Err(anyhow::anyhow!("dropping `{}` panicked", self.name)),
        }
    }
}

impl Drop for TestHandle {
    fn drop(&mut self) {
        if let Err(err) = self.drop_database() {
            warn!("test database `{}` left behind: {}", self.name, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_handle_drops_database() {
        let Some((handle, db)) = Connection::open_test().await else {
            return;
        };
        let name = handle.database_name().to_string();
        let names = db.client.list_database_names().await.unwrap();
        assert!(names.contains(&name));

        drop(handle);

        let names = db.client.list_database_names().await.unwrap();
        assert_eq!(names.iter().find(|n| **n == name), None);
    }
}

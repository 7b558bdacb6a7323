use anyhow::Result;
use log::debug;
use mongodb::{bson::doc, options::IndexOptions, IndexModel};

use roster_data::PEOPLE;

use crate::Connection;

/// Install the collection indexes. Email is unique among
/// the people that have one.
pub async fn install(conn: &Connection) -> Result<()> {
    let email = IndexModel::builder()
        .keys(doc! { "email": 1 })
        .options(IndexOptions::builder().unique(true).sparse(true).build())
        .build();

    debug!("installing indexes on `{}`", PEOPLE);
    conn.people().create_index(email).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_install_is_repeatable() {
        let Some((_handle, db)) = Connection::open_test().await else {
            return;
        };
        install(&db).await.unwrap();
        install(&db).await.unwrap();
    }
}

use mongodb::{
    bson::doc,
    error::Error as DbError,
    options::{FindOneAndUpdateOptions, ReturnDocument, UpdateOptions},
    Database,
};
use rocket::http::Status;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::Coll;

pub const CANDIDATE_ID_COUNTER: &str = "candidate_id";
pub const VOTE_ID_COUNTER: &str = "vote_id";
pub const ADMIN_ID_COUNTER: &str = "admin_id";

/// A counter document used to implement auto-increment IDs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counter {
    #[serde(rename = "_id")]
    pub id: String,
    pub next: u32,
}

impl Counter {
    /// Atomically retrieve the next value of the named counter.
    pub async fn next(counters: &Coll<Counter>, id: &str) -> Result<u32> {
        let update = doc! {
            "$inc": { "next": 1 }
        };
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::Before)
            .build();
        let counter = counters
            .find_one_and_update(doc! { "_id": id }, update, options)
            .await?
            .ok_or_else(|| {
                Error::Status(
                    Status::InternalServerError,
                    format!("Failed to find counter with ID {}", id),
                )
            })?;
        Ok(counter.next)
    }
}

/// Ensure the ID counters exist, each starting at 1.
///
/// This operation is idempotent.
pub async fn ensure_counters_exist(db: &Database) -> std::result::Result<(), DbError> {
    debug!("Ensuring ID counters exist");

    let counters = Coll::<Counter>::from_db(db);
    let upsert = UpdateOptions::builder().upsert(true).build();
    for id in [CANDIDATE_ID_COUNTER, VOTE_ID_COUNTER, ADMIN_ID_COUNTER] {
        let update = doc! {
            "$setOnInsert": { "next": 1 }
        };
        counters
            .update_one(doc! { "_id": id }, update, upsert.clone())
            .await?;
    }

    Ok(())
}

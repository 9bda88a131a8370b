use mongodb::Client as MongoClient;
use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::Deserialize;

use crate::model::admin::NewAdmin;
use crate::storage::{
    mongodb::{ensure_counters_exist, ensure_indexes_exist},
    DynStorage, MemoryStorage, MongoStorage,
};

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Deserialize)]
pub struct Config {
    eligible_voters: u32,
}

impl Config {
    /// Number of voters eligible to vote, used to compute turnout.
    /// Zero means unknown, in which case turnout reports as "0.0".
    pub fn eligible_voters(&self) -> u32 {
        self.eligible_voters
    }
}

/// A fairing that loads the application config and puts it in managed state.
/// This could easily be achieved using `AdHoc::config`, but is written out
/// explicitly for symmetry with the other fairings and control over error
/// messages.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };

        // Manage the state.
        rocket = rocket.manage(config);
        Ok(rocket)
    }
}

/// Which storage backend to run against.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum StorageBackend {
    Memory,
    Mongodb,
}

/// Configuration for the storage service.
#[derive(Deserialize)]
struct StorageConfig {
    // non-secrets
    storage: StorageBackend,
    admin_username: String,
    // secrets
    admin_password: String,
}

/// Configuration for the database, only required by the mongodb backend.
#[derive(Deserialize)]
struct DbConfig {
    // secrets
    db_uri: String,
}

/// A fairing that constructs the configured storage backend, performs any
/// setup necessary (indexes, ID counters), seeds the operator account, and
/// places a [`DynStorage`] into managed state.
pub struct StorageFairing;

#[rocket::async_trait]
impl Fairing for StorageFairing {
    fn info(&self) -> Info {
        Info {
            name: "Storage",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<StorageConfig>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load storage config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };

        let storage: DynStorage = match config.storage {
            StorageBackend::Memory => {
                info!("Using the in-memory storage backend");
                Box::new(MemoryStorage::new())
            }
            StorageBackend::Mongodb => {
                let db_config = match rocket.figment().extract::<DbConfig>() {
                    Ok(config) => config,
                    Err(e) => {
                        error!("Failed to load database config");
                        rocket::config::pretty_print_error(e);
                        return Err(rocket);
                    }
                };
                info!("Loaded database config, connecting...");

                // Construct the connection.
                let client = match MongoClient::with_uri_str(&db_config.db_uri).await {
                    Ok(client) => client,
                    Err(e) => {
                        error!("Failed to connect to database: {e}");
                        return Err(rocket);
                    }
                };
                let db = client.database(&get_database_name());

                // Ensure the required indexes and ID counters exist.
                if let Err(e) = ensure_indexes_exist(&db).await {
                    error!("Failed to connect to database: {e}");
                    return Err(rocket);
                }
                if let Err(e) = ensure_counters_exist(&db).await {
                    error!("Failed to connect to database: {e}");
                    return Err(rocket);
                }
                info!("...database connection online!");

                Box::new(MongoStorage::new(client, db))
            }
        };

        // Ensure there is at least one admin user.
        let admin = NewAdmin {
            username: config.admin_username,
            password: config.admin_password,
        };
        if let Err(e) = storage.seed_admin(admin).await {
            error!("Failed to seed the admin account: {e}");
            return Err(rocket);
        }

        // Manage the state.
        rocket = rocket.manage(storage);
        Ok(rocket)
    }
}

/// Get the name of the database to use (production version).
#[cfg(not(test))]
fn get_database_name() -> String {
    "evote".to_string()
}

/// Get the name of the database to use (test version).
/// Use a random name to avoid collisions between tests.
#[cfg(test)]
fn get_database_name() -> String {
    let random: u32 = rand::random();
    let db = format!("test{random}");
    info!("Using database {db}");
    db
}

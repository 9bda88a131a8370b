#[macro_use]
extern crate rocket;

#[macro_use]
extern crate log;

use rocket::{Build, Rocket};

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod storage;

pub use config::Config;

/// Assemble the server: routes and catchers under `/api`, plus the fairings
/// that load config, bring the storage backend online, and log traffic.
pub fn build() -> Rocket<Build> {
    rocket::build()
        .mount("/api", api::routes())
        .register("/api", api::catchers())
        .attach(config::ConfigFairing)
        .attach(config::StorageFairing)
        .attach(logging::LoggerFairing)
}

/// Get a local client against a fresh server instance.
/// `Rocket.toml` defaults select the in-memory backend, so every test
/// starts from clean state.
#[cfg(test)]
pub(crate) async fn test_client() -> rocket::local::asynchronous::Client {
    test_client_with(rocket::Config::figment()).await
}

/// As [`test_client`], with figment overrides.
#[cfg(test)]
pub(crate) async fn test_client_with(
    figment: rocket::figment::Figment,
) -> rocket::local::asynchronous::Client {
    let rocket = build().configure(figment);
    rocket::local::asynchronous::Client::tracked(rocket)
        .await
        .expect("valid rocket instance")
}

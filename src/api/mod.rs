use rocket::{http::Status, Catcher, Route};

use crate::error::Error;

mod auth;
mod candidates;
mod votes;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(candidates::routes());
    routes.extend(votes::routes());
    routes.extend(auth::routes());
    routes
}

pub fn catchers() -> Vec<Catcher> {
    catchers![
        bad_request,
        unauthorized,
        not_found,
        unprocessable_entity,
        internal_error
    ]
}

#[catch(400)]
fn bad_request() -> Error {
    Error::bad_request("Invalid request data")
}

#[catch(401)]
fn unauthorized() -> Error {
    Error::unauthorized("Unauthorized")
}

#[catch(404)]
fn not_found() -> Error {
    Error::not_found("Resource not found")
}

/// Rocket reports well-formed JSON of the wrong shape as 422; the API
/// promises a plain 400 for every malformed body.
#[catch(422)]
fn unprocessable_entity() -> Error {
    Error::bad_request("Invalid request data")
}

#[catch(500)]
fn internal_error() -> Error {
    Error::Status(
        Status::InternalServerError,
        "Internal server error".to_string(),
    )
}

use rocket::{serde::json::Json, Route, State};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::admin::{AdminCredentials, AdminSummary};
use crate::storage::DynStorage;

pub fn routes() -> Vec<Route> {
    routes![login]
}

#[post("/admin/login", data = "<credentials>", format = "json")]
async fn login(
    credentials: Json<AdminCredentials>,
    storage: &State<DynStorage>,
) -> Result<Json<LoginResponse>> {
    credentials.validate()?;

    let admin = storage
        .get_admin_by_username(&credentials.username)
        .await?
        .filter(|admin| admin.verify_password(&credentials.password))
        .ok_or_else(|| Error::unauthorized("Invalid username or password"))?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        admin: admin.into(),
    }))
}

#[derive(Debug, Serialize, Deserialize)]
struct LoginResponse {
    message: String,
    admin: AdminSummary,
}

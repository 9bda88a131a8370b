use rocket::{
    response::status::Created,
    serde::json::Json,
    Route, State,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::candidate::{Candidate, CandidateId, CandidateSpec, CandidateUpdate};
use crate::storage::DynStorage;

pub fn routes() -> Vec<Route> {
    routes![
        get_candidates,
        create_candidate,
        update_candidate,
        delete_candidate,
    ]
}

#[get("/candidates")]
async fn get_candidates(storage: &State<DynStorage>) -> Result<Json<Vec<Candidate>>> {
    let candidates = storage.list_candidates().await?;
    Ok(Json(candidates))
}

#[post("/candidates", data = "<spec>", format = "json")]
async fn create_candidate(
    spec: Json<CandidateSpec>,
    storage: &State<DynStorage>,
) -> Result<Created<Json<Candidate>>> {
    spec.validate()?;
    let candidate = storage.create_candidate(spec.into_inner()).await?;
    let location = format!("/api/candidates/{}", candidate.id);
    Ok(Created::new(location).body(Json(candidate)))
}

#[patch("/candidates/<id>", data = "<update>", format = "json")]
async fn update_candidate(
    id: CandidateId,
    update: Json<CandidateUpdate>,
    storage: &State<DynStorage>,
) -> Result<Json<Candidate>> {
    update.validate()?;
    storage
        .update_candidate(id, update.into_inner())
        .await?
        .map(Json)
        .ok_or_else(|| Error::not_found("Candidate not found"))
}

#[delete("/candidates/<id>")]
async fn delete_candidate(
    id: CandidateId,
    storage: &State<DynStorage>,
) -> Result<Json<DeleteResponse>> {
    if storage.delete_candidate(id).await? {
        Ok(Json(DeleteResponse {
            message: "Candidate deleted successfully".to_string(),
        }))
    } else {
        Err(Error::not_found("Candidate not found"))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct DeleteResponse {
    message: String,
}

#[cfg(test)]
mod tests {
    use rocket::{
        http::{ContentType, Status},
        local::asynchronous::Client,
        serde::json::{serde_json, Value},
    };

    use crate::test_client;

    use super::*;

    async fn create(client: &Client, spec: &CandidateSpec) -> Candidate {
        let response = client
            .post("/api/candidates")
            .header(ContentType::JSON)
            .body(serde_json::to_string(spec).unwrap())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Created);
        response.into_json().await.unwrap()
    }

    #[rocket::async_test]
    async fn create_and_list() {
        let client = test_client().await;

        // Starts empty.
        let response = client.get("/api/candidates").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let listed: Vec<Candidate> = response.into_json().await.unwrap();
        assert!(listed.is_empty());

        let first = create(&client, &CandidateSpec::example1()).await;
        assert_eq!(first.id, 1);
        assert_eq!(first.votes, 0);
        assert_eq!(first.spec, CandidateSpec::example1());
        let second = create(&client, &CandidateSpec::example2()).await;
        assert_eq!(second.id, 2);

        let response = client.get("/api/candidates").dispatch().await;
        let listed: Vec<Candidate> = response.into_json().await.unwrap();
        assert_eq!(listed, vec![first, second]);
    }

    #[rocket::async_test]
    async fn create_rejects_empty_fields() {
        let client = test_client().await;

        let spec = CandidateSpec {
            name: "".to_string(),
            ..CandidateSpec::example1()
        };
        let response = client
            .post("/api/candidates")
            .header(ContentType::JSON)
            .body(serde_json::to_string(&spec).unwrap())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);

        // The body carries the individual failures.
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["errors"].as_array().unwrap().len(), 1);

        // A missing required field is a shape error, reported as 400 too.
        let response = client
            .post("/api/candidates")
            .header(ContentType::JSON)
            .body(r#"{"name": "No Party"}"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);

        let response = client.get("/api/candidates").dispatch().await;
        let listed: Vec<Candidate> = response.into_json().await.unwrap();
        assert!(listed.is_empty());
    }

    #[rocket::async_test]
    async fn update_applies_partial_fields() {
        let client = test_client().await;
        let candidate = create(&client, &CandidateSpec::example1()).await;

        let response = client
            .patch(format!("/api/candidates/{}", candidate.id))
            .header(ContentType::JSON)
            .body(r#"{"experience": "16 years in public service"}"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let updated: Candidate = response.into_json().await.unwrap();
        assert_eq!(updated.name, candidate.name);
        assert_eq!(updated.party, candidate.party);
        assert_eq!(updated.experience, "16 years in public service");
        assert_eq!(updated.votes, 0);

        // Supplied-but-empty fields are invalid.
        let response = client
            .patch(format!("/api/candidates/{}", candidate.id))
            .header(ContentType::JSON)
            .body(r#"{"name": ""}"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);

        // Unknown IDs are reported as such.
        let response = client
            .patch("/api/candidates/99")
            .header(ContentType::JSON)
            .body(r#"{"name": "Nobody"}"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::NotFound);
    }

    #[rocket::async_test]
    async fn delete_candidate_once() {
        let client = test_client().await;
        let candidate = create(&client, &CandidateSpec::example1()).await;

        let response = client
            .delete(format!("/api/candidates/{}", candidate.id))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let body: DeleteResponse = response.into_json().await.unwrap();
        assert_eq!(body.message, "Candidate deleted successfully");

        let response = client
            .delete(format!("/api/candidates/{}", candidate.id))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::NotFound);

        let response = client.get("/api/candidates").dispatch().await;
        let listed: Vec<Candidate> = response.into_json().await.unwrap();
        assert!(listed.is_empty());
    }
}

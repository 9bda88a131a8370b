use rocket::{
    response::status::Created,
    serde::json::Json,
    Route, State,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    stats::{percentage, VoteStats},
    vote::{Vote, VoteSpec},
};
use crate::storage::DynStorage;
use crate::Config;

pub fn routes() -> Vec<Route> {
    routes![cast_vote, check_vote, vote_stats]
}

#[post("/votes", data = "<spec>", format = "json")]
async fn cast_vote(
    spec: Json<VoteSpec>,
    storage: &State<DynStorage>,
) -> Result<Created<Json<Vote>>> {
    spec.validate()?;

    // Check the ordering requirements before mutating anything: the token
    // must be unused and the candidate must exist. The storage backend
    // re-checks both atomically, so a race here cannot double-count.
    if storage.has_voted(&spec.voter_token).await? {
        return Err(Error::bad_request("You have already voted"));
    }
    if storage.get_candidate(spec.candidate_id).await?.is_none() {
        return Err(Error::not_found("Candidate not found"));
    }

    let spec = spec.into_inner();
    let vote = storage.cast_vote(spec.candidate_id, spec.voter_token).await?;
    let location = format!("/api/votes/{}", vote.id);
    Ok(Created::new(location).body(Json(vote)))
}

#[get("/votes/check/<token>")]
async fn check_vote(token: &str, storage: &State<DynStorage>) -> Result<Json<VoteCheckResponse>> {
    let has_voted = storage.has_voted(token).await?;
    Ok(Json(VoteCheckResponse { has_voted }))
}

#[get("/votes/stats")]
async fn vote_stats(
    storage: &State<DynStorage>,
    config: &State<Config>,
) -> Result<Json<StatsResponse>> {
    let stats = storage.vote_stats().await?;
    let turnout_percentage = percentage(stats.total_votes, config.eligible_voters());
    Ok(Json(StatsResponse {
        stats,
        turnout_percentage,
    }))
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VoteCheckResponse {
    has_voted: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsResponse {
    #[serde(flatten)]
    stats: VoteStats,
    turnout_percentage: String,
}

#[cfg(test)]
mod tests {
    use rocket::{
        http::{ContentType, Status},
        local::asynchronous::Client,
        serde::json::serde_json,
    };

    use crate::model::candidate::{Candidate, CandidateSpec};
    use crate::{test_client, test_client_with};

    use super::*;

    async fn create_candidate(client: &Client, spec: &CandidateSpec) -> Candidate {
        let response = client
            .post("/api/candidates")
            .header(ContentType::JSON)
            .body(serde_json::to_string(spec).unwrap())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Created);
        response.into_json().await.unwrap()
    }

    async fn cast(client: &Client, candidate_id: u32, token: &str) -> Status {
        let response = client
            .post("/api/votes")
            .header(ContentType::JSON)
            .body(
                serde_json::json!({
                    "candidateId": candidate_id,
                    "voterToken": token,
                })
                .to_string(),
            )
            .dispatch()
            .await;
        response.status()
    }

    #[rocket::async_test]
    async fn cast_vote_once_per_token() {
        let client = test_client().await;
        let candidate = create_candidate(&client, &CandidateSpec::example1()).await;

        let response = client
            .post("/api/votes")
            .header(ContentType::JSON)
            .body(
                serde_json::json!({
                    "candidateId": candidate.id,
                    "voterToken": "voter-1",
                })
                .to_string(),
            )
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Created);
        let vote: Vote = response.into_json().await.unwrap();
        assert_eq!(vote.candidate_id, candidate.id);
        assert_eq!(vote.voter_token, "voter-1");

        // The same token is rejected, whatever the candidate.
        assert_eq!(cast(&client, candidate.id, "voter-1").await, Status::BadRequest);

        // The tally reflects exactly one accepted vote.
        let response = client.get("/api/candidates").dispatch().await;
        let listed: Vec<Candidate> = response.into_json().await.unwrap();
        assert_eq!(listed[0].votes, 1);
    }

    #[rocket::async_test]
    async fn cast_vote_rejects_bad_requests() {
        let client = test_client().await;
        let candidate = create_candidate(&client, &CandidateSpec::example1()).await;

        // Unknown candidate.
        assert_eq!(cast(&client, 99, "voter-1").await, Status::NotFound);

        // Empty token.
        assert_eq!(cast(&client, candidate.id, "").await, Status::BadRequest);

        // Wrong shape entirely.
        let response = client
            .post("/api/votes")
            .header(ContentType::JSON)
            .body(r#"{"candidateId": "one"}"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);

        // Nothing was recorded.
        let response = client.get("/api/candidates").dispatch().await;
        let listed: Vec<Candidate> = response.into_json().await.unwrap();
        assert_eq!(listed[0].votes, 0);
    }

    #[rocket::async_test]
    async fn check_vote_reflects_stored_tokens() {
        let client = test_client().await;
        let candidate = create_candidate(&client, &CandidateSpec::example1()).await;

        let response = client.get("/api/votes/check/voter-1").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let check: VoteCheckResponse = response.into_json().await.unwrap();
        assert!(!check.has_voted);

        assert_eq!(cast(&client, candidate.id, "voter-1").await, Status::Created);

        let response = client.get("/api/votes/check/voter-1").dispatch().await;
        let check: VoteCheckResponse = response.into_json().await.unwrap();
        assert!(check.has_voted);
    }

    #[rocket::async_test]
    async fn stats_with_no_votes() {
        let client = test_client().await;
        create_candidate(&client, &CandidateSpec::example1()).await;
        create_candidate(&client, &CandidateSpec::example2()).await;

        let response = client.get("/api/votes/stats").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let stats: StatsResponse = response.into_json().await.unwrap();
        assert_eq!(stats.stats.total_votes, 0);
        assert!(stats.stats.candidates.iter().all(|c| c.percentage == "0.0"));
        assert_eq!(stats.turnout_percentage, "0.0");
    }

    #[rocket::async_test]
    async fn stats_with_split_votes() {
        let figment = rocket::Config::figment().merge(("eligible_voters", 10));
        let client = test_client_with(figment).await;
        let first = create_candidate(&client, &CandidateSpec::example1()).await;
        let second = create_candidate(&client, &CandidateSpec::example2()).await;
        create_candidate(&client, &CandidateSpec::example3()).await;

        assert_eq!(cast(&client, first.id, "voter-1").await, Status::Created);
        assert_eq!(cast(&client, first.id, "voter-2").await, Status::Created);
        assert_eq!(cast(&client, second.id, "voter-3").await, Status::Created);

        let response = client.get("/api/votes/stats").dispatch().await;
        let stats: StatsResponse = response.into_json().await.unwrap();
        assert_eq!(stats.stats.total_votes, 3);
        let percentages: Vec<_> = stats
            .stats
            .candidates
            .iter()
            .map(|c| c.percentage.as_str())
            .collect();
        assert_eq!(percentages, vec!["66.7", "33.3", "0.0"]);

        // Turnout is computed from the configured electorate size.
        assert_eq!(stats.turnout_percentage, "30.0");
    }

    #[rocket::async_test]
    async fn stats_after_candidate_deletion() {
        let client = test_client().await;
        let first = create_candidate(&client, &CandidateSpec::example1()).await;
        let second = create_candidate(&client, &CandidateSpec::example2()).await;
        assert_eq!(cast(&client, first.id, "voter-1").await, Status::Created);
        assert_eq!(cast(&client, second.id, "voter-2").await, Status::Created);

        let response = client
            .delete(format!("/api/candidates/{}", first.id))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);

        // The deleted candidate drops out of the stats; its token stays used.
        let response = client.get("/api/votes/stats").dispatch().await;
        let stats: StatsResponse = response.into_json().await.unwrap();
        assert_eq!(stats.stats.candidates.len(), 1);
        assert_eq!(stats.stats.total_votes, 1);
        let response = client.get("/api/votes/check/voter-1").dispatch().await;
        let check: VoteCheckResponse = response.into_json().await.unwrap();
        assert!(check.has_voted);
    }
}

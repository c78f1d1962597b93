//! End-to-end exercise of the overtime/offset ledger over HTTP.
//!
//! Requires a running server and a migrated database:
//!
//! ```text
//! WORKTRACK_API_URL=http://127.0.0.1:3000 cargo test --test api_flow
//! ```
//!
//! Every test is skipped when `WORKTRACK_API_URL` is unset.

use reqwest::StatusCode;
use serde_json::{json, Value};

fn api_url() -> Option<String> {
    std::env::var("WORKTRACK_API_URL").ok()
}

struct TestClient {
    base: String,
    client: reqwest::Client,
    token: String,
}

impl TestClient {
    /// Registers a fresh user and logs in.
    async fn new(base: String) -> Self {
        let client = reqwest::Client::new();
        let username = format!(
            "tester_{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        );
        let creds = json!({ "username": username, "password": "hunter2hunter2" });

        let resp = client
            .post(format!("{base}/auth/register"))
            .json(&creds)
            .send()
            .await
            .expect("register request");
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = client
            .post(format!("{base}/auth/login"))
            .json(&creds)
            .send()
            .await
            .expect("login request");
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = resp.json().await.expect("login body");
        let token = body["token"].as_str().expect("token").to_string();

        Self { base, client, token }
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let resp = self
            .client
            .post(format!("{}{}", self.base, path))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .expect("post request");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(Value::Null);
        (status, body)
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let resp = self
            .client
            .get(format!("{}{}", self.base, path))
            .bearer_auth(&self.token)
            .send()
            .await
            .expect("get request");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(Value::Null);
        (status, body)
    }

    async fn delete(&self, path: &str) -> StatusCode {
        self.client
            .delete(format!("{}{}", self.base, path))
            .bearer_auth(&self.token)
            .send()
            .await
            .expect("delete request")
            .status()
    }

    async fn create_activity(&self, title: &str, start: &str, end: Option<&str>) -> i64 {
        let (status, body) = self
            .post(
                "/activities",
                json!({ "title": title, "start_date": start, "end_date": end }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "activity creation: {body}");
        body["data"]["id"].as_i64().expect("activity id")
    }

    async fn create_grant(&self, activity_id: i64, days: i64) -> (StatusCode, Value) {
        self.post(
            "/overtime",
            json!({ "activity_id": activity_id, "days": days }),
        )
        .await
    }

    async fn create_offset(&self, activity_id: i64, date: &str, reason: &str) -> (StatusCode, Value) {
        self.post(
            "/offset",
            json!({ "activity_id": activity_id, "offset_date": date, "reason": reason }),
        )
        .await
    }
}

/// Full redemption lifecycle: a two-day grant yields exactly two offsets,
/// then reports an exhausted balance.
#[tokio::test]
async fn grant_two_days_redeem_twice_third_fails() {
    let Some(base) = api_url() else {
        eprintln!("WORKTRACK_API_URL not set, skipping");
        return;
    };
    let tc = TestClient::new(base).await;

    let activity = tc
        .create_activity("Deployment window", "2024-07-01", Some("2024-07-02"))
        .await;

    let (status, body) = tc.create_grant(activity, 2).await;
    assert_eq!(status, StatusCode::CREATED, "grant: {body}");

    let (status, _) = tc.create_offset(activity, "2099-07-10", "clinic").await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = tc.create_offset(activity, "2099-07-11", "errand").await;
    assert_eq!(status, StatusCode::CREATED);

    // Capacity exhausted.
    let (status, body) = tc.create_offset(activity, "2099-07-12", "one more").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .unwrap_or_default()
            .contains("No available overtime"),
        "unexpected message: {body}"
    );

    let (status, body) = tc.get("/balance").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["remaining_days"], 0, "balance: {body}");
    assert_eq!(body["data"]["used_days"], 2);
    assert_eq!(body["data"]["total_offset_count"], 2);
    assert_eq!(body["data"]["overtime_hours"], 0);

    // The consumed grant shows up as `used` in the listing.
    let (status, body) = tc.get("/overtime").await;
    assert_eq!(status, StatusCode::OK);
    let grants = body["data"].as_array().expect("grants");
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0]["used_days"], 2);
    assert_eq!(grants[0]["status"], "used");
}

/// Days beyond the activity's calendar span are rejected; the boundary value
/// is accepted.
#[tokio::test]
async fn grant_days_capped_by_activity_duration() {
    let Some(base) = api_url() else {
        eprintln!("WORKTRACK_API_URL not set, skipping");
        return;
    };
    let tc = TestClient::new(base).await;

    let activity = tc
        .create_activity("Three-day drill", "2024-06-01", Some("2024-06-03"))
        .await;

    let (status, body) = tc.create_grant(activity, 4).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(
        body["message"]
            .as_str()
            .unwrap_or_default()
            .contains("activity duration"),
        "unexpected message: {body}"
    );

    let (status, _) = tc.create_grant(activity, 3).await;
    assert_eq!(status, StatusCode::CREATED);

    // Activity with no end date allows a single day only.
    let single = tc.create_activity("One-off", "2024-06-10", None).await;
    let (status, _) = tc.create_grant(single, 2).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = tc.create_grant(single, 1).await;
    assert_eq!(status, StatusCode::CREATED);
}

/// An offset dated today (or earlier) is rejected; only strictly future
/// dates are accepted.
#[tokio::test]
async fn offset_date_must_be_strictly_future() {
    let Some(base) = api_url() else {
        eprintln!("WORKTRACK_API_URL not set, skipping");
        return;
    };
    let tc = TestClient::new(base).await;

    let activity = tc
        .create_activity("Validation case", "2024-07-01", Some("2024-07-02"))
        .await;
    let (status, _) = tc.create_grant(activity, 2).await;
    assert_eq!(status, StatusCode::CREATED);

    let today = chrono::Utc::now().date_naive().to_string();
    let (status, body) = tc.create_offset(activity, &today, "no notice").await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "today: {body}");

    let (status, body) = tc.create_offset(activity, "2020-01-01", "in the past").await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "past: {body}");

    // Whitespace-only reason is a validation failure too.
    let (status, body) = tc.create_offset(activity, "2099-01-01", "   ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "blank reason: {body}");
}

/// With two eligible grants on the same activity, redemptions drain the
/// older grant before touching the newer one.
#[tokio::test]
async fn redemption_consumes_oldest_grant_first() {
    let Some(base) = api_url() else {
        eprintln!("WORKTRACK_API_URL not set, skipping");
        return;
    };
    let tc = TestClient::new(base).await;

    let activity = tc
        .create_activity("Long haul", "2024-05-01", Some("2024-05-10"))
        .await;

    let (status, body) = tc.create_grant(activity, 1).await;
    assert_eq!(status, StatusCode::CREATED);
    let older_id = body["data"]["id"].as_i64().expect("grant id");
    let (status, body) = tc.create_grant(activity, 2).await;
    assert_eq!(status, StatusCode::CREATED);
    let newer_id = body["data"]["id"].as_i64().expect("grant id");
    assert!(older_id < newer_id);

    let (status, _) = tc.create_offset(activity, "2099-05-20", "first").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = tc.get("/overtime").await;
    assert_eq!(status, StatusCode::OK);
    let grants = body["data"].as_array().expect("grants");
    let find = |id: i64| {
        grants
            .iter()
            .find(|g| g["id"].as_i64() == Some(id))
            .expect("grant present")
    };
    assert_eq!(find(older_id)["status"], "used");
    assert_eq!(find(older_id)["used_days"], 1);
    assert_eq!(find(newer_id)["used_days"].as_i64().unwrap_or(0), 0);
}

/// N concurrent redemptions against R remaining days: exactly R succeed and
/// used_days never exceeds total_days.
#[tokio::test]
async fn concurrent_redemptions_never_double_consume() {
    let Some(base) = api_url() else {
        eprintln!("WORKTRACK_API_URL not set, skipping");
        return;
    };
    let tc = TestClient::new(base).await;

    let activity = tc
        .create_activity("Race window", "2024-08-01", Some("2024-08-03"))
        .await;
    let (status, _) = tc.create_grant(activity, 3).await;
    assert_eq!(status, StatusCode::CREATED);

    let mut handles = Vec::new();
    for i in 0..8 {
        let client = tc.client.clone();
        let base = tc.base.clone();
        let token = tc.token.clone();
        handles.push(tokio::spawn(async move {
            client
                .post(format!("{base}/offset"))
                .bearer_auth(token)
                .json(&json!({
                    "activity_id": activity,
                    "offset_date": "2099-08-10",
                    "reason": format!("attempt {i}"),
                }))
                .send()
                .await
                .expect("offset request")
                .status()
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.expect("join") == StatusCode::CREATED {
            successes += 1;
        }
    }
    assert_eq!(successes, 3, "exactly the remaining capacity is consumed");

    let (status, body) = tc.get("/overtime").await;
    assert_eq!(status, StatusCode::OK);
    let grants = body["data"].as_array().expect("grants");
    assert_eq!(grants[0]["used_days"], 3);
    assert_eq!(grants[0]["status"], "used");
}

/// Deleting a redemption leaves the grant's used_days untouched, and a
/// foreign or missing request id reads as not-found.
#[tokio::test]
async fn deletion_semantics() {
    let Some(base) = api_url() else {
        eprintln!("WORKTRACK_API_URL not set, skipping");
        return;
    };
    let tc = TestClient::new(base.clone()).await;

    let activity = tc
        .create_activity("Cleanup", "2024-09-01", Some("2024-09-02"))
        .await;
    let (status, _) = tc.create_grant(activity, 2).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = tc.create_offset(activity, "2099-09-10", "dentist").await;
    assert_eq!(status, StatusCode::CREATED);
    let offset_id = body["data"]["id"].as_i64().expect("offset id");

    // Another user cannot delete it, and cannot tell whether it exists.
    let stranger = TestClient::new(base).await;
    assert_eq!(
        stranger.delete(&format!("/offset/{offset_id}")).await,
        StatusCode::NOT_FOUND
    );

    assert_eq!(
        tc.delete(&format!("/offset/{offset_id}")).await,
        StatusCode::OK
    );
    assert_eq!(
        tc.delete(&format!("/offset/{offset_id}")).await,
        StatusCode::NOT_FOUND
    );

    // The consumed day stays consumed after the redemption row is gone.
    let (_, body) = tc.get("/balance").await;
    assert_eq!(body["data"]["used_days"], 1);
    assert_eq!(body["data"]["remaining_days"], 1);
    assert_eq!(body["data"]["total_offset_count"], 0);

    // Unconsumed grants can be removed outright.
    let (_, body) = tc.get("/overtime").await;
    let grant_id = body["data"][0]["id"].as_i64().expect("grant id");
    assert_eq!(
        tc.delete(&format!("/overtime/{grant_id}")).await,
        StatusCode::OK
    );
}

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};
use uuid::Uuid;

mod common;
use common::client::TestClient;
use common::TestContext;

#[tokio::test]
async fn health_needs_no_token() {
    let ctx = TestContext::new().await;
    let app = test::init_service(TestClient::create_app(&ctx)).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_or_wrong_token_is_unauthorized() {
    let ctx = TestContext::new().await;
    let app = test::init_service(TestClient::create_app(&ctx)).await;

    let req = test::TestRequest::get().uri("/withdrawals").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/withdrawals")
        .insert_header(("Authorization", "Bearer not-the-key"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn withdrawal_lifecycle_over_http() {
    let ctx = TestContext::new().await;
    let app = test::init_service(TestClient::create_app(&ctx)).await;
    let admin = Uuid::now_v7();

    let alice = Uuid::now_v7();
    let bob = Uuid::now_v7();
    for (id, name) in [(alice, "Alice"), (bob, "Bob")] {
        let req = test::TestRequest::put()
            .uri(&format!("/players/{id}"))
            .insert_header(TestClient::auth_header())
            .set_json(json!({ "name": name }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    let req = test::TestRequest::post()
        .uri("/partnerships")
        .insert_header(TestClient::auth_header())
        .set_json(json!({
            "captainId": alice,
            "partnerId": bob,
            "divisionId": ctx.division,
            "seasonId": ctx.season,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let team: Value = test::read_body_json(resp).await;
    assert_eq!(team["status"], "ACTIVE");
    let team_id = team["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/withdrawals")
        .insert_header(TestClient::auth_header())
        .set_json(json!({ "partnershipId": team_id, "requestingUserId": bob, "reason": "relocating" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let request: Value = test::read_body_json(resp).await;
    assert_eq!(request["status"], "PENDING");
    let request_id = request["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/withdrawals?status=PENDING&pageSize=10")
        .insert_header(TestClient::auth_header())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page: Value = test::read_body_json(resp).await;
    assert_eq!(page["totalItems"], 1);
    assert_eq!(page["pageSize"], 10);
    assert_eq!(page["items"][0]["request"]["id"], request_id.as_str());
    assert_eq!(page["items"][0]["requester"]["name"], "Bob");

    let decision = json!({ "adminId": admin, "notes": "ok" });
    let req = test::TestRequest::post()
        .uri(&format!("/withdrawals/{request_id}/approve"))
        .insert_header(TestClient::auth_header())
        .set_json(&decision)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let outcome: Value = test::read_body_json(resp).await;
    assert_eq!(outcome["withdrawalRequest"]["status"], "APPROVED");
    assert_eq!(outcome["dissolvedPartnership"]["status"], "DISSOLVED");
    assert_eq!(outcome["successorPartnership"]["status"], "FORMING");
    assert_eq!(outcome["successorPartnership"]["predecessorId"], team_id.as_str());
    assert_eq!(outcome["successorPartnership"]["captainId"], alice.to_string());

    // second admin loses the race
    let req = test::TestRequest::post()
        .uri(&format!("/withdrawals/{request_id}/approve"))
        .insert_header(TestClient::auth_header())
        .set_json(&decision)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "INVALID_STATE");
    assert!(body["message"].as_str().unwrap().contains("already processed"));

    let req = test::TestRequest::get()
        .uri(&format!("/withdrawals/{request_id}/timeline"))
        .insert_header(TestClient::auth_header())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let events: Value = test::read_body_json(resp).await;
    let kinds: Vec<&str> = events.as_array().unwrap().iter().map(|e| e["kind"].as_str().unwrap()).collect();
    assert_eq!(
        kinds,
        vec!["PARTNERSHIP_CREATED", "WITHDRAWAL_REQUESTED", "WITHDRAWAL_APPROVED", "PARTNERSHIP_DISSOLVED", "SUCCESSOR_CREATED"]
    );

    let req = test::TestRequest::get()
        .uri("/partnerships/dissolved")
        .insert_header(TestClient::auth_header())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let page: Value = test::read_body_json(resp).await;
    assert_eq!(page["totalItems"], 1);
    assert_eq!(page["items"][0]["partnership"]["id"], team_id.as_str());
    assert_eq!(page["items"][0]["withdrawalRequest"]["id"], request_id.as_str());
    assert_eq!(page["items"][0]["successor"]["captain"]["name"], "Alice");
}

#[tokio::test]
async fn malformed_input_is_bad_request() {
    let ctx = TestContext::new().await;
    let app = test::init_service(TestClient::create_app(&ctx)).await;

    let req = test::TestRequest::get()
        .uri("/withdrawals/not-a-uuid")
        .insert_header(TestClient::auth_header())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "BAD_REQUEST");

    let req = test::TestRequest::post()
        .uri("/withdrawals")
        .insert_header(TestClient::auth_header())
        .set_json(json!({ "partnershipId": Uuid::now_v7() }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/partnerships/dissolved?status=ACTIVE")
        .insert_header(TestClient::auth_header())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let req = test::TestRequest::get()
        .uri("/withdrawals?page=18446744073709551615")
        .insert_header(TestClient::auth_header())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let req = test::TestRequest::get()
        .uri(&format!("/partnerships/{}", Uuid::now_v7()))
        .insert_header(TestClient::auth_header())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn season_close_over_http() {
    let ctx = TestContext::new().await;
    let app = test::init_service(TestClient::create_app(&ctx)).await;
    ctx.active_team("Alice", "Bob").await;

    let req = test::TestRequest::post()
        .uri("/seasons/close")
        .insert_header(TestClient::auth_header())
        .set_json(json!({ "divisionId": ctx.division, "seasonId": ctx.season, "adminId": Uuid::now_v7() }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let summary: Value = test::read_body_json(resp).await;
    assert_eq!(summary, json!({ "expiredPartnerships": 1, "rejectedRequests": 0 }));
}

mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use common::{spawn_app, TestApp};

fn amounts(deposits: &Value, status: &str) -> Vec<f64> {
    deposits
        .as_array()
        .unwrap()
        .iter()
        .filter(|d| d["status"] == status)
        .map(|d| d["deposited_amount"].as_f64().unwrap())
        .collect()
}

async fn create_quarter_plan(app: &TestApp, token: &str) -> Value {
    let (status, body) = app
        .send(
            Method::POST,
            "/api/savings-plans",
            Some(token),
            Some(json!({
                "name": "Bike",
                "description": "Road bike fund",
                "start_date": "2025-01-01",
                "end_date": "2025-03-31",
                "amount": 300,
                "period": "month",
                "totalPeriods": 3,
                "amountPerPeriod": 100
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body
}

#[tokio::test]
async fn create_confirm_reset_and_delete_plan() {
    let app = spawn_app().await;
    let token = app.sign_up("Ana", "ana@example.com", "password123").await;

    let created = create_quarter_plan(&app, &token).await;
    let plan_id = created["plan"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["plan"]["status"], "active");
    assert_eq!(created["plan"]["total_periods"], 3);
    assert_eq!(amounts(&created["deposits"], "pending"), vec![100.0, 100.0, 100.0]);

    let (status, deposits) = app
        .send(
            Method::GET,
            &format!("/api/deposits?savingsplanid={plan_id}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let first = deposits[0].clone();
    assert_eq!(first["date"], "2025-01-01");
    let first_id = first["id"].as_str().unwrap().to_string();

    // Pay less than planned: the shortfall is spread over the remaining slots.
    let (status, confirmed) = app
        .send(
            Method::PUT,
            &format!("/api/deposits/{first_id}"),
            Some(&token),
            Some(json!({
                "id": first_id,
                "plan_id": plan_id,
                "deposited_amount": 100,
                "editableAmount": 50
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{confirmed}");
    assert_eq!(confirmed["plan"]["completed_periods"], 1);
    assert_eq!(confirmed["plan"]["deposited_amount"].as_f64(), Some(50.0));
    assert_eq!(amounts(&confirmed["deposits"], "completed"), vec![50.0]);
    assert_eq!(amounts(&confirmed["deposits"], "pending"), vec![125.0, 125.0]);

    let (status, reset) = app
        .send(
            Method::PUT,
            &format!("/api/deposits/reset/{first_id}"),
            Some(&token),
            Some(json!({ "id": first_id, "plan_id": plan_id })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{reset}");
    assert_eq!(reset["plan"]["completed_periods"], 0);
    assert_eq!(reset["plan"]["deposited_amount"].as_f64(), Some(0.0));
    assert_eq!(amounts(&reset["deposits"], "pending"), vec![100.0, 100.0, 100.0]);

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/api/savings-plans/{plan_id}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/savings-plans/{plan_id}"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn overpayment_completes_plan() {
    let app = spawn_app().await;
    let token = app.sign_up("Ana", "ana@example.com", "password123").await;
    let created = create_quarter_plan(&app, &token).await;
    let plan_id = created["plan"]["id"].as_str().unwrap();
    let first_id = created["deposits"][0]["id"].as_str().unwrap();

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/deposits/{first_id}"),
            Some(&token),
            Some(json!({ "id": first_id, "plan_id": plan_id, "deposited_amount": 350 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["plan"]["status"], "completed");
    assert_eq!(body["plan"]["amount"].as_f64(), Some(350.0));
    assert_eq!(body["plan"]["total_periods"], 1);
    assert!(amounts(&body["deposits"], "pending").is_empty());
}

#[tokio::test]
async fn paused_plan_rejects_confirmation_until_resumed() {
    let app = spawn_app().await;
    let token = app.sign_up("Ana", "ana@example.com", "password123").await;
    let created = create_quarter_plan(&app, &token).await;
    let plan_id = created["plan"]["id"].as_str().unwrap();
    let first_id = created["deposits"][0]["id"].as_str().unwrap();

    let (status, body) = app
        .send(
            Method::PATCH,
            &format!("/api/savings-plans/{plan_id}"),
            Some(&token),
            Some(json!({ "status": "pause" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["plan"]["status"], "paused");

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/deposits/{first_id}"),
            Some(&token),
            Some(json!({ "id": first_id, "plan_id": plan_id, "deposited_amount": 100 })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);

    // Pausing twice is not a legal transition either.
    let (status, _) = app
        .send(
            Method::PATCH,
            &format!("/api/savings-plans/{plan_id}"),
            Some(&token),
            Some(json!({ "status": "pause" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = app
        .send(
            Method::PATCH,
            &format!("/api/savings-plans/{plan_id}"),
            Some(&token),
            Some(json!({ "status": "resume" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["plan"]["status"], "active");
}

#[tokio::test]
async fn plans_are_private_to_their_owner() {
    let app = spawn_app().await;
    let ana = app.sign_up("Ana", "ana@example.com", "password123").await;
    let bob = app.sign_up("Bob", "bob@example.com", "password123").await;
    let created = create_quarter_plan(&app, &ana).await;
    let plan_id = created["plan"]["id"].as_str().unwrap();
    let first_id = created["deposits"][0]["id"].as_str().unwrap();

    let (status, _) = app
        .send(
            Method::GET,
            &format!("/api/savings-plans/{plan_id}"),
            Some(&bob),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/deposits/{first_id}"),
            Some(&bob),
            Some(json!({ "id": first_id, "plan_id": plan_id, "deposited_amount": 100 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app
        .send(Method::GET, "/api/savings-plans", Some(&bob), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn invalid_schedule_is_a_bad_request() {
    let app = spawn_app().await;
    let token = app.sign_up("Ana", "ana@example.com", "password123").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/savings-plans",
            Some(&token),
            Some(json!({
                "name": "Backwards",
                "start_date": "2025-06-01",
                "end_date": "2025-01-01",
                "amount": 300,
                "period": "month",
                "totalPeriods": 3
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);

    let (status, _) = app
        .send(Method::GET, "/api/deposits", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_amounts_are_rejected_and_writes_keep_working() {
    let app = spawn_app().await;
    let token = app.sign_up("Ana", "ana@example.com", "password123").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/savings-plans",
            Some(&token),
            Some(json!({
                "name": "Moonshot",
                "start_date": "2025-01-01",
                "end_date": "2025-02-28",
                "amount": 5e28,
                "period": "month",
                "totalPeriods": 2
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let created = create_quarter_plan(&app, &token).await;
    let plan_id = created["plan"]["id"].as_str().unwrap();
    let first_id = created["deposits"][0]["id"].as_str().unwrap();

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/deposits/{first_id}"),
            Some(&token),
            Some(json!({ "id": first_id, "plan_id": plan_id, "deposited_amount": 4e28 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/savings-plans/{plan_id}"),
            Some(&token),
            Some(json!({ "new_total_amount": 5e28 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Other writes are still served.
    app.sign_up("Bob", "bob@example.com", "password123").await;
    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/deposits/{first_id}"),
            Some(&token),
            Some(json!({ "id": first_id, "plan_id": plan_id, "deposited_amount": 100 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["plan"]["completed_periods"], 1);
}

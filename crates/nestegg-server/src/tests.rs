//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use nestegg_core::models::{NewGoal, NewTransaction, TransactionType};
use nestegg_core::Database;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tower::ServiceExt;

fn setup_test_app() -> (Router, Database, i64) {
    let db = Database::in_memory().unwrap();
    let user = db.ensure_default_user().unwrap();
    db.seed_default_categories(user.id).unwrap();
    let config = ServerConfig {
        user_id: user.id,
        ..Default::default()
    };
    (create_router(db.clone(), None, config), db, user.id)
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn delete_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Decimals are serialized as strings
fn decimal(value: &serde_json::Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

// ========== User API Tests ==========

#[tokio::test]
async fn test_get_me() {
    let (app, _db, user_id) = setup_test_app();

    let response = app.oneshot(get_request("/api/me")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["id"], user_id);
    assert!(json["email"].as_str().unwrap().contains('@'));
}

#[tokio::test]
async fn test_get_me_unknown_user() {
    let db = Database::in_memory().unwrap();
    let app = create_router(db, None, ServerConfig::default());

    let response = app.oneshot(get_request("/api/me")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Transaction API Tests ==========

#[tokio::test]
async fn test_create_and_list_transactions() {
    let (app, _db, _) = setup_test_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/transactions",
            serde_json::json!({
                "type": "expense",
                "amount": "19.99",
                "category": "food",
                "description": "Groceries",
                "date": "2024-03-02"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let created = get_body_json(response).await;
    assert_eq!(created["type"], "expense");
    assert_eq!(decimal(&created["amount"]), dec!(19.99));
    let id = created["id"].as_i64().unwrap();

    let response = app.clone().oneshot(get_request("/api/transactions")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/transactions/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(delete_request(&format!("/api/transactions/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_request(&format!("/api/transactions/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_transaction_numeric_amount() {
    let (app, _db, _) = setup_test_app();

    let response = app
        .oneshot(post_json(
            "/api/transactions",
            serde_json::json!({
                "type": "income",
                "amount": 50000,
                "category": "salary",
                "date": "2024-03-01"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(decimal(&json["amount"]), dec!(50000));
}

#[tokio::test]
async fn test_create_transaction_validation() {
    let (app, _db, _) = setup_test_app();

    // Too many decimals
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/transactions",
            serde_json::json!({
                "type": "expense",
                "amount": "1.999",
                "category": "food",
                "date": "2024-03-02"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Invalid amount"));

    // Bad date
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/transactions",
            serde_json::json!({
                "type": "expense",
                "amount": "10",
                "category": "food",
                "date": "03/02/2024"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unknown goal
    let response = app
        .oneshot(post_json(
            "/api/transactions",
            serde_json::json!({
                "type": "income",
                "amount": "10",
                "category": "salary",
                "date": "2024-03-02",
                "goal_id": 999
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_json_body() {
    let (app, _db, _) = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/transactions")
                .header("content-type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ========== Category API Tests ==========

#[tokio::test]
async fn test_list_categories_by_type() {
    let (app, _db, _) = setup_test_app();

    let response = app
        .clone()
        .oneshot(get_request("/api/categories?type=income"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    let categories = json.as_array().unwrap();
    assert_eq!(categories.len(), 6);
    assert!(categories.iter().all(|c| c["type"] == "income"));

    let response = app
        .oneshot(get_request("/api/categories?type=savings"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_and_delete_category() {
    let (app, _db, _) = setup_test_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/categories",
            serde_json::json!({"name": "Pets", "type": "expense", "icon": "🐕"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["icon"], "🐕");
    assert_eq!(json["color"], "#6366F1");
    let id = json["id"].as_i64().unwrap();

    // Duplicate name of the same type
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/categories",
            serde_json::json!({"name": "Pets", "type": "expense"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(delete_request(&format!("/api/categories/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(delete_request(&format!("/api/categories/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Goal API Tests ==========

#[tokio::test]
async fn test_create_goal_with_progress() {
    let (app, _db, _) = setup_test_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/goals",
            serde_json::json!({
                "name": "Vacation",
                "target_amount": "100000",
                "target_date": "2025-12-31T21:00:00.000Z"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["name"], "Vacation");
    assert_eq!(json["target_date"], "2025-12-31");
    assert_eq!(json["completed"], false);
    assert_eq!(decimal(&json["progress"]["percent_complete"]), Decimal::ZERO);
    let id = json["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/transactions",
            serde_json::json!({
                "type": "income",
                "amount": "25000",
                "category": "salary",
                "date": "2024-03-01",
                "goal_id": id
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_request(&format!("/api/goals/{}", id)))
        .await
        .unwrap();
    let json = get_body_json(response).await;
    assert_eq!(decimal(&json["current_saved"]), dec!(25000));
    assert_eq!(decimal(&json["progress"]["percent_complete"]), dec!(25));
}

#[tokio::test]
async fn test_create_goal_validation() {
    let (app, _db, _) = setup_test_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/goals",
            serde_json::json!({"name": "", "target_amount": "100"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(post_json(
            "/api/goals",
            serde_json::json!({"name": "Tiny", "target_amount": "0.50"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_active_goals_exclude_completed() {
    let (app, db, user_id) = setup_test_app();

    let done = db
        .create_goal(
            user_id,
            &NewGoal {
                name: "Done".to_string(),
                description: None,
                target_amount: dec!(100),
                target_date: None,
            },
        )
        .unwrap();
    db.create_goal(
        user_id,
        &NewGoal {
            name: "Open".to_string(),
            description: None,
            target_amount: dec!(1000),
            target_date: None,
        },
    )
    .unwrap();
    db.insert_transaction(
        user_id,
        &NewTransaction {
            transaction_type: TransactionType::Income,
            amount: dec!(100),
            category: "salary".to_string(),
            description: None,
            date: chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            eco_impact: None,
            goal_id: Some(done),
        },
    )
    .unwrap();

    let response = app.clone().oneshot(get_request("/api/goals")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 2);

    let response = app.oneshot(get_request("/api/goals/active")).await.unwrap();
    let json = get_body_json(response).await;
    let active = json.as_array().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["name"], "Open");
}

#[tokio::test]
async fn test_delete_goal() {
    let (app, db, user_id) = setup_test_app();
    let id = db
        .create_goal(
            user_id,
            &NewGoal {
                name: "Bike".to_string(),
                description: None,
                target_amount: dec!(500),
                target_date: None,
            },
        )
        .unwrap();

    let response = app
        .clone()
        .oneshot(delete_request(&format!("/api/goals/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get_request(&format!("/api/goals/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Recommendation API Tests ==========

#[tokio::test]
async fn test_adhoc_recommendations() {
    let (app, _db, _) = setup_test_app();

    let response = app
        .oneshot(post_json(
            "/api/recommendations",
            serde_json::json!({
                "monthly_income": 50000,
                "monthly_expenses": 45000,
                "top_spending_categories": [
                    {"category": "food", "amount": 15000},
                    {"category": "transport", "amount": 8000},
                    {"category": "entertainment", "amount": 5000}
                ],
                "goal_amount": 100000,
                "current_saved": 20000
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let projection = &json["projection"];
    assert_eq!(decimal(&projection["monthly_savings"]), dec!(5000));
    assert_eq!(decimal(&projection["potential_savings"]), dec!(8400));
    assert_eq!(
        projection["months_without_changes"],
        serde_json::json!({"status": "reachable", "months": 16})
    );
    assert_eq!(
        projection["months_with_savings"],
        serde_json::json!({"status": "reachable", "months": 6})
    );
    assert_eq!(json["acceleration"]["kind"], "sooner");
    assert_eq!(json["acceleration"]["months_saved"], 10);
    assert!(json["highlight"].as_str().unwrap().contains("10 months sooner"));

    let recommendations = json["recommendations"].as_array().unwrap();
    assert_eq!(recommendations[0]["kind"], "savings");
    assert_eq!(recommendations[1]["kind"], "income");
    assert_eq!(
        recommendations
            .iter()
            .filter(|r| r["kind"] == "lifestyle")
            .count(),
        4 // three spending cuts plus one fixed suggestion
    );
}

#[tokio::test]
async fn test_adhoc_recommendations_unreachable() {
    let (app, _db, _) = setup_test_app();

    let response = app
        .oneshot(post_json(
            "/api/recommendations",
            serde_json::json!({
                "monthly_income": 30000,
                "monthly_expenses": 32000,
                "goal_amount": 50000
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(
        json["projection"]["months_without_changes"],
        serde_json::json!({"status": "unreachable"})
    );
    assert!(json.get("acceleration").is_none());
    assert!(json.get("highlight").is_none());
    let warning = json["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["kind"] == "warning")
        .unwrap();
    assert!(warning["description"]
        .as_str()
        .unwrap()
        .contains("will not be reached"));
}

#[tokio::test]
async fn test_adhoc_recommendations_rejects_negative_input() {
    let (app, _db, _) = setup_test_app();

    let response = app
        .oneshot(post_json(
            "/api/recommendations",
            serde_json::json!({
                "monthly_income": -1,
                "monthly_expenses": 0,
                "goal_amount": 100
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_adhoc_recommendations_extreme_amounts() {
    let (app, _db, _) = setup_test_app();
    let max = rust_decimal::Decimal::MAX.to_string();

    let response = app
        .oneshot(post_json(
            "/api/recommendations",
            serde_json::json!({
                "monthly_income": max,
                "monthly_expenses": 0,
                "top_spending_categories": [{"category": "rent", "amount": max}],
                "goal_amount": 100
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(
        json["projection"]["months_without_changes"]["status"],
        "reachable"
    );
    assert_eq!(json["recommendations"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_goal_recommendations_from_history() {
    let (app, db, user_id) = setup_test_app();
    let goal_id = db
        .create_goal(
            user_id,
            &NewGoal {
                name: "Vacation".to_string(),
                description: None,
                target_amount: dec!(100000),
                target_date: None,
            },
        )
        .unwrap();

    let entries = [
        (TransactionType::Income, dec!(50000), "salary"),
        (TransactionType::Expense, dec!(15000), "food"),
        (TransactionType::Expense, dec!(8000), "transport"),
        (TransactionType::Expense, dec!(5000), "entertainment"),
        (TransactionType::Expense, dec!(17000), "utilities"),
    ];
    for (transaction_type, amount, category) in entries {
        db.insert_transaction(
            user_id,
            &NewTransaction {
                transaction_type,
                amount,
                category: category.to_string(),
                description: None,
                date: chrono::NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
                eco_impact: None,
                goal_id: None,
            },
        )
        .unwrap();
    }

    let response = app
        .clone()
        .oneshot(get_request(&format!(
            "/api/goals/{}/recommendations?months=1&top=2&as_of=2024-03-31",
            goal_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let snapshot = &json["snapshot"];
    assert_eq!(decimal(&snapshot["monthly_income"]), dec!(50000));
    assert_eq!(decimal(&snapshot["monthly_expenses"]), dec!(45000));
    let top = snapshot["top_spending_categories"].as_array().unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0]["category"], "utilities");
    assert_eq!(top[1]["category"], "food");
    assert_eq!(
        json["projection"]["months_without_changes"],
        serde_json::json!({"status": "reachable", "months": 20})
    );

    let response = app
        .clone()
        .oneshot(get_request(&format!(
            "/api/goals/{}/recommendations?months=0",
            goal_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(get_request("/api/goals/999/recommendations"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ========== Security Header Tests ==========

#[tokio::test]
async fn test_security_headers() {
    let (app, _db, _) = setup_test_app();

    let response = app.oneshot(get_request("/api/me")).await.unwrap();
    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert!(headers.get("content-security-policy").is_some());
}

#[test]
fn test_parse_origins() {
    assert_eq!(
        parse_origins(" http://localhost:5173, ,https://app.example.com"),
        vec!["http://localhost:5173", "https://app.example.com"]
    );
    assert!(parse_origins("").is_empty());
}

mod common;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;

use common::{create, create_school, create_student, get, patch, post, setup_test_app};

#[sqlx::test(migrations = "./migrations")]
async fn test_record_payment(pool: PgPool) {
    let app = setup_test_app(pool);
    let school = create_school(&app, 30).await;
    let student_id = create_student(&app, "Amina", school.parent_id, school.class_id).await;

    let before = Utc::now();
    let (status, payment) = post(
        &app,
        "/payments",
        json!({
            "student_id": student_id,
            "amount": 150.0,
            "payment_method": "cash",
            "payment_type": "quarterly"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(payment["id"].as_i64().is_some());
    assert_eq!(payment["student_id"], student_id);
    assert_eq!(payment["amount"], 150.0);
    assert_eq!(payment["payment_method"], "cash");
    assert_eq!(payment["payment_type"], "quarterly");
    assert_eq!(payment["status"], "pending");

    let paid_at: DateTime<Utc> = payment["payment_date"].as_str().unwrap().parse().unwrap();
    assert!((paid_at - before).num_seconds().abs() < 60);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_payment_validation(pool: PgPool) {
    let app = setup_test_app(pool);
    let school = create_school(&app, 30).await;
    let student_id = create_student(&app, "Amina", school.parent_id, school.class_id).await;

    let (status, body) = post(
        &app,
        "/payments",
        json!({
            "student_id": student_id,
            "amount": 0.0,
            "payment_method": "cash",
            "payment_type": "quarterly"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("amount"));

    let (status, _) = post(
        &app,
        "/payments",
        json!({
            "student_id": student_id,
            "amount": 10.0,
            "payment_method": "barter",
            "payment_type": "quarterly"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = post(
        &app,
        "/payments",
        json!({
            "student_id": 31337,
            "amount": 10.0,
            "payment_method": "cash",
            "payment_type": "inscription"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("student_id"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_payment_filters(pool: PgPool) {
    let app = setup_test_app(pool);
    let school = create_school(&app, 30).await;
    let amina = create_student(&app, "Amina", school.parent_id, school.class_id).await;
    let binta = create_student(&app, "Binta", school.parent_id, school.class_id).await;

    for (student_id, status, due_date) in [
        (amina, "paid", "2025-01-15"),
        (amina, "pending", "2025-04-15"),
        (binta, "overdue", "2025-01-15"),
    ] {
        create(
            &app,
            "/payments",
            json!({
                "student_id": student_id,
                "amount": 100.0,
                "payment_method": "bank_transfer",
                "payment_type": "quarterly",
                "status": status,
                "due_date": due_date
            }),
        )
        .await;
    }

    let (_, by_student) = get(&app, &format!("/payments?student_id={}", amina)).await;
    assert_eq!(by_student["meta"]["total"], 2);

    let (_, by_status) = get(&app, "/payments?status=overdue").await;
    assert_eq!(by_status["meta"]["total"], 1);
    assert_eq!(by_status["data"][0]["student_id"], binta);

    let (_, combined) = get(
        &app,
        &format!("/payments?student_id={}&due_to=2025-02-01", amina),
    )
    .await;
    assert_eq!(combined["meta"]["total"], 1);
    assert_eq!(combined["data"][0]["status"], "paid");

    let (_, by_class) = get(&app, &format!("/payments?class_id={}", school.class_id)).await;
    assert_eq!(by_class["meta"]["total"], 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_payment_status(pool: PgPool) {
    let app = setup_test_app(pool);
    let school = create_school(&app, 30).await;
    let student_id = create_student(&app, "Amina", school.parent_id, school.class_id).await;
    let id = create(
        &app,
        "/payments",
        json!({
            "student_id": student_id,
            "amount": 75.5,
            "payment_method": "mobile_money",
            "payment_type": "inscription",
            "reference": "MM-0042"
        }),
    )
    .await;

    let (status, updated) = patch(
        &app,
        &format!("/payments/{}", id),
        json!({ "status": "paid" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "paid");
    assert_eq!(updated["amount"], 75.5);
    assert_eq!(updated["reference"], "MM-0042");

    let (status, detail) = get(&app, &format!("/payments/{}/details", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["student"]["first_name"], "Amina");
}

mod common;

use axum::http::StatusCode;
use edutrack::router::App;
use serde_json::json;
use sqlx::PgPool;

use common::{
    create, create_school, create_student, create_user, delete, get, patch, post, send,
    setup_test_app,
};

async fn create_subject(app: &App, name: &str, code: &str) -> i64 {
    create(app, "/subjects", json!({ "name": name, "code": code })).await
}

#[sqlx::test(migrations = "./migrations")]
async fn test_one_grade_per_subject_and_term(pool: PgPool) {
    let app = setup_test_app(pool);
    let school = create_school(&app, 30).await;
    let student_id = create_student(&app, "Amina", school.parent_id, school.class_id).await;
    let subject_id = create_subject(&app, "Mathematics", "MATH").await;

    let grade = json!({
        "student_id": student_id,
        "subject_id": subject_id,
        "term": "first",
        "score": 87.5
    });
    let (status, created) = post(&app, "/grades", grade.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["score"], 87.5);

    let (status, _) = post(&app, "/grades", grade).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = post(
        &app,
        "/grades",
        json!({
            "student_id": student_id,
            "subject_id": subject_id,
            "term": "second",
            "score": 91.0
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, listed) = get(&app, &format!("/grades?student_id={}&term=second", student_id)).await;
    assert_eq!(listed["meta"]["total"], 1);

    let id = created["id"].as_i64().unwrap();
    let (status, detail) = get(&app, &format!("/grades/{}/details", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["subject"]["code"], "MATH");
    assert_eq!(detail["student"]["id"], student_id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_grade_score_range(pool: PgPool) {
    let app = setup_test_app(pool);
    let school = create_school(&app, 30).await;
    let student_id = create_student(&app, "Amina", school.parent_id, school.class_id).await;
    let subject_id = create_subject(&app, "Mathematics", "MATH").await;

    let (status, body) = post(
        &app,
        "/grades",
        json!({
            "student_id": student_id,
            "subject_id": subject_id,
            "term": "first",
            "score": 120.0
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("score"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_subject_with_grades_cannot_be_deleted(pool: PgPool) {
    let app = setup_test_app(pool);
    let school = create_school(&app, 30).await;
    let student_id = create_student(&app, "Amina", school.parent_id, school.class_id).await;
    let subject_id = create_subject(&app, "Mathematics", "MATH").await;
    let unused = create_subject(&app, "Art", "ART").await;
    create(
        &app,
        "/grades",
        json!({ "student_id": student_id, "subject_id": subject_id, "term": "third", "score": 50 }),
    )
    .await;

    let (status, _) = delete(&app, &format!("/subjects/{}", subject_id)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = delete(&app, &format!("/subjects/{}", unused)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = post(&app, "/subjects", json!({ "name": "Algebra", "code": "MATH" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_attendance_once_per_day(pool: PgPool) {
    let app = setup_test_app(pool);
    let school = create_school(&app, 30).await;
    let student_id = create_student(&app, "Amina", school.parent_id, school.class_id).await;

    let (status, today) = post(
        &app,
        "/attendance",
        json!({ "student_id": student_id, "status": "present" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(today["date"].is_string());

    let (status, _) = post(
        &app,
        "/attendance",
        json!({ "student_id": student_id, "status": "late", "date": today["date"] }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = post(
        &app,
        "/attendance",
        json!({ "student_id": student_id, "status": "absent", "date": "2025-02-03" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, absences) = get(&app, "/attendance?status=absent").await;
    assert_eq!(absences["meta"]["total"], 1);
    assert_eq!(absences["data"][0]["date"], "2025-02-03");

    let id = today["id"].as_i64().unwrap();
    let (status, updated) = patch(
        &app,
        &format!("/attendance/{}", id),
        json!({ "status": "excused", "remark": "Doctor's note" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "excused");
    assert_eq!(updated["date"], today["date"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_mark_notification_read_is_idempotent(pool: PgPool) {
    let app = setup_test_app(pool);
    let user_id = create_user(&app, "mr_diop", "password123", "parent").await;

    let (status, created) = post(
        &app,
        "/notifications",
        json!({ "recipient_id": user_id, "message": "Quarterly fees are due" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["notification_type"], "info");
    assert!(created["read_at"].is_null());

    let uri = format!("/notifications/{}/read", created["id"]);
    let (status, first) = send(&app, "POST", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(first["read_at"].is_string());

    let (status, second) = send(&app, "POST", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["read_at"], first["read_at"]);

    let (_, unread) = get(
        &app,
        &format!("/notifications?recipient_id={}&unread=true", user_id),
    )
    .await;
    assert_eq!(unread["meta"]["total"], 0);

    let (status, _) = send(&app, "POST", "/notifications/999/read", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_notification_for_missing_user(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = post(
        &app,
        "/notifications",
        json!({ "recipient_id": 12, "message": "Hello", "notification_type": "alert" }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("recipient_id"));
}

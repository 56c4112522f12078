mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{
    create_classroom, create_parent, create_school, create_student, delete, get, patch, post,
    setup_test_app,
};

#[sqlx::test(migrations = "./migrations")]
async fn test_create_then_fetch_student(pool: PgPool) {
    let app = setup_test_app(pool);
    let school = create_school(&app, 30).await;

    let (status, created) = post(
        &app,
        "/students",
        json!({
            "first_name": "Amina",
            "last_name": "Diallo",
            "birth_date": "2015-04-02",
            "gender": "female",
            "parent_id": school.parent_id,
            "class_id": school.class_id
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["first_name"], "Amina");
    assert_eq!(created["enrollment_status"], "enrolled");
    assert!(created["enrollment_date"].is_string());

    let id = created["id"].as_i64().unwrap();
    let (status, fetched) = get(&app, &format!("/students/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_student_with_missing_classroom_is_unprocessable(pool: PgPool) {
    let app = setup_test_app(pool);
    let school = create_school(&app, 30).await;

    let (status, body) = post(
        &app,
        "/students",
        json!({
            "first_name": "Amina",
            "last_name": "Diallo",
            "birth_date": "2015-04-02",
            "gender": "female",
            "parent_id": school.parent_id,
            "class_id": 9999
        }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("class_id"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_student_rejects_invalid_fields(pool: PgPool) {
    let app = setup_test_app(pool);
    let school = create_school(&app, 30).await;

    let (status, body) = post(
        &app,
        "/students",
        json!({
            "first_name": "Amina",
            "last_name": "Diallo",
            "birth_date": "2015-04-02",
            "gender": "unknown",
            "parent_id": school.parent_id,
            "class_id": school.class_id
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("gender"));

    let (status, body) = post(
        &app,
        "/students",
        json!({
            "last_name": "Diallo",
            "birth_date": "2015-04-02",
            "gender": "female",
            "parent_id": school.parent_id,
            "class_id": school.class_id
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("first_name"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_full_classroom_refuses_enrollment(pool: PgPool) {
    let app = setup_test_app(pool);
    let school = create_school(&app, 1).await;
    create_student(&app, "Amina", school.parent_id, school.class_id).await;

    let (status, _) = post(
        &app,
        "/students",
        json!({
            "first_name": "Moussa",
            "last_name": "Diallo",
            "birth_date": "2014-01-20",
            "gender": "male",
            "parent_id": school.parent_id,
            "class_id": school.class_id
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let other_class = create_classroom(&app, school.level_id, "1B", 1).await;
    let moussa = create_student(&app, "Moussa", school.parent_id, other_class).await;
    let (status, _) = patch(
        &app,
        &format!("/students/{}", moussa),
        json!({ "class_id": school.class_id }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_partial_update_keeps_other_fields(pool: PgPool) {
    let app = setup_test_app(pool);
    let school = create_school(&app, 30).await;
    let id = create_student(&app, "Amina", school.parent_id, school.class_id).await;

    let (status, updated) = patch(
        &app,
        &format!("/students/{}", id),
        json!({ "enrollment_status": "suspended" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["enrollment_status"], "suspended");
    assert_eq!(updated["first_name"], "Amina");
    assert_eq!(updated["birth_date"], "2015-04-02");
    assert_eq!(updated["class_id"], school.class_id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_details_embed_parent_and_classroom(pool: PgPool) {
    let app = setup_test_app(pool);
    let school = create_school(&app, 30).await;
    let id = create_student(&app, "Amina", school.parent_id, school.class_id).await;

    let (status, detail) = get(&app, &format!("/students/{}/details", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["id"], id);
    assert_eq!(detail["parent"]["id"], school.parent_id);
    assert_eq!(detail["classroom"]["name"], "1A");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_students_filters_and_paginates(pool: PgPool) {
    let app = setup_test_app(pool);
    let school = create_school(&app, 30).await;
    let other_parent = create_parent(&app, "Traore").await;
    for name in ["Amina", "Binta", "Coumba"] {
        create_student(&app, name, school.parent_id, school.class_id).await;
    }
    create_student(&app, "Dado", other_parent, school.class_id).await;

    let (status, page) = get(&app, "/students?skip=1&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["data"].as_array().unwrap().len(), 2);
    assert_eq!(page["data"][0]["first_name"], "Binta");
    assert_eq!(page["meta"]["total"], 4);
    assert_eq!(page["meta"]["has_more"], true);

    let (_, filtered) = get(&app, &format!("/students?parent_id={}", other_parent)).await;
    assert_eq!(filtered["meta"]["total"], 1);
    assert_eq!(filtered["data"][0]["first_name"], "Dado");

    let (_, searched) = get(&app, "/students?search=coum").await;
    assert_eq!(searched["meta"]["total"], 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_missing_student_is_not_found(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, _) = get(&app, "/students/4242").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = patch(&app, "/students/4242", json!({ "first_name": "X" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = delete(&app, "/students/4242").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unparsable_query_and_path_answer_json(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = get(&app, "/students?limit=ten").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid query string"));

    let (status, body) = get(&app, "/students?gender=other").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = get(&app, "/students/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("abc"));

    let (status, body) = delete(&app, "/classrooms/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_student_removes_their_records(pool: PgPool) {
    let app = setup_test_app(pool);
    let school = create_school(&app, 30).await;
    let id = create_student(&app, "Amina", school.parent_id, school.class_id).await;
    let (status, _) = post(
        &app,
        "/payments",
        json!({
            "student_id": id,
            "amount": 150.0,
            "payment_method": "cash",
            "payment_type": "quarterly"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = delete(&app, &format!("/students/{}", id)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (_, payments) = get(&app, "/payments").await;
    assert_eq!(payments["meta"]["total"], 0);
}

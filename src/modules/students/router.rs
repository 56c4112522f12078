use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_student, delete_student, get_student_by_id, get_student_details, get_students,
    update_student,
};

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_student).get(get_students))
        .route(
            "/{id}",
            get(get_student_by_id)
                .put(update_student)
                .patch(update_student)
                .delete(delete_student),
        )
        .route("/{id}/details", get(get_student_details))
}

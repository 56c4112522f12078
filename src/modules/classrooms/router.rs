use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_classroom, delete_classroom, get_classroom_by_id, get_classroom_details, get_classrooms,
    update_classroom,
};

pub fn init_classrooms_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_classroom).get(get_classrooms))
        .route(
            "/{id}",
            get(get_classroom_by_id)
                .put(update_classroom)
                .patch(update_classroom)
                .delete(delete_classroom),
        )
        .route("/{id}/details", get(get_classroom_details))
}

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_user, delete_user, get_user_by_id, get_user_details, get_users, update_user,
};

pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user).get(get_users))
        .route(
            "/{id}",
            get(get_user_by_id)
                .put(update_user)
                .patch(update_user)
                .delete(delete_user),
        )
        .route("/{id}/details", get(get_user_details))
}

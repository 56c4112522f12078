use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_notification, delete_notification, get_notification_by_id, get_notifications,
    mark_notification_read, update_notification,
};

pub fn init_notifications_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_notification).get(get_notifications))
        .route(
            "/{id}",
            get(get_notification_by_id)
                .put(update_notification)
                .patch(update_notification)
                .delete(delete_notification),
        )
        .route("/{id}/read", post(mark_notification_read))
}

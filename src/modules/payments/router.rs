use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    create_payment, delete_payment, get_payment_by_id, get_payment_details, get_payments,
    update_payment,
};

pub fn init_payments_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_payment).get(get_payments))
        .route(
            "/{id}",
            get(get_payment_by_id)
                .put(update_payment)
                .patch(update_payment)
                .delete(delete_payment),
        )
        .route("/{id}/details", get(get_payment_details))
}

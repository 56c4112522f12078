use axum::extract::Request;
use axum::http::{HeaderValue, Method, Uri, header, uri::PathAndQuery};
use axum::response::Redirect;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower::util::{MapRequest, MapRequestLayer};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use edutrack_config::CorsConfig;
use edutrack_observability::{MetricsHandle, logging_middleware, metrics_app, metrics_middleware};

use crate::docs::ApiDoc;
use crate::modules::attendance::init_attendance_router;
use crate::modules::auth::init_auth_router;
use crate::modules::classrooms::init_classrooms_router;
use crate::modules::grades::init_grades_router;
use crate::modules::health::health_check;
use crate::modules::levels::init_levels_router;
use crate::modules::notifications::init_notifications_router;
use crate::modules::parents::init_parents_router;
use crate::modules::payments::init_payments_router;
use crate::modules::students::init_students_router;
use crate::modules::subjects::init_subjects_router;
use crate::modules::teachers::init_teachers_router;
use crate::modules::users::init_users_router;
use crate::state::AppState;

const DOCS_PATH: &str = "/docs";

/// The router with trailing slashes trimmed before routing.
pub type App = MapRequest<Router, fn(Request) -> Request>;

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

/// `/students/` routes like `/students`. Swagger UI serves its own
/// `/docs/` tree and is left alone.
fn trim_trailing_slash(mut req: Request) -> Request {
    let path = req.uri().path();
    if path.len() <= 1 || !path.ends_with('/') || path.starts_with(DOCS_PATH) {
        return req;
    }

    let trimmed = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };
    let path_and_query = match req.uri().query() {
        Some(query) => format!("{}?{}", trimmed, query),
        None => trimmed.to_string(),
    };

    let mut parts = req.uri().clone().into_parts();
    if let Ok(pq) = PathAndQuery::try_from(path_and_query) {
        parts.path_and_query = Some(pq);
        if let Ok(uri) = Uri::from_parts(parts) {
            *req.uri_mut() = uri;
        }
    }
    req
}

pub fn init_router(state: AppState, metrics: Option<MetricsHandle>) -> Router {
    let cors = cors_layer(&state.cors_config);

    let router = Router::new()
        .merge(SwaggerUi::new(DOCS_PATH).url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .route("/", get(|| async { Redirect::temporary(DOCS_PATH) }))
        .route("/health", get(health_check))
        .nest("/auth", init_auth_router())
        .nest("/users", init_users_router())
        .nest("/parents", init_parents_router())
        .nest("/teachers", init_teachers_router())
        .nest("/levels", init_levels_router())
        .nest("/classrooms", init_classrooms_router())
        .nest("/students", init_students_router())
        .nest("/subjects", init_subjects_router())
        .nest("/grades", init_grades_router())
        .nest("/payments", init_payments_router())
        .nest("/attendance", init_attendance_router())
        .nest("/notifications", init_notifications_router())
        .with_state(state);

    let router = match metrics {
        Some(handle) => router.merge(metrics_app(handle)),
        None => router,
    };

    router
        .layer(cors)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}

/// Router ready to serve: [`init_router`] behind trailing-slash trimming.
pub fn init_app(state: AppState, metrics: Option<MetricsHandle>) -> App {
    MapRequestLayer::new(trim_trailing_slash as fn(Request) -> Request)
        .layer(init_router(state, metrics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn path_of(uri: &str) -> String {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        trim_trailing_slash(req).uri().to_string()
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        assert_eq!(path_of("/students/"), "/students");
        assert_eq!(path_of("/students/4/details/"), "/students/4/details");
        assert_eq!(path_of("/payments/?status=paid"), "/payments?status=paid");
    }

    #[test]
    fn test_root_and_docs_are_untouched() {
        assert_eq!(path_of("/"), "/");
        assert_eq!(path_of("/docs/"), "/docs/");
        assert_eq!(path_of("/levels"), "/levels");
    }
}

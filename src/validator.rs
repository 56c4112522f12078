use anyhow::anyhow;
use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Request,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, request::Parts},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use edutrack_core::AppError;

const DATA_ERROR_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";
const SYNTAX_ERROR_PREFIX: &str = "Failed to parse the request body as JSON: ";
const QUERY_ERROR_PREFIX: &str = "Failed to deserialize query string: ";

/// Drops serde_json's trailing ` at line N column M`.
fn strip_location(message: &str) -> &str {
    match message.rfind(" at line ") {
        Some(idx) => &message[..idx],
        None => message,
    }
}

fn backticked(message: &str, marker: &str) -> Option<String> {
    message
        .split(marker)
        .nth(1)
        .and_then(|rest| rest.split('`').next())
        .map(str::to_string)
}

/// Turns a body deserialization failure into `field: message`.
///
/// axum reports the failing path before the serde message (`capacity: invalid
/// type: ...`); missing and unknown fields carry the field name in backticks.
pub(crate) fn describe_data_error(body_text: &str) -> String {
    let detail = strip_location(body_text.trim_start_matches(DATA_ERROR_PREFIX));

    if let Some(field) = backticked(detail, "missing field `") {
        return format!("{}: field required", field);
    }
    if let Some(field) = backticked(detail, "unknown field `") {
        return format!("{}: unknown field", field);
    }

    match detail.split_once(": ") {
        Some((path, rest)) if !path.contains(' ') => format!("{}: {}", path, rest),
        _ => format!("body: {}", detail),
    }
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            AppError::unprocessable(anyhow!(describe_data_error(&err.body_text())))
        }
        JsonRejection::JsonSyntaxError(err) => {
            let text = err.body_text();
            let detail = strip_location(text.trim_start_matches(SYNTAX_ERROR_PREFIX));
            AppError::bad_request(anyhow!("Malformed JSON: {}", detail))
        }
        JsonRejection::MissingJsonContentType(_) => AppError::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            anyhow!("Expected request with `Content-Type: application/json`"),
        ),
        other => AppError::bad_request(anyhow!("Invalid request body: {}", other.body_text())),
    }
}

/// JSON body extractor that also runs `validator` rules.
///
/// Deserialization failures naming a field (missing, unknown, wrong type)
/// and failed rules answer 422 with `field: message`; malformed JSON is 400.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(rejection_to_error)?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

fn query_rejection_to_error(rejection: QueryRejection) -> AppError {
    let text = rejection.body_text();
    AppError::bad_request(anyhow!(
        "Invalid query string: {}",
        text.trim_start_matches(QUERY_ERROR_PREFIX)
    ))
}

fn path_rejection_to_error(rejection: PathRejection) -> AppError {
    match rejection {
        PathRejection::FailedToDeserializePathParams(err) => {
            AppError::bad_request(anyhow!(err.body_text()))
        }
        other => AppError::new(other.status(), anyhow!(other.body_text())),
    }
}

/// Query string extractor answering unparsable parameters with a JSON 400.
#[derive(Debug, Clone, Copy, Default)]
pub struct Query<T>(pub T);

impl<T, S> FromRequestParts<S> for Query<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Query(value) =
            axum::extract::Query::<T>::from_request_parts(parts, state)
                .await
                .map_err(query_rejection_to_error)?;
        Ok(Query(value))
    }
}

/// Path parameter extractor; an id that does not parse is a JSON 400.
#[derive(Debug, Clone, Copy, Default)]
pub struct Path<T>(pub T);

impl<T, S> FromRequestParts<S> for Path<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Path(value) =
            axum::extract::Path::<T>::from_request_parts(parts, state)
                .await
                .map_err(path_rejection_to_error)?;
        Ok(Path(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field() {
        let text = format!("{}missing field `class_id` at line 1 column 42", DATA_ERROR_PREFIX);
        assert_eq!(describe_data_error(&text), "class_id: field required");
    }

    #[test]
    fn test_unknown_field() {
        let text = format!(
            "{}unknown field `school_id`, expected one of `name`, `description` at line 1 column 12",
            DATA_ERROR_PREFIX
        );
        assert_eq!(describe_data_error(&text), "school_id: unknown field");
    }

    #[test]
    fn test_invalid_type_keeps_path() {
        let text = format!(
            "{}capacity: invalid type: string \"thirty\", expected i32 at line 1 column 25",
            DATA_ERROR_PREFIX
        );
        assert_eq!(
            describe_data_error(&text),
            "capacity: invalid type: string \"thirty\", expected i32"
        );
    }

    #[test]
    fn test_unknown_variant() {
        let text = format!(
            "{}gender: unknown variant `other`, expected `male` or `female` at line 1 column 30",
            DATA_ERROR_PREFIX
        );
        assert_eq!(
            describe_data_error(&text),
            "gender: unknown variant `other`, expected `male` or `female`"
        );
    }

    #[tokio::test]
    async fn test_malformed_json_drops_location() {
        #[derive(Debug, serde::Deserialize, Validate)]
        struct Level {
            #[allow(dead_code)]
            name: String,
        }

        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/levels")
            .header(axum::http::header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(r#"{"name": "#))
            .unwrap();
        let err = ValidatedJson::<Level>::from_request(request, &())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        let message = err.error.to_string();
        assert!(message.starts_with("Malformed JSON: "));
        assert!(!message.contains(" at line "));
    }

    #[tokio::test]
    async fn test_query_rejection_is_bad_request() {
        #[derive(Debug, serde::Deserialize)]
        struct Filters {
            #[allow(dead_code)]
            limit: i64,
        }

        let (mut parts, _) = axum::http::Request::builder()
            .uri("/students?limit=ten")
            .body(())
            .unwrap()
            .into_parts();
        let err = Query::<Filters>::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.error.to_string().starts_with("Invalid query string: "));
    }

    #[test]
    fn test_unlocated_error() {
        let text = format!("{}invalid type: null, expected struct", DATA_ERROR_PREFIX);
        assert_eq!(describe_data_error(&text), "body: invalid type: null, expected struct");
    }
}

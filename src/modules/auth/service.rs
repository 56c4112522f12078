use sqlx::PgPool;
use tracing::{info, instrument, warn};

use edutrack_auth::create_access_token;
use edutrack_config::JwtConfig;
use edutrack_core::{AppError, verify_password};
use edutrack_observability::{track_jwt_issued, track_user_login_failure, track_user_login_success};

use crate::modules::auth::model::{LoginRequest, LoginResponse};
use crate::modules::users::model::{User, UserRole};
use crate::modules::users::service::USER_COLUMNS;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

#[derive(sqlx::FromRow)]
struct Credentials {
    id: i64,
    password_hash: String,
    is_active: bool,
    role: UserRole,
}

pub struct AuthService;

impl AuthService {
    /// Checks the password, stamps `last_login_at` and issues an access token.
    ///
    /// Unknown usernames and wrong passwords get the same 401. Deactivated
    /// accounts with the right password get 403.
    #[instrument(skip(db, dto, jwt_config), fields(username = %dto.username))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let credentials = sqlx::query_as::<_, Credentials>(
            "SELECT id, password_hash, is_active, role FROM users WHERE username = $1",
        )
        .bind(dto.username.trim())
        .fetch_optional(db)
        .await?;

        let Some(credentials) = credentials else {
            track_user_login_failure("unknown_user");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        if !verify_password(&dto.password, &credentials.password_hash)? {
            track_user_login_failure("invalid_password");
            warn!(user_id = credentials.id, "Login failed: wrong password");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        if !credentials.is_active {
            track_user_login_failure("inactive");
            return Err(AppError::forbidden("This account is deactivated"));
        }

        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET last_login_at = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(credentials.id)
        .fetch_one(db)
        .await?;

        let access_token = create_access_token(
            user.id.into_inner(),
            &user.username,
            user.role.as_str(),
            jwt_config,
        )?;

        track_jwt_issued();
        track_user_login_success(credentials.role.as_str());
        info!(user_id = %user.id, "User logged in");

        Ok(LoginResponse::bearer(
            access_token,
            jwt_config.access_token_expiry,
            user,
        ))
    }
}

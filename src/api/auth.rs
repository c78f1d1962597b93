// src/api/auth.rs
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use bcrypt::{hash, verify, DEFAULT_COST};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::config::Config;
use crate::db::models::user::User;
use crate::utils::api_response::ApiResponse;
use crate::utils::error::LedgerError;

/// Represents a request to register a new user.
#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Desired username
    pub username: String,
    /// User password
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
}

/// JWT claims used for authentication. The ledger trusts `sub` as the
/// caller's user id on every request behind the JWT middleware.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject - user ID as string
    pub sub: String,
    /// The username of the authenticated user.
    pub username: String,
    /// Expiration timestamp (UNIX time)
    pub exp: usize,
}

impl Claims {
    /// Converts `sub` (user ID) to `i32`, or returns a descriptive error.
    pub fn user_id(&self) -> Result<i32, LedgerError> {
        self.sub
            .parse::<i32>()
            .map_err(|_| LedgerError::Validation("Invalid user ID format in token".into()))
    }
}

/// Represents a request to log in.
#[derive(Serialize, Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Represents a successful login response returning a JWT token.
#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

/// Handles user registration.
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Authentication",
    request_body(content = RegisterRequest, description = "New user details"),
    responses(
        (status = 201, description = "User registered", body = RegisterResponse),
        (status = 400, description = "Missing username or password"),
        (status = 409, description = "Username already taken"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register(
    State(pool): State<PgPool>,
    Json(payload): Json<RegisterRequest>,
) -> Result<ApiResponse<RegisterResponse>, ApiResponse<()>> {
    let username = payload.username.trim().to_string();
    if username.is_empty() || payload.password.is_empty() {
        return Err(ApiResponse::error(
            StatusCode::BAD_REQUEST,
            "Username and password are required",
            None,
        ));
    }

    let password_hash = hash(&payload.password, DEFAULT_COST).map_err(|e| {
        ApiResponse::<()>::error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Password hashing failed",
            Some(json!({"error": e.to_string()})),
        )
    })?;

    let result = sqlx::query("INSERT INTO users (username, password_hash) VALUES ($1, $2)")
        .bind(&username)
        .bind(&password_hash)
        .execute(&pool)
        .await;

    match result {
        Ok(_) => {
            info!("✅ User registered: {username}");
            Ok(ApiResponse::success(
                StatusCode::CREATED,
                "User registered",
                RegisterResponse {
                    message: format!("User '{username}' registered successfully"),
                },
            ))
        }
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(ApiResponse::error(
            StatusCode::CONFLICT,
            "Username already taken",
            None,
        )),
        Err(e) => {
            tracing::error!("registration failed: {e}");
            Err(ApiResponse::error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to register user",
                None,
            ))
        }
    }
}

/// Handles user login, returning a JWT on success.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Authentication",
    request_body(content = LoginRequest, description = "User login details"),
    responses(
        (status = 200, description = "Successful login", body = LoginResponse),
        (status = 401, description = "Invalid username or password"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login(
    State(pool): State<PgPool>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiResponse<()>> {
    let config = Config::get();

    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
    )
    .bind(&payload.username)
    .fetch_optional(&pool)
    .await
    .map_err(|e| {
        tracing::error!("login query failed: {e}");
        ApiResponse::<()>::error(StatusCode::INTERNAL_SERVER_ERROR, "Database error", None)
    })?;

    let Some(user) = user else {
        warn!("❌ Login attempt for non-existent user: {}", payload.username);
        return Err(ApiResponse::error(
            StatusCode::UNAUTHORIZED,
            "Invalid username or password",
            None,
        ));
    };

    match verify(&payload.password, &user.password_hash) {
        Ok(true) => {
            let claims = Claims {
                sub: user.id.to_string(),
                username: user.username.clone(),
                exp: chrono::Utc::now().timestamp() as usize + 36000, // 10 hour expiration
            };
            let token = encode(
                &Header::default(),
                &claims,
                &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            )
            .map_err(|e| {
                ApiResponse::<()>::error(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Token generation failed",
                    Some(json!({"error": e.to_string()})),
                )
            })?;

            info!("✅ Login successful for user: {}", payload.username);
            Ok(Json(LoginResponse { token }))
        }
        Ok(false) => {
            warn!("❌ Invalid password attempt for user: {}", payload.username);
            Err(ApiResponse::error(
                StatusCode::UNAUTHORIZED,
                "Invalid username or password",
                None,
            ))
        }
        Err(e) => {
            tracing::error!("password verification error: {e}");
            Err(ApiResponse::error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Password verification error",
                None,
            ))
        }
    }
}

pub fn auth_routes() -> Router<PgPool> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::openapi::Components;
use utoipa::Modify;
use utoipa::OpenApi;

/// Registers the `bearerAuth` scheme every protected endpoint references.
pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let mut components = openapi.components.clone().unwrap_or(Components::default());

        components.add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );

        openapi.components = Some(components);
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(register, login),
    components(schemas(RegisterRequest, RegisterResponse, LoginRequest, LoginResponse)),
    tags(
        (name = "Authentication", description = "User registration and login")
    ),
    modifiers(&SecurityAddon)
)]
pub struct AuthDoc;

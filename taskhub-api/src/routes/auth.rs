/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/sign-up` - Register a new account, returns an access token
/// - `POST /auth/sign-in` - Authenticate, returns an access token
///
/// Sign-in failures (unknown email, wrong password) return the same 401
/// message so the endpoint cannot be used to probe for registered emails.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::validate_request,
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use taskhub_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, User},
};
use validator::Validate;

/// Sign-up request
#[derive(Debug, Deserialize, Validate)]
pub struct SignUpRequest {
    /// Display name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Sign-in request
#[derive(Debug, Deserialize, Validate)]
pub struct SignInRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Response carrying a freshly minted access token
#[derive(Debug, Serialize)]
pub struct AccessTokenResponse {
    /// JWT access token (24h)
    pub access_token: String,
}

/// Registers a new user
///
/// # Errors
///
/// - `409 Conflict`: Email already in use
/// - `422 Unprocessable Entity`: Validation failed
pub async fn sign_up(
    State(state): State<AppState>,
    Json(req): Json<SignUpRequest>,
) -> ApiResult<(StatusCode, Json<AccessTokenResponse>)> {
    validate_request(&req)?;

    // Check the email before hashing so the common failure path is cheap;
    // the unique constraint still backstops races, mapping to 409.
    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Conflict("This email is already in use".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name,
            email: req.email,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = %user.id, "User registered");

    let access_token = jwt::create_token(&jwt::Claims::new(user.id), state.jwt_secret())?;

    Ok((
        StatusCode::CREATED,
        Json(AccessTokenResponse { access_token }),
    ))
}

/// Authenticates a user and returns an access token
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown email or wrong password (same message)
pub async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> ApiResult<Json<AccessTokenResponse>> {
    validate_request(&req)?;

    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let access_token = jwt::create_token(&jwt::Claims::new(user.id), state.jwt_secret())?;

    Ok(Json(AccessTokenResponse { access_token }))
}

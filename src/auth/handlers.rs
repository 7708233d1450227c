use axum::{
    extract::{FromRef, State},
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        password::{hash_password, verify_password},
        repo::User,
        session::{remove_session_cookie, session_cookie, ApiAuth, SessionKeys},
    },
    error::AppError,
    sanitize::{is_strong_password, is_valid_phone, sanitize_string, validate_email},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub business_name: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub business_name: String,
    #[serde(default)]
    pub phone: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/register", post(register))
        .route("/api/update-profile", post(update_profile))
        .route("/api/logout", get(logout))
        .route("/logout", get(logout))
        .route("/health", get(health))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<Value>), AppError> {
    let email = sanitize_string(&payload.email, 255);
    let password = payload.password;

    if email.is_empty() || password.is_empty() {
        return Err(AppError::BadRequest("Email and password required"));
    }
    if !validate_email(&email) {
        return Err(AppError::BadRequest("Invalid email format"));
    }
    if password.chars().count() > 128 {
        return Err(AppError::BadRequest("Password too long"));
    }

    let user = User::find_by_email(&state.db, &email).await?;

    // One generic message for unknown email and wrong password alike, so
    // the endpoint cannot be used to enumerate accounts.
    let user = match user {
        Some(u) if verify_password(&password, &u.password_hash) => u,
        _ => {
            warn!("login failed");
            return Err(AppError::Unauthorized("Invalid credentials"));
        }
    };

    User::touch_last_login(&state.db, user.id).await?;

    let keys = SessionKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.name, &user.email)?;

    info!(user_id = user.id, "user logged in");
    Ok((
        jar.add(session_cookie(token)),
        Json(json!({"success": true, "message": "Login successful"})),
    ))
}

#[instrument(skip(state, jar, payload))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<RegisterRequest>,
) -> Result<(CookieJar, Json<Value>), AppError> {
    let name = sanitize_string(&payload.full_name, 100);
    let email = sanitize_string(&payload.email, 255);
    let business = sanitize_string(&payload.business_name, 200);
    let password = payload.password;

    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AppError::BadRequest("Name, email, and password required"));
    }
    if !validate_email(&email) {
        return Err(AppError::BadRequest("Invalid email format"));
    }
    let password_len = password.chars().count();
    if password_len < 8 {
        return Err(AppError::BadRequest("Password must be 8+ characters"));
    }
    if password_len > 128 {
        return Err(AppError::BadRequest("Password too long"));
    }
    if !is_strong_password(&password) {
        return Err(AppError::BadRequest(
            "Password must contain uppercase, lowercase, and numbers",
        ));
    }

    let hash = hash_password(&password, state.config.bcrypt_cost)?;

    // A duplicate email surfaces as a unique violation and maps to 409.
    let user = User::create(&state.db, &name, &email, &business, &hash).await?;

    let keys = SessionKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.name, &user.email)?;

    info!(user_id = user.id, "user registered");
    Ok((
        jar.add(session_cookie(token)),
        Json(json!({"success": true, "message": "Account created"})),
    ))
}

#[instrument(skip(state, session, jar, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    ApiAuth(session): ApiAuth,
    jar: CookieJar,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<(CookieJar, Json<Value>), AppError> {
    let name = sanitize_string(&payload.name, 100);
    let business = sanitize_string(&payload.business_name, 200);
    let phone = sanitize_string(&payload.phone, 20);

    if name.is_empty() {
        return Err(AppError::BadRequest("Name required"));
    }
    if !phone.is_empty() && !is_valid_phone(&phone) {
        return Err(AppError::BadRequest("Invalid phone number"));
    }

    User::update_profile(&state.db, session.user_id, &name, &business, &phone).await?;

    // Re-issue the session so the display name it carries stays current.
    let keys = SessionKeys::from_ref(&state);
    let token = keys.sign(session.user_id, &name, &session.email)?;

    info!(user_id = session.user_id, "profile updated");
    Ok((
        jar.add(session_cookie(token)),
        Json(json!({"success": true, "message": "Profile updated"})),
    ))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    (jar.remove(remove_session_cookie()), Redirect::to("/landing"))
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "app": "FBAIS",
        "version": "2.0",
        "features": ["Profitability Predictor", "Inventory", "Waste Tracker"],
    }))
}

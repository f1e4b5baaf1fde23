use crate::state::AppState;
use crate::store::{NewUser, User};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Duration;
use log::info;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use trading::{BrokerType, FieldError, ValidationErrors};
use trading_core::auth::USER_TOKEN_TTL_HOURS;
use trading_core::ApiError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default)]
    pub broker_codes: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Public view of a [`User`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub brokers: Vec<BrokerType>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            brokers: user.brokers.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub user: UserView,
    pub token: String,
}

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::bad_request(format!("Malformed JSON body: {}", e)))
}

fn require_non_empty(fields: &[(&str, &str)]) -> Result<(), ValidationErrors> {
    let errors: Vec<FieldError> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(path, _)| FieldError::new(*path, "Required"))
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors::new(errors))
    }
}

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let req: RegisterRequest = parse_body(&body)?;
    require_non_empty(&[
        ("username", req.username.as_str()),
        ("email", req.email.as_str()),
        ("password", req.password.as_str()),
    ])?;

    // Unknown or inactive broker codes are dropped, not rejected.
    let offered = state.brokers.active_brokers();
    let mut brokers: Vec<BrokerType> = Vec::new();
    for code in &req.broker_codes {
        if let Ok(broker) = code.parse::<BrokerType>() {
            if offered.contains(&broker) && !brokers.contains(&broker) {
                brokers.push(broker);
            }
        }
    }

    let (password, cost) = (req.password, state.bcrypt_cost);
    let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| ApiError::internal("Failed to hash password", e))?
        .map_err(|e| ApiError::internal("Failed to hash password", e))?;

    let user = state
        .users
        .create_user(NewUser {
            username: req.username.trim().to_string(),
            email: req.email.trim().to_string(),
            password_hash,
            first_name: req.first_name,
            last_name: req.last_name,
            brokers,
        })
        .await?;
    info!("Registered user {} with brokers {:?}", user.username, user.brokers);

    let token = state.keys.issue(
        &user.id,
        &user.username,
        &user.brokers,
        Duration::hours(USER_TOKEN_TTL_HOURS),
    )?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully",
            user: UserView::from(&user),
            token,
        }),
    ))
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AuthResponse>, ApiError> {
    let req: LoginRequest = parse_body(&body)?;
    let invalid = || ApiError::unauthorized("Invalid username or password");

    let user = state
        .users
        .find_by_username(req.username.trim())
        .await?
        .ok_or_else(invalid)?;

    let hash = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || bcrypt::verify(req.password, &hash))
        .await
        .map_err(|e| ApiError::internal("Failed to verify password", e))?
        .unwrap_or(false);
    if !valid {
        return Err(invalid());
    }

    let token = state.keys.issue(
        &user.id,
        &user.username,
        &user.brokers,
        Duration::hours(USER_TOKEN_TTL_HOURS),
    )?;

    Ok(Json(AuthResponse {
        message: "Login successful",
        user: UserView::from(&user),
        token,
    }))
}

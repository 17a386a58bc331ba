//! Mock authentication for the demo dashboard.
//!
//! NOT a security mechanism. Every account shares [`DEMO_PASSWORD`], and a token is just
//! base64-encoded JSON carrying the user id and the issue time in milliseconds, with no
//! signature. Anyone who knows a user id and login time can rebuild the same string.
//! Sessions expire [`SESSION_TTL_MS`] after issue; an expired session is deleted the first
//! time it is presented. Role checks here are advisory: nothing in the service layer
//! refuses data access based on them.

use crate::{
    core::new_id,
    entities::{Account, Role, Session, account, session},
    errors::{Error, Result},
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use sea_orm::{Set, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Password accepted for every account
pub const DEMO_PASSWORD: &str = "demo123";
/// Session lifetime: 24 hours
pub const SESSION_TTL_MS: i64 = 24 * 60 * 60 * 1000;

/// What a token decodes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    /// Account id
    pub user_id: String,
    /// Issue time, milliseconds since the Unix epoch
    pub timestamp: i64,
}

/// A logged-in account and the token issued for it.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    /// The account, with `last_login` refreshed
    pub user: account::Model,
    /// Bearer token
    pub token: String,
}

/// Registration form.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    /// Login email; must not be taken
    pub email: String,
    /// Accepted but never stored
    pub password: String,
    /// Display name
    pub name: String,
    /// Company
    pub company: String,
    /// Role, default financiero
    #[serde(default)]
    pub role: Option<Role>,
}

/// Builds the token for a user issued at the given time.
pub fn encode_token(user_id: &str, issued_at: DateTime<Utc>) -> Result<String> {
    let claims = TokenClaims {
        user_id: user_id.to_string(),
        timestamp: issued_at.timestamp_millis(),
    };
    Ok(STANDARD.encode(serde_json::to_vec(&claims)?))
}

/// Decodes a token, `None` when it is not base64 JSON of the expected shape.
#[must_use]
pub fn decode_token(token: &str) -> Option<TokenClaims> {
    let bytes = STANDARD.decode(token).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Whether a token issued at `issued_ms` has outlived the session lifetime at `now`.
#[must_use]
pub fn is_expired(issued_ms: i64, now: DateTime<Utc>) -> bool {
    now.timestamp_millis() - issued_ms > SESSION_TTL_MS
}

async fn open_session(db: &DatabaseConnection, user: account::Model, now: DateTime<Utc>) -> Result<AuthSession> {
    let token = encode_token(&user.id, now)?;

    // Same user and millisecond yields the same token
    if Session::find_by_id(token.as_str()).one(db).await?.is_none() {
        session::ActiveModel {
            token: Set(token.clone()),
            user_id: Set(user.id.clone()),
            issued_at: Set(now),
        }
        .insert(db)
        .await?;
    }
    Ok(AuthSession { user, token })
}

/// Logs in with email and password. `None` for an unknown email or a wrong password.
#[instrument(skip(db, password))]
pub async fn login(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
    now: DateTime<Utc>,
) -> Result<Option<AuthSession>> {
    let Some(user) = Account::find()
        .filter(account::Column::Email.eq(email))
        .one(db)
        .await?
    else {
        debug!("Login attempt for unknown email");
        return Ok(None);
    };

    if password != DEMO_PASSWORD {
        debug!("Login attempt with wrong password");
        return Ok(None);
    }

    let mut active: account::ActiveModel = user.into();
    active.last_login = Set(now);
    let user = active.update(db).await?;

    info!("User {} logged in", user.id);
    open_session(db, user, now).await.map(Some)
}

/// Creates an account and logs it in.
#[instrument(skip(db, new), fields(email = %new.email))]
pub async fn register(db: &DatabaseConnection, new: NewAccount, now: DateTime<Utc>) -> Result<AuthSession> {
    let exists = Account::find()
        .filter(account::Column::Email.eq(new.email.as_str()))
        .one(db)
        .await?
        .is_some();
    if exists {
        return Err(Error::UserAlreadyExists { email: new.email });
    }

    let user = account::ActiveModel {
        id: Set(new_id("user")),
        email: Set(new.email),
        name: Set(new.name),
        role: Set(new.role.unwrap_or(Role::Financiero)),
        company: Set(new.company),
        avatar: Set(None),
        created_at: Set(now),
        last_login: Set(now),
    }
    .insert(db)
    .await?;

    info!("Registered user {}", user.id);
    open_session(db, user, now).await
}

/// Forgets a session. Unknown tokens are ignored.
pub async fn logout(db: &DatabaseConnection, token: &str) -> Result<()> {
    Session::delete_by_id(token).exec(db).await?;
    Ok(())
}

/// Resolves a token to its account.
///
/// `None` when the session is unknown, the token does not decode, or it has expired; an
/// expired session is deleted.
pub async fn current_user(
    db: &DatabaseConnection,
    token: &str,
    now: DateTime<Utc>,
) -> Result<Option<account::Model>> {
    let Some(session) = Session::find_by_id(token).one(db).await? else {
        return Ok(None);
    };
    let Some(claims) = decode_token(token) else {
        return Ok(None);
    };

    if is_expired(claims.timestamp, now) {
        debug!("Session for {} expired", session.user_id);
        logout(db, token).await?;
        return Ok(None);
    }

    Account::find_by_id(session.user_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Whether the token resolves to a user.
pub async fn is_authenticated(db: &DatabaseConnection, token: &str, now: DateTime<Utc>) -> Result<bool> {
    Ok(current_user(db, token, now).await?.is_some())
}

/// Whether `role` ranks at or above `required`.
#[must_use]
pub const fn role_satisfies(role: Role, required: Role) -> bool {
    role.rank() >= required.rank()
}

/// Whether `role` may open `resource`.
#[must_use]
pub fn role_can_access(role: Role, resource: &str) -> bool {
    role.permissions()
        .iter()
        .any(|p| *p == "all" || *p == resource)
}

/// Whether the token's user ranks at or above `required`. `false` without a valid session.
pub async fn has_role(
    db: &DatabaseConnection,
    token: &str,
    required: Role,
    now: DateTime<Utc>,
) -> Result<bool> {
    Ok(current_user(db, token, now)
        .await?
        .is_some_and(|user| role_satisfies(user.role, required)))
}

/// Whether the token's user may open `resource`. `false` without a valid session.
pub async fn can_access(
    db: &DatabaseConnection,
    token: &str,
    resource: &str,
    now: DateTime<Utc>,
) -> Result<bool> {
    Ok(current_user(db, token, now)
        .await?
        .is_some_and(|user| role_can_access(user.role, resource)))
}

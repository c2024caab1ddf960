//! Login and logout.
//!
//! Credential validation happens entirely inside `sp_User_Login`; the client
//! sends the raw password and the server hashes and compares it. A missing
//! row means invalid credentials, never an error, and leaves the session
//! untouched.

use std::str::FromStr;

use tracing::info;

use crate::db::value::SpParam;
use crate::db::SpInvoker;
use crate::error::{DbError, DbResult};
use crate::session::{Role, Session};

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub username: String,
    pub role: Role,
    pub clearance: u32,
}

/// Authenticate against `sp_User_Login` and populate the session.
///
/// Returns `Ok(None)` for invalid credentials. The session is overwritten
/// only on success.
pub async fn login(
    invoker: &SpInvoker,
    session: &mut Session,
    username: &str,
    password: &str,
) -> DbResult<Option<LoginOutcome>> {
    let username = username.trim();
    let password = password.trim();
    if username.is_empty() || password.is_empty() {
        return Err(DbError::invalid_input("username and password are required"));
    }

    let row = invoker
        .call_single_row(
            "sp_User_Login",
            &[SpParam::text(username), SpParam::text(password)],
        )
        .await?;

    let Some(row) = row else {
        info!(username = %username, "Login rejected");
        return Ok(None);
    };

    let role_label = row
        .get_str("Role")
        .ok_or_else(|| DbError::internal("login row is missing the Role column"))?;
    let role = Role::from_str(role_label)
        .map_err(|e| DbError::internal(format!("login row: {e}")))?;

    let clearance = row
        .get_i64("ClearanceLevel")
        .ok_or_else(|| DbError::internal("login row is missing the ClearanceLevel column"))?;
    let clearance = u32::try_from(clearance)
        .map_err(|_| DbError::internal(format!("login row: negative clearance {clearance}")))?;

    session.set_user(username, role, clearance);
    info!(username = %username, role = %role, "Login succeeded");

    Ok(Some(LoginOutcome {
        username: username.to_string(),
        role,
        clearance,
    }))
}

/// Clear the session. Idempotent; no server round trip.
pub fn logout(session: &mut Session) {
    if let Some(username) = session.username() {
        info!(username = %username, "Logged out");
    }
    session.clear();
}

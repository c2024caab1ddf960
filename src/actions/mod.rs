//! Typed, gated entry points for every screen action.
//!
//! Each function here backs one dashboard operation of the client. All of
//! them follow the same discipline: check the session first (RBAC, and a
//! clearance floor where one applies) and short-circuit with
//! [`AccessDenied`](crate::session::AccessDenied) before any connection is
//! opened; only then invoke the procedure, passing the acting username as the
//! first parameter so the server can re-authorize the call.

pub mod admin;
pub mod auth;
pub mod guest;
pub mod instructor;
pub mod student;
pub mod ta;

use thiserror::Error;

use crate::db::value::SpParam;
use crate::error::DbError;
use crate::session::{AccessDenied, SessionUser};

/// Failure of a screen action: denied locally, or failed at the data layer.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Access(#[from] AccessDenied),
    #[error(transparent)]
    Db(#[from] DbError),
}

pub type ActionResult<T> = Result<T, ActionError>;

/// First procedure parameter: the acting username.
pub(crate) fn acting(user: &SessionUser) -> SpParam {
    SpParam::text(&user.username)
}

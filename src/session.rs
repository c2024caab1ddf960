//! Authenticated-session state and RBAC/MLS access checks.
//!
//! A [`Session`] holds at most one authenticated identity for the lifetime of
//! the process. It is populated on successful login, cleared on logout, and
//! never persisted. Screens consult it before issuing any data-fetching call;
//! a failed check short-circuits without touching the database. The checks
//! gate display only - the server re-authorizes every procedure call using
//! the acting username passed as the first parameter.

use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, OnceLock};

use thiserror::Error;

/// Closed set of roles assigned by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Instructor,
    Ta,
    Student,
    Guest,
}

impl Role {
    /// Label used by the server for this role.
    ///
    /// The guest role is stored as `Guestrole` in the Users table.
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Instructor => "Instructor",
            Self::Ta => "TA",
            Self::Student => "Student",
            Self::Guest => "Guestrole",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Self::Admin),
            "Instructor" => Ok(Self::Instructor),
            "TA" => Ok(Self::Ta),
            "Student" => Ok(Self::Student),
            "Guestrole" | "Guest" => Ok(Self::Guest),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// A role label outside the closed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

/// Identity and permissions of the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub username: String,
    pub role: Role,
    pub clearance: u32,
}

/// In-process session: logged out, or logged in as exactly one user.
///
/// The three identity fields live in one `Option<SessionUser>` so they are
/// set and cleared as a unit, never partially populated.
#[derive(Debug, Default)]
pub struct Session {
    user: Option<SessionUser>,
}

impl Session {
    /// Create a logged-out session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the logged-in user's identity and permissions.
    ///
    /// Overwrites any existing session without requiring a prior
    /// [`clear`](Self::clear); last write wins.
    pub fn set_user(&mut self, username: impl Into<String>, role: Role, clearance: u32) {
        self.user = Some(SessionUser {
            username: username.into(),
            role,
            clearance,
        });
    }

    /// Clear the session (logout). Idempotent.
    pub fn clear(&mut self) {
        self.user = None;
    }

    /// True if a user is currently logged in.
    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    /// The logged-in user, if any.
    pub fn current(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    pub fn clearance(&self) -> Option<u32> {
        self.user.as_ref().map(|u| u.clearance)
    }

    /// RBAC check: exact match against the required role. False when logged
    /// out.
    pub fn has_role(&self, required: Role) -> bool {
        self.user.as_ref().is_some_and(|u| u.role == required)
    }

    /// MLS check: clearance at or above the required floor. False when
    /// logged out.
    pub fn has_clearance(&self, required: u32) -> bool {
        self.user.as_ref().is_some_and(|u| u.clearance >= required)
    }
}

/// Process-wide session for single-front-end applications.
///
/// Prefer passing `&Session` explicitly; this accessor exists for callers
/// that need the original's global convenience. The mutex assumes a single
/// writer - all session mutation confined to one logical thread.
pub fn global() -> &'static Mutex<Session> {
    static GLOBAL: OnceLock<Mutex<Session>> = OnceLock::new();
    GLOBAL.get_or_init(|| Mutex::new(Session::new()))
}

/// A screen-side access check failed; no database call was made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessDenied {
    #[error("not logged in")]
    NotLoggedIn,
    #[error("requires the {required} role")]
    WrongRole { required: Role },
    #[error("requires clearance level {required} or higher")]
    InsufficientClearance { required: u32 },
}

/// Require a logged-in user with the given role.
pub fn require_role(session: &Session, required: Role) -> Result<&SessionUser, AccessDenied> {
    let user = session.current().ok_or(AccessDenied::NotLoggedIn)?;
    if user.role != required {
        return Err(AccessDenied::WrongRole { required });
    }
    Ok(user)
}

/// Require a logged-in user meeting the given clearance floor.
pub fn require_clearance(
    session: &Session,
    required: u32,
) -> Result<&SessionUser, AccessDenied> {
    let user = session.current().ok_or(AccessDenied::NotLoggedIn)?;
    if user.clearance < required {
        return Err(AccessDenied::InsufficientClearance { required });
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_session_is_logged_out() {
        let session = Session::new();
        assert!(!session.is_logged_in());
        assert!(!session.has_role(Role::Admin));
        assert!(!session.has_clearance(0));
        assert!(session.current().is_none());
    }

    #[test]
    fn test_set_user_populates_all_fields() {
        let mut session = Session::new();
        session.set_user("alice", Role::Admin, 5);
        assert!(session.is_logged_in());
        assert_eq!(session.username(), Some("alice"));
        assert_eq!(session.role(), Some(Role::Admin));
        assert_eq!(session.clearance(), Some(5));
    }

    #[test]
    fn test_rbac_exact_match() {
        let mut session = Session::new();
        session.set_user("alice", Role::Admin, 5);
        assert!(session.has_role(Role::Admin));
        assert!(!session.has_role(Role::Student));
    }

    #[test]
    fn test_mls_floor_is_monotonic() {
        let mut session = Session::new();
        session.set_user("alice", Role::Admin, 5);
        assert!(session.has_clearance(0));
        assert!(session.has_clearance(5));
        assert!(!session.has_clearance(6));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut session = Session::new();
        session.set_user("alice", Role::Admin, 5);
        session.clear();
        assert!(!session.is_logged_in());
        assert!(!session.has_role(Role::Admin));
        assert!(!session.has_clearance(0));
        // Idempotent.
        session.clear();
        assert!(!session.is_logged_in());
    }

    #[test]
    fn test_set_user_overwrites_without_clear() {
        let mut session = Session::new();
        session.set_user("alice", Role::Admin, 5);
        session.set_user("bob", Role::Student, 1);
        assert_eq!(session.username(), Some("bob"));
        assert_eq!(session.role(), Some(Role::Student));
        assert_eq!(session.clearance(), Some(1));
    }

    #[test]
    fn test_role_labels_round_trip() {
        for role in [
            Role::Admin,
            Role::Instructor,
            Role::Ta,
            Role::Student,
            Role::Guest,
        ] {
            assert_eq!(role.as_label().parse::<Role>().unwrap(), role);
        }
        // The server's guest label and the short alias both parse.
        assert_eq!("Guestrole".parse::<Role>().unwrap(), Role::Guest);
        assert_eq!("Guest".parse::<Role>().unwrap(), Role::Guest);
        assert!("Superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_require_role() {
        let mut session = Session::new();
        assert_eq!(
            require_role(&session, Role::Admin),
            Err(AccessDenied::NotLoggedIn)
        );

        session.set_user("tina", Role::Ta, 2);
        assert_eq!(
            require_role(&session, Role::Admin),
            Err(AccessDenied::WrongRole {
                required: Role::Admin
            })
        );
        assert_eq!(require_role(&session, Role::Ta).unwrap().username, "tina");
    }

    #[test]
    fn test_require_clearance() {
        let mut session = Session::new();
        assert_eq!(
            require_clearance(&session, 1),
            Err(AccessDenied::NotLoggedIn)
        );

        session.set_user("tina", Role::Ta, 2);
        assert!(require_clearance(&session, 2).is_ok());
        assert_eq!(
            require_clearance(&session, 3),
            Err(AccessDenied::InsufficientClearance { required: 3 })
        );
    }
}

//! Campus Records client library.
//!
//! This library provides the data-access and session-authorization core of a
//! role-based campus records client. All reads and writes go through named
//! stored procedures on SQL Server; business rules live server-side. The
//! client keeps one in-process [`session::Session`] and gates every privileged
//! action with RBAC and clearance checks before touching the database.

pub mod actions;
pub mod config;
pub mod db;
pub mod error;
pub mod security;
pub mod session;

pub use config::Config;
pub use db::{ResultRow, SpInvoker, SpParam, SqlValue};
pub use error::{DbError, DbResult};
pub use session::{Role, Session};

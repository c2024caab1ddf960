//! Stored-procedure data access.
//!
//! Every database operation goes through the four call shapes on
//! [`SpInvoker`]: multi-row, single-row, scalar and non-query. Each operation
//! opens a short-lived connection via a [`ConnectionProvider`], executes one
//! `EXEC` statement, shapes the result and releases the connection on every
//! exit path. There is no pooling and no shared connection state.

pub mod call;
pub mod connection;
pub mod invoker;
pub mod registry;
pub mod value;

pub use call::{ProcedureCall, build_exec};
pub use connection::{ConnectionProvider, ProcedureClient, TiberiusProvider};
pub use invoker::SpInvoker;
pub use registry::{ProcedureRegistry, ProcedureSignature};
pub use value::{ResultRow, SpParam, SqlValue};

//! Call-text construction for stored-procedure invocations.

use crate::db::value::SpParam;

/// A single stored-procedure invocation: name plus positionally bound
/// parameters. Built fresh per call, never cached.
///
/// Parameter order is significant and must match the procedure's declared
/// signature; the server reports any mismatch at execute time.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureCall {
    pub name: String,
    pub params: Vec<SpParam>,
}

impl ProcedureCall {
    pub fn new(name: impl Into<String>, params: Vec<SpParam>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    /// The `EXEC` statement for this call.
    pub fn exec_sql(&self) -> String {
        build_exec(&self.name, self.params.len())
    }
}

/// Build `EXEC <name> @P1, @P2, ...` with exactly `param_count` placeholders.
///
/// Zero parameters yield a bare `EXEC <name>`. The name may carry a schema
/// qualifier (`dbo.sp_...`) and is passed through unchanged.
pub fn build_exec(name: &str, param_count: usize) -> String {
    if param_count == 0 {
        return format!("EXEC {name}");
    }
    let placeholders = (1..=param_count)
        .map(|i| format!("@P{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("EXEC {name} {placeholders}")
}

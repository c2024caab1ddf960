//! Registry of known stored-procedure signatures.
//!
//! The server is the authority on parameter order and count, but a wrong
//! arity only surfaces there as an opaque execute failure. An invoker built
//! with a registry checks arity up front and rejects the call before a
//! connection is ever opened. Lookups ignore an optional schema qualifier, so
//! `dbo.sp_RoleRequest_Approve` and `sp_RoleRequest_Approve` resolve to the
//! same signature.

use std::collections::HashMap;

use crate::error::{DbError, DbResult};

/// Declared signature of one stored procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureSignature {
    pub name: &'static str,
    pub arity: usize,
}

/// Known procedures, keyed by unqualified name.
#[derive(Debug, Clone, Default)]
pub struct ProcedureRegistry {
    signatures: HashMap<&'static str, usize>,
}

/// The campus catalog: every procedure the dashboards call, with its declared
/// parameter count. By convention the first parameter is the acting username,
/// except for `sp_User_Login` and the self-service `sp_User_Register`.
const CATALOG: &[ProcedureSignature] = &[
    ProcedureSignature { name: "sp_User_Login", arity: 2 },
    ProcedureSignature { name: "sp_User_GetAll", arity: 1 },
    ProcedureSignature { name: "sp_User_Register", arity: 8 },
    ProcedureSignature { name: "sp_User_UpdateRole", arity: 3 },
    ProcedureSignature { name: "sp_User_Delete", arity: 2 },
    ProcedureSignature { name: "sp_Admin_CreateUser", arity: 4 },
    ProcedureSignature { name: "sp_Admin_GetCourses", arity: 1 },
    ProcedureSignature { name: "sp_Admin_CreateCourse", arity: 4 },
    ProcedureSignature { name: "sp_Admin_UpdateCourse", arity: 5 },
    ProcedureSignature { name: "sp_Admin_DeleteCourse", arity: 2 },
    ProcedureSignature { name: "sp_Admin_GetInstructors", arity: 1 },
    ProcedureSignature { name: "sp_Admin_GetTAs", arity: 1 },
    ProcedureSignature { name: "sp_Admin_GetStudents", arity: 1 },
    ProcedureSignature { name: "sp_Admin_GetInstructorAssignments", arity: 1 },
    ProcedureSignature { name: "sp_Admin_AssignInstructorToCourse", arity: 3 },
    ProcedureSignature { name: "sp_Admin_UnassignInstructorFromCourse", arity: 3 },
    ProcedureSignature { name: "sp_Admin_GetTAAssignments", arity: 1 },
    ProcedureSignature { name: "sp_Admin_AssignTAtoCourse", arity: 3 },
    ProcedureSignature { name: "sp_Admin_UnassignTAFromCourse", arity: 3 },
    ProcedureSignature { name: "sp_Admin_EnrollStudentInCourse", arity: 3 },
    ProcedureSignature { name: "sp_Admin_RemoveEnrollment", arity: 3 },
    ProcedureSignature { name: "sp_RoleRequest_Submit", arity: 4 },
    ProcedureSignature { name: "sp_RoleRequest_GetPending", arity: 1 },
    ProcedureSignature { name: "sp_RoleRequest_Approve", arity: 2 },
    ProcedureSignature { name: "sp_RoleRequest_Deny", arity: 2 },
    ProcedureSignature { name: "sp_Instructor_ViewCourses", arity: 1 },
    ProcedureSignature { name: "sp_Instructor_ViewProfile", arity: 1 },
    ProcedureSignature { name: "sp_Instructor_UpdateProfile", arity: 3 },
    ProcedureSignature { name: "sp_Instructor_ViewStudentsByCourse", arity: 2 },
    ProcedureSignature { name: "sp_Instructor_ViewGradesByCourse", arity: 2 },
    ProcedureSignature { name: "sp_Instructor_SaveGrade", arity: 4 },
    ProcedureSignature { name: "sp_Instructor_DeleteGrade", arity: 3 },
    ProcedureSignature { name: "sp_Instructor_ViewAttendanceByCourse", arity: 2 },
    ProcedureSignature { name: "sp_Get_AvgGrade_Safe", arity: 2 },
    ProcedureSignature { name: "sp_TA_ViewCourses", arity: 1 },
    ProcedureSignature { name: "sp_TA_ViewStudentsByCourse", arity: 2 },
    ProcedureSignature { name: "sp_TA_ViewAttendance", arity: 1 },
    ProcedureSignature { name: "sp_TA_RecordAttendance", arity: 4 },
    ProcedureSignature { name: "sp_TA_UpdateAttendance", arity: 2 },
    ProcedureSignature { name: "sp_TA_DeleteAttendance", arity: 2 },
    ProcedureSignature { name: "sp_Student_ViewProfile", arity: 1 },
    ProcedureSignature { name: "sp_Student_UpdateOwnPhone", arity: 2 },
    ProcedureSignature { name: "sp_Student_ViewCourses", arity: 1 },
    ProcedureSignature { name: "sp_Student_ViewGrades", arity: 1 },
    ProcedureSignature { name: "sp_Student_ViewAttendance", arity: 1 },
    ProcedureSignature { name: "sp_Get_PublicCourses", arity: 1 },
];

impl ProcedureRegistry {
    /// Empty registry; accepts nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the campus procedure catalog.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for sig in CATALOG {
            registry.register(sig.name, sig.arity);
        }
        registry
    }

    pub fn register(&mut self, name: &'static str, arity: usize) {
        self.signatures.insert(name, arity);
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// Declared arity for a (possibly schema-qualified) procedure name.
    pub fn arity_of(&self, name: &str) -> Option<usize> {
        let unqualified = name.rsplit('.').next().unwrap_or(name);
        self.signatures.get(unqualified).copied()
    }

    /// Verify a call against the catalog before it reaches the server.
    pub fn verify(&self, name: &str, param_count: usize) -> DbResult<()> {
        match self.arity_of(name) {
            None => Err(DbError::invalid_input(format!(
                "unknown stored procedure: {name}"
            ))),
            Some(expected) if expected != param_count => Err(DbError::invalid_input(format!(
                "{name} takes {expected} parameter(s), got {param_count}"
            ))),
            Some(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_loaded() {
        let registry = ProcedureRegistry::builtin();
        assert_eq!(registry.len(), CATALOG.len());
        assert_eq!(registry.arity_of("sp_User_Login"), Some(2));
        assert_eq!(registry.arity_of("sp_User_Register"), Some(8));
    }

    #[test]
    fn test_schema_qualifier_is_ignored() {
        let registry = ProcedureRegistry::builtin();
        assert_eq!(registry.arity_of("dbo.sp_RoleRequest_Approve"), Some(2));
        assert!(registry.verify("dbo.sp_Instructor_ViewProfile", 1).is_ok());
    }

    #[test]
    fn test_verify_rejects_wrong_arity() {
        let registry = ProcedureRegistry::builtin();
        let err = registry.verify("sp_User_Login", 3).unwrap_err();
        assert!(matches!(err, DbError::InvalidInput { .. }));
        assert!(err.to_string().contains("takes 2"));
    }

    #[test]
    fn test_verify_rejects_unknown_procedure() {
        let registry = ProcedureRegistry::builtin();
        let err = registry.verify("sp_DropEverything", 0).unwrap_err();
        assert!(matches!(err, DbError::InvalidInput { .. }));
    }

    #[test]
    fn test_empty_registry_accepts_nothing() {
        let registry = ProcedureRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.verify("sp_User_Login", 2).is_err());
    }
}

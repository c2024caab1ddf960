//! Integration tests for the stored-procedure invoker against a scripted
//! connection provider: call shapes, transaction discipline and connection
//! lifecycle.

mod common;

use campus_records::db::value::{ResultRow, SpParam, SqlValue};
use campus_records::db::{ProcedureRegistry, SpInvoker};
use campus_records::error::DbError;
use common::{FakeProvider, FakeState};

fn course_row(id: i64, name: &str) -> ResultRow {
    ResultRow::from_pairs([
        ("CourseID".to_string(), SqlValue::Int(id)),
        ("CourseName".to_string(), SqlValue::Text(name.to_string())),
    ])
}

#[tokio::test]
async fn test_call_rows_returns_all_rows_and_releases() {
    let provider = FakeProvider::returning_rows(vec![
        course_row(1, "Databases"),
        course_row(2, "Operating Systems"),
    ]);
    let state = provider.state();
    let invoker = SpInvoker::new(provider);

    let rows = invoker
        .call_rows("sp_Student_ViewCourses", &[SpParam::text("alice")])
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get_str("CourseName"), Some("Databases"));

    let state = state.lock().unwrap();
    assert_eq!(state.acquired, 1);
    assert_eq!(state.closed, 1);
    assert_eq!(state.begins, 0);
    assert_eq!(state.statements, ["EXEC sp_Student_ViewCourses @P1"]);
}

#[tokio::test]
async fn test_call_rows_empty_result_is_not_an_error() {
    let provider = FakeProvider::new();
    let invoker = SpInvoker::new(provider);

    let rows = invoker
        .call_rows("sp_TA_ViewAttendance", &[SpParam::text("tina")])
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_call_single_row_none_on_zero_rows() {
    let provider = FakeProvider::new();
    let invoker = SpInvoker::new(provider);

    let row = invoker
        .call_single_row(
            "sp_User_Login",
            &[SpParam::text("alice"), SpParam::text("wrong")],
        )
        .await
        .unwrap();
    assert!(row.is_none());
}

#[tokio::test]
async fn test_call_single_row_takes_first_of_many() {
    let provider = FakeProvider::returning_rows(vec![course_row(1, "first"), course_row(2, "second")]);
    let invoker = SpInvoker::new(provider);

    let row = invoker
        .call_single_row("sp_Student_ViewProfile", &[SpParam::text("alice")])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.get_i64("CourseID"), Some(1));
}

#[tokio::test]
async fn test_call_scalar_is_first_column_of_first_row() {
    let provider = FakeProvider::returning_rows(vec![course_row(42, "ignored")]);
    let invoker = SpInvoker::new(provider);

    let value = invoker
        .call_scalar("sp_Get_AvgGrade_Safe", &[SpParam::text("bob"), SpParam::Int(3)])
        .await
        .unwrap();
    assert_eq!(value, Some(SqlValue::Int(42)));
}

#[tokio::test]
async fn test_call_scalar_none_without_rows() {
    let invoker = SpInvoker::new(FakeProvider::new());
    let value = invoker
        .call_scalar("sp_Get_AvgGrade_Safe", &[SpParam::text("bob"), SpParam::Int(3)])
        .await
        .unwrap();
    assert!(value.is_none());
}

#[tokio::test]
async fn test_non_query_commits_once_on_success() {
    let provider = FakeProvider::with_state(FakeState {
        affected: 3,
        ..FakeState::default()
    });
    let state = provider.state();
    let invoker = SpInvoker::new(provider);

    let affected = invoker
        .call_non_query(
            "sp_Admin_DeleteCourse",
            &[SpParam::text("root"), SpParam::Int(7)],
        )
        .await
        .unwrap();
    assert_eq!(affected, 3);

    let state = state.lock().unwrap();
    assert_eq!(state.begins, 1);
    assert_eq!(state.commits, 1);
    assert_eq!(state.rollbacks, 0);
    assert_eq!(state.acquired, 1);
    assert_eq!(state.closed, 1);
    assert_eq!(state.statements, ["EXEC sp_Admin_DeleteCourse @P1, @P2"]);
}

#[tokio::test]
async fn test_non_query_rolls_back_on_execute_failure() {
    let provider = FakeProvider::with_state(FakeState {
        fail_execute: true,
        ..FakeState::default()
    });
    let state = provider.state();
    let invoker = SpInvoker::new(provider);

    let err = invoker
        .call_non_query("sp_User_Delete", &[SpParam::text("root"), SpParam::text("bob")])
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NonQuery { .. }));

    let state = state.lock().unwrap();
    assert_eq!(state.commits, 0);
    assert_eq!(state.rollbacks, 1);
    assert_eq!(state.closed, 1, "connection must be released on failure");
}

#[tokio::test]
async fn test_non_query_commit_failure_surfaces_and_rolls_back() {
    let provider = FakeProvider::with_state(FakeState {
        fail_commit: true,
        ..FakeState::default()
    });
    let state = provider.state();
    let invoker = SpInvoker::new(provider);

    let err = invoker
        .call_non_query("sp_User_Delete", &[SpParam::text("root"), SpParam::text("bob")])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("commit"));

    let state = state.lock().unwrap();
    assert_eq!(state.rollbacks, 1);
    assert_eq!(state.closed, 1);
}

#[tokio::test]
async fn test_rollback_failure_never_masks_original_error() {
    let provider = FakeProvider::with_state(FakeState {
        fail_execute: true,
        fail_rollback: true,
        ..FakeState::default()
    });
    let state = provider.state();
    let invoker = SpInvoker::new(provider);

    let err = invoker
        .call_non_query("sp_User_Delete", &[SpParam::text("root"), SpParam::text("bob")])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("execute failure"));

    assert_eq!(state.lock().unwrap().closed, 1);
}

#[tokio::test]
async fn test_query_failure_still_releases_connection() {
    let provider = FakeProvider::with_state(FakeState {
        fail_query: true,
        ..FakeState::default()
    });
    let state = provider.state();
    let invoker = SpInvoker::new(provider);

    let err = invoker
        .call_rows("sp_User_GetAll", &[SpParam::text("root")])
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Query { .. }));

    let state = state.lock().unwrap();
    assert_eq!(state.acquired, 1);
    assert_eq!(state.closed, 1);
}

#[tokio::test]
async fn test_acquire_failure_is_a_connection_error() {
    let provider = FakeProvider::with_state(FakeState {
        fail_acquire: true,
        ..FakeState::default()
    });
    let invoker = SpInvoker::new(provider);

    let err = invoker
        .call_rows("sp_User_GetAll", &[SpParam::text("root")])
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Connection { .. }));
}

#[tokio::test]
async fn test_registry_rejects_arity_mismatch_before_connecting() {
    let provider = FakeProvider::new();
    let state = provider.state();
    let invoker = SpInvoker::with_registry(provider, ProcedureRegistry::builtin());

    // sp_User_Login takes two parameters.
    let err = invoker
        .call_single_row("sp_User_Login", &[SpParam::text("alice")])
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::InvalidInput { .. }));
    assert_eq!(state.lock().unwrap().acquired, 0);
}

#[tokio::test]
async fn test_registry_rejects_unknown_procedure() {
    let provider = FakeProvider::new();
    let state = provider.state();
    let invoker = SpInvoker::with_registry(provider, ProcedureRegistry::builtin());

    let err = invoker
        .call_rows("sp_Drop_Everything", &[])
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::InvalidInput { .. }));
    assert_eq!(state.lock().unwrap().acquired, 0);
}

#[tokio::test]
async fn test_registry_accepts_schema_qualified_names() {
    let provider = FakeProvider::returning_rows(vec![course_row(1, "x")]);
    let invoker = SpInvoker::with_registry(provider, ProcedureRegistry::builtin());

    let row = invoker
        .call_single_row("dbo.sp_Instructor_ViewProfile", &[SpParam::text("ivy")])
        .await
        .unwrap();
    assert!(row.is_some());
}

#[tokio::test]
async fn test_custom_registration() {
    let mut registry = ProcedureRegistry::new();
    registry.register("sp_Custom_Report", 3);
    let provider = FakeProvider::new();
    let invoker = SpInvoker::with_registry(provider, registry);

    let rows = invoker
        .call_rows(
            "sp_Custom_Report",
            &[SpParam::text("root"), SpParam::Int(1), SpParam::Null],
        )
        .await
        .unwrap();
    assert!(rows.is_empty());
}

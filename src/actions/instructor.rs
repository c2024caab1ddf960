//! Instructor dashboard actions: own courses and profile, rosters, grades
//! and attendance per course, and the safe course-average report.

use crate::actions::{acting, ActionResult};
use crate::db::value::{ResultRow, SpParam, SqlValue};
use crate::db::SpInvoker;
use crate::error::DbError;
use crate::session::{require_clearance, require_role, Role, Session};

/// Clearance floor for the aggregated grade report. Roster and per-student
/// grade screens are plain role checks; the aggregate view additionally
/// requires this level.
pub const AVG_GRADE_MIN_CLEARANCE: u32 = 2;

pub async fn my_courses(invoker: &SpInvoker, session: &Session) -> ActionResult<Vec<ResultRow>> {
    let user = require_role(session, Role::Instructor)?;
    Ok(invoker
        .call_rows("sp_Instructor_ViewCourses", &[acting(user)])
        .await?)
}

pub async fn view_profile(
    invoker: &SpInvoker,
    session: &Session,
) -> ActionResult<Option<ResultRow>> {
    let user = require_role(session, Role::Instructor)?;
    Ok(invoker
        .call_single_row("sp_Instructor_ViewProfile", &[acting(user)])
        .await?)
}

pub async fn update_profile(
    invoker: &SpInvoker,
    session: &Session,
    full_name: &str,
    email: &str,
) -> ActionResult<u64> {
    let user = require_role(session, Role::Instructor)?;
    Ok(invoker
        .call_non_query(
            "sp_Instructor_UpdateProfile",
            &[acting(user), SpParam::text(full_name), SpParam::text(email)],
        )
        .await?)
}

pub async fn students_by_course(
    invoker: &SpInvoker,
    session: &Session,
    course_id: i64,
) -> ActionResult<Vec<ResultRow>> {
    let user = require_role(session, Role::Instructor)?;
    Ok(invoker
        .call_rows(
            "sp_Instructor_ViewStudentsByCourse",
            &[acting(user), SpParam::Int(course_id)],
        )
        .await?)
}

pub async fn grades_by_course(
    invoker: &SpInvoker,
    session: &Session,
    course_id: i64,
) -> ActionResult<Vec<ResultRow>> {
    let user = require_role(session, Role::Instructor)?;
    Ok(invoker
        .call_rows(
            "sp_Instructor_ViewGradesByCourse",
            &[acting(user), SpParam::Int(course_id)],
        )
        .await?)
}

pub async fn attendance_by_course(
    invoker: &SpInvoker,
    session: &Session,
    course_id: i64,
) -> ActionResult<Vec<ResultRow>> {
    let user = require_role(session, Role::Instructor)?;
    Ok(invoker
        .call_rows(
            "sp_Instructor_ViewAttendanceByCourse",
            &[acting(user), SpParam::Int(course_id)],
        )
        .await?)
}

/// Insert or update a grade for one student in one course.
pub async fn save_grade(
    invoker: &SpInvoker,
    session: &Session,
    student_id: i64,
    course_id: i64,
    grade: f64,
) -> ActionResult<u64> {
    let user = require_role(session, Role::Instructor)?;
    Ok(invoker
        .call_non_query(
            "sp_Instructor_SaveGrade",
            &[
                acting(user),
                SpParam::Int(student_id),
                SpParam::Int(course_id),
                SpParam::Float(grade),
            ],
        )
        .await?)
}

pub async fn delete_grade(
    invoker: &SpInvoker,
    session: &Session,
    student_id: i64,
    course_id: i64,
) -> ActionResult<u64> {
    let user = require_role(session, Role::Instructor)?;
    Ok(invoker
        .call_non_query(
            "sp_Instructor_DeleteGrade",
            &[acting(user), SpParam::Int(student_id), SpParam::Int(course_id)],
        )
        .await?)
}

/// Average grade for a course via `sp_Get_AvgGrade_Safe`.
///
/// Gated by both the instructor role and [`AVG_GRADE_MIN_CLEARANCE`].
/// Returns `None` when the procedure yields no row or a NULL average
/// (no grades recorded yet).
pub async fn course_average(
    invoker: &SpInvoker,
    session: &Session,
    course_id: i64,
) -> ActionResult<Option<f64>> {
    let user = require_role(session, Role::Instructor)?;
    require_clearance(session, AVG_GRADE_MIN_CLEARANCE)?;

    let row = invoker
        .call_single_row(
            "sp_Get_AvgGrade_Safe",
            &[SpParam::text(&user.username), SpParam::Int(course_id)],
        )
        .await?;

    match row {
        None => Ok(None),
        Some(row) => match row.get("AvgGrade") {
            None => Err(DbError::internal("average-grade row is missing the AvgGrade column").into()),
            Some(SqlValue::Null) => Ok(None),
            Some(value) => match value.as_f64() {
                Some(avg) => Ok(Some(avg)),
                None => Err(DbError::internal("AvgGrade column is not numeric").into()),
            },
        },
    }
}

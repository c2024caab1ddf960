//! TA dashboard actions: assigned courses, rosters, and attendance keeping.

use crate::actions::{acting, ActionResult};
use crate::db::value::{ResultRow, SpParam};
use crate::db::SpInvoker;
use crate::session::{require_role, Role, Session};

pub async fn my_courses(invoker: &SpInvoker, session: &Session) -> ActionResult<Vec<ResultRow>> {
    let user = require_role(session, Role::Ta)?;
    Ok(invoker
        .call_rows("sp_TA_ViewCourses", &[acting(user)])
        .await?)
}

pub async fn students_by_course(
    invoker: &SpInvoker,
    session: &Session,
    course_id: i64,
) -> ActionResult<Vec<ResultRow>> {
    let user = require_role(session, Role::Ta)?;
    Ok(invoker
        .call_rows(
            "sp_TA_ViewStudentsByCourse",
            &[acting(user), SpParam::Int(course_id)],
        )
        .await?)
}

/// All attendance records for the TA's assigned courses.
pub async fn attendance(invoker: &SpInvoker, session: &Session) -> ActionResult<Vec<ResultRow>> {
    let user = require_role(session, Role::Ta)?;
    Ok(invoker
        .call_rows("sp_TA_ViewAttendance", &[acting(user)])
        .await?)
}

pub async fn record_attendance(
    invoker: &SpInvoker,
    session: &Session,
    student_id: i64,
    course_id: i64,
    present: bool,
) -> ActionResult<u64> {
    let user = require_role(session, Role::Ta)?;
    Ok(invoker
        .call_non_query(
            "sp_TA_RecordAttendance",
            &[
                acting(user),
                SpParam::Int(student_id),
                SpParam::Int(course_id),
                SpParam::Int(present as i64),
            ],
        )
        .await?)
}

/// Toggle the present/absent status of an existing record.
pub async fn update_attendance(
    invoker: &SpInvoker,
    session: &Session,
    attendance_id: i64,
) -> ActionResult<u64> {
    let user = require_role(session, Role::Ta)?;
    Ok(invoker
        .call_non_query(
            "sp_TA_UpdateAttendance",
            &[acting(user), SpParam::Int(attendance_id)],
        )
        .await?)
}

pub async fn delete_attendance(
    invoker: &SpInvoker,
    session: &Session,
    attendance_id: i64,
) -> ActionResult<u64> {
    let user = require_role(session, Role::Ta)?;
    Ok(invoker
        .call_non_query(
            "sp_TA_DeleteAttendance",
            &[acting(user), SpParam::Int(attendance_id)],
        )
        .await?)
}

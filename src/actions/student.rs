//! Student dashboard actions: own profile, courses, grades, attendance,
//! phone update and role-upgrade requests.

use crate::actions::{acting, ActionResult};
use crate::db::value::{ResultRow, SpParam};
use crate::db::SpInvoker;
use crate::session::{require_role, Role, Session};

pub async fn view_profile(
    invoker: &SpInvoker,
    session: &Session,
) -> ActionResult<Option<ResultRow>> {
    let user = require_role(session, Role::Student)?;
    Ok(invoker
        .call_single_row("sp_Student_ViewProfile", &[acting(user)])
        .await?)
}

pub async fn my_courses(invoker: &SpInvoker, session: &Session) -> ActionResult<Vec<ResultRow>> {
    let user = require_role(session, Role::Student)?;
    Ok(invoker
        .call_rows("sp_Student_ViewCourses", &[acting(user)])
        .await?)
}

pub async fn my_grades(invoker: &SpInvoker, session: &Session) -> ActionResult<Vec<ResultRow>> {
    let user = require_role(session, Role::Student)?;
    Ok(invoker
        .call_rows("sp_Student_ViewGrades", &[acting(user)])
        .await?)
}

pub async fn my_attendance(invoker: &SpInvoker, session: &Session) -> ActionResult<Vec<ResultRow>> {
    let user = require_role(session, Role::Student)?;
    Ok(invoker
        .call_rows("sp_Student_ViewAttendance", &[acting(user)])
        .await?)
}

/// The only profile field a student may edit directly.
pub async fn update_phone(
    invoker: &SpInvoker,
    session: &Session,
    phone: &str,
) -> ActionResult<u64> {
    let user = require_role(session, Role::Student)?;
    Ok(invoker
        .call_non_query(
            "sp_Student_UpdateOwnPhone",
            &[acting(user), SpParam::text(phone)],
        )
        .await?)
}

/// Submit a role-upgrade request for admin review.
pub async fn submit_role_request(
    invoker: &SpInvoker,
    session: &Session,
    requested_role: Role,
    reason: &str,
    comments: Option<&str>,
) -> ActionResult<u64> {
    let user = require_role(session, Role::Student)?;
    Ok(invoker
        .call_non_query(
            "sp_RoleRequest_Submit",
            &[
                acting(user),
                SpParam::text(requested_role.as_label()),
                SpParam::text(reason),
                SpParam::opt_text(comments),
            ],
        )
        .await?)
}

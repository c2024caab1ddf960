//! Admin dashboard actions: user management, courses, assignments,
//! enrollment and role-request review.

use crate::actions::{acting, ActionResult};
use crate::db::value::{ResultRow, SpParam};
use crate::db::SpInvoker;
use crate::session::{require_role, Role, Session};

/// A new account created from the admin dashboard. Profile fields are
/// optional; the server stores NULL for the ones left empty.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub department: Option<String>,
}

pub async fn list_users(invoker: &SpInvoker, session: &Session) -> ActionResult<Vec<ResultRow>> {
    let user = require_role(session, Role::Admin)?;
    Ok(invoker.call_rows("sp_User_GetAll", &[acting(user)]).await?)
}

/// Create another admin account. Non-admin accounts go through
/// [`register_user`].
pub async fn create_admin_user(
    invoker: &SpInvoker,
    session: &Session,
    username: &str,
    password: &str,
) -> ActionResult<u64> {
    let user = require_role(session, Role::Admin)?;
    Ok(invoker
        .call_non_query(
            "sp_Admin_CreateUser",
            &[
                acting(user),
                SpParam::text(username),
                SpParam::text(password),
                SpParam::text(Role::Admin.as_label()),
            ],
        )
        .await?)
}

/// Register a non-admin account with its profile fields.
pub async fn register_user(
    invoker: &SpInvoker,
    session: &Session,
    new_user: NewUser,
    role: Role,
) -> ActionResult<u64> {
    require_role(session, Role::Admin)?;
    Ok(invoker
        .call_non_query(
            "sp_User_Register",
            &[
                SpParam::text(new_user.username),
                SpParam::text(new_user.password),
                SpParam::text(role.as_label()),
                SpParam::opt_text(new_user.full_name),
                SpParam::opt_text(new_user.email),
                SpParam::opt_text(new_user.phone),
                SpParam::opt_text(new_user.date_of_birth),
                SpParam::opt_text(new_user.department),
            ],
        )
        .await?)
}

pub async fn update_user_role(
    invoker: &SpInvoker,
    session: &Session,
    target_username: &str,
    role: Role,
) -> ActionResult<u64> {
    let user = require_role(session, Role::Admin)?;
    Ok(invoker
        .call_non_query(
            "sp_User_UpdateRole",
            &[
                acting(user),
                SpParam::text(target_username),
                SpParam::text(role.as_label()),
            ],
        )
        .await?)
}

pub async fn delete_user(
    invoker: &SpInvoker,
    session: &Session,
    target_username: &str,
) -> ActionResult<u64> {
    let user = require_role(session, Role::Admin)?;
    Ok(invoker
        .call_non_query(
            "sp_User_Delete",
            &[acting(user), SpParam::text(target_username)],
        )
        .await?)
}

pub async fn list_courses(invoker: &SpInvoker, session: &Session) -> ActionResult<Vec<ResultRow>> {
    let user = require_role(session, Role::Admin)?;
    Ok(invoker
        .call_rows("sp_Admin_GetCourses", &[acting(user)])
        .await?)
}

pub async fn create_course(
    invoker: &SpInvoker,
    session: &Session,
    name: &str,
    description: Option<&str>,
    public_info: Option<&str>,
) -> ActionResult<u64> {
    let user = require_role(session, Role::Admin)?;
    Ok(invoker
        .call_non_query(
            "sp_Admin_CreateCourse",
            &[
                acting(user),
                SpParam::text(name),
                SpParam::opt_text(description),
                SpParam::opt_text(public_info),
            ],
        )
        .await?)
}

pub async fn update_course(
    invoker: &SpInvoker,
    session: &Session,
    course_id: i64,
    name: &str,
    description: Option<&str>,
    public_info: Option<&str>,
) -> ActionResult<u64> {
    let user = require_role(session, Role::Admin)?;
    Ok(invoker
        .call_non_query(
            "sp_Admin_UpdateCourse",
            &[
                acting(user),
                SpParam::Int(course_id),
                SpParam::text(name),
                SpParam::opt_text(description),
                SpParam::opt_text(public_info),
            ],
        )
        .await?)
}

pub async fn delete_course(
    invoker: &SpInvoker,
    session: &Session,
    course_id: i64,
) -> ActionResult<u64> {
    let user = require_role(session, Role::Admin)?;
    Ok(invoker
        .call_non_query(
            "sp_Admin_DeleteCourse",
            &[acting(user), SpParam::Int(course_id)],
        )
        .await?)
}

pub async fn list_instructors(
    invoker: &SpInvoker,
    session: &Session,
) -> ActionResult<Vec<ResultRow>> {
    let user = require_role(session, Role::Admin)?;
    Ok(invoker
        .call_rows("sp_Admin_GetInstructors", &[acting(user)])
        .await?)
}

pub async fn list_tas(invoker: &SpInvoker, session: &Session) -> ActionResult<Vec<ResultRow>> {
    let user = require_role(session, Role::Admin)?;
    Ok(invoker
        .call_rows("sp_Admin_GetTAs", &[acting(user)])
        .await?)
}

pub async fn list_students(invoker: &SpInvoker, session: &Session) -> ActionResult<Vec<ResultRow>> {
    let user = require_role(session, Role::Admin)?;
    Ok(invoker
        .call_rows("sp_Admin_GetStudents", &[acting(user)])
        .await?)
}

pub async fn instructor_assignments(
    invoker: &SpInvoker,
    session: &Session,
) -> ActionResult<Vec<ResultRow>> {
    let user = require_role(session, Role::Admin)?;
    Ok(invoker
        .call_rows("sp_Admin_GetInstructorAssignments", &[acting(user)])
        .await?)
}

pub async fn assign_instructor(
    invoker: &SpInvoker,
    session: &Session,
    instructor_id: i64,
    course_id: i64,
) -> ActionResult<u64> {
    let user = require_role(session, Role::Admin)?;
    Ok(invoker
        .call_non_query(
            "sp_Admin_AssignInstructorToCourse",
            &[acting(user), SpParam::Int(instructor_id), SpParam::Int(course_id)],
        )
        .await?)
}

pub async fn unassign_instructor(
    invoker: &SpInvoker,
    session: &Session,
    instructor_id: i64,
    course_id: i64,
) -> ActionResult<u64> {
    let user = require_role(session, Role::Admin)?;
    Ok(invoker
        .call_non_query(
            "sp_Admin_UnassignInstructorFromCourse",
            &[acting(user), SpParam::Int(instructor_id), SpParam::Int(course_id)],
        )
        .await?)
}

pub async fn ta_assignments(
    invoker: &SpInvoker,
    session: &Session,
) -> ActionResult<Vec<ResultRow>> {
    let user = require_role(session, Role::Admin)?;
    Ok(invoker
        .call_rows("sp_Admin_GetTAAssignments", &[acting(user)])
        .await?)
}

pub async fn assign_ta(
    invoker: &SpInvoker,
    session: &Session,
    ta_username: &str,
    course_id: i64,
) -> ActionResult<u64> {
    let user = require_role(session, Role::Admin)?;
    Ok(invoker
        .call_non_query(
            "sp_Admin_AssignTAtoCourse",
            &[acting(user), SpParam::text(ta_username), SpParam::Int(course_id)],
        )
        .await?)
}

pub async fn unassign_ta(
    invoker: &SpInvoker,
    session: &Session,
    ta_username: &str,
    course_id: i64,
) -> ActionResult<u64> {
    let user = require_role(session, Role::Admin)?;
    Ok(invoker
        .call_non_query(
            "sp_Admin_UnassignTAFromCourse",
            &[acting(user), SpParam::text(ta_username), SpParam::Int(course_id)],
        )
        .await?)
}

pub async fn enroll_student(
    invoker: &SpInvoker,
    session: &Session,
    student_id: i64,
    course_id: i64,
) -> ActionResult<u64> {
    let user = require_role(session, Role::Admin)?;
    Ok(invoker
        .call_non_query(
            "sp_Admin_EnrollStudentInCourse",
            &[acting(user), SpParam::Int(student_id), SpParam::Int(course_id)],
        )
        .await?)
}

pub async fn remove_enrollment(
    invoker: &SpInvoker,
    session: &Session,
    student_id: i64,
    course_id: i64,
) -> ActionResult<u64> {
    let user = require_role(session, Role::Admin)?;
    Ok(invoker
        .call_non_query(
            "sp_Admin_RemoveEnrollment",
            &[acting(user), SpParam::Int(student_id), SpParam::Int(course_id)],
        )
        .await?)
}

pub async fn pending_role_requests(
    invoker: &SpInvoker,
    session: &Session,
) -> ActionResult<Vec<ResultRow>> {
    let user = require_role(session, Role::Admin)?;
    Ok(invoker
        .call_rows("sp_RoleRequest_GetPending", &[acting(user)])
        .await?)
}

pub async fn approve_role_request(
    invoker: &SpInvoker,
    session: &Session,
    request_id: i64,
) -> ActionResult<u64> {
    let user = require_role(session, Role::Admin)?;
    Ok(invoker
        .call_non_query(
            "sp_RoleRequest_Approve",
            &[acting(user), SpParam::Int(request_id)],
        )
        .await?)
}

pub async fn deny_role_request(
    invoker: &SpInvoker,
    session: &Session,
    request_id: i64,
) -> ActionResult<u64> {
    let user = require_role(session, Role::Admin)?;
    Ok(invoker
        .call_non_query(
            "sp_RoleRequest_Deny",
            &[acting(user), SpParam::Int(request_id)],
        )
        .await?)
}

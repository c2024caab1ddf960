//! Guest dashboard: the public course catalog is the only thing a guest
//! can see.

use crate::actions::{acting, ActionResult};
use crate::db::value::ResultRow;
use crate::db::SpInvoker;
use crate::session::{require_role, Role, Session};

pub async fn public_courses(
    invoker: &SpInvoker,
    session: &Session,
) -> ActionResult<Vec<ResultRow>> {
    let user = require_role(session, Role::Guest)?;
    Ok(invoker
        .call_rows("sp_Get_PublicCourses", &[acting(user)])
        .await?)
}

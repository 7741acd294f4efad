//! The user lookup endpoint.

use crate::request::Request;
use crate::response::Response;

/// Path the endpoint is mounted on.
pub const USER_ROUTE: &str = "/users/{userID}";

/// `GET /users/{userID}` → `200 User ID: <userID>`.
///
/// The id is echoed verbatim; no lookup happens and any segment is accepted.
pub async fn get_user(req: Request) -> Response {
    // Always present: the route only matches with a non-empty segment.
    let id = req.param("userID").unwrap_or_default();
    Response::text(format!("User ID: {id}"))
}

use serde::Serialize;

use storefront::SessionUser;

/// Request-scoped template locals, populated incrementally by the pipeline
/// stages and handed to the view layer. Each stage is the sole writer of its
/// own fields; stages run strictly in sequence so no two ever race on a key.
///
/// Handlers read it with `Extension<RequestLocals>`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct RequestLocals {
    /// Render date, set by the first locals stage
    pub date: String,
    /// One-shot success messages drained from the session
    pub success_messages: Vec<String>,
    /// One-shot error messages drained from the session
    pub error_messages: Vec<String>,
    /// CSRF token for forms, absent on exempt routes
    pub csrf_token: Option<String>,
    /// Authenticated user, mirrored from the session on every request
    pub user: Option<SessionUser>,
}

//! Row-level access restriction keyed by the caller's identity.
//!
//! Runs before any query filter, on every data-serving and every export
//! operation. Identity is threaded as a parameter on every call; it is never
//! stored in process-wide state.

use crate::model::Frame;

/// The privileged identity: bypasses the access filter entirely.
pub const ADMIN: &str = "admin";

/// Restrict `frame` to the rows visible to `identity`.
///
/// Non-admin identities see only rows whose `ownership_field` equals the
/// identity exactly (case-sensitive). If the frame lacks the ownership
/// field, a non-admin identity sees no rows at all.
pub fn apply(frame: &Frame, ownership_field: &str, identity: &str) -> Frame {
    if identity == ADMIN {
        return frame.clone();
    }
    if !frame.has_column(ownership_field) {
        return frame.empty_like();
    }
    frame.filtered(|row| row.text(ownership_field) == Some(identity))
}

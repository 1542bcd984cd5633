//! Companies and drives: the admin-managed recruitment surface.

pub mod handlers;

//! Wire representations for JSON endpoints.

pub mod projects;

//! Request payloads validated before any write is attempted.

pub mod comments;
pub mod courses;
pub mod profile;
pub mod projects;

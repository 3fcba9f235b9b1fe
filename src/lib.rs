//! HTTP authentication service: bcrypt credential hashing, HS256 session
//! tokens delivered as an HTTP-only cookie, and a guard that resolves the
//! token subject to a durable user record.

pub mod app;
pub mod auth;
pub mod config;
pub mod state;
pub mod users;

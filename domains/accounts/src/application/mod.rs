//! Use cases for the Accounts domain
//!
//! Each use case is a plain input struct plus a handler function that
//! validates its own invariants and delegates persistence to the
//! repository. Handlers never see HTTP types.

pub mod auth;
pub mod users;

//! Use cases for the Projects domain
//!
//! Each use case is a plain input struct plus a handler function that
//! enforces the use case's own invariants (shape checks, membership and
//! ownership rules) and delegates persistence to the repositories.

pub mod projects;
pub mod tasks;

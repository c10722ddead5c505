//! API handlers for the Teams domain

pub mod teams;

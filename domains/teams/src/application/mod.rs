//! Use cases for the Teams domain

pub mod teams;

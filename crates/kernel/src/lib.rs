//! Roster Kernel Library
//!
//! Composable query specifications over establishments and their employees.
//! The `roster` binary is a thin command-line caller of this library.

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod models;
pub mod query;

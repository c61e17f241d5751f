//! # Operation Handlers
//!
//! Each handler extends [`crate::SigningFacade`] with one group of
//! operations.

mod certificates;
mod csp;
mod sign;
mod verify;

//! KSIS dashboard client library
//!
//! An async client for the list boards of the KSIS digital-signage
//! dashboard: paginated, filterable views with multi-select bulk actions.

pub mod api;
pub mod auth;
pub mod board;
pub mod boards;
pub mod error;
pub mod model;
pub mod playlist;
pub mod selection;
pub mod socket;
pub mod store;

mod client;

pub use board::Board;
pub use client::*;

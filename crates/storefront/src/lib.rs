//! Bazaar storefront client library.
//!
//! This crate provides the client side of the storefront as a library:
//! the admin authorization gate, the local and networked carts, and the
//! REST API client they share. The `bazaar` binary is a thin shell over it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod cart;
pub mod config;
pub mod error;
pub mod navigation;
pub mod notice;
pub mod state;
pub mod storage;

pub use error::{ClientError, Result};
pub use state::Storefront;

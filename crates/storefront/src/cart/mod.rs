//! Shopping cart state.
//!
//! Two independent variants exist:
//!
//! - [`CartStore`] - the local cart persisted in durable storage; load and
//!   remove only, never synced with the server
//! - [`CartService`] - add-to-cart against the REST API, which bumps the
//!   shared [`CartCounter`] on success

mod counter;
mod local;
mod service;

pub use counter::CartCounter;
pub use local::{CART_KEY, CartStore};
pub use service::{AddOutcome, CartError, CartService};

//! Client-side state layer.
//!
//! Every asynchronous workflow follows the same lifecycle: a `*_REQUEST`
//! action, then exactly one `*_SUCCESS` (with the response) or `*_FAIL`
//! (with an error message); `*_RESET` returns the slice to empty.
//! [`thunk`] drives the lifecycle against the HTTP [`Api`], [`Store`] folds
//! the actions into per-feature [`Lifecycle`] slices.

pub mod action;
pub mod api;
pub mod reducer;
pub mod store;
pub mod thunk;

pub use action::{Action, Phase};
pub use api::{Api, Error};
pub use reducer::Lifecycle;
pub use store::Store;

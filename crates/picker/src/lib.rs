//! Debounced, race-safe search-and-select controller.
//!
//! The [`PickerController`] owns all asynchronous state of a type-ahead
//! picker: raw input is rate-limited by a [`Debouncer`], committed queries
//! are sent to an injected [`DirectoryService`], and selecting an entity
//! resolves a secondary asset through an injected [`AssetService`].
//!
//! Every asynchronous write is gated by a per-kind sequence number so that
//! only the most recently *issued* request of a kind can change visible
//! state, regardless of the order in which responses arrive.

mod controller;
mod debounce;
mod entity;
mod error;
mod service;
mod spawn;
mod state;

pub use controller::{DEFAULT_DEBOUNCE, PickerConfig, PickerController, Transition};
pub use debounce::Debouncer;
pub use entity::{AssetRef, Entity};
pub use error::{FetchError, PickerError, SelectError};
pub use service::{AssetService, DirectoryService};
pub use state::{PickerState, RequestKind};

//! Library crate for user-dashboard.
//!
//! This crate exposes the building blocks of the TUI:
//! - Application state, config files and update loop (`app`)
//! - The list mutation controller that owns the user set (`controller`)
//! - Error and result types (`error`)
//! - User records (`model`)
//! - The pagination engine and pager layout (`pagination`)
//! - Name search (`search`)
//! - The remote user service and its HTTP client (`service`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `user-dashboard` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod app;
pub mod controller;
pub mod error;
pub mod model;
pub mod pagination;
pub mod search;
pub mod service;
pub mod ui;

// Re-export commonly used items at the crate root for convenience
pub use controller::{ListController, OpState, Outcome};
pub use error::{MutationError, PageError, ServiceError};
pub use model::{NewUser, User, UserId};
pub use pagination::{PageMarker, page_numbers_with_ellipsis, visible_page};
pub use service::{HttpUserService, UserService};

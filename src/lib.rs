// SPDX-License-Identifier: MPL-2.0
//! `toaster_core` is the lifecycle core of a transient notification ("toast")
//! manager.
//!
//! It accepts toast requests from application code, resolves each toast's
//! display configuration against defaults and per-instance overrides, and
//! manages each toast's visible lifetime including auto-dismiss timers.
//! Rendering, styling and UI mounting belong to the host.

#![doc(html_root_url = "https://docs.rs/toaster_core/0.3.0")]

pub mod config;
pub mod error;
pub mod notifications;

pub use error::{Error, Result};
pub use notifications::{
    ClearRequest, EventRegistry, Toast, ToastId, ToastKind, ToastRequest, Toaster,
    ToasterContainer,
};

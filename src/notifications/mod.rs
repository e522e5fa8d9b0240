// SPDX-License-Identifier: MPL-2.0
//! Toast notification lifecycle.
//!
//! Application code asks for toasts through a [`Toaster`]; a mounted
//! [`ToasterContainer`] receives the request through the [`EventRegistry`],
//! resolves the toast's configuration and keeps it alive until it is
//! dismissed, cleared, or its timer expires. Rendering is left to the host:
//! it reads [`ToasterContainer::toasts`] and forwards clicks and hovers back.
//!
//! # Components
//!
//! - [`notification`] - Requests, live toasts and their identifiers
//! - [`resolver`] - Pure per-toast configuration resolution
//! - [`registry`] - Create/clear event channels between producers and containers
//! - [`scheduler`] - Clock substrate (host tick or tokio)
//! - [`timer`] - Per-toast auto-dismiss timer state machine
//! - [`container`] - The live toast collection
//! - [`toaster`] - Producer entry points
//!
//! # Usage
//!
//! ```
//! use std::rc::Rc;
//! use std::time::Duration;
//! use toaster_core::config::Overrides;
//! use toaster_core::notifications::{EventRegistry, TickScheduler, Toaster, ToasterContainer};
//!
//! let registry = EventRegistry::new();
//! let clock = TickScheduler::new();
//! let container = ToasterContainer::mount(&registry, &Overrides::default(), Rc::new(clock.clone()));
//!
//! let toaster = Toaster::new(registry);
//! toaster.success("Saved", "Image saved successfully");
//! assert_eq!(container.len(), 1);
//!
//! // Default time-out is 5 seconds.
//! clock.advance(Duration::from_secs(5));
//! assert!(container.is_empty());
//! ```
//!
//! # Threading
//!
//! Everything here is single-threaded (`Rc`/`RefCell`). Timer callbacks
//! resume on the same thread, from the scheduler's call stack.

pub mod container;
pub mod notification;
pub mod registry;
pub mod resolver;
pub mod scheduler;
pub mod timer;
pub mod toaster;

pub use container::{ClickTarget, ToasterContainer};
pub use notification::{ClearRequest, Toast, ToastId, ToastKind, ToastRequest};
pub use registry::{EventKind, EventRegistry, Subscription};
pub use resolver::{resolve, resolve_merged, EffectiveConfig, Timeout};
pub use scheduler::{Callback, ScheduleHandle, Scheduler, TickScheduler, TokioScheduler};
pub use timer::{Timer, TimerState};
pub use toaster::Toaster;

// SPDX-License-Identifier: MPL-2.0
//! Core notification data structures.
//!
//! Producers describe what they want with a [`ToastRequest`]; the container
//! turns it into a live [`Toast`] carrying its resolved configuration.

use super::resolver::{EffectiveConfig, Timeout};
use crate::config::Setting;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Unique identifier for a toast.
///
/// Identifiers increase monotonically across every container in the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(u64);

impl ToastId {
    /// Allocates the next identifier.
    pub(crate) fn next() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Toast type. Selects the icon class used as the per-type configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
    /// Long-running operation in progress.
    Wait,
}

impl ToastKind {
    /// Key of this kind in the icon class table.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ToastKind::Info => "info",
            ToastKind::Success => "success",
            ToastKind::Warning => "warning",
            ToastKind::Error => "error",
            ToastKind::Wait => "wait",
        }
    }
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a producer asks for. Every field is optional.
///
/// `timeout` is loosely typed: only numeric values are honored, anything
/// else is ignored and the configured delay applies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToastRequest {
    pub kind: Option<ToastKind>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub timeout: Option<Setting>,
    pub show_close_button: Option<bool>,
    pub close_html: Option<String>,
    /// Routes the request to the container with this toaster id.
    pub toaster_id: Option<String>,
}

impl ToastRequest {
    /// Creates an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a request of the given kind.
    #[must_use]
    pub fn of_kind(kind: ToastKind) -> Self {
        Self::new().kind(kind)
    }

    #[must_use]
    pub fn kind(mut self, kind: ToastKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the auto-dismiss delay in milliseconds.
    #[must_use]
    pub fn timeout(mut self, timeout: impl Into<Setting>) -> Self {
        self.timeout = Some(timeout.into());
        self
    }

    #[must_use]
    pub fn show_close_button(mut self, show: bool) -> Self {
        self.show_close_button = Some(show);
        self
    }

    /// Sets the close affordance markup. It is rendered verbatim.
    #[must_use]
    pub fn close_html(mut self, html: impl Into<String>) -> Self {
        self.close_html = Some(html.into());
        self
    }

    #[must_use]
    pub fn toaster_id(mut self, id: impl Into<String>) -> Self {
        self.toaster_id = Some(id.into());
        self
    }
}

/// Which toasts a clear event removes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearRequest {
    /// Container to target; `None` or `"*"` targets every container.
    pub toaster_id: Option<String>,
    /// Toast to remove; `None` removes all of them.
    pub toast_id: Option<ToastId>,
}

impl ClearRequest {
    /// Clears every toast in every container.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Clears a single toast.
    #[must_use]
    pub fn toast(id: ToastId) -> Self {
        Self {
            toaster_id: None,
            toast_id: Some(id),
        }
    }

    /// Restricts the clear to one container.
    #[must_use]
    pub fn in_toaster(mut self, toaster_id: impl Into<String>) -> Self {
        self.toaster_id = Some(toaster_id.into());
        self
    }
}

/// A live toast owned by a container.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    id: ToastId,
    kind: ToastKind,
    title: Option<String>,
    body: Option<String>,
    config: EffectiveConfig,
    created_at: Instant,
}

impl Toast {
    pub(crate) fn new(id: ToastId, request: &ToastRequest, config: EffectiveConfig) -> Self {
        Self {
            id,
            kind: request.kind.unwrap_or_default(),
            title: request.title.clone(),
            body: request.body.clone(),
            config,
            created_at: Instant::now(),
        }
    }

    #[must_use]
    pub fn id(&self) -> ToastId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> ToastKind {
        self.kind
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Returns the resolved configuration.
    #[must_use]
    pub fn config(&self) -> &EffectiveConfig {
        &self.config
    }

    #[must_use]
    pub fn timeout(&self) -> Timeout {
        self.config.timeout
    }

    #[must_use]
    pub fn show_close_button(&self) -> bool {
        self.config.show_close_button
    }

    /// Markup for the close affordance.
    #[must_use]
    pub fn close_html(&self) -> &str {
        &self.config.close_html
    }

    #[must_use]
    pub fn icon_class(&self) -> &str {
        &self.config.icon_class
    }

    /// Returns when this toast was created.
    #[must_use]
    pub fn created_at(&self) -> Instant {
        self.created_at
    }
}

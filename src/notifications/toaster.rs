// SPDX-License-Identifier: MPL-2.0
//! Producer-facing entry points.
//!
//! Application code holds a [`Toaster`] and never the container itself.
//! Every call turns into a registry event; with no container mounted the call
//! has no effect.

use super::notification::{ClearRequest, ToastId, ToastKind, ToastRequest};
use super::registry::EventRegistry;

/// Handle application code uses to show and clear toasts.
#[derive(Debug, Clone, Default)]
pub struct Toaster {
    registry: EventRegistry,
}

impl Toaster {
    /// Creates a toaster publishing on `registry`.
    #[must_use]
    pub fn new(registry: EventRegistry) -> Self {
        Self { registry }
    }

    /// Registry this toaster publishes on; mount containers against it.
    #[must_use]
    pub fn registry(&self) -> &EventRegistry {
        &self.registry
    }

    /// Requests a toast.
    pub fn pop(&self, request: ToastRequest) {
        self.registry.publish_create(&request);
    }

    /// Requests a toast of `kind` with a title and body.
    pub fn pop_kind(&self, kind: ToastKind, title: impl Into<String>, body: impl Into<String>) {
        self.pop(ToastRequest::of_kind(kind).title(title).body(body));
    }

    pub fn info(&self, title: impl Into<String>, body: impl Into<String>) {
        self.pop_kind(ToastKind::Info, title, body);
    }

    pub fn success(&self, title: impl Into<String>, body: impl Into<String>) {
        self.pop_kind(ToastKind::Success, title, body);
    }

    pub fn warning(&self, title: impl Into<String>, body: impl Into<String>) {
        self.pop_kind(ToastKind::Warning, title, body);
    }

    pub fn error(&self, title: impl Into<String>, body: impl Into<String>) {
        self.pop_kind(ToastKind::Error, title, body);
    }

    pub fn wait(&self, title: impl Into<String>, body: impl Into<String>) {
        self.pop_kind(ToastKind::Wait, title, body);
    }

    /// Clears one toast, or every toast when `id` is `None`.
    pub fn clear(&self, id: Option<ToastId>) {
        self.clear_request(&ClearRequest {
            toaster_id: None,
            toast_id: id,
        });
    }

    /// Clears every toast in every container.
    pub fn clear_all(&self) {
        self.clear(None);
    }

    /// Publishes an arbitrary clear request, e.g. one scoped to a toaster id.
    pub fn clear_request(&self, request: &ClearRequest) {
        self.registry.publish_clear(request);
    }
}

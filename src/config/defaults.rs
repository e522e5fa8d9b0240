// SPDX-License-Identifier: MPL-2.0
//! Built-in default values for toaster configuration.
//!
//! These form the lowest layer of the configuration hierarchy. Instance
//! overrides and per-request fields are merged on top of them.
//!
//! # Categories
//!
//! - **Timing**: Auto-dismiss delay
//! - **Dismissal**: Close button markup and click behavior
//! - **Collection**: Ordering, size limit and duplicate suppression
//! - **Type Classes**: Icon classes used as per-type configuration keys

// ==========================================================================
// Timing Defaults
// ==========================================================================

/// Default auto-dismiss delay in milliseconds.
pub const DEFAULT_TIMEOUT_MS: i64 = 5000;

/// Whether hovering a toast stops its timer by default.
pub const DEFAULT_MOUSEOVER_TIMER_STOP: bool = false;

// ==========================================================================
// Dismissal Defaults
// ==========================================================================

/// Whether a close button is rendered by default.
pub const DEFAULT_CLOSE_BUTTON: bool = false;

/// Markup rendered for the close affordance when a request supplies none.
pub const DEFAULT_CLOSE_HTML: &str =
    r#"<button class="toast-close-button" type="button">×</button>"#;

/// Whether clicking a toast body dismisses it.
pub const DEFAULT_TAP_TO_DISMISS: bool = true;

// ==========================================================================
// Collection Defaults
// ==========================================================================

/// Whether new toasts are displayed above older ones.
pub const DEFAULT_NEWEST_ON_TOP: bool = false;

/// Maximum number of live toasts (0 = unbounded).
pub const DEFAULT_LIMIT: usize = 0;

/// Whether a toast repeating the previous body is dropped.
pub const DEFAULT_PREVENT_DUPLICATES: bool = false;

// ==========================================================================
// Type Class Defaults
// ==========================================================================

/// Icon class for a kind missing from the icon class table.
pub const DEFAULT_ICON_CLASS: &str = "toast-info";

/// Default icon class table, as `(kind, class)` pairs.
pub const DEFAULT_ICON_CLASSES: [(&str, &str); 5] = [
    ("error", "toast-error"),
    ("info", "toast-info"),
    ("wait", "toast-wait"),
    ("success", "toast-success"),
    ("warning", "toast-warning"),
];

/// Wildcard toaster id accepted by clear requests to target every container.
pub const CLEAR_ALL_TOASTERS: &str = "*";

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(DEFAULT_TIMEOUT_MS > 0);
    assert!(!DEFAULT_CLOSE_HTML.is_empty());
    assert!(!DEFAULT_ICON_CLASS.is_empty());
};

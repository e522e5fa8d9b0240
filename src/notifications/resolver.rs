// SPDX-License-Identifier: MPL-2.0
//! Per-toast configuration resolution.
//!
//! Layers, lowest to highest precedence: built-in defaults, instance
//! overrides, request fields. Settings that can be either uniform or keyed by
//! type are classified once into a [`Shape`] and resolved with one rule per
//! shape. Anything malformed resolves to the inert choice: no close button,
//! no timer.
//!
//! `close-button` accepts a boolean as its uniform shape, applied to every
//! type; numbers and text are the malformed cases.
//!
//! Resolution is a pure function of its inputs.

use super::notification::ToastRequest;
use crate::config::{Options, Overrides, Setting, DEFAULT_CLOSE_HTML};
use std::collections::BTreeMap;
use std::time::Duration;

/// Resolved auto-dismiss delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeout {
    /// The toast stays until dismissed.
    #[default]
    Never,
    After(Duration),
}

impl Timeout {
    /// Converts a delay in milliseconds. Non-positive and non-finite values
    /// mean no timer.
    #[must_use]
    pub fn from_millis(ms: f64) -> Self {
        if ms.is_finite() && ms > 0.0 {
            // Saturating float-to-int cast.
            Timeout::After(Duration::from_nanos((ms * 1_000_000.0).round() as u64))
        } else {
            Timeout::Never
        }
    }

    /// Returns the delay if a timer should run.
    #[must_use]
    pub fn duration(self) -> Option<Duration> {
        match self {
            Timeout::Never => None,
            Timeout::After(delay) => Some(delay),
        }
    }
}

/// Settings resolved for one toast. Recomputed at creation, never stored
/// outside the toast.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveConfig {
    /// Icon class, also the key into per-type tables.
    pub icon_class: String,
    pub timeout: Timeout,
    pub show_close_button: bool,
    /// Close affordance markup, rendered verbatim.
    pub close_html: String,
    pub tap_to_dismiss: bool,
}

/// How a multi-shape setting is interpreted.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Shape<'a, T> {
    Uniform(T),
    PerType(&'a BTreeMap<String, Setting>),
    Invalid,
}

impl<T> Shape<'_, T> {
    fn lookup(self, class: &str, extract: fn(&Setting) -> Option<T>) -> Option<T> {
        match self {
            Shape::Uniform(value) => Some(value),
            Shape::PerType(table) => table.get(class).and_then(extract),
            Shape::Invalid => None,
        }
    }
}

fn close_button_shape(setting: &Setting) -> Shape<'_, bool> {
    match setting {
        Setting::Bool(value) => Shape::Uniform(*value),
        Setting::PerType(table) => Shape::PerType(table),
        _ => Shape::Invalid,
    }
}

fn timeout_shape(setting: &Setting) -> Shape<'_, f64> {
    match setting {
        Setting::Integer(_) | Setting::Float(_) => {
            setting.as_number().map_or(Shape::Invalid, Shape::Uniform)
        }
        Setting::PerType(table) => Shape::PerType(table),
        _ => Shape::Invalid,
    }
}

/// Resolves a request against defaults and instance overrides.
#[must_use]
pub fn resolve(defaults: &Options, overrides: &Overrides, request: &ToastRequest) -> EffectiveConfig {
    resolve_merged(&defaults.merged(overrides), request)
}

/// Resolves a request against already merged options.
#[must_use]
pub fn resolve_merged(options: &Options, request: &ToastRequest) -> EffectiveConfig {
    let kind = request.kind.unwrap_or_default();
    let icon_class = options
        .icon_classes
        .get(kind.as_str())
        .cloned()
        .unwrap_or_else(|| options.icon_class.clone());

    let show_close_button = request.show_close_button.unwrap_or_else(|| {
        close_button_shape(&options.close_button)
            .lookup(&icon_class, Setting::as_bool)
            .unwrap_or(false)
    });

    let close_html = request
        .close_html
        .clone()
        .unwrap_or_else(|| DEFAULT_CLOSE_HTML.to_string());

    // A non-numeric request timeout is ignored rather than rejected.
    let timeout = match request.timeout.as_ref().and_then(Setting::as_number) {
        Some(ms) => Timeout::from_millis(ms),
        // Per-type tables without an entry for this class mean "no timer",
        // not the uniform default.
        None => timeout_shape(&options.time_out)
            .lookup(&icon_class, Setting::as_number)
            .map_or(Timeout::Never, Timeout::from_millis),
    };

    EffectiveConfig {
        icon_class,
        timeout,
        show_close_button,
        close_html,
        tap_to_dismiss: options.tap_to_dismiss,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::notification::ToastKind;

    fn info() -> ToastRequest {
        ToastRequest::of_kind(ToastKind::Info)
    }

    fn with_close_button(setting: Setting) -> Overrides {
        Overrides {
            close_button: Some(setting),
            ..Overrides::default()
        }
    }

    fn with_time_out(setting: Setting) -> Overrides {
        Overrides {
            time_out: Some(setting),
            ..Overrides::default()
        }
    }

    #[test]
    fn defaults_give_five_second_timer_and_no_close_button() {
        let config = resolve(&Options::default(), &Overrides::default(), &info());

        assert_eq!(config.timeout, Timeout::After(Duration::from_millis(5000)));
        assert!(!config.show_close_button);
        assert_eq!(config.icon_class, "toast-info");
        assert!(config.tap_to_dismiss);
    }

    #[test]
    fn close_button_table_matching_the_type_shows_the_button() {
        let overrides = with_close_button(Setting::per_type([("toast-info", true)]));
        let config = resolve(&Options::default(), &overrides, &info());

        assert!(config.show_close_button);
        assert_eq!(
            config.close_html,
            r#"<button class="toast-close-button" type="button">×</button>"#
        );
    }

    #[test]
    fn close_button_table_without_the_type_hides_the_button() {
        let overrides = with_close_button(Setting::per_type([("toast-invalid", true)]));
        let config = resolve(&Options::default(), &overrides, &info());

        assert!(!config.show_close_button);
    }

    #[test]
    fn close_button_number_is_invalid_and_hides_the_button() {
        let overrides = with_close_button(Setting::Integer(1));
        for kind in [ToastKind::Info, ToastKind::Error, ToastKind::Wait] {
            let config = resolve(&Options::default(), &overrides, &ToastRequest::of_kind(kind));
            assert!(!config.show_close_button, "{kind} should not show a button");
        }
    }

    #[test]
    fn close_button_boolean_applies_to_every_type() {
        let overrides = with_close_button(Setting::Bool(true));
        let config = resolve(
            &Options::default(),
            &overrides,
            &ToastRequest::of_kind(ToastKind::Success),
        );

        assert!(config.show_close_button);
    }

    #[test]
    fn explicit_request_flag_beats_the_table() {
        let overrides = with_close_button(Setting::per_type([("toast-error", true)]));

        let shown = resolve(&Options::default(), &overrides, &info().show_close_button(true));
        assert!(shown.show_close_button);

        let hidden = resolve(
            &Options::default(),
            &overrides,
            &ToastRequest::of_kind(ToastKind::Error).show_close_button(false),
        );
        assert!(!hidden.show_close_button);
    }

    #[test]
    fn request_close_html_is_used_verbatim() {
        let request = info().show_close_button(true).close_html("<span>Close</span>");
        let config = resolve(&Options::default(), &Overrides::default(), &request);

        assert_eq!(config.close_html, "<span>Close</span>");
    }

    #[test]
    fn numeric_request_timeout_wins() {
        let overrides = with_time_out(Setting::per_type([("toast-info", 5)]));
        let config = resolve(&Options::default(), &overrides, &info().timeout(2));

        assert_eq!(config.timeout, Timeout::After(Duration::from_millis(2)));
    }

    #[test]
    fn text_request_timeout_falls_through_to_default() {
        let config = resolve(&Options::default(), &Overrides::default(), &info().timeout("2"));

        assert_eq!(config.timeout, Timeout::After(Duration::from_millis(5000)));
    }

    #[test]
    fn zero_or_negative_request_timeout_disables_the_timer() {
        for value in [0, -10] {
            let config =
                resolve(&Options::default(), &Overrides::default(), &info().timeout(value));
            assert_eq!(config.timeout, Timeout::Never);
        }
    }

    #[test]
    fn timeout_table_is_looked_up_by_type() {
        let overrides = with_time_out(Setting::per_type([("toast-info", 5)]));
        let config = resolve(&Options::default(), &overrides, &info());

        assert_eq!(config.timeout, Timeout::After(Duration::from_millis(5)));
    }

    #[test]
    fn timeout_table_without_the_type_means_no_timer() {
        let overrides = with_time_out(Setting::per_type([("toast-info", 5)]));
        let config = resolve(
            &Options::default(),
            &overrides,
            &ToastRequest::of_kind(ToastKind::Warning),
        );

        assert_eq!(config.timeout, Timeout::Never);
    }

    #[test]
    fn uniform_timeout_override_applies_to_every_type() {
        let overrides = with_time_out(Setting::Float(1500.0));
        let config = resolve(
            &Options::default(),
            &overrides,
            &ToastRequest::of_kind(ToastKind::Error),
        );

        assert_eq!(config.timeout, Timeout::After(Duration::from_millis(1500)));
    }

    #[test]
    fn text_timeout_override_means_no_timer() {
        let overrides = with_time_out(Setting::from("soon"));
        let config = resolve(&Options::default(), &overrides, &info());

        assert_eq!(config.timeout, Timeout::Never);
    }

    #[test]
    fn unknown_icon_class_falls_back_to_default_class() {
        let overrides = Overrides {
            icon_classes: Some(BTreeMap::from([("error".to_string(), "bad".to_string())])),
            icon_class: Some("plain".to_string()),
            ..Overrides::default()
        };

        let config = resolve(&Options::default(), &overrides, &info());
        assert_eq!(config.icon_class, "plain");

        let config = resolve(
            &Options::default(),
            &overrides,
            &ToastRequest::of_kind(ToastKind::Error),
        );
        assert_eq!(config.icon_class, "bad");
    }

    #[test]
    fn resolution_is_repeatable() {
        let overrides = Overrides {
            close_button: Some(Setting::per_type([("toast-warning", true)])),
            time_out: Some(Setting::per_type([("toast-warning", 750)])),
            ..Overrides::default()
        };
        let request = ToastRequest::of_kind(ToastKind::Warning).body("twice");
        let defaults = Options::default();

        let first = resolve(&defaults, &overrides, &request);
        let second = resolve(&defaults, &overrides, &request);

        assert_eq!(first, second);
        assert_eq!(defaults, Options::default());
    }

    #[test]
    fn from_millis_handles_fractions_and_nan() {
        assert_eq!(
            Timeout::from_millis(1.5),
            Timeout::After(Duration::from_micros(1500))
        );
        assert_eq!(Timeout::from_millis(f64::NAN), Timeout::Never);
        assert_eq!(Timeout::from_millis(f64::INFINITY), Timeout::Never);
        assert_eq!(Timeout::After(Duration::from_millis(3)).duration(), Some(Duration::from_millis(3)));
        assert_eq!(Timeout::Never.duration(), None);
    }
}

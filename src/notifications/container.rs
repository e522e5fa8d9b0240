// SPDX-License-Identifier: MPL-2.0
//! Notification container: the live, ordered collection of toasts.
//!
//! A container subscribes to an [`EventRegistry`] when mounted and
//! unsubscribes on teardown (or drop). It resolves each request's
//! configuration, keeps toasts in display order and owns one [`Timer`] per
//! toast. Timer callbacks hold only a weak reference to the container and
//! re-check that their toast is still present before removing it.

use super::notification::{ClearRequest, Toast, ToastId, ToastRequest};
use super::registry::{EventRegistry, Subscription};
use super::resolver::resolve_merged;
use super::scheduler::Scheduler;
use super::timer::{Timer, TimerState};
use crate::config::{Options, Overrides, CLEAR_ALL_TOASTERS};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

/// Part of a toast the user clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Body,
    CloseButton,
}

/// Why a toast left the container. Reported in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RemovalCause {
    Dismissed,
    Expired,
    Cleared,
    OverLimit,
}

struct Entry {
    toast: Toast,
    timer: Timer,
}

struct ContainerState {
    options: Options,
    /// Display order, top first.
    entries: VecDeque<Entry>,
    scheduler: Rc<dyn Scheduler>,
    this: Weak<RefCell<ContainerState>>,
}

impl ContainerState {
    fn position(&self, id: ToastId) -> Option<usize> {
        self.entries.iter().position(|e| e.toast.id() == id)
    }

    /// Most recently added toast, wherever the ordering places it.
    fn newest(&self) -> Option<&Entry> {
        if self.options.newest_on_top {
            self.entries.front()
        } else {
            self.entries.back()
        }
    }

    fn accepts(&self, request: &ToastRequest) -> bool {
        match (&self.options.toaster_id, &request.toaster_id) {
            (None, None) => true,
            (Some(own), Some(target)) => own == target,
            _ => false,
        }
    }

    fn accepts_clear(&self, request: &ClearRequest) -> bool {
        match &request.toaster_id {
            None => true,
            Some(target) if target == CLEAR_ALL_TOASTERS => true,
            Some(target) => self.options.toaster_id.as_deref() == Some(target.as_str()),
        }
    }

    fn start_timer(&self, toast: &Toast) -> Timer {
        let container = self.this.clone();
        let id = toast.id();
        Timer::start(&self.scheduler, toast.timeout(), move || {
            if let Some(state) = container.upgrade() {
                state.borrow_mut().expire(id);
            }
        })
    }

    fn create(&mut self, request: &ToastRequest) -> Option<ToastId> {
        if self.options.prevent_duplicates
            && self
                .newest()
                .is_some_and(|newest| newest.toast.body() == request.body.as_deref())
        {
            tracing::debug!(body = ?request.body, "duplicate toast suppressed");
            return None;
        }

        let id = ToastId::next();
        let toast = Toast::new(id, request, resolve_merged(&self.options, request));
        let timer = self.start_timer(&toast);

        tracing::debug!(
            toast_id = %id,
            kind = %toast.kind(),
            timeout = ?toast.timeout(),
            close_button = toast.show_close_button(),
            "toast created"
        );

        let entry = Entry { toast, timer };
        if self.options.newest_on_top {
            self.entries.push_front(entry);
        } else {
            self.entries.push_back(entry);
        }
        self.enforce_limit();
        Some(id)
    }

    fn enforce_limit(&mut self) {
        let limit = self.options.limit;
        if limit == 0 {
            return;
        }
        while self.entries.len() > limit {
            let oldest = if self.options.newest_on_top {
                self.entries.pop_back()
            } else {
                self.entries.pop_front()
            };
            if let Some(entry) = oldest {
                Self::discard(entry, RemovalCause::OverLimit);
            }
        }
    }

    fn remove(&mut self, id: ToastId, cause: RemovalCause) -> bool {
        match self.position(id).and_then(|pos| self.entries.remove(pos)) {
            Some(entry) => {
                Self::discard(entry, cause);
                true
            }
            None => false,
        }
    }

    fn expire(&mut self, id: ToastId) {
        // Dismissal may have won the race against the timer.
        if !self.remove(id, RemovalCause::Expired) {
            tracing::trace!(toast_id = %id, "timer fired for a toast already removed");
        }
    }

    fn remove_all(&mut self) {
        for entry in std::mem::take(&mut self.entries) {
            Self::discard(entry, RemovalCause::Cleared);
        }
    }

    fn discard(mut entry: Entry, cause: RemovalCause) {
        entry.timer.cancel();
        tracing::debug!(toast_id = %entry.toast.id(), ?cause, "toast removed");
    }

    fn clear(&mut self, request: &ClearRequest) {
        if !self.accepts_clear(request) {
            return;
        }
        match request.toast_id {
            Some(id) => {
                self.remove(id, RemovalCause::Cleared);
            }
            None => self.remove_all(),
        }
    }

    fn pause_timer(&mut self, id: ToastId) {
        if !self.options.mouseover_timer_stop {
            return;
        }
        if let Some(pos) = self.position(id) {
            self.entries[pos].timer.cancel();
        }
    }

    fn resume_timer(&mut self, id: ToastId) {
        if !self.options.mouseover_timer_stop {
            return;
        }
        let Some(pos) = self.position(id) else {
            return;
        };
        if self.entries[pos].timer.state() == TimerState::Cancelled {
            let timer = self.start_timer(&self.entries[pos].toast);
            self.entries[pos].timer = timer;
        }
    }
}

/// Mounted toast container.
///
/// Teardown happens exactly once: on the first call to
/// [`ToasterContainer::teardown`] or when the container is dropped.
pub struct ToasterContainer {
    state: Rc<RefCell<ContainerState>>,
    registry: EventRegistry,
    subscriptions: Option<(Subscription, Subscription)>,
}

impl ToasterContainer {
    /// Mounts a container configured by `overrides` on top of the built-in
    /// defaults.
    pub fn mount(
        registry: &EventRegistry,
        overrides: &Overrides,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        Self::mount_with_options(registry, Options::from_overrides(overrides), scheduler)
    }

    /// Mounts a container with already merged options.
    pub fn mount_with_options(
        registry: &EventRegistry,
        options: Options,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        for issue in options.issues() {
            tracing::warn!(%issue, "toaster configuration value ignored");
        }

        let state = Rc::new_cyclic(|this| {
            RefCell::new(ContainerState {
                options,
                entries: VecDeque::new(),
                scheduler,
                this: this.clone(),
            })
        });

        let on_create = Rc::downgrade(&state);
        let create = registry.subscribe_create(move |request| {
            let Some(state) = on_create.upgrade() else {
                return;
            };
            let mut state = state.borrow_mut();
            if state.accepts(request) {
                state.create(request);
            } else {
                tracing::trace!(
                    toaster_id = ?request.toaster_id,
                    "toast addressed to another container"
                );
            }
        });

        let on_clear = Rc::downgrade(&state);
        let clear = registry.subscribe_clear(move |request| {
            if let Some(state) = on_clear.upgrade() {
                state.borrow_mut().clear(request);
            }
        });

        tracing::debug!(toaster_id = ?state.borrow().options.toaster_id, "toaster container mounted");

        Self {
            state,
            registry: registry.clone(),
            subscriptions: Some((create, clear)),
        }
    }

    /// Creates a toast from `request`.
    ///
    /// Returns `None` when the request is suppressed as a duplicate.
    pub fn create(&self, request: &ToastRequest) -> Option<ToastId> {
        self.state.borrow_mut().create(request)
    }

    /// Removes a toast and cancels its timer.
    ///
    /// Returns `true` if the toast was present; removing an absent toast is a
    /// no-op.
    pub fn remove(&self, id: ToastId) -> bool {
        self.state.borrow_mut().remove(id, RemovalCause::Dismissed)
    }

    /// Removes every toast and cancels every timer.
    pub fn remove_all(&self) {
        self.state.borrow_mut().remove_all();
    }

    /// Handles a click on a toast. Returns `true` if the toast was removed.
    ///
    /// A body click dismisses when `tap-to-dismiss` is set; a close button
    /// click dismisses when the toast shows a close button.
    pub fn click(&self, id: ToastId, target: ClickTarget) -> bool {
        let mut state = self.state.borrow_mut();
        let Some(pos) = state.position(id) else {
            return false;
        };
        let config = state.entries[pos].toast.config();
        let dismiss = match target {
            ClickTarget::Body => config.tap_to_dismiss,
            ClickTarget::CloseButton => config.show_close_button,
        };
        dismiss && state.remove(id, RemovalCause::Dismissed)
    }

    /// Stops a toast's timer while the pointer hovers it.
    ///
    /// Only effective with `mouseover-timer-stop`.
    pub fn pause_timer(&self, id: ToastId) {
        self.state.borrow_mut().pause_timer(id);
    }

    /// Restarts a paused timer with the toast's full timeout.
    ///
    /// Only effective with `mouseover-timer-stop`.
    pub fn resume_timer(&self, id: ToastId) {
        self.state.borrow_mut().resume_timer(id);
    }

    /// Returns the live toasts in display order.
    #[must_use]
    pub fn toasts(&self) -> Vec<Toast> {
        self.state
            .borrow()
            .entries
            .iter()
            .map(|e| e.toast.clone())
            .collect()
    }

    /// Returns the live toast ids in display order.
    #[must_use]
    pub fn ids(&self) -> Vec<ToastId> {
        self.state
            .borrow()
            .entries
            .iter()
            .map(|e| e.toast.id())
            .collect()
    }

    #[must_use]
    pub fn get(&self, id: ToastId) -> Option<Toast> {
        let state = self.state.borrow();
        state.position(id).map(|pos| state.entries[pos].toast.clone())
    }

    #[must_use]
    pub fn contains(&self, id: ToastId) -> bool {
        self.state.borrow().position(id).is_some()
    }

    /// Returns the state of a toast's timer, if the toast is live.
    #[must_use]
    pub fn timer_state(&self, id: ToastId) -> Option<TimerState> {
        let state = self.state.borrow();
        state.position(id).map(|pos| state.entries[pos].timer.state())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.state.borrow().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.borrow().entries.is_empty()
    }

    /// Returns the merged options the container runs with.
    #[must_use]
    pub fn options(&self) -> Options {
        self.state.borrow().options.clone()
    }

    /// Returns `true` until the container has been torn down.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.subscriptions.is_some()
    }

    /// Unsubscribes from the registry. Later calls are no-ops.
    ///
    /// Live toasts and their timers are left untouched.
    pub fn teardown(&mut self) {
        let Some((create, clear)) = self.subscriptions.take() else {
            return;
        };
        self.registry.unsubscribe_create(&create);
        self.registry.unsubscribe_clear(&clear);
        tracing::debug!("toaster container torn down");
    }
}

impl Drop for ToasterContainer {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl fmt::Debug for ToasterContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToasterContainer")
            .field("toasts", &self.len())
            .field("mounted", &self.is_mounted())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Setting;
    use crate::notifications::notification::ToastKind;
    use crate::notifications::registry::EventKind;
    use crate::notifications::resolver::Timeout;
    use crate::notifications::scheduler::TickScheduler;
    use std::time::Duration;

    fn mount(overrides: Overrides) -> (EventRegistry, TickScheduler, ToasterContainer) {
        let registry = EventRegistry::new();
        let tick = TickScheduler::recording();
        let container = ToasterContainer::mount(&registry, &overrides, Rc::new(tick.clone()));
        (registry, tick, container)
    }

    fn body(text: &str) -> ToastRequest {
        ToastRequest::of_kind(ToastKind::Info).body(text)
    }

    #[test]
    fn new_container_is_empty_and_subscribed() {
        let (registry, _tick, container) = mount(Overrides::default());

        assert!(container.is_empty());
        assert!(container.is_mounted());
        assert_eq!(registry.subscriber_count(EventKind::Create), 1);
        assert_eq!(registry.subscriber_count(EventKind::Clear), 1);
    }

    #[test]
    fn create_appends_oldest_first_by_default() {
        let (_registry, _tick, container) = mount(Overrides::default());
        let first = container.create(&body("one")).unwrap();
        let second = container.create(&body("two")).unwrap();

        assert_eq!(container.ids(), vec![first, second]);
    }

    #[test]
    fn newest_on_top_inserts_at_the_front() {
        let (_registry, _tick, container) = mount(Overrides {
            newest_on_top: Some(true),
            ..Overrides::default()
        });
        let first = container.create(&body("one")).unwrap();
        let second = container.create(&body("two")).unwrap();

        assert_eq!(container.ids(), vec![second, first]);
    }

    #[test]
    fn create_starts_a_timer_for_positive_timeouts() {
        let (_registry, tick, container) = mount(Overrides::default());
        let id = container.create(&body("timed")).unwrap();

        assert_eq!(container.timer_state(id), Some(TimerState::Running));
        assert_eq!(tick.requested_delays(), vec![Duration::from_millis(5000)]);
    }

    #[test]
    fn create_without_timeout_leaves_timer_idle() {
        let (_registry, tick, container) = mount(Overrides::default());
        let id = container.create(&body("sticky").timeout(0)).unwrap();

        assert_eq!(container.timer_state(id), Some(TimerState::Idle));
        assert_eq!(container.get(id).map(|t| t.timeout()), Some(Timeout::Never));
        assert!(tick.requested_delays().is_empty());
    }

    #[test]
    fn remove_is_idempotent() {
        let (_registry, _tick, container) = mount(Overrides::default());
        let keep = container.create(&body("keep")).unwrap();
        let gone = container.create(&body("gone")).unwrap();

        assert!(container.remove(gone));
        let after_first = container.ids();
        assert!(!container.remove(gone));

        assert_eq!(container.ids(), after_first);
        assert_eq!(after_first, vec![keep]);
    }

    #[test]
    fn remove_cancels_the_timer() {
        let (_registry, tick, container) = mount(Overrides::default());
        let id = container.create(&body("x")).unwrap();

        container.remove(id);

        assert_eq!(tick.pending_count(), 0);
    }

    #[test]
    fn expiry_removes_the_toast() {
        let (_registry, tick, container) = mount(Overrides::default());
        let id = container.create(&body("short").timeout(2)).unwrap();

        assert_eq!(tick.advance(Duration::from_millis(1)), 0);
        assert!(container.contains(id));

        assert_eq!(tick.advance(Duration::from_millis(1)), 1);
        assert!(!container.contains(id));
    }

    #[test]
    fn expiry_after_manual_dismissal_is_harmless() {
        let (_registry, tick, container) = mount(Overrides::default());
        let id = container.create(&body("raced").timeout(5)).unwrap();
        let other = container.create(&body("other").timeout(500)).unwrap();

        container.remove(id);
        tick.advance(Duration::from_millis(5));

        assert_eq!(container.ids(), vec![other]);
    }

    #[test]
    fn remove_all_clears_everything_and_every_timer() {
        let (_registry, tick, container) = mount(Overrides::default());
        for i in 0..4 {
            container.create(&body(&format!("toast-{i}")));
        }

        container.remove_all();

        assert!(container.is_empty());
        assert_eq!(tick.pending_count(), 0);
    }

    #[test]
    fn limit_drops_the_oldest_toasts() {
        let (_registry, tick, container) = mount(Overrides {
            limit: Some(2),
            ..Overrides::default()
        });
        let first = container.create(&body("1")).unwrap();
        let second = container.create(&body("2")).unwrap();
        let third = container.create(&body("3")).unwrap();

        assert_eq!(container.ids(), vec![second, third]);
        assert!(!container.contains(first));
        assert_eq!(tick.pending_count(), 2);
    }

    #[test]
    fn limit_with_newest_on_top_drops_from_the_bottom() {
        let (_registry, _tick, container) = mount(Overrides {
            limit: Some(2),
            newest_on_top: Some(true),
            ..Overrides::default()
        });
        container.create(&body("1"));
        let second = container.create(&body("2")).unwrap();
        let third = container.create(&body("3")).unwrap();

        assert_eq!(container.ids(), vec![third, second]);
    }

    #[test]
    fn prevent_duplicates_drops_a_repeated_body() {
        let (_registry, _tick, container) = mount(Overrides {
            prevent_duplicates: Some(true),
            ..Overrides::default()
        });

        assert!(container.create(&body("same")).is_some());
        assert!(container.create(&body("same")).is_none());
        assert!(container.create(&body("different")).is_some());
        assert!(container.create(&body("same")).is_some());
        assert_eq!(container.len(), 3);
    }

    #[test]
    fn duplicates_are_kept_by_default() {
        let (_registry, _tick, container) = mount(Overrides::default());
        container.create(&body("same"));
        container.create(&body("same"));
        assert_eq!(container.len(), 2);
    }

    #[test]
    fn body_click_dismisses_when_tap_to_dismiss() {
        let (_registry, _tick, container) = mount(Overrides::default());
        let id = container.create(&body("tap")).unwrap();

        assert!(container.click(id, ClickTarget::Body));
        assert!(!container.contains(id));
    }

    #[test]
    fn body_click_is_ignored_without_tap_to_dismiss() {
        let (_registry, _tick, container) = mount(Overrides {
            tap_to_dismiss: Some(false),
            ..Overrides::default()
        });
        let plain = container.create(&body("plain")).unwrap();
        let closable = container
            .create(&body("closable").show_close_button(true))
            .unwrap();

        assert!(!container.click(plain, ClickTarget::Body));
        assert!(!container.click(plain, ClickTarget::CloseButton));
        assert!(container.click(closable, ClickTarget::CloseButton));
        assert_eq!(container.ids(), vec![plain]);
    }

    #[test]
    fn hover_pauses_and_restarts_the_timer() {
        let (_registry, tick, container) = mount(Overrides {
            mouseover_timer_stop: Some(true),
            ..Overrides::default()
        });
        let id = container.create(&body("hover").timeout(100)).unwrap();

        tick.advance(Duration::from_millis(80));
        container.pause_timer(id);
        assert_eq!(container.timer_state(id), Some(TimerState::Cancelled));

        tick.advance(Duration::from_millis(500));
        assert!(container.contains(id));

        container.resume_timer(id);
        assert_eq!(container.timer_state(id), Some(TimerState::Running));
        tick.advance(Duration::from_millis(99));
        assert!(container.contains(id));
        tick.advance(Duration::from_millis(1));
        assert!(!container.contains(id));
    }

    #[test]
    fn hover_is_ignored_without_mouseover_timer_stop() {
        let (_registry, tick, container) = mount(Overrides::default());
        let id = container.create(&body("hover").timeout(100)).unwrap();

        container.pause_timer(id);
        assert_eq!(container.timer_state(id), Some(TimerState::Running));

        tick.advance(Duration::from_millis(100));
        assert!(!container.contains(id));
    }

    #[test]
    fn resume_does_not_restart_an_untimed_toast() {
        let (_registry, tick, container) = mount(Overrides {
            mouseover_timer_stop: Some(true),
            ..Overrides::default()
        });
        let id = container.create(&body("sticky").timeout(0)).unwrap();

        container.pause_timer(id);
        container.resume_timer(id);

        assert_eq!(container.timer_state(id), Some(TimerState::Idle));
        assert_eq!(tick.pending_count(), 0);
    }

    #[test]
    fn events_are_routed_through_the_registry() {
        let (registry, _tick, container) = mount(Overrides::default());

        registry.publish_create(&body("via registry"));
        assert_eq!(container.len(), 1);

        registry.publish_clear(&ClearRequest::all());
        assert!(container.is_empty());
    }

    #[test]
    fn clear_event_targets_a_single_toast() {
        let (registry, _tick, container) = mount(Overrides::default());
        let keep = container.create(&body("keep")).unwrap();
        let gone = container.create(&body("gone")).unwrap();

        registry.publish_clear(&ClearRequest::toast(gone));

        assert_eq!(container.ids(), vec![keep]);
    }

    #[test]
    fn toaster_ids_route_create_events() {
        let registry = EventRegistry::new();
        let tick = TickScheduler::new();
        let unnamed =
            ToasterContainer::mount(&registry, &Overrides::default(), Rc::new(tick.clone()));
        let named = ToasterContainer::mount(
            &registry,
            &Overrides {
                toaster_id: Some("side".to_string()),
                ..Overrides::default()
            },
            Rc::new(tick.clone()),
        );

        registry.publish_create(&body("anyone"));
        registry.publish_create(&body("side only").toaster_id("side"));
        registry.publish_create(&body("nobody").toaster_id("missing"));

        assert_eq!(unnamed.len(), 1);
        assert_eq!(named.len(), 1);
        assert_eq!(named.toasts()[0].body(), Some("side only"));
    }

    #[test]
    fn toaster_ids_route_clear_events() {
        let registry = EventRegistry::new();
        let tick = TickScheduler::new();
        let unnamed =
            ToasterContainer::mount(&registry, &Overrides::default(), Rc::new(tick.clone()));
        let named = ToasterContainer::mount(
            &registry,
            &Overrides {
                toaster_id: Some("side".to_string()),
                ..Overrides::default()
            },
            Rc::new(tick.clone()),
        );
        unnamed.create(&body("a"));
        named.create(&body("b"));

        registry.publish_clear(&ClearRequest::all().in_toaster("side"));
        assert_eq!(unnamed.len(), 1);
        assert!(named.is_empty());

        named.create(&body("c"));
        registry.publish_clear(&ClearRequest::all().in_toaster(CLEAR_ALL_TOASTERS));
        assert!(unnamed.is_empty());
        assert!(named.is_empty());
    }

    #[test]
    fn teardown_unsubscribes_once() {
        let (registry, _tick, mut container) = mount(Overrides::default());

        container.teardown();
        container.teardown();

        assert!(!container.is_mounted());
        assert_eq!(registry.subscriber_count(EventKind::Create), 0);
        assert_eq!(registry.subscriber_count(EventKind::Clear), 0);

        registry.publish_create(&body("after teardown"));
        assert!(container.is_empty());
    }

    #[test]
    fn drop_unsubscribes_and_leaves_timers_inert() {
        let (registry, tick, container) = mount(Overrides::default());
        container.create(&body("orphan"));

        drop(container);

        assert_eq!(registry.subscriber_count(EventKind::Create), 0);
        assert_eq!(tick.pending_count(), 0);
        assert_eq!(tick.advance(Duration::from_secs(10)), 0);
        registry.publish_create(&body("nobody listening"));
    }

    #[test]
    fn invalid_close_button_shape_still_mounts() {
        let (_registry, _tick, container) = mount(Overrides {
            close_button: Some(Setting::Integer(1)),
            ..Overrides::default()
        });
        let id = container.create(&body("x")).unwrap();

        assert_eq!(container.get(id).map(|t| t.show_close_button()), Some(false));
    }
}

use dioxus::prelude::*;

use super::event_bus::{publish_event, use_event_bus, EventId};

/// A screen became visible to the user.
///
/// Published whenever the active route changes, the initial route included,
/// and when the application window regains focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenVisibleEvent {
    /// Display form of the route now on screen
    pub route: String,
}
impl EventId for ScreenVisibleEvent {
    fn event_id() -> &'static str {
        "screen_visible"
    }
}

/// Turns window focus changes into "the window came back" notifications.
///
/// Only a focus gain following a focus loss counts: the focus the window
/// receives when first shown belongs to the initial route announcement.
#[cfg_attr(not(feature = "desktop"), allow(dead_code))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct FocusTracker {
    lost_focus: bool,
}
#[cfg_attr(not(feature = "desktop"), allow(dead_code))]
impl FocusTracker {
    /// Returns `true` if the window regained the focus
    fn focus_changed(&mut self, focused: bool) -> bool {
        if focused {
            core::mem::take(&mut self.lost_focus)
        } else {
            self.lost_focus = true;
            false
        }
    }
}

/// Publish [ScreenVisibleEvent]s for the route currently displayed.
///
/// Meant to be called once, by the layout wrapping every screen.
pub fn use_screen_visibility_publisher(route: String) {
    let event_bus = use_event_bus();

    #[cfg(feature = "desktop")]
    {
        use dioxus::desktop::tao::event::{Event, WindowEvent};
        use std::{
            cell::{Cell, RefCell},
            rc::Rc,
        };

        let current_route = use_hook(|| Rc::new(RefCell::new(String::new())));
        *current_route.borrow_mut() = route.clone();
        let focus = use_hook(|| Rc::new(Cell::new(FocusTracker::default())));
        dioxus::desktop::use_wry_event_handler(move |event, _| {
            if let Event::WindowEvent {
                event: WindowEvent::Focused(focused),
                ..
            } = event
            {
                let mut tracker = focus.get();
                let regained = tracker.focus_changed(*focused);
                focus.set(tracker);
                if regained {
                    let route = current_route.borrow().clone();
                    log::debug!("screen_visibility - window focused on {route}");
                    publish_event(event_bus, ScreenVisibleEvent { route });
                }
            }
        });
    }

    use_effect(use_reactive((&route,), move |(route,)| {
        log::debug!("screen_visibility - route {route} on screen");
        publish_event(event_bus, ScreenVisibleEvent { route });
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_focus_is_not_a_return() {
        let mut tracker = FocusTracker::default();
        assert!(!tracker.focus_changed(true));
        assert!(!tracker.focus_changed(true));
    }

    #[test]
    fn focus_regained_after_a_loss_is_a_return() {
        let mut tracker = FocusTracker::default();
        tracker.focus_changed(true);
        assert!(!tracker.focus_changed(false));
        assert!(tracker.focus_changed(true));
        // Once per loss
        assert!(!tracker.focus_changed(true));
    }

    #[test]
    fn repeated_losses_count_once() {
        let mut tracker = FocusTracker::default();
        tracker.focus_changed(false);
        tracker.focus_changed(false);
        assert!(tracker.focus_changed(true));
        assert!(!tracker.focus_changed(true));
    }
}

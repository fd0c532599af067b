use std::cell::{Cell, RefCell};

use super::loader::LoaderHandle;

/// Tells a host screen whether a visibility notification should reload its
/// dependencies.
///
/// The first notification a screen receives announces its own mount, whose
/// load is already in flight, so it is swallowed. Every later notification is
/// a return to the screen and asks for a reload. A remounted screen starts
/// with a fresh gate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VisibilityGate {
    has_been_visible: bool,
}

impl VisibilityGate {
    /// Record a visibility notification and return `true` if it must trigger
    /// a reload.
    pub fn should_reload(&mut self) -> bool {
        core::mem::replace(&mut self.has_been_visible, true)
    }
}

/// Reloads the loader of a screen each time the screen becomes visible
/// again.
///
/// Notifications about other routes are ignored and leave the gate untouched.
pub struct VisibilityReloader {
    route: RefCell<String>,
    gate: Cell<VisibilityGate>,
    handle: LoaderHandle,
}

impl VisibilityReloader {
    pub fn new(handle: LoaderHandle) -> Self {
        Self {
            route: RefCell::default(),
            gate: Cell::default(),
            handle,
        }
    }

    /// Route the screen is currently displayed under
    pub fn set_route(&self, route: String) {
        *self.route.borrow_mut() = route;
    }

    /// `route` became visible. Returns `true` if the loader was asked to
    /// reload.
    pub fn on_visible(&self, route: &str) -> bool {
        if route != *self.route.borrow() {
            return false;
        }
        let mut gate = self.gate.get();
        let reload = gate.should_reload();
        self.gate.set(gate);
        if reload {
            log::debug!("{route} visible again, reloading");
            self.handle.load(true);
        }
        reload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::rc::Rc;

    use futures_util::future::LocalBoxFuture;

    use super::super::{
        loader::{DependencyLoader, Spawner},
        state::LoadState,
    };

    #[test]
    fn first_visibility_is_suppressed() {
        let mut gate = VisibilityGate::default();
        assert!(!gate.should_reload());
        assert_ne!(gate, VisibilityGate::default());
    }

    #[test]
    fn later_visibilities_reload() {
        let mut gate = VisibilityGate::default();
        gate.should_reload();
        assert!(gate.should_reload());
        assert!(gate.should_reload());
    }

    #[test]
    fn remount_starts_a_new_gate() {
        let mut gate = VisibilityGate::default();
        gate.should_reload();
        let mut remounted = VisibilityGate::default();
        assert!(!remounted.should_reload());
        assert!(gate.should_reload());
    }

    /// A loader whose runs never settle, with a counter of started runs
    fn counting_loader() -> (DependencyLoader, Rc<Cell<usize>>) {
        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        let spawner: Spawner = Rc::new(move |_run: LocalBoxFuture<'static, ()>| {
            counter.set(counter.get() + 1);
        });
        (DependencyLoader::new([], spawner), runs)
    }

    #[test]
    fn mount_notification_does_not_reload() {
        let (loader, runs) = counting_loader();
        let reloader = VisibilityReloader::new(loader.handle());
        reloader.set_route("/cart".to_owned());

        assert!(!reloader.on_visible("/cart"));
        assert_eq!(runs.get(), 1);
        assert_eq!(loader.state(), LoadState::Loading);
    }

    #[test]
    fn returning_to_the_screen_reloads() {
        let (loader, runs) = counting_loader();
        let reloader = VisibilityReloader::new(loader.handle());
        reloader.set_route("/cart".to_owned());

        reloader.on_visible("/cart");
        assert!(reloader.on_visible("/cart"));
        assert!(reloader.on_visible("/cart"));
        assert_eq!(runs.get(), 3);
    }

    #[test]
    fn other_routes_are_ignored() {
        let (loader, runs) = counting_loader();
        let reloader = VisibilityReloader::new(loader.handle());
        reloader.set_route("/product/p1".to_owned());

        assert!(!reloader.on_visible("/"));
        assert!(!reloader.on_visible("/product/p2"));
        // The mount notification is still the one swallowed
        assert!(!reloader.on_visible("/product/p1"));
        assert!(reloader.on_visible("/product/p1"));
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn follows_the_displayed_route() {
        let (loader, runs) = counting_loader();
        let reloader = VisibilityReloader::new(loader.handle());
        reloader.set_route("/product/p1".to_owned());
        reloader.on_visible("/product/p1");

        reloader.set_route("/product/p2".to_owned());
        assert!(!reloader.on_visible("/product/p1"));
        assert!(reloader.on_visible("/product/p2"));
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn destroyed_loader_is_not_reloaded() {
        let (loader, runs) = counting_loader();
        let reloader = VisibilityReloader::new(loader.handle());
        reloader.set_route("/account".to_owned());
        reloader.on_visible("/account");

        drop(loader);
        reloader.on_visible("/account");
        assert_eq!(runs.get(), 1);
    }
}

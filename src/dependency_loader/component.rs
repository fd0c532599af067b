use std::rc::Rc;

use dioxus::prelude::*;
use futures_util::future::LocalBoxFuture;

use super::{
    loader::{Dependency, DependencyLoader, LoaderHandle, Spawner},
    state::{DependencyFailure, LoadState},
};

/// Runs the settlement of loader runs on the Dioxus runtime.
///
/// Tasks are attached to the root scope so that a run started from an event
/// bus callback outlives the scope that happened to be current at that time.
/// The loader itself discards results once its screen is gone.
fn dioxus_spawner() -> Spawner {
    Rc::new(|fut: LocalBoxFuture<'static, ()>| {
        if spawn_forever(fut).is_none() {
            log::warn!("dependency_loader - no runtime to spawn the run on");
        }
    })
}

/// The reactive side of a [DependencyLoader] living in a component.
#[derive(Clone, PartialEq)]
pub struct UseDependencyLoader {
    state: ReadOnlySignal<LoadState>,
    handle: LoaderHandle,
}
impl UseDependencyLoader {
    pub fn state(&self) -> LoadState {
        self.state.read().clone()
    }
    pub fn handle(&self) -> LoaderHandle {
        self.handle.clone()
    }
}

/// Creates the [DependencyLoader] of the calling component.
///
/// `dependencies` is only evaluated on the first render: the dependency set
/// is fixed for the lifetime of the component. The first run starts right
/// away and the loader is destroyed when the component is dropped.
pub fn use_dependency_loader(
    dependencies: impl FnOnce() -> Vec<Dependency>,
) -> UseDependencyLoader {
    let loader = use_hook(|| Rc::new(DependencyLoader::new(dependencies(), dioxus_spawner())));

    let state = use_signal(|| loader.state());
    let handle = use_hook(|| {
        loader.set_observer(move |previous, next| {
            log::debug!("dependency_loader - {previous} -> {next}");
            let mut state = state;
            state.set(next.clone());
        });
        loader.handle()
    });

    use_drop({
        let loader = loader.clone();
        move || loader.destroy()
    });

    UseDependencyLoader {
        state: state.into(),
        handle,
    }
}

/// Renders `loaded_view` once every dependency of `loader` is resolved.
///
/// - `Idle` and `Loading` render `loading_view` (default: [LoadingPlaceholder])
/// - `Failed` renders `failed_view` with the failure (default: [FailedPlaceholder])
/// - `Ready` renders `loaded_view`
#[component]
pub fn DependencyLoading(
    loader: UseDependencyLoader,
    loaded_view: Callback<(), Element>,
    loading_view: Option<Callback<(), Element>>,
    failed_view: Option<Callback<DependencyFailure, Element>>,
) -> Element {
    select_view(
        loader.state(),
        ViewSelector {
            loaded: || loaded_view.call(()),
            loading: || match loading_view {
                Some(loading_view) => loading_view.call(()),
                None => rsx! {
                    LoadingPlaceholder {}
                },
            },
            failed: |failure: DependencyFailure| match failed_view {
                Some(failed_view) => failed_view.call(failure),
                None => rsx! {
                    FailedPlaceholder { failure }
                },
            },
        },
    )
}

/// The three renderers of a [DependencyLoading]
struct ViewSelector<L, W, F> {
    loaded: L,
    loading: W,
    failed: F,
}

fn select_view<T, L, W, F>(state: LoadState, views: ViewSelector<L, W, F>) -> T
where
    L: FnOnce() -> T,
    W: FnOnce() -> T,
    F: FnOnce(DependencyFailure) -> T,
{
    match state {
        LoadState::Failed(failure) => (views.failed)(failure),
        state if state.is_loading() => (views.loading)(),
        _ => (views.loaded)(),
    }
}

#[component]
pub fn LoadingPlaceholder() -> Element {
    rsx! {
        div { class: "loading-placeholder",
            span { class: "spinner" }
        }
    }
}

#[component]
pub fn FailedPlaceholder(failure: DependencyFailure) -> Element {
    rsx! {
        div { class: "failed-placeholder",
            div { class: "text-error", "Something went wrong" }
            for reason in failure.reasons() {
                div { "{reason}" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::utils::CCStr;

    /// Renders a state the way a screen with custom loading and failed views
    /// would, with text instead of elements
    fn shown(state: LoadState) -> String {
        select_view(
            state,
            ViewSelector {
                loaded: || "content".to_owned(),
                loading: || "spinner".to_owned(),
                failed: |failure: DependencyFailure| format!("error: {failure}"),
            },
        )
    }

    #[test]
    fn pending_states_show_the_loading_view() {
        assert_eq!(shown(LoadState::Idle), "spinner");
        assert_eq!(shown(LoadState::Loading), "spinner");
    }

    #[test]
    fn failure_shows_the_failed_view_with_its_reasons() {
        let failure = DependencyFailure::new([CCStr::from("401")]);
        assert_eq!(shown(LoadState::Failed(failure)), "error: 401");

        let failure = DependencyFailure::new([CCStr::from("timeout"), CCStr::from("401")]);
        assert_eq!(shown(LoadState::Failed(failure)), "error: timeout; 401");
    }

    #[test]
    fn ready_shows_the_content() {
        assert_eq!(shown(LoadState::Ready), "content");
    }

    #[test]
    fn only_the_selected_renderer_runs() {
        let mut calls = Vec::new();
        select_view(
            LoadState::Loading,
            ViewSelector {
                loaded: || calls.push("loaded"),
                loading: || (),
                failed: |_: DependencyFailure| (),
            },
        );
        assert!(calls.is_empty());
    }
}

use std::{
    cell::RefCell,
    future::Future,
    rc::{Rc, Weak},
};

use futures_util::future::{join_all, FutureExt, LocalBoxFuture};

use crate::utils::CCStr;

use super::state::{DependencyFailure, LoadState, RunToken};

/// Outcome of a single dependency operation. Dependencies only report
/// success or failure, whatever they fetch lands in the store.
pub type DependencyResult = Result<(), CCStr>;

/// A zero-argument asynchronous operation a screen depends on.
pub type Dependency = Rc<dyn Fn() -> LocalBoxFuture<'static, DependencyResult>>;

/// Drives the futures of a run to completion.
///
/// The loader never blocks; it hands the settlement of each run to the
/// spawner of the UI runtime it lives in.
pub type Spawner = Rc<dyn Fn(LocalBoxFuture<'static, ()>)>;

/// Called with `(previous, next)` every time the state changes.
pub type Observer = Rc<dyn Fn(&LoadState, &LoadState)>;

/// Wraps an async closure into a [Dependency]
pub fn dependency<F, Fut>(f: F) -> Dependency
where
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = DependencyResult> + 'static,
{
    Rc::new(move || f().boxed_local())
}

struct LoaderState {
    state: LoadState,
    last_token: RunToken,
    destroyed: bool,
    observer: Option<Observer>,
}

struct LoaderShared {
    dependencies: Rc<[Dependency]>,
    spawner: Spawner,
    inner: RefCell<LoaderState>,
}

impl LoaderShared {
    fn run(self: &Rc<Self>, force_reload: bool) {
        let token = {
            let mut inner = self.inner.borrow_mut();
            if inner.destroyed {
                log::debug!("dependency_loader - run ignored: loader destroyed");
                return;
            }
            inner.last_token = inner.last_token.next();
            inner.last_token
        };
        log::debug!(
            "dependency_loader - run {token} (force_reload={force_reload}, {} dependencies)",
            self.dependencies.len()
        );

        self.transition(LoadState::Loading);

        let pending = self
            .dependencies
            .iter()
            .map(|dependency| dependency())
            .collect::<Vec<_>>();
        let shared = Rc::downgrade(self);
        (self.spawner)(
            async move {
                let outcomes = join_all(pending).await;
                match shared.upgrade() {
                    Some(shared) => shared.settle(token, outcomes),
                    None => log::debug!("dependency_loader - run {token} settled after drop"),
                }
            }
            .boxed_local(),
        );
    }

    fn settle(&self, token: RunToken, outcomes: Vec<DependencyResult>) {
        {
            let inner = self.inner.borrow();
            if inner.destroyed {
                log::debug!("dependency_loader - run {token} settled after destruction");
                return;
            }
            if token != inner.last_token {
                log::debug!(
                    "dependency_loader - run {token} is stale (latest is {}), discarding",
                    inner.last_token
                );
                return;
            }
        }

        let reasons = outcomes
            .into_iter()
            .filter_map(Result::err)
            .collect::<Vec<_>>();
        let next = if reasons.is_empty() {
            log::debug!("dependency_loader - run {token} ready");
            LoadState::Ready
        } else {
            let failure = DependencyFailure::new(reasons);
            log::warn!("dependency_loader - run {token} failed: {failure}");
            LoadState::Failed(failure)
        };
        self.transition(next);
    }

    fn transition(&self, next: LoadState) {
        let (previous, observer) = {
            let mut inner = self.inner.borrow_mut();
            if inner.destroyed || inner.state == next {
                return;
            }
            let previous = core::mem::replace(&mut inner.state, next.clone());
            (previous, inner.observer.clone())
        };
        // The observer may re-enter the loader through its handle
        if let Some(observer) = observer {
            observer(&previous, &next);
        }
    }
}

/// Gates a screen's content behind the resolution of its dependency set.
///
/// The loader starts its first run as soon as it is created. Further runs are
/// triggered through [DependencyLoader::run] or a [LoaderHandle]. Runs may
/// overlap: each one mints a fresh [RunToken] and only the most recent run is
/// allowed to move the loader out of [LoadState::Loading].
///
/// Dropping the loader destroys it: runs still in flight settle silently and
/// every handle becomes a no-op.
pub struct DependencyLoader {
    shared: Rc<LoaderShared>,
}

impl DependencyLoader {
    pub fn new(dependencies: impl IntoIterator<Item = Dependency>, spawner: Spawner) -> Self {
        Self::build(dependencies, spawner, None)
    }

    /// Same as [DependencyLoader::new] but the `observer` also sees the
    /// transitions of the automatic first run, starting from [LoadState::Idle]
    pub fn new_observed(
        dependencies: impl IntoIterator<Item = Dependency>,
        spawner: Spawner,
        observer: impl Fn(&LoadState, &LoadState) + 'static,
    ) -> Self {
        Self::build(dependencies, spawner, Some(Rc::new(observer)))
    }

    fn build(
        dependencies: impl IntoIterator<Item = Dependency>,
        spawner: Spawner,
        observer: Option<Observer>,
    ) -> Self {
        let shared = Rc::new(LoaderShared {
            dependencies: dependencies.into_iter().collect(),
            spawner,
            inner: RefCell::new(LoaderState {
                state: LoadState::Idle,
                last_token: RunToken::default(),
                destroyed: false,
                observer,
            }),
        });
        shared.run(false);
        Self { shared }
    }

    /// Replace the state observer. The new observer is not called for the
    /// current state, only for the following transitions.
    pub fn set_observer(&self, observer: impl Fn(&LoadState, &LoadState) + 'static) {
        self.shared.inner.borrow_mut().observer = Some(Rc::new(observer));
    }

    /// Re-execute every dependency. `force_reload` is only reported in logs.
    pub fn run(&self, force_reload: bool) {
        self.shared.run(force_reload)
    }

    pub fn state(&self) -> LoadState {
        self.shared.inner.borrow().state.clone()
    }

    pub fn handle(&self) -> LoaderHandle {
        LoaderHandle(Rc::downgrade(&self.shared))
    }

    /// Tear the loader down. Idempotent.
    pub fn destroy(&self) {
        let mut inner = self.shared.inner.borrow_mut();
        if !inner.destroyed {
            log::debug!("dependency_loader - destroyed at run {}", inner.last_token);
            inner.destroyed = true;
            inner.observer = None;
        }
    }
}

impl Drop for DependencyLoader {
    fn drop(&mut self) {
        self.destroy()
    }
}

/// Stable imperative handle on a [DependencyLoader].
///
/// The handle does not keep the loader alive and can be called from outside
/// any render, typically from a "screen became visible" callback.
#[derive(Clone)]
pub struct LoaderHandle(Weak<LoaderShared>);

impl LoaderHandle {
    /// Start a new run of the loader, superseding any run in flight.
    /// A no-op once the loader is destroyed.
    pub fn load(&self, force_reload: bool) {
        match self.0.upgrade() {
            Some(shared) => shared.run(force_reload),
            None => log::debug!("dependency_loader - load ignored: loader dropped"),
        }
    }

    /// Current state, `None` once the loader is gone
    pub fn state(&self) -> Option<LoadState> {
        self.0.upgrade().and_then(|shared| {
            let inner = shared.inner.borrow();
            (!inner.destroyed).then(|| inner.state.clone())
        })
    }
}
impl PartialEq for LoaderHandle {
    fn eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.0, &other.0)
    }
}
impl core::fmt::Debug for LoaderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("LoaderHandle")
            .field(&self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::{
        cell::{Cell, RefCell},
        collections::VecDeque,
        time::Duration,
    };

    use tokio::task::LocalSet;

    fn local_spawner() -> Spawner {
        Rc::new(|fut: LocalBoxFuture<'static, ()>| {
            tokio::task::spawn_local(fut);
        })
    }

    /// A dependency whose successive invocations follow `script`:
    /// each entry is a delay in ms and an outcome. Once the script is
    /// exhausted the dependency resolves immediately.
    fn scripted(
        script: Vec<(u64, Result<(), &'static str>)>,
        calls: Rc<Cell<usize>>,
    ) -> Dependency {
        let script = Rc::new(RefCell::new(VecDeque::from(script)));
        dependency(move || {
            calls.set(calls.get() + 1);
            let (delay, outcome) = script.borrow_mut().pop_front().unwrap_or((0, Ok(())));
            async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                outcome.map_err(CCStr::from)
            }
        })
    }

    fn delayed(delay: u64, outcome: Result<(), &'static str>) -> Dependency {
        scripted(vec![(delay, outcome)], Rc::new(Cell::new(0)))
    }

    type History = Rc<RefCell<Vec<(LoadState, LoadState)>>>;

    fn observed(dependencies: Vec<Dependency>) -> (DependencyLoader, History) {
        let history: History = Rc::default();
        let recorder = history.clone();
        let loader = DependencyLoader::new_observed(dependencies, local_spawner(), move |p, n| {
            recorder.borrow_mut().push((p.clone(), n.clone()))
        });
        (loader, history)
    }

    fn failed(reason: &str) -> LoadState {
        LoadState::Failed(DependencyFailure::new([CCStr::from(reason)]))
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_secs(5)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn catalog_and_cart_reach_ready() {
        LocalSet::new()
            .run_until(async {
                let (loader, history) = observed(vec![delayed(30, Ok(())), delayed(10, Ok(()))]);
                assert_eq!(loader.state(), LoadState::Loading);
                settle().await;
                assert_eq!(loader.state(), LoadState::Ready);
                assert_eq!(
                    *history.borrow(),
                    vec![
                        (LoadState::Idle, LoadState::Loading),
                        (LoadState::Loading, LoadState::Ready)
                    ]
                );
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_session_fails_the_whole_set() {
        LocalSet::new()
            .run_until(async {
                let (loader, history) = observed(vec![delayed(50, Ok(())), delayed(5, Err("401"))]);
                settle().await;
                assert_eq!(loader.state(), failed("401"));
                assert_eq!(
                    *history.borrow(),
                    vec![
                        (LoadState::Idle, LoadState::Loading),
                        (LoadState::Loading, failed("401"))
                    ]
                );
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn every_rejection_is_reported_in_order() {
        LocalSet::new()
            .run_until(async {
                let (loader, _) = observed(vec![
                    delayed(20, Err("catalog unavailable")),
                    delayed(1, Ok(())),
                    delayed(5, Err("401")),
                ]);
                settle().await;
                let LoadState::Failed(failure) = loader.state() else {
                    panic!("expected a failure, got {}", loader.state());
                };
                assert_eq!(
                    failure.reasons(),
                    &[CCStr::from("catalog unavailable"), CCStr::from("401")]
                );
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn stays_loading_until_the_slowest_dependency() {
        LocalSet::new()
            .run_until(async {
                let (loader, _) = observed(vec![delayed(10, Ok(())), delayed(500, Ok(()))]);
                tokio::time::sleep(Duration::from_millis(100)).await;
                assert_eq!(loader.state(), LoadState::Loading);
                tokio::time::sleep(Duration::from_millis(500)).await;
                assert_eq!(loader.state(), LoadState::Ready);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn newer_run_wins_over_slower_older_run() {
        LocalSet::new()
            .run_until(async {
                let calls = Rc::new(Cell::new(0));
                // run #1 resolves after 200ms, run #2 rejects after 10ms
                let (loader, history) = observed(vec![scripted(
                    vec![(200, Ok(())), (10, Err("401"))],
                    calls.clone(),
                )]);
                loader.handle().load(true);
                tokio::time::sleep(Duration::from_millis(50)).await;
                assert_eq!(loader.state(), failed("401"));
                settle().await;
                assert_eq!(loader.state(), failed("401"));
                assert_eq!(calls.get(), 2);
                assert!(history.borrow().iter().all(|(_, next)| *next != LoadState::Ready));
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn result_is_discarded_when_a_later_run_was_issued() {
        LocalSet::new()
            .run_until(async {
                let calls = Rc::new(Cell::new(0));
                // run #2 settles first but run #3 is already in flight
                let (loader, _) = observed(vec![scripted(
                    vec![(10, Ok(())), (20, Err("stale")), (100, Ok(()))],
                    calls.clone(),
                )]);
                let handle = loader.handle();
                handle.load(true);
                handle.load(true);
                tokio::time::sleep(Duration::from_millis(50)).await;
                assert_eq!(loader.state(), LoadState::Loading);
                settle().await;
                assert_eq!(loader.state(), LoadState::Ready);
                assert_eq!(calls.get(), 3);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn redundant_reload_reruns_every_dependency_once() {
        LocalSet::new()
            .run_until(async {
                let catalog_calls = Rc::new(Cell::new(0));
                let cart_calls = Rc::new(Cell::new(0));
                let (loader, history) = observed(vec![
                    scripted(vec![(10, Ok(())), (10, Ok(()))], catalog_calls.clone()),
                    scripted(vec![(20, Ok(())), (20, Ok(()))], cart_calls.clone()),
                ]);
                settle().await;
                assert_eq!(loader.state(), LoadState::Ready);
                history.borrow_mut().clear();

                loader.handle().load(true);
                assert_eq!(loader.state(), LoadState::Loading);
                settle().await;

                assert_eq!((catalog_calls.get(), cart_calls.get()), (2, 2));
                assert_eq!(
                    *history.borrow(),
                    vec![
                        (LoadState::Ready, LoadState::Loading),
                        (LoadState::Loading, LoadState::Ready)
                    ]
                );
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn reload_recovers_from_failure() {
        LocalSet::new()
            .run_until(async {
                let calls = Rc::new(Cell::new(0));
                let (loader, _) = observed(vec![scripted(
                    vec![(10, Err("401")), (10, Ok(()))],
                    calls.clone(),
                )]);
                settle().await;
                assert_eq!(loader.state(), failed("401"));
                loader.run(true);
                settle().await;
                assert_eq!(loader.state(), LoadState::Ready);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn empty_dependency_set_is_ready() {
        LocalSet::new()
            .run_until(async {
                let (loader, _) = observed(vec![]);
                settle().await;
                assert_eq!(loader.state(), LoadState::Ready);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn destroyed_loader_ignores_settlements_and_handles() {
        LocalSet::new()
            .run_until(async {
                let calls = Rc::new(Cell::new(0));
                let (loader, history) =
                    observed(vec![scripted(vec![(100, Ok(()))], calls.clone())]);
                let handle = loader.handle();
                loader.destroy();
                settle().await;

                assert_eq!(loader.state(), LoadState::Loading);
                assert_eq!(handle.state(), None);
                handle.load(true);
                assert_eq!(calls.get(), 1);
                assert_eq!(history.borrow().len(), 1);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_loader_makes_handles_inert() {
        LocalSet::new()
            .run_until(async {
                let calls = Rc::new(Cell::new(0));
                let (loader, _) = observed(vec![scripted(vec![(100, Ok(()))], calls.clone())]);
                let handle = loader.handle();
                drop(loader);
                handle.load(true);
                settle().await;
                assert_eq!(handle.state(), None);
                assert_eq!(calls.get(), 1);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn late_observer_only_sees_later_transitions() {
        LocalSet::new()
            .run_until(async {
                let loader = DependencyLoader::new(vec![delayed(10, Ok(()))], local_spawner());
                let seen = Rc::new(RefCell::new(Vec::new()));
                let recorder = seen.clone();
                loader.set_observer(move |_, next| recorder.borrow_mut().push(next.clone()));
                settle().await;
                assert_eq!(*seen.borrow(), vec![LoadState::Ready]);
            })
            .await;
    }

    mod arrival_order {
        use super::*;

        use proptest::prelude::*;

        fn run_to_completion(delays: &[u64], rejected: Option<usize>) -> LoadState {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .start_paused(true)
                .build()
                .expect("runtime");
            LocalSet::new().block_on(&runtime, async {
                let dependencies = delays
                    .iter()
                    .enumerate()
                    .map(|(i, delay)| {
                        let outcome = if Some(i) == rejected { Err("rejected") } else { Ok(()) };
                        delayed(*delay, outcome)
                    })
                    .collect::<Vec<_>>();
                let loader = DependencyLoader::new(dependencies, local_spawner());
                tokio::time::sleep(Duration::from_secs(10)).await;
                loader.state()
            })
        }

        proptest! {
            #[test]
            fn resolves_ready_whatever_the_arrival_order(
                delays in prop::collection::vec(0u64..1000, 1..8)
            ) {
                prop_assert_eq!(run_to_completion(&delays, None), LoadState::Ready);
            }

            #[test]
            fn one_rejection_fails_whatever_the_arrival_order(
                (delays, rejected) in prop::collection::vec(0u64..1000, 1..8)
                    .prop_flat_map(|d| { let len = d.len(); (Just(d), 0..len) })
            ) {
                prop_assert_eq!(run_to_completion(&delays, Some(rejected)), failed("rejected"));
            }
        }
    }
}

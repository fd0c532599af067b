use crate::utils::CCStr;

/// Identifier of one invocation of the loader's run procedure.
///
/// Tokens are minted in strictly increasing order. Only the outcome of the
/// run holding the most recent token may be applied to the loader state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RunToken(u64);
impl RunToken {
    pub(super) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}
impl core::fmt::Display for RunToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The failure of one or more dependencies during the most recent run.
///
/// Reasons are kept in the order of the dependency set, so the first reason
/// always belongs to the first rejecting dependency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", join_reasons(.reasons))]
pub struct DependencyFailure {
    reasons: Vec<CCStr>,
}
fn join_reasons(reasons: &[CCStr]) -> String {
    reasons
        .iter()
        .map(|r| r.as_ref())
        .collect::<Vec<_>>()
        .join("; ")
}
impl DependencyFailure {
    pub fn new(reasons: impl IntoIterator<Item = CCStr>) -> Self {
        Self {
            reasons: reasons.into_iter().collect(),
        }
    }
    pub fn reasons(&self) -> &[CCStr] {
        &self.reasons
    }
}

/// Aggregate readiness of a dependency set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// No run has ever started
    #[default]
    Idle,
    /// At least one dependency of the current run is outstanding
    Loading,
    /// Every dependency resolved on the most recent run
    Ready,
    /// At least one dependency rejected on the most recent run
    Failed(DependencyFailure),
}
impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Idle | Self::Loading)
    }
}
impl core::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => f.write_str("Idle"),
            Self::Loading => f.write_str("Loading"),
            Self::Ready => f.write_str("Ready"),
            Self::Failed(failure) => write!(f, "Failed({failure})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_displays_every_reason() {
        let failure = DependencyFailure::new([CCStr::from("401"), CCStr::from("timeout")]);
        assert_eq!(failure.to_string(), "401; timeout");
        assert_eq!(failure.reasons()[0].as_ref(), "401");
    }

    #[test]
    fn idle_counts_as_loading_for_rendering() {
        assert!(LoadState::Idle.is_loading());
        assert!(LoadState::Loading.is_loading());
        assert!(!LoadState::Ready.is_loading());
        assert_eq!(
            LoadState::Failed(DependencyFailure::new([CCStr::from("401")])).to_string(),
            "Failed(401)"
        );
    }

    #[test]
    fn tokens_increase() {
        let first = RunToken::default().next();
        let second = first.next();
        assert!(second > first);
        assert_eq!(second.to_string(), "#2");
    }
}

use super::types::WizardStep;

/// Position within the ordered wizard steps.
///
/// `advance` and `retreat` clamp at the ends: moving past either bound is a
/// no-op that reports `false`, never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepCoordinator {
    position: usize,
}

impl StepCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn current(&self) -> WizardStep {
        WizardStep::ALL[self.position]
    }

    pub fn is_first(&self) -> bool {
        self.position == 0
    }

    pub fn is_last(&self) -> bool {
        self.position == WizardStep::ALL.len() - 1
    }

    /// Move forward one step. Returns whether the position changed.
    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.position += 1;
        self.check_invariant();
        tracing::debug!("[coordinator] advance → {:?}", self.current());
        true
    }

    /// Move back one step. Returns whether the position changed.
    pub fn retreat(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.position -= 1;
        self.check_invariant();
        tracing::debug!("[coordinator] retreat → {:?}", self.current());
        true
    }

    fn check_invariant(&self) {
        debug_assert!(
            self.position < WizardStep::ALL.len(),
            "step position {} out of bounds",
            self.position
        );
    }
}

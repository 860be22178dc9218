//! Organization setup: company form with debounced description auto-fetch,
//! detected page browser, and the training gate on `Continue`.

use std::time::Duration;

use super::notice::Toasts;
use super::timer::Generation;
use super::types::{DETECTED_PAGES, DetectedPage, FETCHED_DESCRIPTION, TrainingStatus, WizardAction};

#[derive(Debug, Clone)]
pub struct OrganizationFlow {
    pub company_name: String,
    pub company_description: String,
    company_url: String,
    /// A description fetch is scheduled and has not landed yet
    loading: bool,
    fetch: Generation,
    fetch_delay: Duration,
    selected_page: Option<usize>,
    training: TrainingStatus,
}

impl OrganizationFlow {
    pub fn new(fetch_delay: Duration) -> Self {
        Self {
            company_name: String::new(),
            company_description: String::new(),
            company_url: String::new(),
            loading: false,
            fetch: Generation::default(),
            fetch_delay,
            selected_page: None,
            training: TrainingStatus::InProgress,
        }
    }

    /// Blank form with training back in progress. The fetch counter keeps
    /// counting so a timer from the previous visit can never match.
    pub fn reset(&mut self) {
        let mut fetch = std::mem::take(&mut self.fetch);
        fetch.cancel();
        *self = Self {
            fetch,
            ..Self::new(self.fetch_delay)
        };
    }

    pub fn company_url(&self) -> &str {
        &self.company_url
    }

    /// Replace the company URL. Any pending fetch is superseded; a URL that
    /// contains `.` schedules a fresh one.
    pub fn set_company_url(&mut self, url: impl Into<String>) -> WizardAction {
        let url = url.into();
        if url == self.company_url {
            return WizardAction::None;
        }
        self.company_url = url;

        if self.company_url.contains('.') {
            let generation = self.fetch.schedule();
            self.loading = true;
            tracing::debug!(
                "[organization] description fetch #{} scheduled for {}",
                generation,
                self.company_url
            );
            return WizardAction::ScheduleDescriptionFetch {
                generation,
                delay: self.fetch_delay,
            };
        }

        if self.fetch.cancel() {
            self.loading = false;
            return WizardAction::CancelDescriptionFetch;
        }
        WizardAction::None
    }

    /// The debounce timer for `generation` fired
    pub fn description_fetched(&mut self, generation: u64, toasts: &mut Toasts) -> bool {
        if !self.fetch.settle(generation) {
            tracing::debug!("[organization] dropping stale fetch #{}", generation);
            return false;
        }
        self.company_description = FETCHED_DESCRIPTION.to_string();
        self.loading = false;
        toasts.success("Meta description fetched successfully!", None);
        true
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Generation of the fetch still waiting to fire, if any
    pub fn pending_fetch(&self) -> Option<u64> {
        self.fetch.pending()
    }

    pub fn pages(&self) -> &'static [DetectedPage] {
        DETECTED_PAGES
    }

    /// Select a detected page; out-of-range indices are ignored
    pub fn select_page(&mut self, index: usize) {
        if index < DETECTED_PAGES.len() {
            self.selected_page = Some(index);
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected_page
    }

    pub fn selected_page(&self) -> Option<&'static DetectedPage> {
        self.selected_page.map(|i| &DETECTED_PAGES[i])
    }

    /// Chunks revealed by the current selection; empty when nothing was scraped
    pub fn selected_chunks(&self) -> &'static [&'static str] {
        self.selected_page().map(|p| p.chunks).unwrap_or(&[])
    }

    pub fn training(&self) -> TrainingStatus {
        self.training
    }

    /// Force training to complete. Only the first call notifies.
    pub fn finish_training(&mut self, toasts: &mut Toasts) {
        if self.training == TrainingStatus::Complete {
            return;
        }
        self.training = TrainingStatus::Complete;
        tracing::info!("[organization] training complete");
        toasts.success(
            "Chatbot Training Complete",
            Some("Your chatbot is now ready to use."),
        );
    }

    /// Advance when training is done. Refused silently while in progress.
    pub fn continue_setup(&self) -> WizardAction {
        match self.training {
            TrainingStatus::Complete => WizardAction::Advance,
            TrainingStatus::InProgress => {
                tracing::debug!("[organization] continue refused: training in progress");
                WizardAction::None
            }
        }
    }

    pub fn back(&self) -> WizardAction {
        WizardAction::Retreat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::onboarding::types::PageStatus;

    fn flow() -> OrganizationFlow {
        OrganizationFlow::new(Duration::from_millis(1500))
    }

    #[test]
    fn test_url_with_dot_schedules_one_fetch() {
        let mut f = flow();
        let action = f.set_company_url("acme.com");
        assert!(matches!(
            action,
            WizardAction::ScheduleDescriptionFetch { generation: 1, .. }
        ));
        assert!(f.is_loading());
        assert_eq!(f.pending_fetch(), Some(1));
    }

    #[test]
    fn test_url_without_dot_schedules_nothing() {
        let mut f = flow();
        assert_eq!(f.set_company_url("acme"), WizardAction::None);
        assert!(!f.is_loading());
        assert_eq!(f.pending_fetch(), None);
    }

    #[test]
    fn test_new_edit_supersedes_pending_fetch() {
        let mut f = flow();
        let mut toasts = Toasts::new();
        f.set_company_url("acme.c");
        f.set_company_url("acme.co");

        assert!(!f.description_fetched(1, &mut toasts));
        assert!(f.company_description.is_empty());
        assert!(f.description_fetched(2, &mut toasts));
        assert_eq!(f.company_description, FETCHED_DESCRIPTION);
        assert!(!f.is_loading());
        assert_eq!(toasts.count_titled("Meta description fetched successfully!"), 1);
    }

    #[test]
    fn test_removing_dot_cancels_fetch() {
        let mut f = flow();
        let mut toasts = Toasts::new();
        f.set_company_url("acme.");
        assert_eq!(f.set_company_url("acme"), WizardAction::CancelDescriptionFetch);
        assert!(!f.is_loading());
        assert!(!f.description_fetched(1, &mut toasts));
        assert!(f.company_description.is_empty());
    }

    #[test]
    fn test_same_url_is_not_an_edit() {
        let mut f = flow();
        f.set_company_url("acme.com");
        assert_eq!(f.set_company_url("acme.com"), WizardAction::None);
        assert_eq!(f.pending_fetch(), Some(1));
    }

    #[test]
    fn test_fetch_overwrites_user_description() {
        let mut f = flow();
        let mut toasts = Toasts::new();
        f.company_description = "We sell anvils".to_string();
        f.set_company_url("acme.com");
        f.description_fetched(1, &mut toasts);
        assert_eq!(f.company_description, FETCHED_DESCRIPTION);
    }

    #[test]
    fn test_select_page_reveals_chunks() {
        let mut f = flow();
        assert!(f.selected_chunks().is_empty());

        f.select_page(0);
        assert_eq!(f.selected_page().unwrap().url, "/home");
        assert_eq!(f.selected_chunks().len(), 2);

        f.select_page(2);
        assert_eq!(f.selected_page().unwrap().status, PageStatus::Pending);
        assert!(f.selected_chunks().is_empty());

        f.select_page(99);
        assert_eq!(f.selected_index(), Some(2));
    }

    #[test]
    fn test_continue_refused_while_training() {
        let f = flow();
        assert_eq!(f.training(), TrainingStatus::InProgress);
        assert_eq!(f.continue_setup(), WizardAction::None);
    }

    #[test]
    fn test_finish_training_is_idempotent() {
        let mut f = flow();
        let mut toasts = Toasts::new();
        f.finish_training(&mut toasts);
        f.finish_training(&mut toasts);
        assert_eq!(f.training(), TrainingStatus::Complete);
        assert_eq!(toasts.count_titled("Chatbot Training Complete"), 1);
        assert_eq!(f.continue_setup(), WizardAction::Advance);
    }
}

//! End-to-end onboarding: registration, organization setup with a debounced
//! description fetch, then integration checks until one passes.

use async_trait::async_trait;
use chatboat::config::Config;
use chatboat::onboarding::{
    FETCHED_DESCRIPTION, IntegrationProbe, IntegrationView, OnboardingWizard, TimerSlots,
    WizardAction, WizardStep,
};
use chatboat::provider::{CompletionProvider, CompletionReply, CompletionRequest};
use chatboat::tui::app::{App, Field, fields_for};
use chatboat::tui::TuiEvent;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

/// Fails the first `failures` checks, then passes
struct FlakyProbe {
    failures: usize,
    calls: AtomicUsize,
}

impl IntegrationProbe for FlakyProbe {
    fn passes(&self) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst) >= self.failures
    }
}

struct SilentProvider;

#[async_trait]
impl CompletionProvider for SilentProvider {
    fn name(&self) -> &str {
        "silent"
    }

    async fn complete(
        &self,
        _request: CompletionRequest,
    ) -> chatboat::provider::Result<CompletionReply> {
        Ok(None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Slot {
    Fetch,
}

#[tokio::test(start_paused = true)]
async fn test_wizard_end_to_end_with_real_timers() {
    let mut wizard = OnboardingWizard::new(&Config::default());
    let mut timers = TimerSlots::new();
    let (tx, mut rx) = mpsc::unbounded_channel::<u64>();

    wizard.registration.name = "Test User".to_string();
    wizard.registration.email = "test@example.com".to_string();
    wizard.registration.password = "secret".to_string();
    wizard.submit_registration();
    wizard.registration.verification_code = "123456".to_string();
    wizard.submit_registration();
    assert_eq!(wizard.step(), WizardStep::Organization);

    // Each keystroke supersedes the previous fetch
    let mut url = String::new();
    for c in "acme.com".chars() {
        url.push(c);
        if let WizardAction::ScheduleDescriptionFetch { generation, delay } =
            wizard.set_company_url(url.clone())
        {
            let tx = tx.clone();
            timers.schedule(Slot::Fetch, delay, move || {
                let _ = tx.send(generation);
            });
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    tokio::time::sleep(Duration::from_secs(2)).await;
    let mut landed = 0;
    while let Ok(generation) = rx.try_recv() {
        if wizard.description_fetched(generation) {
            landed += 1;
        }
    }
    assert_eq!(landed, 1);
    assert_eq!(wizard.organization.company_description, FETCHED_DESCRIPTION);

    wizard.finish_training();
    wizard.continue_setup();
    assert_eq!(wizard.step(), WizardStep::Integration);

    let probe = FlakyProbe {
        failures: 3,
        calls: AtomicUsize::new(0),
    };
    while wizard.integration.view != IntegrationView::Complete {
        wizard.integration.retry();
        let WizardAction::ScheduleIntegrationCheck { generation, .. } = wizard.run_check() else {
            panic!("expected a scheduled check");
        };
        wizard.integration_checked(generation, probe.passes());
    }
    assert_eq!(probe.calls.load(Ordering::SeqCst), 4);
    assert_eq!(wizard.finish(), WizardAction::Complete);
    assert!(wizard.is_complete());
}

fn key(code: KeyCode) -> TuiEvent {
    TuiEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn focus(app: &mut App, field: Field) {
    for _ in 0..fields_for(&app.wizard).len() {
        if app.focused == field {
            break;
        }
        app.handle_event(key(KeyCode::Tab));
    }
    assert_eq!(app.focused, field);
}

fn press(app: &mut App, field: Field) {
    focus(app, field);
    app.handle_event(key(KeyCode::Enter));
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_event(key(KeyCode::Char(c)));
    }
}

async fn settle(app: &mut App, wait: Duration) {
    tokio::time::sleep(wait).await;
    while let Some(event) = app.try_next_event() {
        app.handle_event(event);
    }
}

#[tokio::test(start_paused = true)]
async fn test_end_to_end_through_terminal_app() {
    let probe = Arc::new(FlakyProbe {
        failures: 2,
        calls: AtomicUsize::new(0),
    });
    let mut app = App::new(&Config::default(), Arc::new(SilentProvider), probe.clone());

    type_text(&mut app, "Test User");
    app.handle_event(key(KeyCode::Tab));
    type_text(&mut app, "test@example.com");
    app.handle_event(key(KeyCode::Tab));
    type_text(&mut app, "secret");
    press(&mut app, Field::CreateAccount);
    type_text(&mut app, "123456");
    press(&mut app, Field::Verify);
    assert_eq!(app.wizard.step(), WizardStep::Organization);

    focus(&mut app, Field::CompanyUrl);
    type_text(&mut app, "acme.com");
    settle(&mut app, Duration::from_secs(2)).await;
    assert_eq!(app.wizard.organization.company_description, FETCHED_DESCRIPTION);

    press(&mut app, Field::ContinueSetup);
    assert_eq!(app.wizard.step(), WizardStep::Organization);
    press(&mut app, Field::FinishTraining);
    press(&mut app, Field::ContinueSetup);
    assert_eq!(app.wizard.step(), WizardStep::Integration);

    while app.wizard.integration.view != IntegrationView::Complete {
        if fields_for(&app.wizard).contains(&Field::Retry) {
            press(&mut app, Field::Retry);
        }
        press(&mut app, Field::RunCheck);
        settle(&mut app, Duration::from_secs(3)).await;
    }
    assert_eq!(probe.calls.load(Ordering::SeqCst), 3);

    press(&mut app, Field::StartTalking);
    assert!(app.wizard.is_complete());
    assert!(app.should_quit);
}

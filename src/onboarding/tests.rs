use super::*;
use crate::config::Config;
use crate::provider::ProviderError;

fn wizard() -> OnboardingWizard {
    OnboardingWizard::new(&Config::default())
}

/// Wizard parked on the organization step
fn at_organization() -> OnboardingWizard {
    let mut w = wizard();
    w.registration.name = "Test User".to_string();
    w.registration.email = "test@example.com".to_string();
    w.registration.password = "secret".to_string();
    w.submit_registration();
    w.registration.verification_code = "123456".to_string();
    w.submit_registration();
    assert_eq!(w.step(), WizardStep::Organization);
    w
}

fn at_integration() -> OnboardingWizard {
    let mut w = at_organization();
    w.finish_training();
    w.continue_setup();
    assert_eq!(w.step(), WizardStep::Integration);
    w
}

#[test]
fn test_wizard_creation() {
    let w = wizard();
    assert_eq!(w.step(), WizardStep::Registration);
    assert_eq!(w.step_number(), 1);
    assert_eq!(w.registration.phase, RegistrationPhase::Collecting);
    assert!(w.toasts.is_empty());
    assert!(!w.is_complete());
}

#[test]
fn test_wrong_code_stays_on_registration() {
    let mut w = wizard();
    w.registration.name = "Test User".to_string();
    w.registration.email = "test@example.com".to_string();
    w.registration.password = "secret".to_string();
    w.submit_registration();
    w.registration.verification_code = "654321".to_string();
    assert_eq!(w.submit_registration(), WizardAction::None);
    assert_eq!(w.step(), WizardStep::Registration);
    assert_eq!(w.registration.phase, RegistrationPhase::Verifying);
}

#[test]
fn test_configured_verification_code() {
    let mut config = Config::default();
    config.registration.verification_code = "999000".to_string();
    let mut w = OnboardingWizard::new(&config);
    w.registration.name = "n".to_string();
    w.registration.email = "e".to_string();
    w.registration.password = "p".to_string();
    w.submit_registration();

    w.registration.verification_code = "123456".to_string();
    w.submit_registration();
    assert_eq!(w.step(), WizardStep::Registration);

    w.registration.verification_code = "999000".to_string();
    w.submit_registration();
    assert_eq!(w.step(), WizardStep::Organization);
}

#[test]
fn test_alternate_login_advances() {
    let mut w = wizard();
    assert!(matches!(
        w.alternate_login(),
        WizardAction::ScheduleAlternateLogin { .. }
    ));
    assert_eq!(w.step(), WizardStep::Registration);
    assert_eq!(
        w.alternate_login_finished(),
        WizardAction::LeftStep(WizardStep::Registration)
    );
    assert_eq!(w.step(), WizardStep::Organization);
}

#[test]
fn test_stale_alternate_login_is_dropped() {
    let mut w = wizard();
    w.alternate_login();
    // The user verified by email before the login stand-in returned
    w.registration.name = "n".to_string();
    w.registration.email = "e".to_string();
    w.registration.password = "p".to_string();
    w.submit_registration();
    w.registration.verification_code = "123456".to_string();
    w.submit_registration();
    assert_eq!(w.step(), WizardStep::Organization);

    w.alternate_login_finished();
    assert_eq!(w.step(), WizardStep::Organization);
}

#[test]
fn test_intents_for_other_steps_are_ignored() {
    let mut w = wizard();
    assert_eq!(w.set_company_url("acme.com"), WizardAction::None);
    assert_eq!(w.run_check(), WizardAction::None);
    assert_eq!(w.finish(), WizardAction::None);
    w.finish_training();
    assert_eq!(w.organization.training(), TrainingStatus::InProgress);
    assert_eq!(w.organization.company_url(), "");
}

#[test]
fn test_continue_refused_until_training_done() {
    let mut w = at_organization();
    assert_eq!(w.continue_setup(), WizardAction::None);
    assert_eq!(w.step(), WizardStep::Organization);
    w.finish_training();
    w.continue_setup();
    assert_eq!(w.step(), WizardStep::Integration);
}

#[test]
fn test_back_navigation() {
    let mut w = at_integration();
    w.back();
    assert_eq!(w.step(), WizardStep::Organization);
    w.back();
    assert_eq!(w.step(), WizardStep::Registration);
    w.back();
    assert_eq!(w.step(), WizardStep::Registration);
}

#[test]
fn test_back_blocked_outside_options() {
    let mut w = at_integration();
    w.integration.enter_integrate();
    w.back();
    assert_eq!(w.step(), WizardStep::Integration);
}

#[test]
fn test_steps_start_over_on_reentry() {
    let mut w = at_organization();
    w.organization.company_name = "Acme".to_string();
    w.select_page(0);
    w.finish_training();
    assert_eq!(
        w.continue_setup(),
        WizardAction::LeftStep(WizardStep::Organization)
    );
    assert_eq!(w.back(), WizardAction::LeftStep(WizardStep::Integration));

    assert_eq!(w.step(), WizardStep::Organization);
    assert_eq!(w.organization.training(), TrainingStatus::InProgress);
    assert!(w.organization.company_name.is_empty());
    assert_eq!(w.organization.selected_index(), None);
    assert_eq!(w.continue_setup(), WizardAction::None);

    w.back();
    assert_eq!(w.step(), WizardStep::Registration);
    assert_eq!(w.registration.phase, RegistrationPhase::Collecting);
    assert!(w.registration.name.is_empty());
    assert!(w.registration.verification_code.is_empty());
}

#[test]
fn test_fetch_from_previous_visit_is_dropped() {
    let mut w = at_organization();
    let WizardAction::ScheduleDescriptionFetch { generation, .. } = w.set_company_url("acme.com")
    else {
        panic!("expected a description fetch");
    };
    w.back();
    w.registration.name = "n".to_string();
    w.registration.email = "e".to_string();
    w.registration.password = "p".to_string();
    w.submit_registration();
    w.registration.verification_code = "123456".to_string();
    w.submit_registration();
    assert_eq!(w.step(), WizardStep::Organization);

    let WizardAction::ScheduleDescriptionFetch { generation: fresh, .. } =
        w.set_company_url("acme.org")
    else {
        panic!("expected a description fetch");
    };
    assert_ne!(fresh, generation);
    assert!(!w.description_fetched(generation));
    assert!(w.organization.company_description.is_empty());
    assert!(w.description_fetched(fresh));
}

#[test]
fn test_check_started_before_leaving_is_dropped() {
    let mut w = at_integration();
    let WizardAction::ScheduleIntegrationCheck { generation, .. } = w.run_check() else {
        panic!("expected a scheduled check");
    };
    w.back();
    assert_eq!(w.step(), WizardStep::Organization);
    assert!(!w.integration_checked(generation, true));

    w.finish_training();
    w.continue_setup();
    assert_eq!(w.step(), WizardStep::Integration);
    assert_eq!(w.integration.view, IntegrationView::Main);
    assert_eq!(w.integration.test_result, TestResult::None);
    assert!(!w.integration.is_checking());
}

#[test]
fn test_chat_failure_raises_toast() {
    let mut w = at_integration();
    w.integration.open_test_chat();
    w.integration.chat_mut().unwrap().input = "Hi".to_string();
    assert!(matches!(w.chat_send(), WizardAction::SendChat(_)));
    w.chat_replied(Err(ProviderError::MissingApiKey));

    let chat = w.integration.chat().unwrap();
    assert_eq!(chat.messages().len(), 1);
    assert!(!chat.is_pending());
    assert_eq!(
        w.toasts.latest().unwrap().description.as_deref(),
        Some("Failed to get a response. Please try again.")
    );
}

#[test]
fn test_finish_marks_complete() {
    let mut w = at_integration();
    let WizardAction::ScheduleIntegrationCheck { generation, .. } = w.run_check() else {
        panic!("expected a scheduled check");
    };
    w.integration_checked(generation, true);
    assert_eq!(w.finish(), WizardAction::Complete);
    assert!(w.is_complete());
}

#[test]
fn test_end_to_end_scenario() {
    let mut w = wizard();
    assert_eq!(w.step_number(), 1);

    w.registration.name = "Test User".to_string();
    w.registration.email = "test@example.com".to_string();
    w.registration.password = "secret".to_string();
    w.submit_registration();
    assert_eq!(w.registration.phase, RegistrationPhase::Verifying);
    w.registration.verification_code = "123456".to_string();
    w.submit_registration();
    assert_eq!(w.step_number(), 2);

    let WizardAction::ScheduleDescriptionFetch { generation, .. } = w.set_company_url("acme.com")
    else {
        panic!("expected a description fetch");
    };
    assert!(w.description_fetched(generation));
    assert_eq!(w.organization.company_description, FETCHED_DESCRIPTION);

    w.finish_training();
    w.continue_setup();
    assert_eq!(w.step_number(), 3);

    let probe = RandomProbe;
    let mut attempts = 0;
    while w.integration.view != IntegrationView::Complete {
        attempts += 1;
        assert!(attempts < 200, "integration check never passed");
        w.integration.retry();
        let WizardAction::ScheduleIntegrationCheck { generation, .. } = w.run_check() else {
            panic!("expected a scheduled check");
        };
        w.integration_checked(generation, probe.passes());
    }
    assert_eq!(w.integration.test_result, TestResult::Success);
    assert_eq!(w.finish(), WizardAction::Complete);
}

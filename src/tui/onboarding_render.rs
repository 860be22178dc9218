//! Onboarding Wizard Rendering
//!
//! Render functions for each step of the onboarding wizard, plus the toast
//! stack and the feedback dialog.

use super::app::{App, Field};
use crate::onboarding::{
    IntegrationMode, IntegrationView, OnboardingWizard, PageStatus, RegistrationPhase,
    Severity, TestResult, TrainingStatus, WizardStep,
};
use crate::provider::Role;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Main color palette
const BRAND_BLUE: Color = Color::Rgb(70, 130, 180);
const BRAND_GOLD: Color = Color::Rgb(218, 165, 32);
const ACCENT_GOLD: Color = Color::Rgb(184, 134, 11);

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Rows taken by the navigation footer
const FOOTER_LINES: usize = 3;

/// Indent of chat message text, matching the "   You: " prefix
const CHAT_PREFIX_WIDTH: usize = 8;

/// Space left for the step content inside the wizard box
#[derive(Debug, Clone, Copy)]
struct Room {
    rows: usize,
    width: usize,
}

/// Render the whole screen
pub fn render(f: &mut Frame, app: &App) {
    render_onboarding(f, app);
    if app.wizard.integration.feedback.open {
        render_feedback_dialog(f, app);
    }
    render_toasts(f, app);
}

/// Render the onboarding wizard box
fn render_onboarding(f: &mut Frame, app: &App) {
    let area = f.area();
    let wizard = &app.wizard;
    let step = wizard.step();

    let mut lines: Vec<Line<'static>> = Vec::new();

    // Header
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        render_progress_dots(step),
        Style::default().fg(BRAND_BLUE),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        step.title().to_string(),
        Style::default().fg(BRAND_GOLD).add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(Span::styled(
        step.subtitle().to_string(),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));
    let header_end = lines.len();

    let box_width = 72u16.min(area.width.saturating_sub(4));
    let inner_width = box_width.saturating_sub(2) as usize;
    // Two rows of margin plus the borders
    let room = Room {
        rows: (area.height.saturating_sub(4) as usize).saturating_sub(header_end + FOOTER_LINES),
        width: inner_width,
    };

    match step {
        WizardStep::Registration => render_registration(&mut lines, app),
        WizardStep::Organization => render_organization(&mut lines, app),
        WizardStep::Integration => render_integration(&mut lines, app, room),
    }

    // Navigation footer
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(
            " [Esc] ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::styled("Back  ", Style::default().fg(Color::White)),
        Span::styled(
            "[Tab] ",
            Style::default().fg(BRAND_BLUE).add_modifier(Modifier::BOLD),
        ),
        Span::styled("Next Field  ", Style::default().fg(Color::White)),
        Span::styled(
            "[Enter] ",
            Style::default()
                .fg(ACCENT_GOLD)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("Confirm  ", Style::default().fg(Color::White)),
        Span::styled(
            "[Ctrl+C] ",
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD),
        ),
        Span::styled("Quit", Style::default().fg(Color::DarkGray)),
    ]));
    lines.push(Line::from(""));
    let footer_start = lines.len() - FOOTER_LINES;

    let lines = center_lines(lines, header_end, footer_start, inner_width);

    let content_height = (lines.len() as u16).saturating_add(2);
    let box_height = content_height.min(area.height.saturating_sub(2));
    let wizard_area = centered_rect(area, box_width, box_height);

    let title = format!(
        " Chatbot Setup ({}/{}) ",
        wizard.step_number(),
        WizardStep::ALL.len()
    );
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(BRAND_BLUE))
                .title(Span::styled(
                    title,
                    Style::default().fg(BRAND_BLUE).add_modifier(Modifier::BOLD),
                )),
        )
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, wizard_area);
}

/// Header and footer lines are centered one by one; the step content is
/// shifted as a block so its fields stay aligned with each other.
fn center_lines(
    lines: Vec<Line<'static>>,
    header_end: usize,
    footer_start: usize,
    inner_width: usize,
) -> Vec<Line<'static>> {
    let width = |line: &Line| line.spans.iter().map(|s| s.content.width()).sum::<usize>();

    let content_max_width = lines[header_end..footer_start]
        .iter()
        .map(width)
        .max()
        .unwrap_or(0);
    let content_pad = inner_width.saturating_sub(content_max_width) / 2;

    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let line_width = width(&line);
            if line_width == 0 {
                return line;
            }
            let pad = if i < header_end || i >= footer_start {
                inner_width.saturating_sub(line_width) / 2
            } else {
                content_pad
            };
            if pad == 0 {
                return line;
            }
            let mut spans = vec![Span::raw(" ".repeat(pad))];
            spans.extend(line.spans);
            Line::from(spans)
        })
        .collect()
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .flex(Flex::Center)
        .constraints([Constraint::Length(height)])
        .split(area);
    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .flex(Flex::Center)
        .constraints([Constraint::Length(width)])
        .split(v_chunks[0]);
    h_chunks[0]
}

/// Render progress dots (filled for completed, hollow for remaining)
fn render_progress_dots(step: WizardStep) -> String {
    WizardStep::ALL
        .iter()
        .map(|s| if s.index() <= step.index() { "●" } else { "○" })
        .collect::<Vec<_>>()
        .join(" ")
}

// --- Widgets ---

fn text_field(
    lines: &mut Vec<Line<'static>>,
    app: &App,
    field: Field,
    value: &str,
    masked: bool,
) {
    let focused = app.focused == field;
    let shown = if masked {
        "*".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    let cursor = if focused { "█" } else { "" };
    lines.push(Line::from(vec![
        Span::styled(
            format!("  {}: ", field.label()),
            Style::default().fg(if focused { BRAND_BLUE } else { Color::DarkGray }),
        ),
        Span::styled(
            format!("{}{}", shown, cursor),
            Style::default().fg(if focused { Color::White } else { Color::Gray }),
        ),
    ]));
}

fn button(lines: &mut Vec<Line<'static>>, app: &App, field: Field) {
    button_with(lines, app, field, true);
}

/// A button that may be drawn dimmed while its action would be refused
fn button_with(lines: &mut Vec<Line<'static>>, app: &App, field: Field, enabled: bool) {
    let focused = app.focused == field;
    let color = match (focused, enabled) {
        (true, true) => Color::White,
        (true, false) => Color::Gray,
        (false, _) => Color::DarkGray,
    };
    lines.push(Line::from(vec![
        Span::styled(
            if focused { " > " } else { "   " },
            Style::default().fg(ACCENT_GOLD),
        ),
        Span::styled(
            format!("[ {} ]", field.label()),
            Style::default().fg(color).add_modifier(if focused {
                Modifier::BOLD
            } else {
                Modifier::empty()
            }),
        ),
    ]));
}

fn hint(lines: &mut Vec<Line<'static>>, text: impl Into<String>) {
    lines.push(Line::from(Span::styled(
        text.into(),
        Style::default().fg(Color::DarkGray),
    )));
}

fn spinner(app: &App) -> &'static str {
    SPINNER[app.animation_frame % SPINNER.len()]
}

// --- Individual step renderers ---

fn render_registration(lines: &mut Vec<Line<'static>>, app: &App) {
    let reg = &app.wizard.registration;
    match reg.phase {
        RegistrationPhase::Collecting => {
            text_field(lines, app, Field::Name, &reg.name, false);
            text_field(lines, app, Field::Email, &reg.email, false);
            text_field(lines, app, Field::Password, &reg.password, true);
            lines.push(Line::from(""));
            button(lines, app, Field::CreateAccount);
            lines.push(Line::from(""));
            hint(lines, "  ─── or ───");
            if reg.alternate_login_pending() {
                hint(lines, format!("   {} Signing in with Google...", spinner(app)));
            } else {
                button(lines, app, Field::GoogleLogin);
            }
        }
        RegistrationPhase::Verifying => {
            hint(lines, format!("  We sent a verification code to {}", reg.email));
            lines.push(Line::from(""));
            text_field(lines, app, Field::Code, &reg.verification_code, false);
            lines.push(Line::from(""));
            button(lines, app, Field::Verify);
            button(lines, app, Field::BackToRegistration);
        }
    }
}

fn render_organization(lines: &mut Vec<Line<'static>>, app: &App) {
    let org = &app.wizard.organization;
    text_field(lines, app, Field::CompanyName, &org.company_name, false);
    text_field(lines, app, Field::CompanyUrl, org.company_url(), false);
    text_field(
        lines,
        app,
        Field::CompanyDescription,
        &org.company_description,
        false,
    );
    if org.is_loading() {
        hint(lines, format!("  {} Fetching meta description...", spinner(app)));
    }
    lines.push(Line::from(""));

    let pages_focused = app.focused == Field::Pages;
    lines.push(Line::from(Span::styled(
        "  Detected Pages",
        Style::default()
            .fg(if pages_focused { BRAND_BLUE } else { Color::Gray })
            .add_modifier(Modifier::BOLD),
    )));
    for (i, page) in org.pages().iter().enumerate() {
        let selected = org.selected_index() == Some(i);
        let status_color = match page.status {
            PageStatus::Scraped => Color::Green,
            PageStatus::Pending => BRAND_GOLD,
            PageStatus::Detected => Color::DarkGray,
        };
        lines.push(Line::from(vec![
            Span::styled(
                if selected && pages_focused { " > " } else { "   " },
                Style::default().fg(ACCENT_GOLD),
            ),
            Span::styled(
                format!("{:<12}", page.url),
                Style::default().fg(if selected { Color::White } else { Color::Gray }),
            ),
            Span::styled(
                format!("[{}]", page.status.label()),
                Style::default().fg(status_color),
            ),
        ]));
    }
    let chunks = org.selected_chunks();
    if !chunks.is_empty() {
        lines.push(Line::from(""));
        for chunk in chunks {
            hint(lines, format!("     \"{}\"", chunk));
        }
    }
    lines.push(Line::from(""));

    match org.training() {
        TrainingStatus::InProgress => {
            hint(lines, format!("  {} Training your chatbot...", spinner(app)));
            button(lines, app, Field::FinishTraining);
        }
        TrainingStatus::Complete => {
            lines.push(Line::from(Span::styled(
                "  ✓ Training complete",
                Style::default().fg(Color::Green),
            )));
            button(lines, app, Field::FinishTraining);
        }
    }
    button_with(
        lines,
        app,
        Field::ContinueSetup,
        org.training() == TrainingStatus::Complete,
    );
    button(lines, app, Field::Back);
}

fn render_integration(lines: &mut Vec<Line<'static>>, app: &App, room: Room) {
    let integration = &app.wizard.integration;
    match integration.view {
        IntegrationView::Complete => render_success(lines, app),
        IntegrationView::TestChat => render_test_chat(lines, app, room),
        IntegrationView::Main => {
            match integration.mode {
                IntegrationMode::Options => {
                    button(lines, app, Field::OpenTestChat);
                    button(lines, app, Field::Integrate);
                    button(lines, app, Field::RunCheck);
                }
                IntegrationMode::Integrate => {
                    hint(lines, "  Paste this into the <head> of your website:");
                    lines.push(Line::from(Span::styled(
                        format!("    {}", integration.embed_snippet()),
                        Style::default().fg(BRAND_GOLD),
                    )));
                    lines.push(Line::from(""));
                    hint(lines, "  Or mail the instructions to your developer:");
                    text_field(
                        lines,
                        app,
                        Field::DeveloperEmail,
                        &integration.developer_email,
                        false,
                    );
                    button(lines, app, Field::SendInstructions);
                    button(lines, app, Field::BackToOptions);
                }
            }

            if integration.is_checking() {
                lines.push(Line::from(""));
                hint(lines, format!("  {} Testing integration...", spinner(app)));
            } else if integration.test_result == TestResult::Failure {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "  ✗ Integration not detected",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )));
                hint(lines, "  We couldn't find the chatbot on your website.");
                button(lines, app, Field::Retry);
                button(lines, app, Field::ReportIssue);
            }

            if integration.mode == IntegrationMode::Options {
                lines.push(Line::from(""));
                button(lines, app, Field::Back);
            }
        }
    }
}

/// The chat log keeps its newest rows in view; older ones scroll off the top
fn render_test_chat(lines: &mut Vec<Line<'static>>, app: &App, room: Room) {
    let Some(chat) = app.wizard.integration.chat() else {
        return;
    };
    hint(lines, "  Your website (preview)");
    lines.push(Line::from(""));
    button(lines, app, Field::ToggleChat);

    if chat.open {
        let text_width = room.width.saturating_sub(CHAT_PREFIX_WIDTH + 1);
        let mut log: Vec<Line<'static>> = Vec::new();
        for message in chat.messages() {
            let (who, color) = match message.role {
                Role::User => ("You", BRAND_BLUE),
                Role::Assistant => ("Bot", BRAND_GOLD),
            };
            for (i, row) in wrap_columns(&message.content, text_width).into_iter().enumerate() {
                let prefix = if i == 0 {
                    Span::styled(
                        format!("   {}: ", who),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::raw(" ".repeat(CHAT_PREFIX_WIDTH))
                };
                log.push(Line::from(vec![
                    prefix,
                    Span::styled(row, Style::default().fg(Color::White)),
                ]));
            }
        }

        // toggle, header and the input/send/report/close block around the log
        let fixed = 9 + usize::from(chat.is_pending());
        let log_rows = room.rows.saturating_sub(fixed);
        if log.len() > log_rows {
            let shown = log_rows.saturating_sub(1);
            let hidden = log.len() - shown;
            hint(lines, format!("   ({} earlier lines)", hidden));
            lines.extend(log.drain(hidden..));
        } else {
            lines.extend(log);
        }

        if chat.is_pending() {
            hint(lines, format!("   Bot: {}", spinner(app)));
        }
        lines.push(Line::from(""));
        text_field(lines, app, Field::ChatInput, &chat.input, false);
        button_with(lines, app, Field::ChatSend, !chat.is_pending());
    }

    lines.push(Line::from(""));
    button(lines, app, Field::ReportIssue);
    button(lines, app, Field::CloseChat);
}

/// Break `text` into rows at most `width` columns wide, preferring spaces
fn wrap_columns(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    for paragraph in text.split('\n') {
        let mut row = String::new();
        let mut used = 0;
        for word in paragraph.split(' ') {
            let word_width = word.width();
            let gap = usize::from(!row.is_empty());
            if used + gap + word_width <= width {
                if gap == 1 {
                    row.push(' ');
                }
                row.push_str(word);
                used += gap + word_width;
                continue;
            }
            if !row.is_empty() {
                rows.push(std::mem::take(&mut row));
                used = 0;
            }
            for ch in word.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if used + ch_width > width && used > 0 {
                    rows.push(std::mem::take(&mut row));
                    used = 0;
                }
                row.push(ch);
                used += ch_width;
            }
        }
        rows.push(row);
    }
    rows
}

fn render_success(lines: &mut Vec<Line<'static>>, app: &App) {
    lines.push(Line::from(Span::styled(
        "  Integration Successful!",
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    )));
    hint(lines, "  Your chatbot is now ready to use.");
    lines.push(Line::from(""));
    button(lines, app, Field::ExploreAdmin);
    button(lines, app, Field::StartTalking);
}

fn render_feedback_dialog(f: &mut Frame, app: &App) {
    let mut lines: Vec<Line<'static>> = Vec::new();
    hint(&mut lines, " Tell us what went wrong.");
    lines.push(Line::from(""));
    text_field(
        &mut lines,
        app,
        Field::FeedbackText,
        &app.wizard.integration.feedback.text,
        false,
    );
    lines.push(Line::from(""));
    button(&mut lines, app, Field::SubmitFeedback);
    button(&mut lines, app, Field::CancelFeedback);

    let area = f.area();
    let width = 56u16.min(area.width.saturating_sub(4));
    let height = (lines.len() as u16 + 2).min(area.height);
    let dialog = centered_rect(area, width, height);
    f.render_widget(Clear, dialog);
    f.render_widget(
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(BRAND_GOLD))
                    .title(Span::styled(
                        " Report an Issue ",
                        Style::default().fg(BRAND_GOLD).add_modifier(Modifier::BOLD),
                    )),
            )
            .wrap(Wrap { trim: false }),
        dialog,
    );
}

/// Newest toasts stacked in the top-right corner
fn render_toasts(f: &mut Frame, app: &App) {
    let area = f.area();
    let width = 44u16.min(area.width);
    let mut y = area.y;
    for notice in visible_toasts(&app.wizard, app.max_visible_toasts) {
        let color = match notice.severity {
            Severity::Info => BRAND_BLUE,
            Severity::Success => Color::Green,
            Severity::Error => Color::Red,
        };
        let mut lines = vec![Line::from(Span::styled(
            notice.title.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))];
        if let Some(description) = &notice.description {
            lines.push(Line::from(Span::styled(
                description.clone(),
                Style::default().fg(Color::Gray),
            )));
        }
        let height = lines.len() as u16 + 2;
        if y + height > area.bottom() {
            break;
        }
        let rect = Rect::new(area.right().saturating_sub(width), y, width, height);
        f.render_widget(Clear, rect);
        f.render_widget(
            Paragraph::new(lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(color)),
                )
                .wrap(Wrap { trim: true }),
            rect,
        );
        y += height;
    }
}

/// Newest first
fn visible_toasts(
    wizard: &OnboardingWizard,
    limit: usize,
) -> Vec<&crate::onboarding::Notice> {
    let mut notices: Vec<_> = wizard.toasts.visible(limit).collect();
    notices.reverse();
    notices
}

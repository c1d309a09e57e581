use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::actions::{ActionKind, Control};
use crate::form::{FormEntry, FormModel};
use crate::npm::NpmSession;
use crate::state::AppState;
use crate::ui::Theme;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let theme = Theme::new();
    let form = match &state.form {
        Some(form) => form,
        None => return,
    };

    let npm_active =
        form.kind() == ActionKind::NginxProxyManager && form.active_group() == Some("api");

    let columns = if npm_active {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area)
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(100)])
            .split(area)
    };

    render_fields(frame, columns[0], form, &theme);
    if npm_active {
        render_npm_panel(frame, columns[1], state, form, &theme);
    }
}

fn render_fields(frame: &mut Frame, area: Rect, form: &FormModel, theme: &Theme) {
    let mut lines: Vec<Line> = Vec::new();

    for (idx, entry) in form.entries().into_iter().enumerate() {
        let focused = idx == form.cursor();
        let marker = if focused { "▸ " } else { "  " };
        let label_style = if focused {
            theme.focus_style()
        } else {
            theme.primary_style()
        };

        let (label, value) = match entry {
            FormEntry::Kind => (
                "Action kind".to_string(),
                format!("◂ {} ▸", form.kind().label()),
            ),
            FormEntry::Name => ("Name".to_string(), form.name().to_string()),
            FormEntry::Enabled => (
                "Enabled".to_string(),
                if form.enabled() { "[x]" } else { "[ ]" }.to_string(),
            ),
            FormEntry::Field(spec) => {
                let raw = form.value(spec.id);
                let display = match spec.control {
                    Control::Checkbox => {
                        if form.values().flag(spec.id) { "[x]" } else { "[ ]" }.to_string()
                    }
                    Control::Secret => "•".repeat(raw.chars().count()),
                    Control::Select(_) | Control::Choice(_) => format!("◂ {} ▸", raw),
                    _ => raw.to_string(),
                };
                let label = if spec.required {
                    format!("{} *", spec.label)
                } else {
                    spec.label.to_string()
                };
                (label, display)
            }
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{}{:<24}", marker, label), label_style),
            Span::raw(value),
        ]));
    }

    lines.push(Line::default());
    if let Some(error) = &form.error {
        lines.push(Line::styled(format!("✗ {}", error), theme.error_style()));
    } else if form.saving {
        lines.push(Line::styled("Saving...", theme.warning_style()));
    }

    let mode = if form.is_edit() { "Edit action" } else { "Add action" };
    let dirty = if form.is_dirty() { " *" } else { "" };
    let title = format!("{}{} - [Enter]save [Esc]close", mode, dirty);

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_npm_panel(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    form: &FormModel,
    theme: &Theme,
) {
    let session = &state.npm_session;
    let mut lines: Vec<Line> = Vec::new();

    let status_style = match session {
        NpmSession::Unreachable(_) | NpmSession::TokenInvalid => theme.error_style(),
        NpmSession::TokenValid { .. } | NpmSession::Certificates(_) => theme.success_style(),
        _ => theme.warning_style(),
    };
    lines.push(Line::styled(session.status_line(), status_style));
    lines.push(Line::default());

    match session {
        NpmSession::Certificates(certificates) => {
            let selected_id: Option<u64> = form.value("certificateId").parse().ok();
            lines.push(Line::styled(
                "Certificates (◂ ▸ on the certificate field to pick):",
                theme.primary_style(),
            ));
            for cert in certificates {
                let marker = if Some(cert.id) == selected_id { "● " } else { "  " };
                let line = format!("{}{} (#{})", marker, cert.display_name(), cert.id);
                if Some(cert.id) == selected_id {
                    lines.push(Line::styled(line, theme.selected_style()));
                } else {
                    lines.push(Line::raw(line));
                }
            }

            // Preview panel for the picked certificate.
            if let Some(cert) = certificates.iter().find(|c| Some(c.id) == selected_id) {
                lines.push(Line::default());
                lines.push(Line::styled("Selected certificate", theme.title_style()));
                lines.push(Line::raw(format!(
                    "  Domains: {}",
                    cert.domain_names.join(", ")
                )));
                if let Some(expires) = &cert.expires_on {
                    lines.push(Line::raw(format!("  Expires: {}", expires)));
                }
            }
        }
        NpmSession::TokenInvalid => {
            lines.push(Line::raw("The stored token was rejected."));
            lines.push(Line::raw("Press Ctrl-R to request a new one."));
        }
        NpmSession::Idle | NpmSession::Unreachable(_) => {
            lines.push(Line::raw("Press Ctrl-T to test the connection."));
        }
        _ => {}
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Nginx Proxy Manager - [Ctrl-T]est [Ctrl-R]equest token"),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::state::{ConfirmDialog, ResultsView, TokenField, TokenPrompt};
use crate::ui::Theme;

/// Centred overlay rectangle, percentage-sized.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

pub fn render_confirm(frame: &mut Frame, area: Rect, dialog: &ConfirmDialog) {
    let theme = Theme::new();
    let rect = centered_rect(50, 25, area);
    frame.render_widget(Clear, rect);

    let lines = vec![
        Line::raw(dialog.message.clone()),
        Line::default(),
        Line::styled("[y] confirm    [n] cancel", theme.muted_style()),
    ];
    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(dialog.title.clone())
                .title_style(theme.warning_style()),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, rect);
}

pub fn render_token_prompt(frame: &mut Frame, area: Rect, prompt: &TokenPrompt) {
    let theme = Theme::new();
    let rect = centered_rect(50, 30, area);
    frame.render_widget(Clear, rect);

    let field_line = |label: &str, value: String, focused: bool| {
        let style = if focused {
            theme.focus_style()
        } else {
            theme.primary_style()
        };
        Line::from(vec![
            Span::styled(format!("{:<12}", label), style),
            Span::raw(value),
        ])
    };

    let lines = vec![
        Line::raw("Credentials are sent once and not stored."),
        Line::default(),
        field_line(
            "Email",
            prompt.email.clone(),
            prompt.focus == TokenField::Email,
        ),
        field_line(
            "Password",
            "•".repeat(prompt.password.chars().count()),
            prompt.focus == TokenField::Password,
        ),
        Line::default(),
        Line::styled("[Enter] request    [Tab] switch    [Esc] cancel", theme.muted_style()),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Request NPM token"),
    );
    frame.render_widget(paragraph, rect);
}

pub fn render_results(frame: &mut Frame, area: Rect, results: &ResultsView, scroll: usize) {
    let theme = Theme::new();
    let rect = centered_rect(70, 60, area);
    frame.render_widget(Clear, rect);

    let (title, mut lines) = match results {
        ResultsView::Test { index, name, outcome } => {
            let mut lines = vec![Line::from(vec![
                Span::styled(
                    if outcome.success { "✓ passed " } else { "✗ failed " },
                    if outcome.success {
                        theme.success_style()
                    } else {
                        theme.error_style()
                    },
                ),
                Span::raw(format!("#{} {}", index, name)),
            ])];
            if let Some(message) = &outcome.message {
                lines.push(Line::raw(message.clone()));
            }
            if let Some(result) = &outcome.result {
                lines.push(Line::default());
                let pretty =
                    serde_json::to_string_pretty(result).unwrap_or_else(|_| result.to_string());
                for text_line in pretty.lines() {
                    lines.push(Line::raw(text_line.to_string()));
                }
            }
            ("Test result".to_string(), lines)
        }
        ResultsView::Execute(report) => {
            let mut lines = vec![Line::styled(
                format!(
                    "Successfully executed {} of {} actions",
                    report.actions_succeeded, report.actions_executed
                ),
                if report.actions_succeeded == report.actions_executed {
                    theme.success_style()
                } else {
                    theme.warning_style()
                },
            )];
            lines.push(Line::default());
            for (idx, result) in report.results.iter().enumerate() {
                let marker = if result.success { "✓" } else { "✗" };
                let style = if result.success {
                    theme.success_style()
                } else {
                    theme.error_style()
                };
                let name = result
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("action {}", idx));
                let mut text = format!("{} {}", marker, name);
                if let Some(message) = &result.message {
                    text.push_str(&format!(" - {}", message));
                }
                lines.push(Line::styled(text, style));
            }
            ("Execution report".to_string(), lines)
        }
    };

    lines.push(Line::default());
    lines.push(Line::styled("[Esc] close    [↑↓] scroll", theme.muted_style()));

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .scroll((scroll as u16, 0))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, rect);
}

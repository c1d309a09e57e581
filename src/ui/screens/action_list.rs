use ratatui::{
    layout::{Constraint, Rect},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use crate::actions::describe;
use crate::state::AppState;
use crate::ui::Theme;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let theme = Theme::new();

    if state.actions.is_empty() {
        let title = if state.loading {
            "Deployment actions - loading..."
        } else {
            "Deployment actions - none configured - [a]dd [r]efresh"
        };
        let block = Block::default().borders(Borders::ALL).title(title);
        frame.render_widget(block, area);
        return;
    }

    let selected_index = state.selection.list_index;
    let moving = state.selection.is_moving();

    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from("On"),
        Cell::from("Name"),
        Cell::from("Kind"),
        Cell::from("Details"),
    ])
    .style(theme.title_style())
    .height(1);

    let rows: Vec<Row> = state
        .actions
        .iter()
        .enumerate()
        .map(|(idx, action)| {
            let marker = if action.enabled { "✓" } else { " " };
            let position = if moving && idx == selected_index {
                format!("{}↕", idx)
            } else {
                idx.to_string()
            };

            let row = Row::new(vec![
                Cell::from(position),
                Cell::from(marker),
                Cell::from(action.name.clone()),
                Cell::from(action.kind().as_str()).style(theme.badge_style()),
                Cell::from(describe(&action.params)),
            ]);

            if idx == selected_index {
                row.style(theme.selected_style())
            } else if !action.enabled {
                row.style(theme.muted_style())
            } else {
                row
            }
        })
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Percentage(30),
        Constraint::Length(20),
        Constraint::Percentage(50),
    ];

    let title = if moving {
        "Deployment actions - MOVING - [↑↓]position [Enter]drop [Esc]cancel"
    } else {
        "Deployment actions - [a]dd [e]dit [d]elete [t]est [x]execute [Space]toggle [m]ove [r]efresh"
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(theme.selected_style());

    frame.render_widget(table, area);
}

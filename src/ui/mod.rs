pub mod components;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode, ModalState};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(1),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(f.area());

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            "User Dashboard",
            Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "View and manage all user profiles in one place.",
            Style::default().fg(app.theme.muted),
        )),
    ])
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(header, root[0]);

    let searching = app.input_mode == InputMode::Search;
    let (text, style) = if app.search_query.is_empty() && !searching {
        ("Search users by name... (/)".to_string(), Style::default().fg(app.theme.muted))
    } else {
        let cursor = if searching { "▏" } else { "" };
        (format!("{}{}", app.search_query, cursor), Style::default().fg(app.theme.text))
    };
    let border = if searching { app.theme.highlight_fg } else { app.theme.border };
    let search = Paragraph::new(text).style(style).block(
        Block::default()
            .title("Search")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(search, root[1]);

    users::render_user_cards(f, root[2], app);
    components::render_pager(f, root[3], app);
    components::render_status_bar(f, root[4], app);

    if let Some(state) = app.modal.clone() {
        render_modal(f, app, &state);
    }
    components::render_toasts(f, f.area(), app);
}

fn render_modal(f: &mut Frame, app: &AppState, state: &ModalState) {
    let area = f.area();
    match state {
        ModalState::AddUser(form) => users::render_add_user_form(f, area, app, form),
        ModalState::DeleteConfirm { id, name, selected } => {
            users::render_delete_confirm(f, area, app, *id, name, *selected)
        }
        ModalState::Details { user } => users::render_user_details(f, area, app, user),
        ModalState::Info { message } => components::render_info_modal(f, area, app, message),
        ModalState::Help => components::render_help_modal(f, area, app),
    }
}

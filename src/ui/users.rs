use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::{AppState, FORM_FIELDS, UserForm};
use crate::model::{User, UserId};
use crate::ui::components::centered_rect;

const CARD_HEIGHT: u16 = 7;
const CARD_MIN_WIDTH: u16 = 36;
const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Render the current page as a grid of cards, or the loading / empty states.
pub fn render_user_cards(f: &mut Frame, area: Rect, app: &AppState) {
    if !app.loaded_once && app.controller.is_loading() {
        let frame = SPINNER[(app.tick / 2) as usize % SPINNER.len()];
        let p = Paragraph::new(format!("{frame} Loading users..."))
            .style(Style::default().fg(app.theme.muted))
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(app.theme.border)));
        f.render_widget(p, area);
        return;
    }

    let page = app.current_page();
    if page.no_results() {
        let p = Paragraph::new(vec![
            Line::raw(""),
            Line::from(Span::styled("No users found", Style::default().add_modifier(Modifier::BOLD))),
            Line::from(Span::styled("Try adjusting your search term", Style::default().fg(app.theme.muted))),
        ])
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(app.theme.border)));
        f.render_widget(p, area);
        return;
    }

    let cols = (area.width / CARD_MIN_WIDTH).clamp(1, 3) as usize;
    let rows = page.items.len().div_ceil(cols);
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CARD_HEIGHT); rows])
        .split(area);

    for (r, row_area) in row_areas.iter().enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, cols as u32); cols])
            .split(*row_area);
        for (c, cell) in cells.iter().enumerate() {
            let idx = r * cols + c;
            if let Some(user) = page.items.get(idx) {
                render_card(f, *cell, app, user, idx == app.selected);
            }
        }
    }
}

fn render_card(f: &mut Frame, area: Rect, app: &AppState, user: &User, selected: bool) {
    let deleting = app.controller.is_deleting(user.id);
    let border = if selected { app.theme.highlight_fg } else { app.theme.border };
    let mut title = vec![
        Span::styled(format!(" {} ", user.initials()), Style::default().fg(app.theme.title).add_modifier(Modifier::REVERSED)),
        Span::raw(" "),
        Span::styled(user.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
    ];
    if deleting {
        title.push(Span::styled(" deleting...", Style::default().fg(app.theme.error)));
    }

    let muted = Style::default().fg(app.theme.muted);
    let lines = vec![
        Line::from(Span::styled(format!("@{}", user.username), muted)),
        Line::from(format!("✉ {}", user.email)),
        Line::from(format!("☎ {}", user.phone)),
        Line::from(format!("⌂ {}", user.website)),
    ];
    let p = Paragraph::new(lines).style(Style::default().fg(app.theme.text)).block(
        Block::default()
            .title(Line::from(title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(p, area);
}

pub fn render_user_details(f: &mut Frame, area: Rect, app: &AppState, user: &User) {
    let rect = centered_rect(60, 18, area);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let a = &user.address;
    let mut lines = vec![
        Line::from(Span::styled(format!("@{}", user.username), Style::default().fg(app.theme.muted))),
        Line::raw(""),
        Line::from(Span::styled("Contact Information", bold)),
        Line::from(format!("  ✉ {}", user.email)),
        Line::from(format!("  ☎ {}", user.phone)),
        Line::from(format!("  ⌂ https://{}", user.website)),
        Line::raw(""),
        Line::from(Span::styled("Address", bold)),
        Line::from(format!("  {}, {}", a.street, a.suite)),
        Line::from(format!("  {}, {}", a.city, a.zipcode)),
        Line::raw(""),
        Line::from(Span::styled("Company", bold)),
        Line::from(format!("  {}", user.company.name)),
        Line::from(Span::styled(format!("  {}", user.company.catch_phrase), Style::default().fg(app.theme.muted))),
    ];
    let hint = if app.controller.is_fetching(user.id) { "refreshing..." } else { "r: refresh  Esc: close" };
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(hint, Style::default().fg(app.theme.muted))));

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(user.name.clone())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

pub fn render_add_user_form(f: &mut Frame, area: Rect, app: &AppState, form: &UserForm) {
    let rect = centered_rect(60, 14, area);
    let mut lines: Vec<Line> = Vec::with_capacity(FORM_FIELDS.len() + 4);
    for (idx, label) in FORM_FIELDS.iter().enumerate() {
        let marker = if idx == form.selected { "▶" } else { " " };
        let style = if idx == form.selected {
            Style::default().fg(app.theme.highlight_fg)
        } else {
            Style::default().fg(app.theme.text)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker} {label:<13}"), style),
            Span::raw(form.values[idx].clone()),
        ]));
    }
    lines.push(Line::raw(""));
    if let Some(err) = &form.error {
        lines.push(Line::from(Span::styled(err.clone(), Style::default().fg(app.theme.error))));
    }
    let submit = if app.controller.is_creating() {
        "Creating..."
    } else {
        "Enter on last field: Create User   Tab/↑/↓: move   Esc: cancel"
    };
    lines.push(Line::from(Span::styled(submit, Style::default().fg(app.theme.muted))));

    let p = Paragraph::new(lines).block(
        Block::default()
            .title("Add New User")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

pub fn render_delete_confirm(f: &mut Frame, area: Rect, app: &AppState, id: UserId, name: &str, selected: usize) {
    let rect = centered_rect(50, 7, area);
    let yes = if selected == 0 { "[Yes]" } else { " Yes " };
    let no = if selected == 1 { "[No]" } else { " No " };
    let body = format!("Delete user '{name}' (id {id})?\n\n  {yes}    {no}");
    let p = Paragraph::new(body).block(
        Block::default()
            .title("Confirm delete")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

//! Shared UI components (pager, status bar, toasts, modal helpers).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode, ToastKind};
use crate::pagination::{self, PageMarker};

/// Render the compact pager: `‹ 1 ... 4 [5] 6 ... 10 ›`. Hidden for a single page.
pub fn render_pager(f: &mut Frame, area: Rect, app: &AppState) {
    let page = app.current_page();
    if page.no_results() || !pagination::pager_visible(page.total_pages) {
        return;
    }

    let enabled = Style::default().fg(app.theme.text);
    let disabled = Style::default().fg(app.theme.muted);
    let current = Style::default()
        .fg(app.theme.highlight_fg)
        .add_modifier(Modifier::BOLD | Modifier::REVERSED);

    let prev = if pagination::has_previous(page.page) { enabled } else { disabled };
    let next = if pagination::has_next(page.page, page.total_pages) { enabled } else { disabled };

    let mut spans = vec![Span::styled("‹ ", prev)];
    for marker in pagination::page_numbers_with_ellipsis(page.page, page.total_pages) {
        let style = match marker {
            PageMarker::Page(n) if n == page.page => current,
            PageMarker::Page(_) => enabled,
            PageMarker::Ellipsis => disabled,
        };
        spans.push(Span::styled(format!(" {marker} "), style));
    }
    spans.push(Span::styled(" ›", next));

    let p = Paragraph::new(Line::from(spans)).alignment(ratatui::layout::Alignment::Center);
    f.render_widget(p, area);
}

/// Render the bottom status bar with mode and counts.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Modal => "MODAL",
    };
    let page = app.current_page();
    let mut msg = format!(
        "mode: {mode}  users:{}  matches:{}  page:{}/{}  per page:{}",
        app.controller.len(),
        page.filtered_len,
        if page.no_results() { 0 } else { page.page },
        page.display_total_pages(),
        app.page_size.get(),
    );
    if app.controller.is_loading() {
        msg.push_str("  loading...");
    }
    msg.push_str("  ?: help");
    let p = Paragraph::new(msg).style(Style::default().fg(app.theme.status_fg).bg(app.theme.status_bg));
    f.render_widget(p, area);
}

/// Stack live toasts in the top-right corner, newest at the bottom.
pub fn render_toasts(f: &mut Frame, area: Rect, app: &AppState) {
    let width = 44u16.min(area.width);
    let mut y = area.y + 1;
    for toast in app.toasts.iter().rev().take(3).collect::<Vec<_>>().into_iter().rev() {
        let height = 4u16;
        if y + height > area.y + area.height {
            break;
        }
        let rect = Rect {
            x: area.x + area.width.saturating_sub(width + 1),
            y,
            width,
            height,
        };
        let color = match toast.kind {
            ToastKind::Success => app.theme.success,
            ToastKind::Error => app.theme.error,
        };
        let p = Paragraph::new(toast.message.clone()).wrap(Wrap { trim: true }).block(
            Block::default()
                .title(Span::styled(toast.title, Style::default().fg(color).add_modifier(Modifier::BOLD)))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
        y += height;
    }
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render a generic informational modal dialog.
pub fn render_info_modal(f: &mut Frame, area: Rect, app: &AppState, message: &str) {
    let max_w = area.width.saturating_sub(6).max(30);
    let min_w = 40u16.min(max_w);
    let approx_lines = (message.len() as u16 / (min_w.saturating_sub(4).max(10))).max(1);
    let max_h = area.height.saturating_sub(6).max(5);
    let height = (approx_lines + 4).min(max_h).max(5);
    let rect = centered_rect(min_w, height, area);
    let p = Paragraph::new(message.to_string()).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Info")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Render the help modal listing the active keybindings.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let width = 64u16.min(area.width.saturating_sub(4)).max(40);
    let height = 22u16.min(area.height.saturating_sub(2)).max(10);
    let rect = centered_rect(width, height, area);

    let rows: [(&str, KeyAction); 13] = [
        ("Search", KeyAction::StartSearch),
        ("New user", KeyAction::NewUser),
        ("Delete user", KeyAction::DeleteSelection),
        ("Details", KeyAction::EnterAction),
        ("Reload", KeyAction::Reload),
        ("Move up", KeyAction::MoveUp),
        ("Move down", KeyAction::MoveDown),
        ("Previous page", KeyAction::PrevPage),
        ("Next page", KeyAction::NextPage),
        ("First page", KeyAction::FirstPage),
        ("Last page", KeyAction::LastPage),
        ("Help", KeyAction::OpenHelp),
        ("Quit", KeyAction::Quit),
    ];

    let mut lines = vec![
        Line::from(Span::styled("Keybindings", Style::default().add_modifier(Modifier::BOLD))),
        Line::raw(""),
    ];
    for (label, action) in rows {
        lines.push(Line::from(vec![
            Span::raw(format!("  {label:>14} │ ")),
            Span::styled(app.keymap.keys_for(action).join(", "), Style::default().add_modifier(Modifier::ITALIC)),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Search filters by name as you type; Enter keeps it, Esc clears it.",
        Style::default().fg(app.theme.muted),
    )));

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

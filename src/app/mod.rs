//! Application state types and entry glue.
//!
//! Defines the state the TUI renders from, the modal dialogs, toasts and the
//! events network tasks send back, plus helpers to locate config files and to
//! run the application loop (re-exported as `run`).
//!
pub mod keymap;
pub mod settings;
pub mod update;

use ratatui::style::Color;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::controller::ListController;
use crate::error::ServiceResult;
use crate::model::{NewUser, User, UserId};
use crate::pagination::{self, Page, PageSize};
use crate::search::filter_by_name;

use keymap::Keymap;

/// Directory name used under the user's config dir.
pub const APP_NAME: &str = "user-dashboard";

/// How long a toast stays on screen.
pub const TOAST_TTL: Duration = Duration::from_secs(4);

/// Config directory: `$XDG_CONFIG_HOME/user-dashboard` or `~/.config/user-dashboard`.
pub fn config_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(xdg).join(APP_NAME));
    }
    std::env::var_os("HOME")
        .filter(|v| !v.is_empty())
        .map(|home| PathBuf::from(home).join(".config").join(APP_NAME))
}

/// Where a config file named `name` should be written. Falls back to the
/// working directory when no config dir can be created.
pub fn config_file_write_path(name: &str) -> String {
    if let Some(dir) = config_dir() {
        if std::fs::create_dir_all(&dir).is_ok() {
            return dir.join(name).to_string_lossy().into_owned();
        }
    }
    name.to_string()
}

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Modal,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub success: Color,
    pub error: Color,
}

impl Theme {
    /// Dark default theme.
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
            success: Color::Green,
            error: Color::Red,
        }
    }

    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            success: Color::Rgb(0xa6, 0xe3, 0xa1),      // green
            error: Color::Rgb(0xf3, 0x8b, 0xa8),        // red
        }
    }

    /// Named palette, as selected by `base = <name>` in `theme.conf`.
    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "mocha" => Some(Self::mocha()),
            "dark" => Some(Self::dark()),
            _ => None,
        }
    }

    /// Load theme from a simple key=value file.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    /// Parse theme text. `base` picks the palette missing keys fall back to
    /// (`mocha` when absent or unknown); color keys override it.
    pub fn parse(contents: &str) -> Self {
        let entries: Vec<(&str, &str)> = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| line.split_once('='))
            .map(|(k, v)| (k.trim(), v.trim()))
            .collect();

        let mut theme = entries
            .iter()
            .find(|(key, _)| *key == "base")
            .and_then(|(_, val)| Self::by_name(val))
            .unwrap_or_else(Self::mocha);

        for (key, val) in entries {
            if let Some(color) = Self::parse_color(val) {
                match key {
                    "text" => theme.text = color,
                    "muted" => theme.muted = color,
                    "title" => theme.title = color,
                    "border" => theme.border = color,
                    "header_bg" => theme.header_bg = color,
                    "header_fg" => theme.header_fg = color,
                    "status_bg" => theme.status_bg = color,
                    "status_fg" => theme.status_fg = color,
                    "highlight_fg" => theme.highlight_fg = color,
                    "highlight_bg" => theme.highlight_bg = color,
                    "success" => theme.success = color,
                    "error" => theme.error = color,
                    _ => {}
                }
            }
        }

        theme
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB") or "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(&lower);
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# user-dashboard theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n");
        buf.push_str("# base = mocha | dark picks the palette for keys left out\n\n");

        fn color_to_str(c: Color) -> String {
            match c {
                Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
                Color::Reset => "reset".to_string(),
                // Named colors get a best-effort hex approximation
                Color::Black => "#000000".to_string(),
                Color::Red => "#FF0000".to_string(),
                Color::Green => "#00FF00".to_string(),
                Color::Yellow => "#FFFF00".to_string(),
                Color::Blue => "#0000FF".to_string(),
                Color::Magenta => "#FF00FF".to_string(),
                Color::Cyan => "#00FFFF".to_string(),
                Color::Gray => "#B3B3B3".to_string(),
                Color::DarkGray => "#4D4D4D".to_string(),
                Color::LightRed => "#FF6666".to_string(),
                Color::LightGreen => "#66FF66".to_string(),
                Color::LightYellow => "#FFFF66".to_string(),
                Color::LightBlue => "#6666FF".to_string(),
                Color::LightMagenta => "#FF66FF".to_string(),
                Color::LightCyan => "#66FFFF".to_string(),
                Color::White => "#FFFFFF".to_string(),
                Color::Indexed(_) => "reset".to_string(),
            }
        }

        for (k, v) in [
            ("text", self.text),
            ("muted", self.muted),
            ("title", self.title),
            ("border", self.border),
            ("header_bg", self.header_bg),
            ("header_fg", self.header_fg),
            ("status_bg", self.status_bg),
            ("status_fg", self.status_fg),
            ("highlight_fg", self.highlight_fg),
            ("highlight_bg", self.highlight_bg),
            ("success", self.success),
            ("error", self.error),
        ] {
            let _ = writeln!(&mut buf, "{} = {}", k, color_to_str(v));
        }

        std::fs::write(path, buf)
    }

    /// Load `path` if it exists, otherwise write the default theme there and return it.
    pub fn load_or_init(path: &str) -> Self {
        if std::path::Path::new(path).exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        let _ = t.write_file(path);
        t
    }
}

/// Labels of the add-user form, in field order.
pub const FORM_FIELDS: [&str; 6] = ["Name", "Username", "Email", "Phone", "Website", "Company Name"];

/// Add-user form contents. Every field is required.
#[derive(Clone, Debug, Default)]
pub struct UserForm {
    pub values: [String; 6],
    pub selected: usize,
    pub error: Option<String>,
    /// Ticket of the create this form sent, if any. Only the answer to that
    /// create may close it.
    pub submission: Option<u64>,
}

impl UserForm {
    pub fn current_mut(&mut self) -> &mut String {
        &mut self.values[self.selected.min(FORM_FIELDS.len() - 1)]
    }

    pub fn next_field(&mut self) {
        self.selected = (self.selected + 1) % FORM_FIELDS.len();
    }

    pub fn prev_field(&mut self) {
        self.selected = (self.selected + FORM_FIELDS.len() - 1) % FORM_FIELDS.len();
    }

    pub fn to_new_user(&self) -> NewUser {
        let [name, username, email, phone, website, company] = &self.values;
        NewUser::from_form(name, username, email, phone, website, company)
    }
}

/// Modal dialogs.
#[derive(Clone, Debug)]
pub enum ModalState {
    AddUser(UserForm),
    DeleteConfirm {
        id: UserId,
        name: String,
        /// 0 = Yes, 1 = No.
        selected: usize,
    },
    /// Snapshot of a user; `r` replaces it with the service's copy.
    Details {
        user: User,
    },
    Info {
        message: String,
    },
    Help,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

/// A short-lived notification shown in the corner.
#[derive(Clone, Debug)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: &'static str,
    pub message: String,
    pub created: Instant,
}

/// Results of network calls, sent back to the UI thread.
#[derive(Debug)]
pub enum AppEvent {
    Loaded(ServiceResult<Vec<User>>),
    Created(ServiceResult<User>),
    Deleted {
        id: UserId,
        result: ServiceResult<()>,
    },
    Fetched {
        id: UserId,
        result: ServiceResult<User>,
    },
}

pub struct AppState {
    pub started_at: Instant,
    pub controller: ListController,
    /// 1-based page currently shown.
    pub page: usize,
    pub page_size: PageSize,
    /// Index of the highlighted card within the current page.
    pub selected: usize,
    pub input_mode: InputMode,
    pub search_query: String,
    pub theme: Theme,
    pub keymap: Keymap,
    pub modal: Option<ModalState>,
    pub toasts: Vec<Toast>,
    /// Set after the first load finished, successful or not.
    pub loaded_once: bool,
    /// Ticket of the most recent create request.
    pub create_ticket: u64,
    pub tick: u64,
}

impl AppState {
    pub fn new(controller: ListController, page_size: PageSize, theme: Theme, keymap: Keymap) -> Self {
        Self {
            started_at: Instant::now(),
            controller,
            page: 1,
            page_size,
            selected: 0,
            input_mode: InputMode::Normal,
            search_query: String::new(),
            theme,
            keymap,
            modal: None,
            toasts: Vec::new(),
            loaded_once: false,
            create_ticket: 0,
            tick: 0,
        }
    }

    /// The visible page, recomputed from the current set, search and page.
    pub fn current_page(&self) -> Page<'_> {
        pagination::paginate(
            filter_by_name(self.controller.users(), &self.search_query),
            self.page,
            self.page_size,
        )
    }

    pub fn total_pages(&self) -> usize {
        let filtered = filter_by_name(self.controller.users(), &self.search_query).len();
        pagination::total_pages(filtered, self.page_size)
    }

    pub fn selected_user(&self) -> Option<&User> {
        self.current_page().items.get(self.selected).copied()
    }

    /// Replace the search term; the view jumps back to the first page.
    pub fn set_search(&mut self, query: String) {
        if query != self.search_query {
            self.search_query = query;
            self.page = 1;
            self.selected = 0;
        }
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.total_pages());
        self.selected = 0;
    }

    pub fn next_page(&mut self) {
        if pagination::has_next(self.page, self.total_pages()) {
            self.go_to_page(self.page + 1);
        }
    }

    pub fn prev_page(&mut self) {
        if pagination::has_previous(self.page) {
            self.go_to_page(self.page - 1);
        }
    }

    pub fn move_selection(&mut self, down: bool) {
        let len = self.current_page().items.len();
        if down {
            if self.selected + 1 < len {
                self.selected += 1;
            }
        } else {
            self.selected = self.selected.saturating_sub(1);
        }
    }

    /// Keep page and selection inside bounds after the set changed.
    pub fn clamp_view(&mut self) {
        let total = self.total_pages();
        if self.page > total {
            self.page = total;
        }
        let len = self.current_page().items.len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn notify(&mut self, kind: ToastKind, title: &'static str, message: impl Into<String>) {
        self.toasts.push(Toast {
            kind,
            title,
            message: message.into(),
            created: Instant::now(),
        });
    }

    /// Drop toasts older than [`TOAST_TTL`].
    pub fn expire_toasts(&mut self, now: Instant) {
        self.toasts
            .retain(|t| now.saturating_duration_since(t.created) < TOAST_TTL);
    }

    pub fn open_modal(&mut self, modal: ModalState) {
        self.modal = Some(modal);
        self.input_mode = InputMode::Modal;
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
        self.input_mode = InputMode::Normal;
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_selects_the_fallback_palette() {
        let t = Theme::parse("base = dark\nerror = #123456\n");
        assert_eq!(t.text, Theme::dark().text);
        assert_eq!(t.error, Color::Rgb(0x12, 0x34, 0x56));

        // Order does not matter; overrides still apply on top of the base
        let t = Theme::parse("title = reset\nbase = DARK\n");
        assert_eq!(t.title, Color::Reset);
        assert_eq!(t.border, Theme::dark().border);
    }

    #[test]
    fn unknown_or_missing_base_means_mocha() {
        assert_eq!(Theme::parse("base = solarized\n").text, Theme::mocha().text);
        assert_eq!(Theme::parse("").highlight_fg, Theme::mocha().highlight_fg);
        assert!(Theme::by_name("nope").is_none());
    }
}

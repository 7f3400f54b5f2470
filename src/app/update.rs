use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use futures::future::BoxFuture;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, info};

use crate::app::keymap::KeyAction;
use crate::app::{AppEvent, AppState, FORM_FIELDS, InputMode, ModalState, ToastKind, UserForm};
use crate::error::MutationError;
use crate::model::UserId;
use crate::ui;

/// Whether the loop should keep running after a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Runs network calls on the tokio runtime and sends their results back to
/// the UI thread, which is the only place the user set is mutated.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    handle: Handle,
    tx: UnboundedSender<AppEvent>,
}

impl Dispatcher {
    pub fn new(handle: Handle) -> (Self, UnboundedReceiver<AppEvent>) {
        let (tx, rx) = unbounded_channel();
        (Self { handle, tx }, rx)
    }

    /// Spawn `task`; its event is delivered unless the loop has gone away.
    pub fn spawn(&self, task: BoxFuture<'static, AppEvent>) {
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let ev = task.await;
            if tx.send(ev).is_err() {
                debug!("UI loop gone; dropping result");
            }
        });
    }
}

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    mut app: AppState,
    runtime: Handle,
) -> Result<()> {
    let (dispatcher, mut events) = Dispatcher::new(runtime);
    request_load(&mut app, &dispatcher);

    loop {
        while let Ok(ev) = events.try_recv() {
            handle_event(&mut app, ev);
        }
        app.expire_toasts(Instant::now());
        app.tick = app.tick.wrapping_add(1);

        terminal.draw(|f| {
            ui::render(f, &mut app);
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(&mut app, key, &dispatcher) == Flow::Quit {
                    break;
                }
            }
        }
    }

    info!(uptime_secs = app.started_at.elapsed().as_secs(), "Exiting");
    Ok(())
}

/// Start (re)loading the list unless a load is already running.
pub fn request_load(app: &mut AppState, dispatcher: &Dispatcher) {
    match app.controller.begin_load() {
        Ok(call) => dispatcher.spawn(Box::pin(async move { AppEvent::Loaded(call.await) })),
        Err(e) => debug!(error = %e, "Load not started"),
    }
}

/// Submit the add-user form. Validation errors stay in the form.
pub fn submit_form(app: &mut AppState, dispatcher: &Dispatcher) {
    let Some(ModalState::AddUser(form)) = &app.modal else { return };
    let payload = form.to_new_user();
    match app.controller.begin_create(payload) {
        Ok(call) => {
            app.create_ticket = app.create_ticket.wrapping_add(1);
            if let Some(ModalState::AddUser(form)) = &mut app.modal {
                form.submission = Some(app.create_ticket);
            }
            dispatcher.spawn(Box::pin(async move { AppEvent::Created(call.await) }));
        }
        Err(MutationError::InvalidUser(field)) => {
            if let Some(ModalState::AddUser(form)) = &mut app.modal {
                form.error = Some(format!("{field} is required"));
            }
        }
        Err(e) => debug!(error = %e, "Create not started"),
    }
}

/// Send the delete for `id`. A delete already in flight for `id` is not repeated.
pub fn request_delete(app: &mut AppState, dispatcher: &Dispatcher, id: UserId) {
    match app.controller.begin_delete(id) {
        Ok(call) => dispatcher.spawn(Box::pin(async move {
            AppEvent::Deleted { id, result: call.await }
        })),
        Err(e) => debug!(error = %e, "Delete not started"),
    }
}

pub fn request_fetch(app: &mut AppState, dispatcher: &Dispatcher, id: UserId) {
    match app.controller.begin_fetch(id) {
        Ok(call) => dispatcher.spawn(Box::pin(async move {
            AppEvent::Fetched { id, result: call.await }
        })),
        Err(e) => debug!(error = %e, "Fetch not started"),
    }
}

/// Apply a network result to the state and surface it to the user.
pub fn handle_event(app: &mut AppState, ev: AppEvent) {
    match ev {
        AppEvent::Loaded(result) => {
            app.loaded_once = true;
            if let Err(e) = app.controller.finish_load(result) {
                let detail = std::error::Error::source(&e).map(ToString::to_string).unwrap_or_default();
                app.notify(ToastKind::Error, "Error", format!("Failed to fetch users. {detail}"));
            }
            app.clamp_view();
        }
        AppEvent::Created(result) => match app.controller.finish_create(result) {
            Ok(user) => {
                // A form opened after the submission keeps its input
                let ticket = Some(app.create_ticket);
                if matches!(&app.modal, Some(ModalState::AddUser(form)) if form.submission == ticket) {
                    app.close_modal();
                }
                debug!(id = user.id, "New user shown first");
                app.notify(ToastKind::Success, "Success", "User has been created successfully");
                app.clamp_view();
            }
            Err(_) => {
                app.notify(ToastKind::Error, "Error", "Failed to create user. Please try again.");
            }
        },
        AppEvent::Deleted { id, result } => match app.controller.finish_delete(id, result) {
            Ok(_) => {
                if matches!(&app.modal, Some(ModalState::Details { user }) if user.id == id) {
                    app.close_modal();
                }
                app.notify(ToastKind::Success, "Success", "User has been deleted successfully");
                app.clamp_view();
            }
            Err(_) => {
                app.notify(ToastKind::Error, "Error", "Failed to delete user. Please try again.");
            }
        },
        AppEvent::Fetched { id, result } => match app.controller.finish_fetch(id, result) {
            Ok(fresh) => {
                if let Some(ModalState::Details { user }) = &mut app.modal {
                    if user.id == id {
                        *user = fresh;
                    }
                }
            }
            Err(_) => {
                app.notify(ToastKind::Error, "Error", format!("Failed to fetch user {id}."));
            }
        },
    }
}

/// Route a key press according to the current input mode.
pub fn handle_key(app: &mut AppState, key: KeyEvent, dispatcher: &Dispatcher) -> Flow {
    match app.input_mode {
        InputMode::Normal => return handle_normal_key(app, key, dispatcher),
        InputMode::Search => match key.code {
            KeyCode::Enter => app.input_mode = InputMode::Normal,
            KeyCode::Esc => {
                app.set_search(String::new());
                app.input_mode = InputMode::Normal;
            }
            KeyCode::Backspace => {
                let mut q = app.search_query.clone();
                q.pop();
                app.set_search(q);
            }
            KeyCode::Char(c) => {
                let mut q = app.search_query.clone();
                q.push(c);
                app.set_search(q);
            }
            _ => {}
        },
        InputMode::Modal => handle_modal_key(app, key.code, dispatcher),
    }
    Flow::Continue
}

fn handle_normal_key(app: &mut AppState, key: KeyEvent, dispatcher: &Dispatcher) -> Flow {
    let Some(action) = app.keymap.resolve(&key) else { return Flow::Continue };
    match action {
        KeyAction::Quit => return Flow::Quit,
        KeyAction::StartSearch => app.input_mode = InputMode::Search,
        KeyAction::NewUser => app.open_modal(ModalState::AddUser(UserForm::default())),
        KeyAction::DeleteSelection => {
            if let Some(u) = app.selected_user() {
                // Disabled while a delete for this user is pending
                let modal = if app.controller.is_deleting(u.id) {
                    ModalState::Info { message: format!("Deleting '{}' is already in progress.", u.name) }
                } else {
                    ModalState::DeleteConfirm { id: u.id, name: u.name.clone(), selected: 1 }
                };
                app.open_modal(modal);
            }
        }
        KeyAction::EnterAction => {
            if let Some(u) = app.selected_user().cloned() {
                app.open_modal(ModalState::Details { user: u });
            }
        }
        KeyAction::Reload => request_load(app, dispatcher),
        KeyAction::OpenHelp => app.open_modal(ModalState::Help),
        KeyAction::MoveUp => app.move_selection(false),
        KeyAction::MoveDown => app.move_selection(true),
        KeyAction::PrevPage => app.prev_page(),
        KeyAction::NextPage => app.next_page(),
        KeyAction::FirstPage => app.go_to_page(1),
        KeyAction::LastPage => {
            let last = app.total_pages();
            app.go_to_page(last);
        }
        KeyAction::Ignore => {}
    }
    Flow::Continue
}

fn handle_modal_key(app: &mut AppState, code: KeyCode, dispatcher: &Dispatcher) {
    match &mut app.modal {
        Some(ModalState::AddUser(form)) => match code {
            KeyCode::Esc => app.close_modal(),
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Backspace => {
                form.current_mut().pop();
            }
            KeyCode::Char(c) => {
                form.current_mut().push(c);
                form.error = None;
            }
            KeyCode::Enter => {
                if form.selected + 1 < FORM_FIELDS.len() {
                    form.next_field();
                } else if !app.controller.is_creating() {
                    submit_form(app, dispatcher);
                }
            }
            _ => {}
        },
        Some(ModalState::DeleteConfirm { id, selected, .. }) => match code {
            KeyCode::Esc => app.close_modal(),
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') => {
                *selected = 1 - (*selected).min(1);
            }
            KeyCode::Char('y') => {
                let id = *id;
                app.close_modal();
                request_delete(app, dispatcher, id);
            }
            KeyCode::Char('n') => app.close_modal(),
            KeyCode::Enter => {
                let (id, yes) = (*id, *selected == 0);
                app.close_modal();
                if yes {
                    request_delete(app, dispatcher, id);
                }
            }
            _ => {}
        },
        Some(ModalState::Details { user }) => match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => app.close_modal(),
            KeyCode::Char('r') => {
                let id = user.id;
                request_fetch(app, dispatcher, id);
            }
            _ => {}
        },
        Some(ModalState::Info { .. }) | Some(ModalState::Help) => match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('?') => app.close_modal(),
            _ => {}
        },
        None => app.input_mode = InputMode::Normal,
    }
}

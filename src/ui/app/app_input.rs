use chrono::Utc;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::auth::{self, oauth, AuthError, OAuthConfig};
use crate::docs;
use crate::store::Notice;
use crate::ui::app::App;
use crate::ui::components::{
    theme, ConfirmationContext, ConfirmationType, EditorField, LoginMode, TextAreaState,
    TextInputState,
};
use crate::ui::effect::Effect;
use crate::ui::events::InputMode;
use crate::view::Screen;

/// Apply an editing key to a single-line field. Returns false if unused.
fn edit_input(input: &mut TextInputState, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('a') if ctrl => input.move_start(),
        KeyCode::Char('e') if ctrl => input.move_end(),
        KeyCode::Char('u') if ctrl => input.delete_to_start(),
        KeyCode::Char('w') if ctrl => input.delete_word(),
        KeyCode::Char(c) if !ctrl => input.insert_char(c),
        KeyCode::Backspace => input.delete_char(),
        KeyCode::Delete => input.delete_forward(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_start(),
        KeyCode::End => input.move_end(),
        _ => return false,
    }
    true
}

/// Apply an editing key to the editor body. Returns false if unused.
fn edit_area(area: &mut TextAreaState, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('a') if ctrl => area.move_home(),
        KeyCode::Char('e') if ctrl => area.move_end(),
        KeyCode::Char(c) if !ctrl => area.insert_char(c),
        KeyCode::Enter => area.insert_newline(),
        KeyCode::Backspace => area.backspace(),
        KeyCode::Delete => area.delete(),
        KeyCode::Left => area.move_left(),
        KeyCode::Right => area.move_right(),
        KeyCode::Up => area.move_up(),
        KeyCode::Down => area.move_down(),
        KeyCode::PageUp => area.page_up(10),
        KeyCode::PageDown => area.page_down(10),
        KeyCode::Home => area.move_home(),
        KeyCode::End => area.move_end(),
        _ => return false,
    }
    true
}

impl App {
    pub(super) fn handle_input_event(&mut self, input: Event) -> Vec<Effect> {
        match input {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.handle_key_event(key),
            Event::Paste(text) => {
                self.handle_paste(&text);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Vec<Effect> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Vec::new();
        }

        match self.input_mode() {
            InputMode::ShowingError => self.handle_error_key(key),
            InputMode::Confirming => return self.handle_confirm_key(key),
            InputMode::ShowingHelp => self.handle_help_key(key),
            InputMode::LoggingIn => return self.handle_login_key(key),
            InputMode::ConfiguringRepo => return self.handle_repo_key(key),
            InputMode::Uploading => return self.handle_upload_key(key),
            InputMode::Searching => self.handle_search_key(key),
            InputMode::Editing => return self.handle_editor_key(key),
            InputMode::Browse => return self.handle_browse_key(key),
        }
        Vec::new()
    }

    fn handle_paste(&mut self, text: &str) {
        match self.input_mode() {
            InputMode::LoggingIn => self.ui.login.input_mut().insert_str(text),
            InputMode::ConfiguringRepo => self.ui.repo.input_mut().insert_str(text),
            InputMode::Uploading => self.ui.upload.input.insert_str(text),
            InputMode::Searching => {
                self.ui.list.search.insert_str(text);
                self.apply_search();
            }
            InputMode::Editing => {
                if let Some(editor) = self.ui.editor.as_mut() {
                    match editor.focus {
                        EditorField::Name => editor.name.insert_str(text),
                        EditorField::Body => editor.body.insert_str(text),
                    }
                }
                self.write_editor_to_draft();
            }
            _ => {}
        }
    }

    fn handle_error_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => self.ui.error.hide(),
            KeyCode::Char('d') => self.ui.error.toggle_details(),
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        let confirmed = match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h' | 'l') => {
                self.ui.confirm.toggle_selection();
                return Vec::new();
            }
            KeyCode::Char('y' | 'Y') => true,
            KeyCode::Char('n' | 'N') | KeyCode::Esc => false,
            KeyCode::Enter => self.ui.confirm.confirm_selected,
            _ => return Vec::new(),
        };

        match self.ui.confirm.resolve(confirmed) {
            Some(ConfirmationContext::DeleteDocument(entry)) => {
                self.request(Effect::DeleteDocument(entry))
            }
            Some(ConfirmationContext::DiscardEdits) => {
                if let Err(e) = self.store.cancel_edit() {
                    tracing::warn!(error = %e, "Discard outside the editor");
                }
                self.sync_editor();
                Vec::new()
            }
            Some(ConfirmationContext::Logout) => {
                self.logout();
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    fn handle_help_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('?' | 'q') => self.ui.help.hide(),
            KeyCode::Down | KeyCode::Char('j') => self.ui.help.scroll_down(),
            KeyCode::Up | KeyCode::Char('k') => self.ui.help.scroll_up(),
            _ => {}
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.ui.login.hide(),
            KeyCode::Char('o') if ctrl => self.begin_oauth(),
            KeyCode::Enter => return self.submit_login(),
            _ => {
                edit_input(self.ui.login.input_mut(), key);
            }
        }
        Vec::new()
    }

    fn submit_login(&mut self) -> Vec<Effect> {
        match self.ui.login.mode {
            LoginMode::Token => {
                let token = self.ui.login.token.value().trim().to_string();
                if token.is_empty() {
                    self.ui.login.set_error(AuthError::EmptyToken.to_string());
                    return Vec::new();
                }
                self.ui.login.error = None;
                self.request(Effect::Login { token })
            }
            LoginMode::OAuth => {
                let callback = self.ui.login.callback.value().to_string();
                let result = oauth::handle_callback(
                    self.stores.ephemeral.as_ref(),
                    &callback,
                    Utc::now(),
                )
                .and_then(|code| oauth::exchange_code(&code));

                match result {
                    // exchange_code never yields a token client-side
                    Ok(token) => self.request(Effect::Login { token }),
                    Err(e) => {
                        tracing::info!(error = %e, "OAuth callback not accepted");
                        self.ui.login.set_error(e.to_string());
                        Vec::new()
                    }
                }
            }
        }
    }

    fn begin_oauth(&mut self) {
        let Some(config) = OAuthConfig::from_config(&self.config) else {
            self.ui
                .login
                .set_error(AuthError::OAuthNotConfigured.to_string());
            return;
        };

        match oauth::begin_authorization(&config, self.stores.ephemeral.as_ref(), Utc::now()) {
            Ok(url) => self.ui.login.show_authorize_url(url.to_string()),
            Err(e) => self.ui.login.set_error(e.to_string()),
        }
    }

    fn handle_repo_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Esc => self.ui.repo.hide(),
            KeyCode::Tab | KeyCode::Down => self.ui.repo.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.ui.repo.prev_field(),
            KeyCode::Enter => match self.ui.repo.to_target() {
                Ok(target) => {
                    self.ui.repo.hide();
                    let changed = &target != self.store.target();
                    self.store.set_target(target.clone());
                    self.sync_editor();
                    self.ui.list.clamp(0);
                    self.notify(Notice::info(format!("Repository set to {target}")));

                    let mut effects = vec![Effect::SaveRepository(target)];
                    if changed && self.store.is_logged_in() {
                        effects.extend(self.request_reload());
                    }
                    return effects;
                }
                Err(msg) => self.ui.repo.error = Some(msg),
            },
            _ => {
                edit_input(self.ui.repo.input_mut(), key);
            }
        }
        Vec::new()
    }

    fn handle_upload_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        match key.code {
            KeyCode::Esc => self.ui.upload.hide(),
            KeyCode::Enter => {
                let paths = self.ui.upload.paths();
                if paths.is_empty() {
                    self.ui.upload.error = Some("Enter at least one file".to_string());
                    return Vec::new();
                }
                let effects = self.request(Effect::UploadFiles(paths));
                if !effects.is_empty() {
                    self.ui.upload.hide();
                }
                return effects;
            }
            _ => {
                edit_input(&mut self.ui.upload.input, key);
            }
        }
        Vec::new()
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.ui.list.searching = false;
                self.ui.list.search.clear();
                self.apply_search();
            }
            KeyCode::Enter => self.ui.list.searching = false,
            KeyCode::Down => {
                let len = self.store.visible_documents().len();
                self.ui.list.select_next(len);
            }
            KeyCode::Up => self.ui.list.select_prev(),
            _ => {
                if edit_input(&mut self.ui.list.search, key) {
                    self.apply_search();
                }
            }
        }
    }

    fn apply_search(&mut self) {
        self.store.set_query(self.ui.list.search.value());
        self.ui.list.select_first();
    }

    fn handle_editor_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('s') if ctrl => return self.save_draft(),
            KeyCode::Char('p') if ctrl => {
                if let Some(editor) = self.ui.editor.as_mut() {
                    editor.toggle_preview();
                }
            }
            KeyCode::Esc => self.leave_editor(),
            KeyCode::Tab | KeyCode::BackTab => {
                if let Some(editor) = self.ui.editor.as_mut() {
                    editor.toggle_focus();
                }
            }
            _ => {
                let Some(editor) = self.ui.editor.as_mut() else {
                    return Vec::new();
                };
                let changed = match editor.focus {
                    EditorField::Name if key.code == KeyCode::Enter => {
                        editor.focus = EditorField::Body;
                        false
                    }
                    EditorField::Name => edit_input(&mut editor.name, key),
                    EditorField::Body => edit_area(&mut editor.body, key),
                };
                if changed {
                    self.write_editor_to_draft();
                }
            }
        }
        Vec::new()
    }

    fn write_editor_to_draft(&mut self) {
        let Self { store, ui, .. } = self;
        if let Some(editor) = &ui.editor {
            store.edit_draft(|draft| editor.write_to(draft));
        }
    }

    fn save_draft(&mut self) -> Vec<Effect> {
        self.write_editor_to_draft();
        let Some(request) = self.store.save_request() else {
            return Vec::new();
        };
        if let Err(e) = docs::validate_file_name(&request.file_name) {
            self.show_error("Cannot save", e.to_string());
            return Vec::new();
        }
        if !self.ensure_ready() {
            return Vec::new();
        }
        self.request(Effect::SaveDocument(request))
    }

    fn leave_editor(&mut self) {
        let dirty = self
            .store
            .screen()
            .draft()
            .is_some_and(|draft| draft.is_dirty());
        if dirty {
            self.ui.confirm.show(
                "Discard Changes",
                "Leave the editor without saving?",
                vec!["Unsaved changes will be lost.".to_string()],
                ConfirmationType::Warning,
                "Discard",
                ConfirmationContext::DiscardEdits,
            );
            return;
        }
        if let Err(e) = self.store.cancel_edit() {
            tracing::warn!(error = %e, "Cancel outside the editor");
        }
        self.sync_editor();
    }

    /// Logged in with a configured repository; shows an error otherwise.
    fn ensure_ready(&mut self) -> bool {
        if !self.store.is_logged_in() {
            self.show_error("Not logged in", "Press l to log in first.");
            return false;
        }
        if !self.store.target().is_configured() {
            self.show_error("No repository", docs::DocsError::NotConfigured.to_string());
            return false;
        }
        true
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        let viewing = matches!(self.store.screen(), Screen::Viewer(_));
        let list_focused = self.ui.list.focused || !viewing;

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.ui.help.show(),
            KeyCode::Char('l') => self.ui.login.show(),
            KeyCode::Char('L') => {
                if self.store.is_logged_in() {
                    let login = self
                        .store
                        .session()
                        .map(|s| s.login().to_string())
                        .unwrap_or_default();
                    self.ui.confirm.show(
                        "Log Out",
                        format!("Log out {login}?"),
                        vec!["The stored token will be removed.".to_string()],
                        ConfirmationType::Info,
                        "Log out",
                        ConfirmationContext::Logout,
                    );
                }
            }
            KeyCode::Char('c') => {
                let target = self.store.target().clone();
                self.ui.repo.show(&target);
            }
            KeyCode::Char('t') => {
                let mode = self.store.toggle_theme();
                theme::apply_mode(mode);
                return vec![Effect::SaveTheme(mode)];
            }
            KeyCode::Char('/') => {
                self.ui.list.focused = true;
                self.ui.list.searching = true;
            }
            KeyCode::Tab if viewing => self.ui.list.focused = !self.ui.list.focused,
            KeyCode::Down | KeyCode::Char('j') => {
                if list_focused {
                    let len = self.store.visible_documents().len();
                    self.ui.list.select_next(len);
                } else {
                    self.ui.viewer.scroll_down(1);
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if list_focused {
                    self.ui.list.select_prev();
                } else {
                    self.ui.viewer.scroll_up(1);
                }
            }
            KeyCode::Char('g') | KeyCode::Home if list_focused => self.ui.list.select_first(),
            KeyCode::Char('G') | KeyCode::End if list_focused => {
                let len = self.store.visible_documents().len();
                self.ui.list.select_last(len);
            }
            KeyCode::PageDown => self.ui.viewer.page_down(),
            KeyCode::PageUp => self.ui.viewer.page_up(),
            KeyCode::Enter => {
                let selected = self
                    .store
                    .visible_documents()
                    .get(self.ui.list.selected)
                    .map(|entry| (*entry).clone());
                if let Some(entry) = selected {
                    return self.request(Effect::OpenDocument(entry));
                }
            }
            KeyCode::Char('r') => {
                if self.ensure_ready() {
                    return self.request(Effect::LoadDocuments);
                }
            }
            KeyCode::Char('n') => {
                if self.ensure_ready() {
                    if let Err(e) = self.store.begin_new() {
                        tracing::warn!(error = %e, "Cannot start a new document");
                    }
                    self.sync_editor();
                }
            }
            KeyCode::Char('e') => {
                if let Err(e) = self.store.begin_edit() {
                    tracing::debug!(error = %e, "Nothing to edit");
                }
                self.sync_editor();
            }
            KeyCode::Char('d') => {
                let target = match self.store.current_document() {
                    Some(doc) if !list_focused => Some(doc.entry.clone()),
                    _ => self
                        .store
                        .visible_documents()
                        .get(self.ui.list.selected)
                        .map(|entry| (*entry).clone()),
                };
                if let Some(entry) = target {
                    self.ui.confirm.show_delete(&entry);
                }
            }
            KeyCode::Char('u') => {
                if self.ensure_ready() {
                    self.ui.upload.show();
                }
            }
            KeyCode::Char('s') => {
                if let Some(document) = self.store.current_document().cloned() {
                    return vec![Effect::DownloadDocument(document)];
                }
            }
            _ => {}
        }
        Vec::new()
    }

    fn logout(&mut self) {
        if let Err(e) = auth::logout(&self.stores) {
            self.show_error("Logout failed", e.to_string());
            return;
        }
        self.store.clear_session();
        self.api = None;
        self.reload_pending = false;
        self.sync_editor();
        self.ui.list.clamp(0);
        self.ui.list.search.clear();
        self.notify(Notice::info("Logged out"));
    }
}

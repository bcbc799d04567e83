use std::collections::VecDeque;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, EnableBracketedPaste},
    execute,
    terminal::{enable_raw_mode, EnterAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    style::Style,
    widgets::{Block, Widget},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use crate::auth::SessionStores;
use crate::config::Config;
use crate::github::{ApiProvider, ContentsApi};
use crate::store::{AppStore, Notice};
use crate::ui::components::{
    theme, ConfirmationDialog, ConfirmationDialogState, DocList, DocListState, DocumentView,
    DocumentViewState, EditorState, EditorView, ErrorDialog, ErrorDialogState, HelpDialog,
    HelpDialogState, LoginDialog, LoginDialogState, RepoDialog, RepoDialogState, Spinner,
    StatusBar, UploadDialog, UploadDialogState, Welcome,
};
use crate::ui::effect::{perform, Effect, EffectContext};
use crate::ui::events::{AppEvent, InputMode};
use crate::ui::terminal_guard::TerminalGuard;
use crate::view::Screen;

mod app_events;
mod app_input;

/// Widget state that is not part of the application store
#[derive(Debug, Default)]
pub struct UiState {
    pub list: DocListState,
    pub viewer: DocumentViewState,
    /// Present exactly while the editor screen is showing
    pub editor: Option<EditorState>,
    pub login: LoginDialogState,
    pub repo: RepoDialogState,
    pub upload: UploadDialogState,
    pub help: HelpDialogState,
    pub confirm: ConfirmationDialogState,
    pub error: ErrorDialogState,
    pub spinner: Spinner,
}

/// Main application state
pub struct App {
    config: Config,
    /// Where repository and theme changes are written
    config_path: PathBuf,
    /// Where downloaded documents are written
    download_dir: PathBuf,
    store: AppStore,
    stores: SessionStores,
    provider: Arc<dyn ApiProvider>,
    /// Client for the logged-in session
    api: Option<Arc<dyn ContentsApi>>,
    ui: UiState,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// A listing reload was asked for while another call was outstanding
    reload_pending: bool,
    should_quit: bool,
    tick_count: u32,
}

impl App {
    pub fn new(
        config: Config,
        config_path: PathBuf,
        stores: SessionStores,
        provider: Arc<dyn ApiProvider>,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        Self {
            store: AppStore::new(&config),
            config,
            config_path,
            download_dir: PathBuf::from("."),
            stores,
            provider,
            api: None,
            ui: UiState {
                list: DocListState::new(),
                ..UiState::default()
            },
            event_tx,
            event_rx,
            reload_pending: false,
            should_quit: false,
            tick_count: 0,
        }
    }

    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    pub fn store(&self) -> &AppStore {
        &self.store
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Which part of the screen receives keys; the topmost overlay wins.
    pub fn input_mode(&self) -> InputMode {
        if self.ui.error.is_visible() {
            InputMode::ShowingError
        } else if self.ui.confirm.is_visible() {
            InputMode::Confirming
        } else if self.ui.help.is_visible() {
            InputMode::ShowingHelp
        } else if self.ui.login.is_visible() {
            InputMode::LoggingIn
        } else if self.ui.repo.is_visible() {
            InputMode::ConfiguringRepo
        } else if self.ui.upload.is_visible() {
            InputMode::Uploading
        } else if self.ui.list.searching {
            InputMode::Searching
        } else if matches!(self.store.screen(), Screen::Editor(_)) {
            InputMode::Editing
        } else {
            InputMode::Browse
        }
    }

    /// Effects to run when the application starts.
    pub fn startup(&mut self) -> Vec<Effect> {
        self.request(Effect::RestoreSession)
    }

    /// Admit `effect`. Remote effects claim the busy flag and are dropped
    /// while another one is outstanding.
    fn request(&mut self, effect: Effect) -> Vec<Effect> {
        if effect.is_remote() {
            if let Err(busy) = self.store.begin_busy(effect.label()) {
                tracing::debug!(?effect, %busy, "Ignoring request while busy");
                return Vec::new();
            }
        }
        if effect == Effect::LoadDocuments {
            self.reload_pending = false;
        }
        vec![effect]
    }

    fn effect_context(&self) -> EffectContext {
        EffectContext {
            provider: Arc::clone(&self.provider),
            api: self.api.clone(),
            stores: self.stores.clone(),
            target: self.store.target().clone(),
            config_path: self.config_path.clone(),
            download_dir: self.download_dir.clone(),
        }
    }

    /// Reduce one event into state changes and the effects it asks for.
    pub fn handle_event(&mut self, event: AppEvent) -> Vec<Effect> {
        match event {
            AppEvent::Input(input) => self.handle_input_event(input),
            AppEvent::Tick => {
                self.ui.spinner.tick();
                Vec::new()
            }
            AppEvent::Quit => {
                self.should_quit = true;
                Vec::new()
            }
            completion => self.handle_completion(completion),
        }
    }

    /// Handle `event` and run every resulting effect to completion, inline.
    pub async fn process(&mut self, event: AppEvent) {
        let effects = self.handle_event(event);
        self.run_effects(effects).await;
    }

    /// Run `effects` and any follow-ups they trigger, inline.
    pub async fn run_effects(&mut self, effects: Vec<Effect>) {
        let mut pending: VecDeque<Effect> = effects.into();
        while let Some(effect) = pending.pop_front() {
            let completion = perform(self.effect_context(), effect).await;
            pending.extend(self.handle_event(completion));
        }
    }

    /// Spawn `effects`; each one reports back through the event channel.
    fn dispatch(&self, effects: Vec<Effect>) {
        for effect in effects {
            let ctx = self.effect_context();
            let event_tx = self.event_tx.clone();
            tokio::spawn(async move {
                let event = perform(ctx, effect).await;
                if event_tx.send(event).is_err() {
                    tracing::debug!("Event channel closed before effect completed");
                }
            });
        }
    }

    fn show_error(&mut self, title: &str, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(%title, %message, "Showing error");
        self.ui.error.show(title, message);
    }

    fn notify(&mut self, notice: Notice) {
        self.store.set_notice(notice);
    }

    /// Keep the editor buffers in step with the screen.
    fn sync_editor(&mut self) {
        match self.store.screen().draft() {
            Some(draft) => {
                if self.ui.editor.is_none() {
                    self.ui.editor = Some(EditorState::from_draft(draft));
                }
            }
            None => self.ui.editor = None,
        }
    }

    /// Run the application main loop
    pub async fn run(&mut self) -> anyhow::Result<()> {
        theme::apply_mode(self.store.theme());

        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
        let mut guard = TerminalGuard::new();
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let effects = self.startup();
        self.dispatch(effects);

        let result = self.event_loop(&mut terminal).await;

        guard.cleanup()?;
        terminal.show_cursor()?;
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;

            tokio::select! {
                _ = tokio::time::sleep(Duration::from_millis(16)) => {
                    if event::poll(Duration::from_millis(0))? {
                        let input = event::read()?;
                        let effects = self.handle_event(AppEvent::Input(input));
                        self.dispatch(effects);
                    }

                    // ~100ms per spinner frame
                    self.tick_count = self.tick_count.wrapping_add(1);
                    if self.tick_count % 6 == 0 && self.store.is_busy() {
                        self.ui.spinner.tick();
                    }
                }

                Some(event) = self.event_rx.recv() => {
                    let effects = self.handle_event(event);
                    self.dispatch(effects);
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    pub fn draw(&mut self, f: &mut Frame) {
        let area = f.area();
        Block::default()
            .style(Style::default().bg(theme::bg_base()))
            .render(area, f.buffer_mut());

        let [main, status] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);
        let list_width = if main.width >= 90 { 32 } else { main.width / 3 };
        let [list_area, content_area] =
            Layout::horizontal([Constraint::Length(list_width), Constraint::Min(10)]).areas(main);

        let Self { store, ui, .. } = self;
        let buf = f.buffer_mut();

        let visible = store.visible_documents();
        let placeholder = if !store.is_logged_in() {
            "Log in to list documents"
        } else if !store.target().is_configured() {
            "No repository configured"
        } else {
            "No documents"
        };
        DocList::new(&visible, store.documents().len())
            .placeholder(placeholder)
            .render(list_area, buf, &ui.list);

        let login = store.session().map(|s| s.login());
        match store.screen() {
            Screen::Welcome => Welcome::new(login, store.target()).render(content_area, buf),
            Screen::Viewer(document) => DocumentView::new(document)
                .focused(!ui.list.focused)
                .render(content_area, buf, &mut ui.viewer),
            Screen::Editor(draft) => {
                let editor = ui
                    .editor
                    .get_or_insert_with(|| EditorState::from_draft(draft));
                EditorView::new(draft.is_dirty()).render(content_area, buf, editor);
            }
        }

        StatusBar::new(store.target(), &ui.spinner)
            .login(login)
            .busy(store.busy())
            .notice(store.notice())
            .theme(store.theme())
            .render(status, buf);

        UploadDialog::new().render(area, buf, &ui.upload);
        RepoDialog::new().render(area, buf, &ui.repo);
        LoginDialog::new().render(area, buf, &ui.login);
        HelpDialog::new().render(area, buf, &ui.help);
        if ui.confirm.is_visible() {
            ConfirmationDialog::new(&ui.confirm).render(area, buf);
        }
        ErrorDialog::new(&ui.error).render(area, buf);
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("store", &self.store)
            .field("input_mode", &self.input_mode())
            .finish_non_exhaustive()
    }
}

use crate::docs::DocumentEntry;
use crate::store::Notice;
use crate::ui::app::App;
use crate::ui::effect::Effect;
use crate::ui::events::{AppEvent, Mutation};
use crate::view::ScreenKind;

impl App {
    /// Apply the result of an effect. Remote completions release the busy
    /// flag before anything else. Listings and documents fetched under an
    /// older session or repository target are not applied.
    pub(super) fn handle_completion(&mut self, event: AppEvent) -> Vec<Effect> {
        let mut stale = false;
        if !matches!(
            event,
            AppEvent::DocumentDownloaded(_) | AppEvent::ConfigSaved(_)
        ) {
            let claimed = self.store.end_busy();
            stale = claimed.is_some_and(|scope| scope != self.store.scope());
        }

        let mut effects = if stale && event.follows_scope() {
            self.discard_stale(event)
        } else {
            self.apply_completion(event)
        };
        effects.extend(self.resume_reload());
        effects
    }

    fn apply_completion(&mut self, event: AppEvent) -> Vec<Effect> {
        match event {
            AppEvent::SessionRestored(Ok(Some(session))) | AppEvent::LoggedIn(Ok(session)) => {
                self.api = Some(self.provider.connect(&session.token));
                self.notify(Notice::info(format!("Logged in as {}", session.login())));
                self.store.set_session(session);
                self.ui.login.hide();
                if self.store.target().is_configured() {
                    return self.request(Effect::LoadDocuments);
                }
            }
            AppEvent::SessionRestored(Ok(None)) => {
                tracing::debug!("No stored session");
            }
            AppEvent::SessionRestored(Err(e)) => {
                tracing::warn!(error = %e, "Stored token could not be restored");
                self.notify(Notice::error(e));
            }
            AppEvent::LoggedIn(Err(e)) => {
                if self.ui.login.is_visible() {
                    self.ui.login.set_error(e);
                } else {
                    self.show_error("Login failed", e);
                }
            }
            AppEvent::DocumentsLoaded(Ok(documents)) => {
                self.set_documents(documents);
            }
            AppEvent::DocumentsLoaded(Err(e)) => {
                self.show_error("Failed to load documents", e);
            }
            AppEvent::DocumentOpened(Ok(document)) => {
                let name = document.name().to_string();
                match self.store.open_document(document) {
                    Ok(()) => {
                        self.ui.viewer.reset();
                        self.ui.list.focused = false;
                    }
                    Err(e) => tracing::warn!(error = %e, %name, "Loaded document was not shown"),
                }
            }
            AppEvent::DocumentOpened(Err(e)) => {
                self.show_error("Failed to load document", e);
            }
            AppEvent::DocumentSaved {
                request,
                result: Ok(Mutation { outcome, documents }),
            } => {
                let documents = self.take_reload(documents);
                self.store.finish_save(&request, &outcome, documents);
                self.sync_editor();
                if self.store.screen().kind() == ScreenKind::Welcome {
                    self.ui.list.focused = true;
                }
                self.clamp_selection();
            }
            AppEvent::DocumentSaved { result: Err(e), .. } => {
                self.show_error("Failed to save document", e);
            }
            AppEvent::DocumentDeleted(Ok(Mutation {
                outcome: path,
                documents,
            })) => {
                let documents = self.take_reload(documents);
                self.store.finish_delete(&path, documents);
                self.sync_editor();
                self.ui.list.focused = true;
                self.clamp_selection();
            }
            AppEvent::DocumentDeleted(Err(e)) => {
                self.show_error("Failed to delete document", e);
            }
            AppEvent::FilesUploaded(summary) => {
                for outcome in &summary.uploaded {
                    self.store.finish_upload(outcome, None);
                }
                let mut problems = summary.problems;
                match summary.documents {
                    Some(Ok(documents)) => self.set_documents(documents),
                    Some(Err(e)) => problems.push(format!("Reloading the list failed: {e}")),
                    None => {}
                }

                let uploaded = summary.uploaded.len();
                if problems.is_empty() {
                    self.notify(Notice::info(format!("Uploaded {uploaded} document(s)")));
                } else {
                    let total = uploaded + problems.len();
                    self.ui.error.show_with_details(
                        "Upload",
                        format!("Uploaded {uploaded} of {total}; some files were not uploaded"),
                        problems.join("\n"),
                    );
                    self.ui.error.details_expanded = true;
                }
            }
            AppEvent::DocumentDownloaded(Ok(path)) => {
                self.notify(Notice::info(format!("Saved {}", path.display())));
            }
            AppEvent::DocumentDownloaded(Err(e)) => {
                self.show_error("Download failed", e);
            }
            AppEvent::ConfigSaved(Ok(())) => {}
            AppEvent::ConfigSaved(Err(e)) => {
                tracing::warn!(error = %e, "Failed to write config");
                self.notify(Notice::error(format!("Could not save settings: {e}")));
            }
            AppEvent::Input(_) | AppEvent::Tick | AppEvent::Quit => {}
        }
        Vec::new()
    }

    /// Report a commit made under a previous session or target without
    /// touching the current listing or screen.
    fn discard_stale(&mut self, event: AppEvent) -> Vec<Effect> {
        match event {
            AppEvent::DocumentSaved {
                result: Ok(Mutation { outcome, .. }),
                ..
            } => {
                tracing::info!(
                    path = %outcome.path,
                    "Save finished after a repository or session change"
                );
                self.notify(Notice::info(format!("Committed {}", outcome.path)));
            }
            AppEvent::DocumentDeleted(Ok(Mutation { outcome: path, .. })) => {
                tracing::info!(
                    %path,
                    "Delete finished after a repository or session change"
                );
                self.notify(Notice::info(format!("Deleted {path}")));
            }
            AppEvent::FilesUploaded(mut summary) => {
                summary.documents = None;
                return self.apply_completion(AppEvent::FilesUploaded(summary));
            }
            failed @ (AppEvent::DocumentSaved { result: Err(_), .. }
            | AppEvent::DocumentDeleted(Err(_))) => {
                return self.apply_completion(failed);
            }
            _ => {
                tracing::debug!("Dropping a result fetched for a previous repository or session");
            }
        }
        Vec::new()
    }

    /// Reload the listing now, or once the outstanding remote call finishes.
    pub(super) fn request_reload(&mut self) -> Vec<Effect> {
        if self.store.is_busy() {
            self.reload_pending = true;
            return Vec::new();
        }
        self.request(Effect::LoadDocuments)
    }

    fn resume_reload(&mut self) -> Vec<Effect> {
        if !self.reload_pending || self.store.is_busy() {
            return Vec::new();
        }
        self.reload_pending = false;
        if self.store.is_logged_in() && self.store.target().is_configured() {
            self.request(Effect::LoadDocuments)
        } else {
            Vec::new()
        }
    }

    fn set_documents(&mut self, documents: Vec<DocumentEntry>) {
        self.store.set_documents(documents);
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.store.visible_documents().len();
        self.ui.list.clamp(len);
    }

    /// Listing reloaded after a mutation. A failed reload is shown but the
    /// mutation itself stands.
    fn take_reload(
        &mut self,
        documents: Result<Vec<DocumentEntry>, String>,
    ) -> Option<Vec<DocumentEntry>> {
        match documents {
            Ok(documents) => Some(documents),
            Err(e) => {
                self.show_error("Failed to reload documents", e);
                None
            }
        }
    }
}

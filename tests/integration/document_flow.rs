//! Document library, sessions and the OAuth handshake against the
//! in-memory repository and real stores.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use mdocs::auth::{self, oauth, AuthError, CsrfError, OAuthConfig};
use mdocs::docs::{self, DocsError, SaveRequest, UploadResult};
use mdocs::github::{
    ApiError, ContentItem, ContentsApi, DeleteContentRequest, InMemoryContents,
    PutContentRequest, PutContentResponse, RepoTarget, User,
};
use mdocs::storage::{FileStore, KeyValueStore, MemoryStore, TOKEN_KEY};
use mdocs::{DocumentLibrary, SessionStores};
use reqwest::Url;
use tempfile::TempDir;

use super::common::{contents, memory_stores, target, write_files, LOGIN, TOKEN};

fn library(api: &InMemoryContents) -> DocumentLibrary<InMemoryContents> {
    DocumentLibrary::new(Arc::new(api.with_token(TOKEN)), target())
}

fn file_stores(dir: &TempDir) -> SessionStores {
    let persistent = FileStore::open(dir.path().join("storage.json")).unwrap();
    SessionStores::new(Arc::new(persistent), Arc::new(MemoryStore::new()))
}

#[tokio::test]
async fn test_open_edit_save_round_trip() {
    let api = contents();
    api.insert_file("docs/guide.md", "# Guide\n");
    let library = library(&api);

    let entry = library.list().await.unwrap().remove(0);
    let document = library.load(&entry).await.unwrap();
    let refreshed = library
        .save(&SaveRequest {
            file_name: document.name().to_string(),
            body: format!("{}\nMore text.\n", document.content),
            original: Some(document.entry.clone()),
        })
        .await
        .unwrap();

    assert!(!refreshed.outcome.created);
    assert_eq!(
        api.file_text("docs/guide.md").as_deref(),
        Some("# Guide\n\nMore text.\n")
    );
    let listed = refreshed.documents.unwrap();
    assert_ne!(listed[0].sha, entry.sha, "the listing carries the new hash");

    let commits = api.commits();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].message, "Update guide.md");
    assert_eq!(commits[0].branch, "main");
}

#[tokio::test]
async fn test_saving_twice_with_the_same_sha_conflicts() {
    let api = contents();
    api.insert_file("docs/guide.md", "v1");
    let library = library(&api);
    let entry = library.list().await.unwrap().remove(0);
    let request = SaveRequest {
        file_name: "guide.md".to_string(),
        body: "v2".to_string(),
        original: Some(entry),
    };

    library.save(&request).await.unwrap();
    let err = library.save(&request).await.unwrap_err();

    assert!(matches!(err, DocsError::Api(ref e) if e.is_conflict()), "got {err:?}");
    assert_eq!(api.file_text("docs/guide.md").as_deref(), Some("v2"));
}

#[tokio::test]
async fn test_renaming_in_the_editor_creates_a_new_file() {
    let api = contents();
    api.insert_file("docs/old.md", "body");
    let library = library(&api);
    let entry = library.list().await.unwrap().remove(0);

    let refreshed = library
        .save(&SaveRequest {
            file_name: "new.md".to_string(),
            body: "body".to_string(),
            original: Some(entry),
        })
        .await
        .unwrap();

    assert!(refreshed.outcome.created);
    assert!(api.file_text("docs/old.md").is_some());
    assert!(api.file_text("docs/new.md").is_some());
}

#[tokio::test]
async fn test_invalid_names_never_reach_the_network() {
    let api = contents();
    let library = library(&api);

    for name in ["notes.txt", "", "  ", ".md", "dir/x.md"] {
        let err = library.upload(name, "text").await.unwrap_err();
        assert!(err.is_validation(), "{name:?} gave {err:?}");
    }
    assert_eq!(api.request_count(), 0);
}

#[tokio::test]
async fn test_batch_upload_reports_each_file() {
    let api = contents();
    let dir = TempDir::new().unwrap();
    let mut paths = write_files(
        dir.path(),
        &[("a.md", "# A"), ("notes.txt", "plain"), ("b.md", "# B")],
    );
    paths.push(dir.path().join("missing.md"));

    let report = library(&api).upload_paths(&paths).await;

    assert_eq!(report.uploaded(), 2);
    assert!(matches!(
        &report.results[1],
        UploadResult::Skipped { file_name, reason: DocsError::NotMarkdown(_) } if file_name == "notes.txt"
    ));
    assert!(matches!(
        &report.results[3],
        UploadResult::Failed { file_name, error: DocsError::Io(_) } if file_name == "missing.md"
    ));
    assert_eq!(report.documents.unwrap().unwrap().len(), 2);
    assert_eq!(api.file_text("docs/a.md").as_deref(), Some("# A"));
}

/// Passes everything through but fails directory listings once armed.
struct FailingListing {
    inner: InMemoryContents,
    armed: AtomicBool,
}

#[async_trait]
impl ContentsApi for FailingListing {
    async fn current_user(&self) -> Result<User, ApiError> {
        self.inner.current_user().await
    }

    async fn list_directory(
        &self,
        target: &RepoTarget,
        dir: &str,
    ) -> Result<Vec<ContentItem>, ApiError> {
        if self.armed.load(Ordering::SeqCst) {
            return Err(ApiError::Network("connection reset".to_string()));
        }
        self.inner.list_directory(target, dir).await
    }

    async fn get_file(&self, target: &RepoTarget, path: &str) -> Result<ContentItem, ApiError> {
        self.inner.get_file(target, path).await
    }

    async fn put_file(
        &self,
        target: &RepoTarget,
        path: &str,
        request: &PutContentRequest,
    ) -> Result<PutContentResponse, ApiError> {
        self.inner.put_file(target, path, request).await
    }

    async fn delete_file(
        &self,
        target: &RepoTarget,
        path: &str,
        request: &DeleteContentRequest,
    ) -> Result<(), ApiError> {
        self.inner.delete_file(target, path, request).await
    }
}

#[tokio::test]
async fn test_failed_reload_does_not_undo_the_commit() {
    let api = contents();
    api.insert_file("docs/b.md", "# B");
    let flaky = Arc::new(FailingListing {
        inner: api.with_token(TOKEN),
        armed: AtomicBool::new(false),
    });
    let library = DocumentLibrary::new(Arc::clone(&flaky), target());
    let entry = library.list().await.unwrap().remove(0);
    flaky.armed.store(true, Ordering::SeqCst);

    let refreshed = library.upload("a.md", "# A").await.unwrap();
    assert!(refreshed.outcome.created);
    assert!(refreshed.documents.is_err());
    assert_eq!(api.file_text("docs/a.md").as_deref(), Some("# A"));

    let refreshed = library.delete(&entry).await.unwrap();
    assert!(refreshed.documents.is_err());
    assert!(api.file_text("docs/b.md").is_none());
}

#[tokio::test]
async fn test_download_writes_the_document() {
    let api = contents();
    api.insert_file("docs/guide.md", "# Guide\n");
    let library = library(&api);
    let entry = library.list().await.unwrap().remove(0);
    let document = library.load(&entry).await.unwrap();
    let dir = TempDir::new().unwrap();

    let path = docs::download(&document, &dir.path().join("out"))
        .await
        .unwrap();

    assert_eq!(path, dir.path().join("out").join("guide.md"));
    assert_eq!(std::fs::read_to_string(path).unwrap(), "# Guide\n");
}

#[tokio::test]
async fn test_session_survives_restart_with_file_store() {
    let api = contents();
    let dir = TempDir::new().unwrap();

    {
        let stores = file_stores(&dir);
        let session = auth::login(&api.with_token(TOKEN), &stores, TOKEN)
            .await
            .unwrap();
        assert_eq!(session.login(), LOGIN);
    }

    // A fresh process: new ephemeral store, same storage file
    let stores = file_stores(&dir);
    let session = auth::restore(&stores, |token| Arc::new(api.with_token(token)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session.login(), LOGIN);
    assert_eq!(session.token, TOKEN);

    auth::logout(&stores).unwrap();
    let reopened = file_stores(&dir);
    assert!(reopened.stored_token().is_none());
}

#[tokio::test]
async fn test_rejected_token_clears_stored_credential() {
    let api = contents();
    let stores = memory_stores();
    stores.persistent.set(TOKEN_KEY, "ghp_revoked").unwrap();

    let err = auth::restore(&stores, |token| Arc::new(api.with_token(token)))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::InvalidToken(_)), "got {err:?}");
    assert!(stores.stored_token().is_none());
}

fn oauth_config() -> OAuthConfig {
    OAuthConfig::new("Iv1.client", "http://localhost:8976/callback")
}

fn state_of(url: &Url) -> String {
    url.query_pairs()
        .find(|(k, _)| k == "state")
        .map(|(_, v)| v.into_owned())
        .unwrap()
}

#[test]
fn test_oauth_callback_with_matching_state_yields_code() {
    let store = MemoryStore::new();
    let now = Utc::now();
    let url = oauth::begin_authorization(&oauth_config(), &store, now).unwrap();
    let state = state_of(&url);
    assert_eq!(state.len(), 32);

    let callback = format!("http://localhost:8976/callback?code=abc123&state={state}");
    let code = oauth::handle_callback(&store, &callback, now + Duration::seconds(30)).unwrap();
    assert_eq!(code, "abc123");

    // The state is single use
    let err = oauth::handle_callback(&store, &callback, now).unwrap_err();
    assert!(matches!(err, AuthError::Csrf(CsrfError::MissingState)));
}

#[test]
fn test_oauth_callback_with_forged_state_is_rejected() {
    let store = MemoryStore::new();
    let now = Utc::now();
    oauth::begin_authorization(&oauth_config(), &store, now).unwrap();

    let callback = "http://localhost:8976/callback?code=abc123&state=forged";
    let err = oauth::handle_callback(&store, callback, now).unwrap_err();
    assert!(matches!(err, AuthError::Csrf(CsrfError::StateMismatch)));
    assert!(store.is_empty(), "a failed check still consumes the state");
}

#[test]
fn test_oauth_state_expires_after_five_minutes() {
    let store = MemoryStore::new();
    let issued = Utc::now();
    let url = oauth::begin_authorization(&oauth_config(), &store, issued).unwrap();
    let callback = format!(
        "http://localhost:8976/callback?code=abc&state={}",
        state_of(&url)
    );

    let err = oauth::handle_callback(&store, &callback, issued + Duration::minutes(6)).unwrap_err();
    assert!(matches!(err, AuthError::Csrf(CsrfError::Expired)));
}

#[test]
fn test_oauth_denial_is_reported() {
    let store = MemoryStore::new();
    let now = Utc::now();
    oauth::begin_authorization(&oauth_config(), &store, now).unwrap();

    let callback = "http://localhost:8976/callback?error=access_denied&error_description=The+user+declined";
    let err = oauth::handle_callback(&store, callback, now).unwrap_err();
    assert!(matches!(err, AuthError::Denied(ref msg) if msg == "The user declined"));
}

//! Application flows driven through key events with effects run inline.

use std::sync::Arc;

use crossterm::event::KeyCode;
use mdocs::config::{Config, ThemeMode};
use mdocs::storage::{KeyValueStore, TOKEN_KEY};
use mdocs::ui::{AppEvent, Effect, InputMode};
use mdocs::view::ScreenKind;
use mdocs::{App, InMemoryContents, RepoTarget};
use tempfile::TempDir;

use super::common::{
    app, char_key, contents, ctrl, key, memory_stores, paste, press, write_files, LOGIN, TOKEN,
};

/// App that is already logged in with the listing loaded.
async fn logged_in(api: &InMemoryContents, dir: &TempDir) -> App {
    let stores = memory_stores();
    stores.persistent.set(TOKEN_KEY, TOKEN).unwrap();
    let mut app = app(api, stores, dir.path());
    let effects = app.startup();
    app.run_effects(effects).await;
    assert!(app.store().is_logged_in());
    app
}

fn names(app: &App) -> Vec<String> {
    app.store()
        .visible_documents()
        .into_iter()
        .map(|entry| entry.name.clone())
        .collect()
}

fn screen(app: &App) -> ScreenKind {
    app.store().screen().kind()
}

#[tokio::test]
async fn test_startup_restores_session_and_loads_listing() {
    let api = contents();
    api.insert_file("docs/b.md", "# B");
    api.insert_file("docs/a.md", "# A");
    let dir = TempDir::new().unwrap();

    let app = logged_in(&api, &dir).await;

    assert_eq!(app.store().session().unwrap().login(), LOGIN);
    assert_eq!(names(&app), vec!["a.md", "b.md"]);
    assert_eq!(screen(&app), ScreenKind::Welcome);
    assert!(!app.store().is_busy());
}

#[tokio::test]
async fn test_startup_without_token_stays_logged_out() {
    let api = contents();
    let dir = TempDir::new().unwrap();
    let mut app = app(&api, memory_stores(), dir.path());

    let effects = app.startup();
    app.run_effects(effects).await;

    assert!(!app.store().is_logged_in());
    assert_eq!(api.request_count(), 0);
}

#[tokio::test]
async fn test_login_dialog_with_valid_token() {
    let api = contents();
    api.insert_file("docs/a.md", "# A");
    let dir = TempDir::new().unwrap();
    let stores = memory_stores();
    let mut app = app(&api, stores.clone(), dir.path());

    press(&mut app, [char_key('l')]).await;
    assert_eq!(app.input_mode(), InputMode::LoggingIn);
    press(&mut app, [paste(TOKEN), key(KeyCode::Enter)]).await;

    assert!(!app.ui().login.is_visible());
    assert_eq!(app.store().session().unwrap().login(), LOGIN);
    assert_eq!(stores.stored_token().as_deref(), Some(TOKEN));
    assert_eq!(names(&app), vec!["a.md"]);
}

#[tokio::test]
async fn test_login_dialog_with_rejected_token() {
    let api = contents();
    let dir = TempDir::new().unwrap();
    let stores = memory_stores();
    let mut app = app(&api, stores.clone(), dir.path());

    press(
        &mut app,
        [char_key('l'), paste("ghp_nope"), key(KeyCode::Enter)],
    )
    .await;

    assert!(app.ui().login.is_visible());
    let error = app.ui().login.error.clone().unwrap();
    assert!(error.contains("Failed to authenticate"), "{error}");
    assert!(stores.stored_token().is_none());
    assert!(!app.store().is_busy());
}

#[tokio::test]
async fn test_empty_token_is_refused_locally() {
    let api = contents();
    let dir = TempDir::new().unwrap();
    let mut app = app(&api, memory_stores(), dir.path());

    press(&mut app, [char_key('l'), key(KeyCode::Enter)]).await;

    assert_eq!(
        app.ui().login.error.as_deref(),
        Some("Please enter a personal access token")
    );
    assert_eq!(api.request_count(), 0);
}

#[tokio::test]
async fn test_open_edit_and_save_document() {
    let api = contents();
    api.insert_file("docs/guide.md", "# Guide\n");
    let dir = TempDir::new().unwrap();
    let mut app = logged_in(&api, &dir).await;

    press(&mut app, [key(KeyCode::Enter)]).await;
    assert_eq!(screen(&app), ScreenKind::Viewer);
    assert_eq!(app.store().current_document().unwrap().content, "# Guide\n");

    press(&mut app, [char_key('e')]).await;
    assert_eq!(app.input_mode(), InputMode::Editing);
    press(&mut app, [paste("Intro. "), ctrl('s')]).await;

    assert_eq!(screen(&app), ScreenKind::Welcome);
    assert!(app.ui().editor.is_none());
    assert_eq!(
        api.file_text("docs/guide.md").as_deref(),
        Some("Intro. # Guide\n")
    );
    assert_eq!(
        app.store().notice().unwrap().text,
        "Updated docs/guide.md"
    );
    assert_eq!(api.commits()[0].message, "Update guide.md");
}

#[tokio::test]
async fn test_new_document_is_created() {
    let api = contents();
    let dir = TempDir::new().unwrap();
    let mut app = logged_in(&api, &dir).await;

    press(
        &mut app,
        [
            char_key('n'),
            paste("fresh.md"),
            key(KeyCode::Tab),
            paste("# Fresh"),
            ctrl('s'),
        ],
    )
    .await;

    assert_eq!(api.file_text("docs/fresh.md").as_deref(), Some("# Fresh"));
    assert_eq!(names(&app), vec!["fresh.md"]);
    assert_eq!(app.store().notice().unwrap().text, "Created docs/fresh.md");
}

#[tokio::test]
async fn test_non_markdown_name_is_refused_before_any_request() {
    let api = contents();
    let dir = TempDir::new().unwrap();
    let mut app = logged_in(&api, &dir).await;
    let before = api.request_count();

    press(&mut app, [char_key('n'), paste("notes.txt"), ctrl('s')]).await;

    assert_eq!(app.input_mode(), InputMode::ShowingError);
    assert!(app.ui().error.message.contains("Only .md files"));
    assert_eq!(screen(&app), ScreenKind::Editor);
    assert_eq!(api.request_count(), before);
}

#[tokio::test]
async fn test_stale_save_keeps_the_draft() {
    let api = contents();
    api.insert_file("docs/guide.md", "v1");
    let dir = TempDir::new().unwrap();
    let mut app = logged_in(&api, &dir).await;

    press(&mut app, [key(KeyCode::Enter), char_key('e'), paste("mine ")]).await;
    api.insert_file("docs/guide.md", "changed elsewhere");
    press(&mut app, [ctrl('s')]).await;

    assert_eq!(app.input_mode(), InputMode::ShowingError);
    assert!(app
        .ui()
        .error
        .message
        .contains("changed in the repository since it was opened"));
    assert_eq!(screen(&app), ScreenKind::Editor);
    assert_eq!(app.store().screen().draft().unwrap().body, "mine v1");
    assert_eq!(
        api.file_text("docs/guide.md").as_deref(),
        Some("changed elsewhere")
    );
}

#[tokio::test]
async fn test_deleting_the_open_document_returns_to_welcome() {
    let api = contents();
    api.insert_file("docs/a.md", "# A");
    api.insert_file("docs/b.md", "# B");
    let dir = TempDir::new().unwrap();
    let mut app = logged_in(&api, &dir).await;

    press(&mut app, [key(KeyCode::Down), key(KeyCode::Enter)]).await;
    assert_eq!(app.store().current_document().unwrap().name(), "b.md");

    press(&mut app, [char_key('d')]).await;
    assert_eq!(app.input_mode(), InputMode::Confirming);
    press(&mut app, [char_key('y')]).await;

    assert_eq!(screen(&app), ScreenKind::Welcome);
    assert!(api.file_text("docs/b.md").is_none());
    assert_eq!(names(&app), vec!["a.md"]);
    assert_eq!(app.ui().list.selected, 0);
}

#[tokio::test]
async fn test_declining_delete_keeps_the_document() {
    let api = contents();
    api.insert_file("docs/a.md", "# A");
    let dir = TempDir::new().unwrap();
    let mut app = logged_in(&api, &dir).await;

    press(&mut app, [char_key('d'), char_key('n')]).await;

    assert_eq!(app.input_mode(), InputMode::Browse);
    assert!(api.file_text("docs/a.md").is_some());
}

#[tokio::test]
async fn test_leaving_a_dirty_editor_asks_first() {
    let api = contents();
    api.insert_file("docs/a.md", "# A");
    let dir = TempDir::new().unwrap();
    let mut app = logged_in(&api, &dir).await;

    press(
        &mut app,
        [key(KeyCode::Enter), char_key('e'), paste("x"), key(KeyCode::Esc)],
    )
    .await;
    assert_eq!(app.input_mode(), InputMode::Confirming);

    press(&mut app, [char_key('n')]).await;
    assert_eq!(screen(&app), ScreenKind::Editor);

    press(&mut app, [key(KeyCode::Esc), char_key('y')]).await;
    assert_eq!(screen(&app), ScreenKind::Viewer);
    assert_eq!(app.store().current_document().unwrap().content, "# A");
    assert!(api.commits().is_empty());
}

#[tokio::test]
async fn test_clean_editor_closes_without_asking() {
    let api = contents();
    api.insert_file("docs/a.md", "# A");
    let dir = TempDir::new().unwrap();
    let mut app = logged_in(&api, &dir).await;

    press(
        &mut app,
        [key(KeyCode::Enter), char_key('e'), key(KeyCode::Esc)],
    )
    .await;

    assert_eq!(app.input_mode(), InputMode::Browse);
    assert_eq!(screen(&app), ScreenKind::Viewer);
}

#[tokio::test]
async fn test_search_filters_and_escape_clears() {
    let api = contents();
    for name in ["Guide.md", "notes.md", "guidelines.md"] {
        api.insert_file(&format!("docs/{name}"), "x");
    }
    let dir = TempDir::new().unwrap();
    let mut app = logged_in(&api, &dir).await;

    press(&mut app, [char_key('/'), paste("GUIDE")]).await;
    assert_eq!(app.input_mode(), InputMode::Searching);
    assert_eq!(names(&app), vec!["Guide.md", "guidelines.md"]);

    press(&mut app, [key(KeyCode::Esc)]).await;
    assert_eq!(names(&app).len(), 3);
    assert_eq!(app.input_mode(), InputMode::Browse);
}

#[tokio::test]
async fn test_second_remote_request_is_ignored_while_busy() {
    let api = contents();
    let dir = TempDir::new().unwrap();
    let mut app = logged_in(&api, &dir).await;

    let first = app.handle_event(char_key('r'));
    assert_eq!(first, vec![Effect::LoadDocuments]);
    assert_eq!(app.store().busy(), Some("Loading documents..."));

    let second = app.handle_event(char_key('r'));
    assert!(second.is_empty());

    app.run_effects(first).await;
    assert!(!app.store().is_busy());
}

#[tokio::test]
async fn test_upload_dialog_uploads_and_reports_skips() {
    let api = contents();
    let dir = TempDir::new().unwrap();
    let files = TempDir::new().unwrap();
    let paths = write_files(files.path(), &[("one.md", "# One"), ("two.txt", "2")]);
    let mut app = logged_in(&api, &dir).await;

    let input = paths
        .iter()
        .map(|p| format!("\"{}\"", p.display()))
        .collect::<Vec<_>>()
        .join(" ");
    press(&mut app, [char_key('u'), paste(&input), key(KeyCode::Enter)]).await;

    assert_eq!(api.file_text("docs/one.md").as_deref(), Some("# One"));
    assert_eq!(names(&app), vec!["one.md"]);
    assert_eq!(app.input_mode(), InputMode::ShowingError);
    let details = app.ui().error.details.clone().unwrap();
    assert!(details.contains("two.txt"), "{details}");
}

#[tokio::test]
async fn test_download_writes_into_download_dir() {
    let api = contents();
    api.insert_file("docs/a.md", "# A\n");
    let dir = TempDir::new().unwrap();
    let mut app = logged_in(&api, &dir).await;

    press(&mut app, [key(KeyCode::Enter), char_key('s')]).await;

    let saved = dir.path().join("downloads").join("a.md");
    assert_eq!(std::fs::read_to_string(&saved).unwrap(), "# A\n");
    assert!(app.store().notice().unwrap().text.starts_with("Saved "));
}

#[tokio::test]
async fn test_repository_dialog_saves_config_and_reloads() {
    let api = contents();
    let dir = TempDir::new().unwrap();
    let stores = memory_stores();
    stores.persistent.set(TOKEN_KEY, TOKEN).unwrap();
    let mut app = App::new(
        Config::default(),
        dir.path().join("config.toml"),
        stores,
        Arc::new(api.clone()),
    );
    let effects = app.startup();
    app.run_effects(effects).await;
    api.insert_file("wiki/page.md", "# Page");

    press(&mut app, [char_key('c')]).await;
    assert_eq!(app.input_mode(), InputMode::ConfiguringRepo);
    press(
        &mut app,
        [
            paste("octo"),
            key(KeyCode::Tab),
            paste("handbook"),
            key(KeyCode::Tab),
            ctrl('u'),
            paste("wiki"),
            key(KeyCode::Enter),
        ],
    )
    .await;

    let expected = RepoTarget::new("octo", "handbook", "wiki", "main");
    assert_eq!(app.store().target(), &expected);
    assert_eq!(names(&app), vec!["page.md"]);
    let saved = Config::load_from(&dir.path().join("config.toml"));
    assert_eq!(saved.repository, expected);
}

#[tokio::test]
async fn test_repository_dialog_requires_owner_and_name() {
    let api = contents();
    let dir = TempDir::new().unwrap();
    let mut app = App::new(
        Config::default(),
        dir.path().join("config.toml"),
        memory_stores(),
        Arc::new(api.clone()),
    );

    press(&mut app, [char_key('c'), paste("octo"), key(KeyCode::Enter)]).await;

    assert!(app.ui().repo.is_visible());
    assert_eq!(
        app.ui().repo.error.as_deref(),
        Some("Owner and repository are required")
    );
    assert!(!dir.path().join("config.toml").exists());
}

#[tokio::test]
async fn test_theme_toggle_is_saved() {
    let api = contents();
    let dir = TempDir::new().unwrap();
    let mut app = logged_in(&api, &dir).await;

    press(&mut app, [char_key('t')]).await;
    assert_eq!(app.store().theme(), ThemeMode::Light);
    let saved = Config::load_from(&dir.path().join("config.toml"));
    assert_eq!(saved.theme, ThemeMode::Light);

    press(&mut app, [char_key('t')]).await;
    assert_eq!(app.store().theme(), ThemeMode::Dark);
}

#[tokio::test]
async fn test_logout_clears_session_and_listing() {
    let api = contents();
    api.insert_file("docs/a.md", "# A");
    let dir = TempDir::new().unwrap();
    let stores = memory_stores();
    stores.persistent.set(TOKEN_KEY, TOKEN).unwrap();
    let mut app = app(&api, stores.clone(), dir.path());
    let effects = app.startup();
    app.run_effects(effects).await;

    press(&mut app, [key(KeyCode::Enter), char_key('L'), char_key('y')]).await;

    assert!(!app.store().is_logged_in());
    assert!(app.store().documents().is_empty());
    assert_eq!(screen(&app), ScreenKind::Welcome);
    assert!(stores.stored_token().is_none());
}

#[tokio::test]
async fn test_actions_that_need_login_show_an_error() {
    let api = contents();
    let dir = TempDir::new().unwrap();
    let mut app = app(&api, memory_stores(), dir.path());

    press(&mut app, [char_key('n')]).await;

    assert_eq!(app.input_mode(), InputMode::ShowingError);
    assert_eq!(app.ui().error.title, "Not logged in");
    assert_eq!(screen(&app), ScreenKind::Welcome);
}

#[tokio::test]
async fn test_quit_keys() {
    let api = contents();
    let dir = TempDir::new().unwrap();

    let mut app = app(&api, memory_stores(), dir.path());
    press(&mut app, [char_key('q')]).await;
    assert!(app.should_quit());

    // q types into the search box instead of quitting
    let mut app = super::common::app(&api, memory_stores(), dir.path());
    press(&mut app, [char_key('/'), char_key('q')]).await;
    assert!(!app.should_quit());
    press(&mut app, [ctrl('c')]).await;
    assert!(app.should_quit());

    let mut app = super::common::app(&api, memory_stores(), dir.path());
    app.process(AppEvent::Quit).await;
    assert!(app.should_quit());
}

#[tokio::test]
async fn test_save_finishing_after_the_editor_was_left() {
    let api = contents();
    api.insert_file("docs/guide.md", "# Guide\n");
    let dir = TempDir::new().unwrap();
    let mut app = logged_in(&api, &dir).await;
    let old_sha = app.store().documents()[0].sha.clone();

    press(&mut app, [key(KeyCode::Enter), char_key('e'), paste("Intro. ")]).await;
    let save = app.handle_event(ctrl('s'));
    assert!(matches!(save.as_slice(), [Effect::SaveDocument(_)]));

    // Leave the editor while the commit is still outstanding
    press(&mut app, [key(KeyCode::Esc), char_key('y')]).await;
    assert_eq!(screen(&app), ScreenKind::Viewer);
    app.run_effects(save).await;

    assert!(!app.store().is_busy());
    assert_eq!(screen(&app), ScreenKind::Viewer);
    assert_eq!(
        app.store().notice().unwrap().text,
        "Updated docs/guide.md"
    );
    let listed = &app.store().documents()[0];
    assert_ne!(listed.sha, old_sha);
    let shown = app.store().current_document().unwrap();
    assert_eq!(shown.content, "Intro. # Guide\n");
    assert_eq!(shown.sha(), listed.sha);

    // The viewer holds the new hash, so the next edit saves cleanly
    press(&mut app, [char_key('e'), paste("More. "), ctrl('s')]).await;
    assert_eq!(app.input_mode(), InputMode::Browse);
    assert_eq!(
        api.file_text("docs/guide.md").as_deref(),
        Some("More. Intro. # Guide\n")
    );
    assert_eq!(api.commits().len(), 2);
}

#[tokio::test]
async fn test_listing_from_previous_repository_is_dropped() {
    let api = contents();
    api.insert_file("docs/old.md", "# Old");
    api.insert_file("wiki/page.md", "# Page");
    let dir = TempDir::new().unwrap();
    let mut app = logged_in(&api, &dir).await;
    let old_listing = app.store().documents().to_vec();

    let load = app.handle_event(char_key('r'));
    assert_eq!(load, vec![Effect::LoadDocuments]);

    press(
        &mut app,
        [
            char_key('c'),
            key(KeyCode::Tab),
            key(KeyCode::Tab),
            ctrl('u'),
            paste("wiki"),
            key(KeyCode::Enter),
        ],
    )
    .await;
    assert_eq!(app.store().target().path, "wiki");

    // The load issued for docs/ lands after the switch
    let follow_up = app.handle_event(AppEvent::DocumentsLoaded(Ok(old_listing)));
    assert!(app.store().documents().is_empty());
    assert_eq!(follow_up, vec![Effect::LoadDocuments]);

    app.run_effects(follow_up).await;
    assert_eq!(names(&app), vec!["page.md"]);
    assert_eq!(app.store().documents()[0].path, "wiki/page.md");
    assert!(!app.store().is_busy());
    assert!(!app.ui().error.is_visible());
}

#[tokio::test]
async fn test_listing_arriving_after_logout_is_dropped() {
    let api = contents();
    api.insert_file("docs/a.md", "# A");
    let dir = TempDir::new().unwrap();
    let mut app = logged_in(&api, &dir).await;
    let old_listing = app.store().documents().to_vec();

    let load = app.handle_event(char_key('r'));
    assert_eq!(load, vec![Effect::LoadDocuments]);
    press(&mut app, [char_key('L'), char_key('y')]).await;
    assert!(!app.store().is_logged_in());

    let follow_up = app.handle_event(AppEvent::DocumentsLoaded(Ok(old_listing)));

    assert!(follow_up.is_empty());
    assert!(app.store().documents().is_empty());
    assert!(!app.store().is_busy());
    assert_eq!(screen(&app), ScreenKind::Welcome);
}

#[tokio::test]
async fn test_commit_after_repository_switch_leaves_new_listing_alone() {
    let api = contents();
    api.insert_file("docs/a.md", "# A");
    api.insert_file("wiki/a.md", "# Wiki A");
    let dir = TempDir::new().unwrap();
    let mut app = logged_in(&api, &dir).await;

    press(&mut app, [key(KeyCode::Enter)]).await;
    press(&mut app, [char_key('d')]).await;
    let delete = app.handle_event(char_key('y'));
    assert!(matches!(delete.as_slice(), [Effect::DeleteDocument(_)]));

    press(
        &mut app,
        [
            char_key('c'),
            key(KeyCode::Tab),
            key(KeyCode::Tab),
            ctrl('u'),
            paste("wiki"),
            key(KeyCode::Enter),
        ],
    )
    .await;
    app.run_effects(delete).await;

    assert_eq!(names(&app), vec!["a.md"]);
    assert_eq!(app.store().documents()[0].path, "wiki/a.md");
    assert_eq!(app.store().notice().unwrap().text, "Deleted docs/a.md");
}

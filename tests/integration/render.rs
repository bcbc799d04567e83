//! Full-screen rendering through a TestBackend.

use crossterm::event::KeyCode;
use tempfile::TempDir;

use mdocs::storage::{KeyValueStore, TOKEN_KEY};
use mdocs::App;

use super::common::terminal::{assert_not_on_screen, assert_on_screen, render_app};
use super::common::{app, char_key, contents, key, memory_stores, press, TOKEN};

async fn logged_in_app(dir: &TempDir) -> App {
    let api = contents();
    api.insert_file(
        "docs/guide.md",
        "# Guide\n\nSome body text.\n\n- first item\n- second item\n",
    );
    api.insert_file("docs/notes.md", "notes");
    let stores = memory_stores();
    stores.persistent.set(TOKEN_KEY, TOKEN).unwrap();
    let mut app = app(&api, stores, dir.path());
    let effects = app.startup();
    app.run_effects(effects).await;
    app
}

#[tokio::test]
async fn test_logged_out_welcome_screen() {
    let dir = TempDir::new().unwrap();
    let mut app = app(&contents(), memory_stores(), dir.path());

    let buffer = render_app(&mut app, 100, 30);

    assert_on_screen(&buffer, "Log in to list documents");
    assert_on_screen(&buffer, "Not signed in");
    assert_on_screen(&buffer, "to log in with a personal access token");
    assert_on_screen(&buffer, "logged out");
    assert_on_screen(&buffer, "? help");
}

#[tokio::test]
async fn test_listing_and_status_after_login() {
    let dir = TempDir::new().unwrap();
    let mut app = logged_in_app(&dir).await;

    let buffer = render_app(&mut app, 100, 30);

    assert_on_screen(&buffer, "Documents (2)");
    assert_on_screen(&buffer, "guide.md");
    assert_on_screen(&buffer, "notes.md");
    assert_on_screen(&buffer, "@octo");
    assert_on_screen(&buffer, "Signed in as octo");
}

#[tokio::test]
async fn test_viewer_renders_markdown() {
    let dir = TempDir::new().unwrap();
    let mut app = logged_in_app(&dir).await;
    press(&mut app, [key(KeyCode::Enter)]).await;

    let buffer = render_app(&mut app, 100, 30);

    assert_on_screen(&buffer, "docs/guide.md");
    assert_on_screen(&buffer, "Guide");
    assert_on_screen(&buffer, "Some body text.");
    assert_on_screen(&buffer, "first item");
    assert_not_on_screen(&buffer, "# Guide");
}

#[tokio::test]
async fn test_search_narrows_the_list_title() {
    let dir = TempDir::new().unwrap();
    let mut app = logged_in_app(&dir).await;
    press(&mut app, [char_key('/'), char_key('n'), char_key('o')]).await;

    let buffer = render_app(&mut app, 100, 30);

    assert_on_screen(&buffer, "Documents (1/2)");
    assert_on_screen(&buffer, "notes.md");
    assert_not_on_screen(&buffer, "guide.md");
}

#[tokio::test]
async fn test_editor_shows_name_and_preview() {
    let dir = TempDir::new().unwrap();
    let mut app = logged_in_app(&dir).await;
    press(&mut app, [key(KeyCode::Enter), char_key('e')]).await;

    let buffer = render_app(&mut app, 120, 30);

    assert_on_screen(&buffer, "Edit guide.md");
    assert_on_screen(&buffer, "# Guide");
    assert_on_screen(&buffer, "Some body text.");
}

#[tokio::test]
async fn test_help_and_delete_overlays() {
    let dir = TempDir::new().unwrap();
    let mut app = logged_in_app(&dir).await;

    press(&mut app, [char_key('?')]).await;
    let buffer = render_app(&mut app, 100, 40);
    assert_on_screen(&buffer, "Keybindings");
    assert_on_screen(&buffer, "Save (commit)");

    press(&mut app, [key(KeyCode::Esc), char_key('d')]).await;
    let buffer = render_app(&mut app, 100, 40);
    assert_not_on_screen(&buffer, "Keybindings");
    assert_on_screen(&buffer, "Delete guide.md?");
}

#[tokio::test]
async fn test_narrow_terminal_does_not_panic() {
    let dir = TempDir::new().unwrap();
    let mut app = logged_in_app(&dir).await;
    press(&mut app, [key(KeyCode::Enter), char_key('?')]).await;

    for (width, height) in [(20, 5), (40, 10), (1, 1)] {
        render_app(&mut app, width, height);
    }
}

use tempfile::TempDir;

use crate::core::app::App;
use crate::core::config::Config;

/// App wired to a throwaway history directory. The `TempDir` must stay
/// alive as long as the app does.
pub fn create_test_app() -> (App, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        endpoint: Some("http://localhost:9999/chat".to_string()),
        session_id: Some("test-session".to_string()),
    };
    let app = App::new(&config, dir.path().join("history.json"));
    (app, dir)
}

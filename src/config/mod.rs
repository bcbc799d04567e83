mod settings;

pub use settings::{
    save_repository, save_repository_to, save_theme, save_theme_to, ApiConfig, Config, ThemeMode,
    DEFAULT_API_BASE_URL, DEFAULT_OAUTH_REDIRECT_URI, EXAMPLE_CONFIG,
};

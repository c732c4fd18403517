use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Repository layout
// ---------------------------------------------------------------------------

pub const BASE_TEMPLATES_DIR: &str = "base_templates";
pub const UPDATED_LETTERS_DIR: &str = "updated_letters";
pub const SIGNATURES_CONFIG: &str = "config/signatures.json";

pub const TEXT_EXTENSIONS: &[&str] = &[".txt", ".md", ".html"];
pub const LIVE_SUFFIX: &str = "_live.txt";

// ---------------------------------------------------------------------------
// Local files
// ---------------------------------------------------------------------------

pub const SETTINGS_FILE: &str = "letterbox.yaml";
pub const TOKEN_FILE: &str = ".config/letterbox/token";

pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_API_URL: &str = "https://api.github.com";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn settings_path(root: &Path) -> PathBuf {
    root.join(SETTINGS_FILE)
}

pub fn token_path(home: &Path) -> PathBuf {
    home.join(TOKEN_FILE)
}

/// Join repository path segments with `/`, ignoring empty parts.
pub fn repo_join(folder: &str, name: &str) -> String {
    let folder = folder.trim_matches('/');
    let name = name.trim_start_matches('/');
    if folder.is_empty() {
        name.to_string()
    } else {
        format!("{folder}/{name}")
    }
}

/// Final segment of a repository path.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

pub fn is_text_like(name: &str) -> bool {
    TEXT_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

pub fn is_live_letter(name: &str) -> bool {
    name.to_lowercase().ends_with(LIVE_SUFFIX)
}

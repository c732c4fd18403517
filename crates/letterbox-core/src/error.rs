use thiserror::Error;

#[derive(Debug, Error)]
pub enum LetterboxError {
    #[error("tags not found: {start}, {end}")]
    TagsNotFound { start: String, end: String },

    #[error("unknown location '{0}': expected denver or wslope")]
    InvalidLocation(String),

    #[error("unknown wording scope '{0}': expected denver, wslope or both")]
    InvalidScope(String),

    #[error("location not found in signature config: {0}")]
    LocationNotFound(String),

    #[error("signature set '{preset}' not found for location '{location}'")]
    PresetNotFound { location: String, preset: String },

    #[error("invalid signee '{0}': expected NAME|TITLE|MIN_GIFT")]
    InvalidSignee(String),

    #[error("invalid minimum gift '{0}': must be a non-negative number")]
    InvalidMinGift(String),

    #[error("custom signature sets hold between 1 and {max} signees, got {count}")]
    TierSetSize { count: usize, max: usize },

    #[error("signature set is empty")]
    EmptyTierSet,

    #[error("no wording supplied for {0}")]
    MissingWording(String),

    #[error("GitHub token not found: pass --token or set GITHUB_TOKEN")]
    MissingToken,

    #[error("repository not configured: set owner and repo")]
    RepoNotConfigured,

    #[error("invalid API url '{0}'")]
    InvalidApiUrl(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("stale version for {0}: the file changed since it was read")]
    StaleVersion(String),

    #[error("unexpected contents for {0}: expected a file")]
    NotAFile(String),

    #[error("cannot read {path}: content encoding '{encoding}' is not supported (files over 1 MB are served without content)")]
    UnsupportedEncoding { path: String, encoding: String },

    #[error("invalid repository path '{0}': '..' segments are not allowed")]
    InvalidPath(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Base64(#[from] base64::DecodeError),

    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LetterboxError>;

pub mod config;
pub mod error;
pub mod github;
pub mod io;
pub mod local;
pub mod paragraphs;
pub mod paths;
pub mod session;
pub mod signature;
pub mod store;
pub mod tags;
pub mod token;
pub mod types;
pub mod update;

pub use error::{LetterboxError, Result};

use crate::config::{Settings, SignatureConfig};
use crate::error::Result;
use crate::store::{self, RepositoryStore, VersionToken};

/// Everything an operation needs for one run: the store to talk to and the
/// settings that locate folders, branch and signature config inside it.
pub struct Session {
    store: Box<dyn RepositoryStore>,
    settings: Settings,
}

impl Session {
    pub fn new(store: Box<dyn RepositoryStore>, settings: Settings) -> Self {
        Self { store, settings }
    }

    pub fn store(&self) -> &dyn RepositoryStore {
        self.store.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn branch(&self) -> &str {
        &self.settings.branch
    }

    pub fn load_signature_config(&self) -> Result<(SignatureConfig, VersionToken)> {
        store::read_json(self.store(), &self.settings.signatures_path, self.branch())
    }
}

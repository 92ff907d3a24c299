//! Background music lookup.

use crate::MusicConfig;
use async_trait::async_trait;
use reelsmith_error::ProviderResult;
use reelsmith_interface::MusicLibrary;
use std::collections::BTreeMap;
use std::path::PathBuf;

const EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "ogg"];

/// Music library answering from a name table, then a directory of files.
#[derive(Debug, Clone, Default)]
pub struct DirectoryMusicLibrary {
    directory: Option<PathBuf>,
    tracks: BTreeMap<String, String>,
}

impl DirectoryMusicLibrary {
    /// Creates a library from configuration.
    pub fn new(config: &MusicConfig) -> Self {
        Self {
            directory: config.directory().clone(),
            tracks: config.tracks().clone(),
        }
    }

    fn is_plain_name(name: &str) -> bool {
        !name.is_empty() && !name.contains(['/', '\\']) && name != "." && name != ".."
    }
}

#[async_trait]
impl MusicLibrary for DirectoryMusicLibrary {
    #[tracing::instrument(skip(self))]
    async fn lookup(&self, name: &str) -> ProviderResult<Option<String>> {
        if let Some(url) = self.tracks.get(name) {
            return Ok(Some(url.clone()));
        }

        let Some(directory) = &self.directory else {
            return Ok(None);
        };
        if !Self::is_plain_name(name) {
            tracing::warn!(name, "Ignoring music name that is not a plain file name");
            return Ok(None);
        }

        for extension in EXTENSIONS {
            let candidate = directory.join(format!("{}.{}", name, extension));
            if tokio::fs::try_exists(&candidate).await.unwrap_or(false) {
                return Ok(Some(candidate.to_string_lossy().into_owned()));
            }
        }
        Ok(None)
    }
}

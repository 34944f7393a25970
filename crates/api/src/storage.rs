//! Uploaded file storage under `MEDIA_ROOT`.
//!
//! Files are addressed by storage-relative names such as `media/poster.png`
//! or `thumbnails/poster_thumb.png`; those names are what the database keeps.

use std::io;
use std::path::PathBuf;

use rand::distr::Alphanumeric;
use rand::Rng;
use tokio::io::AsyncWriteExt;

/// Length of the random suffix appended on name collisions.
const COLLISION_SUFFIX_LEN: usize = 7;

/// Attempts before giving up on finding a free name.
const MAX_NAME_ATTEMPTS: usize = 20;

#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
    base_url: String,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            root: root.into(),
            base_url,
        }
    }

    /// Absolute path of a stored name.
    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Public URL of a stored name.
    pub fn url(&self, name: &str) -> String {
        format!("{}{}", self.base_url, name)
    }

    pub async fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.path(name)).await
    }

    /// Store `bytes` under `dir` using a sanitised form of `file_name`.
    /// When the name is taken, a random suffix is appended to the stem.
    /// Returns the storage name actually used.
    pub async fn save(&self, dir: &str, file_name: &str, bytes: &[u8]) -> io::Result<String> {
        tokio::fs::create_dir_all(self.root.join(dir)).await?;

        let clean = sanitize_file_name(file_name);
        let (stem, ext) = hypeblog_core::media::split_file_name(&clean);

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let candidate = if attempt == 0 {
                format!("{dir}/{clean}")
            } else {
                format!("{dir}/{stem}_{}{ext}", random_suffix())
            };
            let open = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.path(&candidate))
                .await;
            match open {
                Ok(mut file) => {
                    file.write_all(bytes).await?;
                    file.flush().await?;
                    return Ok(candidate);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e),
            }
        }

        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("No free name for {file_name} in {dir}"),
        ))
    }

    /// Remove a stored file. A missing file is not an error.
    pub async fn delete(&self, name: &str) -> io::Result<()> {
        match tokio::fs::remove_file(self.path(name)).await {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

fn random_suffix() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(COLLISION_SUFFIX_LEN)
        .map(char::from)
        .collect()
}

/// Reduce an uploaded file name to a safe base name: path components are
/// dropped, whitespace becomes `_`, only ASCII alphanumerics and `._-` are
/// kept, and leading dots are stripped.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .trim()
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('_')
            } else if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                Some(c)
            } else {
                None
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}

//! Forwarding Config Store
//!
//! Flat-file persistence for [`ForwardConfig`]. The file holds one
//! `KEY=VALUE` pair per line:
//!
//! ```text
//! RTMP_URL=rtmp://live.example.com/app
//! STREAM_KEY=abc123
//! ```
//!
//! Reads never fail: a missing or unreadable file yields the empty config.
//! Writes replace the whole file through a temp file and rename, so a
//! concurrent reader sees either the old or the new content.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use super::ForwardConfig;

/// Key holding the RTMP destination URL
pub const RTMP_URL_KEY: &str = "RTMP_URL";
/// Key holding the stream key
pub const STREAM_KEY_KEY: &str = "STREAM_KEY";

/// File-backed store for the forwarding config
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Create a store backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current config, falling back to empty values
    pub fn read(&self) -> ForwardConfig {
        match fs::read_to_string(&self.path) {
            Ok(content) => parse(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Forwarding config {:?} not found, using empty config", self.path);
                ForwardConfig::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read forwarding config {:?}: {}", self.path, e);
                ForwardConfig::default()
            }
        }
    }

    /// Replace the stored config
    pub fn write(&self, config: &ForwardConfig) -> Result<()> {
        for (key, value) in [(RTMP_URL_KEY, &config.rtmp_url), (STREAM_KEY_KEY, &config.stream_key)] {
            if value.contains(|c: char| c == '\n' || c == '\r') {
                return Err(Error::InvalidArgument(format!(
                    "{} cannot contain line breaks",
                    key
                )));
            }
        }

        replace_file(&self.path, serialize(config).as_bytes()).map_err(|source| {
            Error::Persistence {
                path: self.path.clone(),
                source,
            }
        })?;

        tracing::info!(
            "Forwarding config saved to {:?} (rtmp_url set: {}, stream_key set: {})",
            self.path,
            !config.rtmp_url.is_empty(),
            !config.stream_key.is_empty()
        );
        Ok(())
    }
}

/// Parse file content into a config, ignoring lines it does not recognize
pub fn parse(content: &str) -> ForwardConfig {
    let mut config = ForwardConfig::default();
    for line in content.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        match parse_line(line) {
            Some((RTMP_URL_KEY, value)) => config.rtmp_url = value.to_string(),
            Some((STREAM_KEY_KEY, value)) => config.stream_key = value.to_string(),
            _ => {}
        }
    }
    config
}

/// Split `UPPERCASE_KEY=rest` into key and value
fn parse_line(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let valid_key = !key.is_empty() && key.bytes().all(|b| b.is_ascii_uppercase() || b == b'_');
    valid_key.then_some((key, value))
}

/// Serialize a config into the two-line file format
pub fn serialize(config: &ForwardConfig) -> String {
    format!(
        "{}={}\n{}={}\n",
        RTMP_URL_KEY, config.rtmp_url, STREAM_KEY_KEY, config.stream_key
    )
}

/// Write content to a sibling temp file, sync it, then rename over the target
fn replace_file(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_path = parent.join(format!(".{}.tmp-{}", file_name, uuid::Uuid::new_v4()));

    let result = write_synced(&temp_path, content).and_then(|_| fs::rename(&temp_path, path));
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_synced(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("forward.env"));

        assert_eq!(store.read(), ForwardConfig::new("", ""));
    }

    #[test]
    fn test_parse_file_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("forward.env");
        fs::write(&path, "RTMP_URL=rtmp://example.com/live\nSTREAM_KEY=abc123\n").unwrap();

        let config = ConfigStore::new(&path).read();
        assert_eq!(config.rtmp_url, "rtmp://example.com/live");
        assert_eq!(config.stream_key, "abc123");
    }

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("forward.env"));

        let config = ForwardConfig::new("rtmp://a.rtmp.youtube.com/live2", "xxxx-yyyy=zzzz");
        store.write(&config).unwrap();
        assert_eq!(store.read(), config);

        let empty = ForwardConfig::default();
        store.write(&empty).unwrap();
        assert_eq!(store.read(), empty);
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "RTMP_URL=\nSTREAM_KEY=\n"
        );
    }

    #[test]
    fn test_write_replaces_whole_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("forward.env");
        fs::write(&path, "RTMP_URL=rtmp://old\nSTREAM_KEY=old\nEXTRA=1\n").unwrap();

        let store = ConfigStore::new(&path);
        store.write(&ForwardConfig::new("rtmp://new", "")).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "RTMP_URL=rtmp://new\nSTREAM_KEY=\n"
        );
    }

    #[test]
    fn test_write_creates_parent_dir() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config").join("forward.env"));

        store.write(&ForwardConfig::new("rtmp://x", "k")).unwrap();
        assert_eq!(store.read(), ForwardConfig::new("rtmp://x", "k"));
    }

    #[test]
    fn test_parse_is_lenient() {
        let content = "# comment\n\
                       lower_case=ignored\n\
                       RTMP_URL=rtmp://first\r\n\
                       UNKNOWN_KEY=whatever\n\
                       not a pair\n\
                       =novalue\n\
                       RTMP_URL=rtmp://second?a=b\n";
        let config = parse(content);

        assert_eq!(config.rtmp_url, "rtmp://second?a=b");
        assert_eq!(config.stream_key, "");
    }

    #[test]
    fn test_parse_empty_and_crlf() {
        assert_eq!(parse(""), ForwardConfig::default());
        assert_eq!(parse("\n"), ForwardConfig::default());
        assert_eq!(
            parse("RTMP_URL=rtmp://x\r\nSTREAM_KEY=k\r\n"),
            ForwardConfig::new("rtmp://x", "k")
        );
    }

    #[test]
    fn test_unreadable_file_reads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("forward.env");
        fs::create_dir(&path).unwrap();

        assert_eq!(ConfigStore::new(&path).read(), ForwardConfig::default());
    }

    #[test]
    fn test_failed_write_leaves_no_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("forward.env");
        // A directory at the target path makes the final rename fail
        fs::create_dir(&path).unwrap();

        let err = ConfigStore::new(&path)
            .write(&ForwardConfig::new("rtmp://x", "k"))
            .unwrap_err();
        assert!(matches!(err, Error::Persistence { .. }));

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("forward.env")]);
    }

    #[test]
    fn test_rejects_line_breaks() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("forward.env");
        let store = ConfigStore::new(&path);
        store.write(&ForwardConfig::new("rtmp://keep", "keep")).unwrap();

        let err = store
            .write(&ForwardConfig::new("rtmp://x\nSTREAM_KEY=forged", ""))
            .unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(store.read(), ForwardConfig::new("rtmp://keep", "keep"));
    }
}

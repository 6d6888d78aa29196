use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{DEFAULT_FILE, config_dir};
use crate::error::{ConfigError, FilesystemError, Result};

/// The single active identity of this CLI installation. Missing keys in
/// the file load as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credential {
    pub client_id: String,
    pub client_secret: String,
    pub token: String,
}

/// Layout of the YAML document on disk. Older files may list several
/// credentials; only the first one is ever used.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialDocument {
    #[serde(default)]
    authconfigs: Vec<Credential>,
    #[serde(default)]
    filepath: String,
}

/// In-memory mirror of one credential file for the span of a load/save cycle.
#[derive(Debug, Clone)]
pub struct CredentialFile {
    file_path: PathBuf,
    credential: Option<Credential>,
}

impl CredentialFile {
    pub fn new(file_path: impl Into<PathBuf>) -> std::result::Result<Self, ConfigError> {
        let file_path = file_path.into();
        if file_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath);
        }

        Ok(Self {
            file_path,
            credential: None,
        })
    }

    /// Creates a mirror of `file_path` and fills it from disk.
    pub fn open(file_path: impl Into<PathBuf>) -> std::result::Result<Self, ConfigError> {
        let mut file = Self::new(file_path)?;
        file.load()?;
        Ok(file)
    }

    /// Reads the file. A file without any credential leaves the current
    /// in-memory credential untouched.
    pub fn load(&mut self) -> std::result::Result<(), ConfigError> {
        if !self.file_path.exists() {
            return Err(ConfigError::NotFound(self.file_path.clone()));
        }

        let content = fs::read_to_string(&self.file_path).map_err(|source| ConfigError::Read {
            path: self.file_path.clone(),
            source,
        })?;

        if content.trim().is_empty() {
            debug!("Credential file {:?} is empty", self.file_path);
            return Ok(());
        }

        let document: Option<CredentialDocument> =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: self.file_path.clone(),
                source,
            })?;

        if let Some(credential) = document.and_then(|doc| doc.authconfigs.into_iter().next()) {
            debug!(
                "Loaded credential for client {} from {:?}",
                credential.client_id, self.file_path
            );
            self.credential = Some(credential);
        }

        Ok(())
    }

    /// Truncates the file and writes the whole document back.
    pub fn save(&self) -> std::result::Result<(), FilesystemError> {
        let document = CredentialDocument {
            authconfigs: self.credential.iter().cloned().collect(),
            filepath: self.file_path.display().to_string(),
        };
        let content = serde_yaml::to_string(&document).map_err(FilesystemError::Serialize)?;

        let write_err = |source| FilesystemError::Write {
            path: self.file_path.clone(),
            source,
        };

        let mut file = owner_only_file()
            .truncate(true)
            .open(&self.file_path)
            .map_err(write_err)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.file_path, fs::Permissions::from_mode(0o600))
                .map_err(write_err)?;
        }
        file.write_all(content.as_bytes()).map_err(write_err)?;

        debug!("Saved credential file {:?}", self.file_path);
        Ok(())
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Inserts the credential, or replaces the one already held.
    pub fn set_credential(&mut self, credential: Credential) {
        self.credential = Some(credential);
    }
}

/// Owns the credential file location and its read-modify-write cycle.
///
/// `update` is an unlocked load/modify/save sequence: two processes
/// updating at once race and the last save wins.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    dir: PathBuf,
}

impl CredentialStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at `$OPENFX_CONFIG_DIR` or `~/.openfx`.
    pub fn from_env() -> std::result::Result<Self, FilesystemError> {
        Ok(Self::new(config_dir()?))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_path(&self) -> PathBuf {
        self.dir.join(DEFAULT_FILE)
    }

    /// Creates the directory (0700) and an empty file (0600) when missing.
    pub fn ensure_file(&self) -> std::result::Result<PathBuf, FilesystemError> {
        create_private_dir(&self.dir)?;

        let file_path = self.file_path();
        if !file_path.exists() {
            owner_only_file()
                .open(&file_path)
                .map_err(|source| FilesystemError::CreateFile {
                    path: file_path.clone(),
                    source,
                })?;
            info!("Created credential file: {:?}", file_path);
        }

        Ok(file_path)
    }

    /// Replaces the stored credential with a new one.
    pub fn update(&self, client_id: &str, client_secret: &str, token: &str) -> Result<()> {
        let file_path = self.ensure_file()?;
        let mut file = CredentialFile::open(file_path)?;

        file.set_credential(Credential {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            token: token.to_string(),
        });
        file.save()?;

        info!("Stored credential for client {}", client_id);
        Ok(())
    }

    /// Returns the stored credential.
    pub fn lookup(&self) -> Result<Credential> {
        let file_path = self.file_path();
        if !file_path.exists() {
            return Err(ConfigError::NotFound(file_path).into());
        }

        let file = CredentialFile::open(&file_path)?;
        file.credential
            .ok_or_else(|| ConfigError::NoCredential(file_path).into())
    }
}

fn owner_only_file() -> OpenOptions {
    let mut options = OpenOptions::new();
    options.write(true).create(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options
}

fn create_private_dir(dir: &Path) -> std::result::Result<(), FilesystemError> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder
        .create(dir)
        .map_err(|source| FilesystemError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;

    fn credential(token: &str) -> Credential {
        Credential {
            client_id: "openfx".to_string(),
            client_secret: "secret".to_string(),
            token: token.to_string(),
        }
    }

    #[test]
    fn empty_path_is_rejected() {
        assert!(matches!(CredentialFile::new(""), Err(ConfigError::EmptyPath)));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");

        let mut file = CredentialFile::new(&path).unwrap();
        file.set_credential(credential("abc123"));
        file.save().unwrap();

        let loaded = CredentialFile::open(&path).unwrap();
        assert_eq!(loaded.credential(), Some(&credential("abc123")));
    }

    #[test]
    fn load_of_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = CredentialFile::new(dir.path().join("missing.yml")).unwrap();

        assert!(matches!(file.load(), Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn load_of_garbage_is_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "authconfigs: [unterminated").unwrap();

        assert!(matches!(
            CredentialFile::open(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn empty_document_keeps_in_memory_credential() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "authconfigs: []\n").unwrap();

        let mut file = CredentialFile::new(&path).unwrap();
        file.set_credential(credential("kept"));
        file.load().unwrap();

        assert_eq!(file.credential(), Some(&credential("kept")));
    }

    #[test]
    fn reads_first_entry_of_legacy_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(
            &path,
            "authconfigs:\n\
             - client_id: first\n  client_secret: s1\n  token: t1\n\
             - client_id: second\n  client_secret: s2\n  token: t2\n\
             filepath: /somewhere/config.yml\n",
        )
        .unwrap();

        let file = CredentialFile::open(&path).unwrap();
        assert_eq!(file.credential().map(|c| c.client_id.as_str()), Some("first"));
    }

    #[test]
    fn ensure_file_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("nested").join(".openfx"));

        let first = store.ensure_file().unwrap();
        fs::write(&first, "authconfigs: []\n").unwrap();
        let second = store.ensure_file().unwrap();

        assert_eq!(first, second);
        assert_eq!(fs::read_to_string(&second).unwrap(), "authconfigs: []\n");
    }

    #[cfg(unix)]
    #[test]
    fn ensure_file_uses_owner_only_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join(".openfx"));
        let path = store.ensure_file().unwrap();

        let dir_mode = fs::metadata(store.dir()).unwrap().permissions().mode() & 0o777;
        let file_mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(dir_mode, 0o700);
        assert_eq!(file_mode, 0o600);
    }

    #[test]
    fn record_without_token_loads_with_empty_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "authconfigs:\n- client_id: x\n  client_secret: y\n").unwrap();

        let file = CredentialFile::open(&path).unwrap();
        assert_eq!(
            file.credential(),
            Some(&Credential {
                client_id: "x".to_string(),
                client_secret: "y".to_string(),
                token: String::new(),
            })
        );
    }

    #[test]
    fn update_over_record_without_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        fs::write(store.file_path(), "authconfigs:\n- client_id: x\n  client_secret: y\n").unwrap();

        store.update("openfx", "secret", "abc123").unwrap();

        assert_eq!(store.lookup().unwrap(), credential("abc123"));
    }

    #[cfg(unix)]
    #[test]
    fn update_tightens_loose_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        let path = store.file_path();
        fs::write(&path, "").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        store.update("a", "b", "c").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[test]
    fn first_update_on_fresh_store_inserts() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());

        store.update("openfx", "secret", "abc123").unwrap();

        assert_eq!(store.lookup().unwrap(), credential("abc123"));
    }

    #[test]
    fn second_update_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());

        store.update("openfx", "secret", "stale-token").unwrap();
        store.update("openfx", "secret", "new").unwrap();

        assert_eq!(store.lookup().unwrap().token, "new");
        let raw = fs::read_to_string(store.file_path()).unwrap();
        assert!(!raw.contains("stale-token"));
    }

    #[test]
    fn lookup_without_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("never-created"));

        assert!(matches!(
            store.lookup(),
            Err(Error::Config(ConfigError::NotFound(_)))
        ));
    }

    #[test]
    fn lookup_of_empty_file_reports_no_credential() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        store.ensure_file().unwrap();

        assert!(matches!(
            store.lookup(),
            Err(Error::Config(ConfigError::NoCredential(_)))
        ));
    }
}

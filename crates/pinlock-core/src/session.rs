//! Session-scoped authentication flag
//!
//! The flag lives in memory and is mirrored to a [`SessionStore`] so that a
//! restart within the same session skips the PIN screen. It is never
//! revalidated: once stored, it is trusted until logout or until the store
//! goes away with the session.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{GateError, Result};
use crate::{SESSION_KEY, SESSION_VALUE};

/// Environment variable naming the session explicitly
pub const SESSION_ID_VAR: &str = "PINLOCK_SESSION_ID";

/// Directory name under the runtime directory
const SESSION_DIR_NAME: &str = "pinlock";

/// String key/value storage that lives as long as one session
pub trait SessionStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-process store, gone when the process exits
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    entries: HashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already carries the authenticated flag
    pub fn authenticated() -> Self {
        let mut store = Self::new();
        store
            .entries
            .insert(SESSION_KEY.to_string(), SESSION_VALUE.to_string());
        store
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store backed by a small JSON object file.
///
/// One file per session id, kept in the per-user runtime directory so it does
/// not outlive the login session. The file is deleted once it holds no keys.
///
/// On Unix the directory and the file must belong to the current user and be
/// closed to everyone else; anything else is refused rather than read.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Use an explicit file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store for `session_id` under `dir` (or [`Self::default_dir`])
    pub fn for_session(dir: Option<PathBuf>, session_id: &str) -> Result<Self> {
        let dir = dir.unwrap_or_else(Self::default_dir);
        create_private_dir(&dir)?;

        let name: String = session_id
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        if name.is_empty() {
            return Err(GateError::Storage(format!(
                "invalid session id {:?}",
                session_id
            )));
        }

        Ok(Self::new(dir.join(format!("session-{}.json", name))))
    }

    /// Runtime directory if the platform has one, else a per-user directory
    /// in the temp directory
    pub fn default_dir() -> PathBuf {
        match dirs::runtime_dir() {
            Some(dir) => dir.join(SESSION_DIR_NAME),
            None => std::env::temp_dir().join(fallback_dir_name()),
        }
    }

    /// Identify the current session.
    ///
    /// `PINLOCK_SESSION_ID` wins; otherwise the parent process (the shell that
    /// launched us) stands for the session on Unix, qualified by its start time
    /// so a later process reusing the pid is a different session.
    pub fn current_session_id() -> String {
        if let Ok(id) = std::env::var(SESSION_ID_VAR) {
            if !id.trim().is_empty() {
                return id;
            }
        }

        parent_session_id()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn check_dir(&self) -> Result<()> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => ensure_private(dir),
            _ => Ok(()),
        }
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>> {
        self.check_dir()?;
        if fs::symlink_metadata(&self.path).is_err() {
            return Ok(BTreeMap::new());
        }
        ensure_private(&self.path)?;

        let contents = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if entries.is_empty() {
            if self.path.exists() {
                fs::remove_file(&self.path)?;
            }
            return Ok(());
        }

        let contents = serde_json::to_string_pretty(entries)?;
        let mut file = open_private(&self.path)?;
        file.write_all(contents.as_bytes())?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let mut entries = self.read_entries()?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

#[cfg(unix)]
fn current_uid() -> u32 {
    // SAFETY: geteuid has no preconditions and cannot fail
    unsafe { libc::geteuid() }
}

#[cfg(unix)]
fn fallback_dir_name() -> String {
    format!("{}-{}", SESSION_DIR_NAME, current_uid())
}

#[cfg(not(unix))]
fn fallback_dir_name() -> String {
    SESSION_DIR_NAME.to_string()
}

/// Create `dir` (and missing parents) readable by the owner only
fn create_private_dir(dir: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        fs::DirBuilder::new()
            .recursive(true)
            .mode(0o700)
            .create(dir)?;
    }
    #[cfg(not(unix))]
    fs::create_dir_all(dir)?;

    Ok(())
}

/// Refuse paths that are symlinks, owned by someone else, or open to
/// group/other
#[cfg(unix)]
fn ensure_private(path: &Path) -> Result<()> {
    use std::os::unix::fs::MetadataExt;

    let meta = fs::symlink_metadata(path)?;
    if meta.file_type().is_symlink() {
        return Err(GateError::Storage(format!("{:?} is a symlink", path)));
    }
    if meta.uid() != current_uid() {
        return Err(GateError::Storage(format!(
            "{:?} is not owned by the current user",
            path
        )));
    }
    if meta.mode() & 0o077 != 0 {
        return Err(GateError::Storage(format!(
            "{:?} is accessible by other users (mode {:o})",
            path,
            meta.mode() & 0o777
        )));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_private(_path: &Path) -> Result<()> {
    Ok(())
}

/// Open for writing, created with owner-only permissions
fn open_private(path: &Path) -> Result<fs::File> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600).custom_flags(libc::O_NOFOLLOW);
    }
    Ok(options.open(path)?)
}

#[cfg(unix)]
fn parent_session_id() -> String {
    let ppid = std::os::unix::process::parent_id();
    match process_start_time(ppid) {
        Some(started) => format!("{}-{}", ppid, started),
        None => ppid.to_string(),
    }
}

#[cfg(not(unix))]
fn parent_session_id() -> String {
    "default".to_string()
}

/// Start time of `pid` in clock ticks since boot
#[cfg(target_os = "linux")]
fn process_start_time(pid: u32) -> Option<String> {
    let stat = fs::read_to_string(format!("/proc/{}/stat", pid)).ok()?;
    parse_start_time(&stat).map(|ticks| ticks.to_string())
}

/// Start time of `pid` as reported by `ps`
#[cfg(all(unix, not(target_os = "linux")))]
fn process_start_time(pid: u32) -> Option<String> {
    let output = std::process::Command::new("ps")
        .args(["-o", "lstart=", "-p", &pid.to_string()])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let started: String = String::from_utf8_lossy(&output.stdout)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    (!started.is_empty()).then_some(started)
}

/// Field 22 (`starttime`) of a `/proc/<pid>/stat` line.
///
/// The command name in field 2 may itself contain spaces and parentheses, so
/// fields are counted from the last `)`.
#[cfg(any(target_os = "linux", test))]
fn parse_start_time(stat: &str) -> Option<u64> {
    let (_, rest) = stat.rsplit_once(')')?;
    rest.split_whitespace().nth(19)?.parse().ok()
}

/// Owns the authenticated flag
pub struct SessionGate {
    store: Box<dyn SessionStore>,
    authenticated: bool,
}

impl SessionGate {
    /// Read the persisted flag once.
    ///
    /// Anything other than the literal `"true"` counts as not authenticated,
    /// and so does a store that cannot be read.
    pub fn restore(store: Box<dyn SessionStore>) -> Self {
        let authenticated = match store.get(SESSION_KEY) {
            Ok(value) => value.as_deref() == Some(SESSION_VALUE),
            Err(e) => {
                tracing::warn!("Failed to read session flag: {}", e);
                false
            }
        };

        if authenticated {
            tracing::info!("Resuming authenticated session");
        }

        Self {
            store,
            authenticated,
        }
    }

    /// Mark the session authenticated and persist the flag
    pub fn login(&mut self) {
        self.authenticated = true;
        if let Err(e) = self.store.set(SESSION_KEY, SESSION_VALUE) {
            tracing::warn!("Failed to persist session flag: {}", e);
        }
        tracing::info!("Session authenticated");
    }

    /// Drop the flag from memory and storage
    pub fn logout(&mut self) {
        self.authenticated = false;
        if let Err(e) = self.store.remove(SESSION_KEY) {
            tracing::warn!("Failed to clear session flag: {}", e);
        }
        tracing::info!("Session ended");
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// The backing store
    pub fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }
}

impl std::fmt::Debug for SessionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGate")
            .field("authenticated", &self.authenticated)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_restore_from_empty_store() {
        let gate = SessionGate::restore(Box::new(MemorySessionStore::new()));
        assert!(!gate.is_authenticated());
    }

    #[test]
    fn test_restore_authenticated() {
        let gate = SessionGate::restore(Box::new(MemorySessionStore::authenticated()));
        assert!(gate.is_authenticated());
    }

    #[test]
    fn test_restore_ignores_other_values() {
        let mut store = MemorySessionStore::new();
        store.set(SESSION_KEY, "yes").unwrap();
        let gate = SessionGate::restore(Box::new(store));
        assert!(!gate.is_authenticated());
    }

    #[test]
    fn test_login_logout_round() {
        let mut gate = SessionGate::restore(Box::new(MemorySessionStore::new()));

        gate.login();
        assert!(gate.is_authenticated());
        assert_eq!(
            gate.store().get(SESSION_KEY).unwrap().as_deref(),
            Some(SESSION_VALUE)
        );

        gate.logout();
        assert!(!gate.is_authenticated());
        assert_eq!(gate.store().get(SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_persists_and_removes() {
        let temp_dir = tempdir().unwrap();
        let mut store =
            FileSessionStore::for_session(Some(temp_dir.path().to_path_buf()), "tab-1").unwrap();

        assert_eq!(store.get(SESSION_KEY).unwrap(), None);

        store.set(SESSION_KEY, SESSION_VALUE).unwrap();
        assert!(store.path().exists());

        // A second handle on the same session sees the flag
        let reopened =
            FileSessionStore::for_session(Some(temp_dir.path().to_path_buf()), "tab-1").unwrap();
        assert_eq!(
            reopened.get(SESSION_KEY).unwrap().as_deref(),
            Some(SESSION_VALUE)
        );

        store.remove(SESSION_KEY).unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_store_sessions_are_isolated() {
        let temp_dir = tempdir().unwrap();
        let dir = Some(temp_dir.path().to_path_buf());

        let mut first = FileSessionStore::for_session(dir.clone(), "a").unwrap();
        let second = FileSessionStore::for_session(dir, "b").unwrap();

        first.set(SESSION_KEY, SESSION_VALUE).unwrap();
        assert_eq!(second.get(SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn test_session_id_is_sanitized() {
        let temp_dir = tempdir().unwrap();
        let store =
            FileSessionStore::for_session(Some(temp_dir.path().to_path_buf()), "../x/y").unwrap();
        assert_eq!(store.path(), temp_dir.path().join("session-xy.json"));

        assert!(FileSessionStore::for_session(Some(temp_dir.path().to_path_buf()), "../").is_err());
    }

    fn write_flag_file(path: &Path) {
        open_private(path)
            .unwrap()
            .write_all(br#"{"authenticated":"true"}"#)
            .unwrap();
    }

    #[test]
    fn test_corrupt_file_reads_as_logged_out() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("session.json");
        open_private(&path).unwrap().write_all(b"not json").unwrap();

        let gate = SessionGate::restore(Box::new(FileSessionStore::new(path)));
        assert!(!gate.is_authenticated());
    }

    #[test]
    fn test_private_flag_file_is_trusted() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("session.json");
        write_flag_file(&path);

        let gate = SessionGate::restore(Box::new(FileSessionStore::new(path)));
        assert!(gate.is_authenticated());
    }

    #[test]
    fn test_stale_session_id_is_ignored() {
        let temp_dir = tempdir().unwrap();
        let dir = Some(temp_dir.path().to_path_buf());

        // Shell 4242 logged in, then exited without logging out
        let mut old = FileSessionStore::for_session(dir.clone(), "4242-1000").unwrap();
        old.set(SESSION_KEY, SESSION_VALUE).unwrap();

        // A new shell reusing pid 4242 started later
        let reused = FileSessionStore::for_session(dir.clone(), "4242-2000").unwrap();
        let gate = SessionGate::restore(Box::new(reused));
        assert!(!gate.is_authenticated());

        let same = FileSessionStore::for_session(dir, "4242-1000").unwrap();
        assert!(SessionGate::restore(Box::new(same)).is_authenticated());
    }

    #[test]
    fn test_parse_start_time() {
        let stat = "4242 (bash (login) x) S 1 4242 4242 34816 4242 4194560 1000 2000 0 0 \
                    10 5 0 0 20 0 1 0 987654 12345 300";
        assert_eq!(parse_start_time(stat), Some(987654));

        assert_eq!(parse_start_time("4242 (bash) S 1 2"), None);
        assert_eq!(parse_start_time("garbage"), None);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_parent_session_id_carries_start_time() {
        let id = parent_session_id();
        let ppid = std::os::unix::process::parent_id().to_string();

        let (pid, started) = id.split_once('-').unwrap();
        assert_eq!(pid, ppid);
        assert!(started.parse::<u64>().is_ok());
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use std::os::unix::fs::{MetadataExt, PermissionsExt};

        #[test]
        fn test_for_session_creates_private_dir() {
            let temp_dir = tempdir().unwrap();
            let dir = temp_dir.path().join("nested").join("pinlock");

            FileSessionStore::for_session(Some(dir.clone()), "tab-1").unwrap();

            let meta = fs::metadata(&dir).unwrap();
            assert_eq!(meta.mode() & 0o777, 0o700);
            assert_eq!(meta.uid(), current_uid());
        }

        #[test]
        fn test_flag_file_created_owner_only() {
            let temp_dir = tempdir().unwrap();
            let mut store =
                FileSessionStore::for_session(Some(temp_dir.path().to_path_buf()), "tab-1")
                    .unwrap();
            store.set(SESSION_KEY, SESSION_VALUE).unwrap();

            let meta = fs::metadata(store.path()).unwrap();
            assert_eq!(meta.mode() & 0o777, 0o600);
        }

        #[test]
        fn test_fallback_dir_is_per_user() {
            assert_eq!(fallback_dir_name(), format!("pinlock-{}", current_uid()));
            assert_ne!(fallback_dir_name(), SESSION_DIR_NAME);
        }

        #[test]
        fn test_readable_flag_file_is_refused() {
            let temp_dir = tempdir().unwrap();
            let path = temp_dir.path().join("session.json");
            write_flag_file(&path);
            fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

            let gate = SessionGate::restore(Box::new(FileSessionStore::new(path)));
            assert!(!gate.is_authenticated());
        }

        #[test]
        fn test_shared_directory_is_refused() {
            let temp_dir = tempdir().unwrap();
            let shared = temp_dir.path().join("shared");
            fs::create_dir(&shared).unwrap();
            fs::set_permissions(&shared, fs::Permissions::from_mode(0o777)).unwrap();

            // A flag planted in a directory anyone can write to
            let path = shared.join("session-4242.json");
            write_flag_file(&path);

            let store = FileSessionStore::new(path);
            assert!(matches!(
                store.get(SESSION_KEY),
                Err(GateError::Storage(_))
            ));
            let gate = SessionGate::restore(Box::new(store));
            assert!(!gate.is_authenticated());
        }

        #[test]
        fn test_symlinked_flag_file_is_refused() {
            let temp_dir = tempdir().unwrap();
            let target = temp_dir.path().join("elsewhere.json");
            write_flag_file(&target);

            let link = temp_dir.path().join("session.json");
            std::os::unix::fs::symlink(&target, &link).unwrap();

            let gate = SessionGate::restore(Box::new(FileSessionStore::new(link)));
            assert!(!gate.is_authenticated());
        }
    }
}

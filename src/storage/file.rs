//! File-backed session repository

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use super::SessionRepository;
use crate::error::{ClientError, ClientResult};

/// Attempts made to take the state lock before giving up
const LOCK_ATTEMPTS: u32 = 100;

/// Pause between lock attempts
const LOCK_RETRY_DELAY: Duration = Duration::from_millis(20);

/// A lock file older than this is left over from a crashed client
const LOCK_STALE_AFTER: Duration = Duration::from_secs(10);

/// Durable store kept as a single JSON object on disk
///
/// The file is the only copy of the state: every operation reads it afresh,
/// so several clients can share one path. Mutations run as
/// read-modify-write under an exclusive lock file and replace the whole file
/// through a temporary file, so a crash leaves either the old or the new
/// state and never a partial one.
#[derive(Debug)]
pub struct FileRepository {
    path: PathBuf,
    local: Mutex<()>,
}

impl FileRepository {
    /// Open the store at `path`, creating it lazily on first write
    ///
    /// An unreadable or malformed file is treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> ClientResult<Self> {
        let repo = Self {
            path: path.into(),
            local: Mutex::new(()),
        };
        let entries = repo.read_entries()?;
        tracing::debug!(path = %repo.path.display(), keys = entries.len(), "Opened client state");
        Ok(repo)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.path.with_extension("lock")
    }

    fn local_lock(&self) -> ClientResult<MutexGuard<'_, ()>> {
        self.local
            .lock()
            .map_err(|_| ClientError::Storage("state lock poisoned".to_string()))
    }

    /// Current contents of the file
    fn read_entries(&self) -> ClientResult<HashMap<String, String>> {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<HashMap<String, String>>(&bytes) {
                Ok(map) => Ok(map),
                Err(e) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        error = %e,
                        "Discarding malformed client state file"
                    );
                    Ok(HashMap::new())
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn flush(&self, entries: &HashMap<String, String>) -> ClientResult<()> {
        let bytes = serde_json::to_vec_pretty(entries)?;
        let tmp = self
            .path
            .with_extension(format!("{}.tmp", std::process::id()));
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Read, apply `op`, and write back if it reports a change
    fn update<T>(&self, op: impl FnOnce(&mut HashMap<String, String>) -> (T, bool)) -> ClientResult<T> {
        let _local = self.local_lock()?;
        let _lock = StateLock::acquire(self.lock_path())?;

        let mut entries = self.read_entries()?;
        let (result, changed) = op(&mut entries);
        if changed {
            self.flush(&entries)?;
        }
        Ok(result)
    }
}

impl SessionRepository for FileRepository {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        let _local = self.local_lock()?;
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.update(|entries| {
            let changed = entries.get(key).map(String::as_str) != Some(value);
            entries.insert(key.to_string(), value.to_string());
            ((), changed)
        })
    }

    fn set_if_absent(&self, key: &str, value: &str) -> ClientResult<String> {
        self.update(|entries| match entries.get(key) {
            Some(existing) => (existing.clone(), false),
            None => {
                entries.insert(key.to_string(), value.to_string());
                (value.to_string(), true)
            }
        })
    }

    fn remove_many(&self, keys: &[&str]) -> ClientResult<()> {
        self.update(|entries| {
            let before = entries.len();
            for key in keys {
                entries.remove(*key);
            }
            ((), entries.len() != before)
        })
    }
}

/// Exclusive lock file held for one read-modify-write; removed on drop
#[derive(Debug)]
struct StateLock {
    path: PathBuf,
}

impl StateLock {
    fn acquire(path: PathBuf) -> ClientResult<Self> {
        for _ in 0..LOCK_ATTEMPTS {
            match fs::OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    let _ = writeln!(file, "{}", std::process::id());
                    return Ok(Self { path });
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    if Self::is_stale(&path) {
                        tracing::warn!(path = %path.display(), "Removing stale state lock");
                        let _ = fs::remove_file(&path);
                        continue;
                    }
                    std::thread::sleep(LOCK_RETRY_DELAY);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(ClientError::Storage(format!(
            "state file is locked by another client: {}",
            path.display()
        )))
    }

    fn is_stale(path: &Path) -> bool {
        fs::metadata(path)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|modified| modified.elapsed().ok())
            .is_some_and(|age| age > LOCK_STALE_AFTER)
    }
}

impl Drop for StateLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        {
            let repo = FileRepository::open(&path).unwrap();
            repo.set("team_info", r#"{"team_id":1,"team_name":"Tigress"}"#)
                .unwrap();
            repo.set_if_absent("timer_start_time", "1700000000000").unwrap();
        }

        let reopened = FileRepository::open(&path).unwrap();
        assert_eq!(
            reopened.get("timer_start_time").unwrap().as_deref(),
            Some("1700000000000")
        );
        assert!(reopened.get("team_info").unwrap().is_some());
    }

    #[test]
    fn test_remove_many_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let repo = FileRepository::open(&path).unwrap();
        repo.set("team_info", "x").unwrap();
        repo.set("submissions", "y").unwrap();
        repo.set("unrelated", "z").unwrap();
        repo.remove_many(&["team_info", "submissions"]).unwrap();

        let reopened = FileRepository::open(&path).unwrap();
        assert_eq!(reopened.get("team_info").unwrap(), None);
        assert_eq!(reopened.get("submissions").unwrap(), None);
        assert_eq!(reopened.get("unrelated").unwrap().as_deref(), Some("z"));
    }

    #[test]
    fn test_corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, b"\x00garbage").unwrap();

        let repo = FileRepository::open(&path).unwrap();
        assert_eq!(repo.get("team_info").unwrap(), None);
    }

    #[test]
    fn test_two_clients_share_first_start() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let a = FileRepository::open(&path).unwrap();
        let b = FileRepository::open(&path).unwrap();

        assert_eq!(a.set_if_absent("timer_start_time", "100").unwrap(), "100");
        assert_eq!(b.set_if_absent("timer_start_time", "200").unwrap(), "100");
        assert_eq!(b.get("timer_start_time").unwrap().as_deref(), Some("100"));
        assert_eq!(a.get("timer_start_time").unwrap().as_deref(), Some("100"));
    }

    #[test]
    fn test_logout_in_one_client_is_not_undone_by_another() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let a = FileRepository::open(&path).unwrap();
        let b = FileRepository::open(&path).unwrap();

        a.set("team_info", "team").unwrap();
        a.set("timer_start_time", "100").unwrap();
        assert!(b.get("team_info").unwrap().is_some());

        a.remove_many(&["team_info", "timer_start_time"]).unwrap();
        b.set("problems_cache", "[]").unwrap();

        let reopened = FileRepository::open(&path).unwrap();
        assert_eq!(reopened.get("team_info").unwrap(), None);
        assert_eq!(reopened.get("timer_start_time").unwrap(), None);
        assert_eq!(reopened.get("problems_cache").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_lock_released_and_stale_lock_recovered() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let repo = FileRepository::open(&path).unwrap();

        repo.set("team_info", "x").unwrap();
        assert!(!repo.lock_path().exists());

        // Left behind by a client that crashed mid-write.
        let leftover = fs::File::create(repo.lock_path()).unwrap();
        leftover
            .set_modified(SystemTime::now() - Duration::from_secs(60))
            .unwrap();
        drop(leftover);

        repo.set("team_info", "y").unwrap();
        assert_eq!(repo.get("team_info").unwrap().as_deref(), Some("y"));
        assert!(!repo.lock_path().exists());
    }
}

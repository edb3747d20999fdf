use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use zeroize::Zeroizing;

/// A persistent slot for the session token.
///
/// Failures are reported to the `SessionStore`, which logs them and carries
/// on with its in-memory state. Implementations may block; the store's async
/// methods run them on tokio's blocking pool.
pub trait TokenSlot: Send + Sync {
    fn load(&self) -> io::Result<Option<String>>;
    fn store(&self, token: &str) -> io::Result<()>;
    fn clear(&self) -> io::Result<()>;
}

/// A slot that lives only as long as the process.
#[derive(Default)]
pub struct MemoryTokenSlot {
    token: Mutex<Option<Zeroizing<String>>>,
}

impl TokenSlot for MemoryTokenSlot {
    fn load(&self) -> io::Result<Option<String>> {
        let guard = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(guard.as_ref().map(|token| token.as_str().to_owned()))
    }

    fn store(&self, token: &str) -> io::Result<()> {
        let mut guard = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(Zeroizing::new(token.to_string()));
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        let mut guard = self.token.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
        Ok(())
    }
}

/// A slot backed by a single file holding the raw token.
pub struct FileTokenSlot {
    path: PathBuf,
}

impl FileTokenSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenSlot for FileTokenSlot {
    fn load(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let contents = Zeroizing::new(contents);
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn store(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Staged beside the target and renamed over it; owner-only from creation.
        let staging = self.path.with_extension("tmp");
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let written = options.open(&staging).and_then(|mut file| {
            file.write_all(token.as_bytes())?;
            file.sync_all()
        });
        if let Err(e) = written.and_then(|()| fs::rename(&staging, &self.path)) {
            let _ = fs::remove_file(&staging);
            return Err(e);
        }
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

struct SessionInner {
    token: RwLock<Option<Zeroizing<String>>>,
    slot: Box<dyn TokenSlot>,
    // Serialises slot writes; each write mirrors the token current at that
    // moment, so the slot ends up matching memory whatever order they run in.
    persist: Mutex<()>,
}

impl SessionInner {
    fn set(&self, token: Option<Zeroizing<String>>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    fn take_if(&self, sent: &str) -> bool {
        let mut guard = self.token.write().unwrap_or_else(PoisonError::into_inner);
        if guard.as_ref().map(|token| token.as_str()) != Some(sent) {
            return false;
        }
        *guard = None;
        true
    }

    fn write_through(&self) {
        let _persist = self.persist.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let result = match current.as_ref() {
            Some(token) => self.slot.store(token),
            None => self.slot.clear(),
        };
        if let Err(e) = result {
            tracing::warn!("⚠️ Could not update persisted session token: {}", e);
        }
    }
}

/// Holds the token of the current session.
///
/// Clones share the same state, so one store is created at startup and
/// handed to every client. At most one token is active; saving replaces it
/// and the previous value is wiped.
///
/// The synchronous methods write the slot on the calling thread. From async
/// code use the `_async` variants, which hand slot I/O to the blocking pool.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

impl SessionStore {
    /// Creates the store and restores any token the slot already holds.
    pub fn init(slot: impl TokenSlot + 'static) -> Self {
        let restored = match slot.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("⚠️ Could not restore session token: {}", e);
                None
            }
        };
        if restored.is_some() {
            tracing::info!("✅ Session restored from token slot");
        }

        Self {
            inner: Arc::new(SessionInner {
                token: RwLock::new(restored.map(Zeroizing::new)),
                slot: Box::new(slot),
                persist: Mutex::new(()),
            }),
        }
    }

    /// A store that is forgotten when the process exits.
    pub fn in_memory() -> Self {
        Self::init(MemoryTokenSlot::default())
    }

    pub fn save_token(&self, token: impl Into<String>) {
        self.inner.set(Some(Zeroizing::new(token.into())));
        self.inner.write_through();
        tracing::debug!("🔑 Session token saved");
    }

    pub async fn save_token_async(&self, token: String) {
        self.inner.set(Some(Zeroizing::new(token)));
        self.persist().await;
        tracing::debug!("🔑 Session token saved");
    }

    pub fn token(&self) -> Option<String> {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|token| token.as_str().to_owned())
    }

    pub fn clear_token(&self) {
        self.inner.set(None);
        self.inner.write_through();
        tracing::debug!("🔒 Session token cleared");
    }

    pub async fn clear_token_async(&self) {
        self.inner.set(None);
        self.persist().await;
        tracing::debug!("🔒 Session token cleared");
    }

    /// Clears the session only while it still holds `sent`.
    ///
    /// A rejected request must not wipe a token that replaced the one it was
    /// sent with. Returns `true` when the token was cleared.
    pub async fn clear_token_if(&self, sent: &str) -> bool {
        if !self.inner.take_if(sent) {
            tracing::debug!("🔑 Rejected token already replaced, session kept");
            return false;
        }
        self.persist().await;
        tracing::debug!("🔒 Session token cleared");
        true
    }

    pub fn is_logged_in(&self) -> bool {
        self.inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    async fn persist(&self) {
        let inner = Arc::clone(&self.inner);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                if let Err(e) = handle.spawn_blocking(move || inner.write_through()).await {
                    tracing::warn!("⚠️ Token slot write did not complete: {}", e);
                }
            }
            Err(_) => inner.write_through(),
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("logged_in", &self.is_logged_in())
            .finish()
    }
}

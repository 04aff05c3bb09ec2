//! Background resource loading into generational arenas.
//!
//! A [`LoaderSystem`] owns one [`GenArr`] per resource kind. Components name
//! resources by key; the first reference to a key allocates a handle and
//! starts a load on a worker thread, and later references reuse the handle.
//! Workers never touch the arena. They send their result back over a channel
//! and the simulation thread commits it in [`LoaderSystem::poll`].
//!
//! # Supersession
//!
//! Each load carries a serial number and a [`CancelToken`]. Starting a new
//! load for a key cancels the previous token and bumps the serial, and a
//! result is committed only if its serial is still the current one for its
//! key and its handle is still alive. A slow worker for an old version of a
//! resource therefore cannot overwrite a newer one, and a worker for a
//! released key cannot write into a slot that has since been reused.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use crossbeam_channel::{Receiver, Sender};
use log::{debug, error, trace, warn};

use lette_foundation::{Error, GenIdx, Result};
use lette_storage::GenArr;

use crate::component::ResourceHandle;
use crate::config::LoaderConfig;

// =============================================================================
// Cancellation
// =============================================================================

/// Shared flag telling a worker its result is no longer wanted.
///
/// Cloning shares the flag. Loaders should call [`CancelToken::check`]
/// between expensive steps and bail out early.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a live token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flags the token as cancelled.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Returns true once [`CancelToken::cancel`] has been called on any clone.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Fails with a `Cancelled` error if the token has been cancelled.
    ///
    /// # Errors
    ///
    /// Returns `ErrorKind::Cancelled` after cancellation.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::cancelled())
        } else {
            Ok(())
        }
    }
}

// =============================================================================
// ResourceLoader
// =============================================================================

/// Produces resources of one kind from their keys.
///
/// Called on worker threads, possibly several at once.
pub trait ResourceLoader<R>: Send + Sync {
    /// Content folder this loader reads from. File change notifications are
    /// matched against it.
    fn folder(&self) -> &str;

    /// Loads the resource named `src`.
    ///
    /// # Errors
    ///
    /// Any error is logged and leaves the resource unloaded. Return
    /// `ErrorKind::Cancelled` when stopping because of `token`.
    fn load(&self, src: &str, token: &CancelToken) -> Result<R>;
}

/// A [`ResourceLoader`] backed by a closure.
pub struct FnLoader<F> {
    folder: String,
    load: F,
}

impl<F> FnLoader<F> {
    /// Creates a loader for `folder` that calls `load(src, token)`.
    pub fn new(folder: impl Into<String>, load: F) -> Self {
        Self {
            folder: folder.into(),
            load,
        }
    }
}

impl<F> fmt::Debug for FnLoader<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnLoader")
            .field("folder", &self.folder)
            .finish_non_exhaustive()
    }
}

impl<R, F> ResourceLoader<R> for FnLoader<F>
where
    F: Fn(&str, &CancelToken) -> Result<R> + Send + Sync,
{
    fn folder(&self) -> &str {
        &self.folder
    }

    fn load(&self, src: &str, token: &CancelToken) -> Result<R> {
        (self.load)(src, token)
    }
}

/// Reads `<root>/<folder>/<src><suffix>` from disk and decodes the bytes.
///
/// The decoder receives the key and the file contents.
pub struct FileLoader<F> {
    root: PathBuf,
    folder: String,
    suffix: String,
    decode: F,
}

impl<F> FileLoader<F> {
    /// Creates a loader for files under `root/folder`.
    ///
    /// `suffix` is appended to the key to form the file name, for example
    /// `".json"` or `"/sheet.json"`.
    pub fn new(
        root: impl Into<PathBuf>,
        folder: impl Into<String>,
        suffix: impl Into<String>,
        decode: F,
    ) -> Self {
        Self {
            root: root.into(),
            folder: folder.into(),
            suffix: suffix.into(),
            decode,
        }
    }

    /// The file a key maps to.
    #[must_use]
    pub fn path(&self, src: &str) -> PathBuf {
        self.root
            .join(&self.folder)
            .join(format!("{src}{}", self.suffix))
    }
}

impl<F> fmt::Debug for FileLoader<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileLoader")
            .field("root", &self.root)
            .field("folder", &self.folder)
            .field("suffix", &self.suffix)
            .finish_non_exhaustive()
    }
}

impl<R, F> ResourceLoader<R> for FileLoader<F>
where
    F: Fn(&str, &[u8]) -> Result<R> + Send + Sync,
{
    fn folder(&self) -> &str {
        &self.folder
    }

    fn load(&self, src: &str, token: &CancelToken) -> Result<R> {
        let path = self.path(src);
        let bytes = std::fs::read(&path)
            .map_err(|e| Error::from(e).with_context(path.display().to_string()))?;
        token.check()?;
        (self.decode)(src, &bytes)
    }
}

// =============================================================================
// LoaderSystem
// =============================================================================

/// Bookkeeping for one resource key.
#[derive(Debug)]
struct LoadEntry {
    idx: GenIdx,
    /// Serial of the most recently started load.
    serial: u64,
    token: Option<CancelToken>,
    /// Number of committed loads.
    revision: u64,
}

/// A finished worker, sent back to the simulation thread.
struct Completion<R> {
    src: String,
    idx: GenIdx,
    serial: u64,
    result: Result<R>,
}

/// Splits a changed path of the form `folder/name.ext` into folder and key.
///
/// Only the first segment after the folder names the resource, so
/// `img/hero/sheet.json` maps to key `hero` in folder `img`.
fn split_changed_path(path: &str) -> Option<(&str, &str)> {
    let path = path.trim_start_matches("./");
    let (folder, rest) = path.split_once(['/', '\\'])?;
    let name = rest.split(['/', '\\']).next()?;
    let key = name.split('.').next()?;
    (!key.is_empty()).then_some((folder, key))
}

/// Loads resources of one kind on worker threads and owns their arena.
///
/// All methods are called from the simulation thread. Dropping the system
/// cancels every in-flight load.
pub struct LoaderSystem<R> {
    loader: Arc<dyn ResourceLoader<R>>,
    config: LoaderConfig,
    resources: GenArr<R>,
    entries: HashMap<String, LoadEntry>,
    keys: HashMap<GenIdx, String>,
    next_serial: u64,
    in_flight: usize,
    sender: Sender<Completion<R>>,
    receiver: Receiver<Completion<R>>,
}

impl<R> fmt::Debug for LoaderSystem<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderSystem")
            .field("folder", &self.loader.folder())
            .field("entries", &self.entries.len())
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

impl<R: Send + 'static> LoaderSystem<R> {
    /// Creates a loader system with the default configuration.
    pub fn new(loader: impl ResourceLoader<R> + 'static) -> Self {
        Self::with_config(loader, LoaderConfig::default())
    }

    /// Creates a loader system.
    pub fn with_config(loader: impl ResourceLoader<R> + 'static, config: LoaderConfig) -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self {
            loader: Arc::new(loader),
            config,
            resources: GenArr::new(),
            entries: HashMap::new(),
            keys: HashMap::new(),
            next_serial: 0,
            in_flight: 0,
            sender,
            receiver,
        }
    }

    /// Returns the handle for `src`, allocating it and starting a load the
    /// first time the key is seen.
    pub fn resolve(&mut self, src: &str) -> GenIdx {
        if let Some(entry) = self.entries.get(src) {
            return entry.idx;
        }

        let idx = self.resources.alloc();
        debug!("{}: allocated {idx:?} for {src}", self.loader.folder());
        self.entries.insert(
            src.to_string(),
            LoadEntry {
                idx,
                serial: 0,
                token: None,
                revision: 0,
            },
        );
        self.keys.insert(idx, src.to_string());
        self.start(src, false);
        idx
    }

    /// Fills in the handle of every unresolved component.
    ///
    /// Components with an empty key are left alone. Returns how many handles
    /// were assigned.
    pub fn run<'a, H>(&mut self, handles: impl IntoIterator<Item = &'a mut H>) -> usize
    where
        H: ResourceHandle + 'a,
    {
        let mut assigned = 0;
        for handle in handles {
            if handle.is_resolved() || handle.src().is_empty() {
                continue;
            }
            let idx = self.resolve(handle.src());
            handle.set_idx(idx);
            assigned += 1;
        }
        assigned
    }

    /// Commits finished loads and returns how many were written.
    ///
    /// Results for superseded loads, released keys, or dead handles are
    /// dropped. Failed loads are logged and leave the slot as it was.
    pub fn poll(&mut self) -> usize {
        let mut committed = 0;
        while let Ok(completion) = self.receiver.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            if self.commit(completion) {
                committed += 1;
            }
        }
        committed
    }

    fn commit(&mut self, completion: Completion<R>) -> bool {
        let Completion {
            src,
            idx,
            serial,
            result,
        } = completion;

        let Some(entry) = self.entries.get_mut(&src) else {
            trace!("{}: dropped load of released {src}", self.loader.folder());
            return false;
        };
        if entry.serial != serial || entry.idx != idx {
            trace!("{}: dropped superseded load of {src}", self.loader.folder());
            return false;
        }
        entry.token = None;

        match result {
            Ok(resource) => {
                if !self.resources.set(idx, resource) {
                    trace!("{}: {idx:?} died before {src} loaded", self.loader.folder());
                    return false;
                }
                entry.revision += 1;
                debug!(
                    "{}: loaded {src} into {idx:?} (revision {})",
                    self.loader.folder(),
                    entry.revision
                );
                true
            }
            Err(err) if err.is_cancelled() => {
                trace!("{}: load of {src} cancelled", self.loader.folder());
                false
            }
            Err(err) => {
                warn!("could not load resource {src}: {err}");
                false
            }
        }
    }

    /// Reacts to a changed content file at `path` (`folder/name.ext`).
    ///
    /// If the folder is this loader's and the key has been resolved before,
    /// the in-flight load is cancelled and a fresh one starts after the
    /// reload debounce. Returns whether a reload was started.
    pub fn on_changed(&mut self, path: &str) -> bool {
        let Some((folder, key)) = split_changed_path(path) else {
            return false;
        };
        if folder != self.loader.folder() || !self.entries.contains_key(key) {
            return false;
        }
        let key = key.to_string();
        self.start(&key, true);
        true
    }

    /// Restarts the load of a resolved key immediately.
    ///
    /// Returns false for unknown keys.
    pub fn reload(&mut self, src: &str) -> bool {
        if !self.entries.contains_key(src) {
            return false;
        }
        self.start(src, false);
        true
    }

    /// Forgets a key: cancels its load and frees its handle.
    ///
    /// Components still holding the handle will read it as absent. Returns
    /// false for unknown keys.
    pub fn release(&mut self, src: &str) -> bool {
        let Some(entry) = self.entries.remove(src) else {
            return false;
        };
        if let Some(token) = entry.token {
            token.cancel();
        }
        self.keys.remove(&entry.idx);
        self.resources.dealloc(entry.idx);
        debug!("{}: released {src}", self.loader.folder());
        true
    }

    /// Cancels every in-flight load.
    ///
    /// Loaded resources stay readable. A load that observes its token reports
    /// cancellation and commits nothing, but one that completes successfully
    /// anyway is still committed by the next [`LoaderSystem::poll`].
    pub fn shutdown(&mut self) {
        for entry in self.entries.values_mut() {
            if let Some(token) = entry.token.take() {
                token.cancel();
            }
        }
    }

    fn start(&mut self, src: &str, debounce: bool) {
        let Some(entry) = self.entries.get_mut(src) else {
            return;
        };

        if let Some(previous) = entry.token.take() {
            trace!("{}: superseding load of {src}", self.loader.folder());
            previous.cancel();
        }

        self.next_serial += 1;
        let token = CancelToken::new();
        entry.serial = self.next_serial;
        entry.token = Some(token.clone());

        let completion_src = src.to_string();
        let idx = entry.idx;
        let serial = entry.serial;
        let loader = Arc::clone(&self.loader);
        let sender = self.sender.clone();
        let delay = if debounce {
            self.config.reload_debounce
        } else {
            std::time::Duration::ZERO
        };

        let spawned = thread::Builder::new()
            .name(format!(
                "{}-{}",
                self.config.thread_name_prefix,
                self.loader.folder()
            ))
            .spawn(move || {
                if !delay.is_zero() {
                    thread::sleep(delay);
                }
                let result = token
                    .check()
                    .and_then(|()| loader.load(&completion_src, &token));
                // The system may be gone; nothing to report to then.
                let _ = sender.send(Completion {
                    src: completion_src,
                    idx,
                    serial,
                    result,
                });
            });

        match spawned {
            Ok(_) => self.in_flight += 1,
            Err(err) => error!("could not start loader thread for {src}: {err}"),
        }
    }
}

impl<R> LoaderSystem<R> {
    /// The loaded resource behind a handle, if it has arrived.
    #[must_use]
    pub fn get(&self, idx: GenIdx) -> Option<&R> {
        self.resources.get(idx)
    }

    /// The handle assigned to a key, if it has been resolved.
    #[must_use]
    pub fn handle(&self, src: &str) -> Option<GenIdx> {
        self.entries.get(src).map(|entry| entry.idx)
    }

    /// How many times the resource behind `idx` has been committed.
    ///
    /// Zero until the first load lands; `None` for unknown handles.
    #[must_use]
    pub fn revision(&self, idx: GenIdx) -> Option<u64> {
        let src = self.keys.get(&idx)?;
        self.entries.get(src).map(|entry| entry.revision)
    }

    /// The arena holding the loaded resources.
    #[must_use]
    pub fn resources(&self) -> &GenArr<R> {
        &self.resources
    }

    /// The content folder of the underlying loader.
    #[must_use]
    pub fn folder(&self) -> &str {
        self.loader.folder()
    }

    /// Number of resolved keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no key has been resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of started loads whose result has not been polled yet.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }
}

impl<R> Drop for LoaderSystem<R> {
    fn drop(&mut self) {
        for entry in self.entries.values() {
            if let Some(token) = &entry.token {
                token.cancel();
            }
        }
    }
}

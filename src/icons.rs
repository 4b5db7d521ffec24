//! Icon asset resolution.
//!
//! Asset paths follow a naming contract: state-dependent variants of an icon
//! carry a `_running`, `_hover` or `_selected` suffix before the extension
//! (`add.svg` -> `add_hover.svg`). Paths starting with `:/` are relative to
//! the asset root of the [`AssetSource`].
//!
//! Painting must not hit the disk repeatedly, so every lookup goes through
//! [`IconCache`], which remembers hits and misses alike.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use slint::{Image, SharedString};
use thiserror::Error;

use crate::model::ResultType;
use crate::visual_state::NodeVisualState;

pub const STEP_INTO_ICON: &str = ":/imgs/step_next.svg";
pub const STEP_OVER_ICON: &str = ":/imgs/step_over.svg";
pub const RESULT_FAILED_ICON: &str = ":/imgs/tip_failed.svg";
pub const RESULT_SUCCEEDED_ICON: &str = ":/imgs/tip_success.svg";
pub const RESULT_UNREACHABLE_ICON: &str = ":/imgs/tip_error.svg";

const STATEFUL_EXTENSIONS: [&str; 2] = ["svg", "png"];

/// Asset shown for an execution result, `None` for no result.
pub fn result_icon_path(result: ResultType) -> Option<&'static str> {
    match result {
        ResultType::None => None,
        ResultType::Failed => Some(RESULT_FAILED_ICON),
        ResultType::Succeeded => Some(RESULT_SUCCEEDED_ICON),
        ResultType::Unreachable => Some(RESULT_UNREACHABLE_ICON),
    }
}

/// Path of the state-specific variant of `path`.
///
/// `None` when the state has no suffix or the file is not an `.svg`/`.png`.
pub fn state_variant_path(path: &str, state: NodeVisualState) -> Option<String> {
    let suffix = state.asset_suffix()?;
    let (stem, ext) = path.rsplit_once('.')?;
    if stem.is_empty() || stem.ends_with('/') {
        return None;
    }
    if !STATEFUL_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)) {
        return None;
    }
    Some(format!("{stem}{suffix}.{ext}"))
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset '{0}' not found")]
    NotFound(String),

    #[error("asset '{0}' could not be decoded")]
    Decode(String),
}

/// A loaded image together with the asset path it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Icon {
    pub source: SharedString,
    pub image: Image,
}

/// Where icon images come from.
pub trait AssetSource {
    fn load(&self, path: &str) -> Result<Image, AssetError>;
}

/// Loads assets from a directory; `:/` maps to that directory.
#[derive(Debug, Clone)]
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve_path(&self, path: &str) -> PathBuf {
        match path.strip_prefix(":/") {
            Some(rel) => self.root.join(rel),
            None => Path::new(path).to_path_buf(),
        }
    }
}

impl AssetSource for FsAssetSource {
    fn load(&self, path: &str) -> Result<Image, AssetError> {
        let file = self.resolve_path(path);
        if !file.is_file() {
            return Err(AssetError::NotFound(path.to_owned()));
        }
        let image = Image::load_from_path(&file).map_err(|err| {
            log::debug!("decoding {}: {err:?}", file.display());
            AssetError::Decode(path.to_owned())
        })?;
        let size = image.size();
        if size.width == 0 || size.height == 0 {
            return Err(AssetError::Decode(path.to_owned()));
        }
        Ok(image)
    }
}

/// In-memory assets, for embedded icon sets and tests.
#[derive(Debug, Default)]
pub struct MemoryAssetSource {
    images: HashMap<String, Image>,
    loads: Cell<usize>,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register placeholder images under the given paths.
    pub fn with_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut source = Self::new();
        for path in paths {
            source.insert(path, Image::default());
        }
        source
    }

    pub fn insert(&mut self, path: impl Into<String>, image: Image) {
        self.images.insert(path.into(), image);
    }

    /// Number of `load` calls served so far.
    pub fn load_count(&self) -> usize {
        self.loads.get()
    }
}

impl AssetSource for MemoryAssetSource {
    fn load(&self, path: &str) -> Result<Image, AssetError> {
        self.loads.set(self.loads.get() + 1);
        self.images
            .get(path)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(path.to_owned()))
    }
}

impl<T: AssetSource + ?Sized> AssetSource for std::rc::Rc<T> {
    fn load(&self, path: &str) -> Result<Image, AssetError> {
        (**self).load(path)
    }
}

/// Memoizing front of an [`AssetSource`].
pub struct IconCache {
    source: Box<dyn AssetSource>,
    entries: RefCell<HashMap<String, Option<Icon>>>,
}

impl IconCache {
    pub fn new(source: impl AssetSource + 'static) -> Self {
        Self { source: Box::new(source), entries: RefCell::new(HashMap::new()) }
    }

    fn lookup(&self, path: &str, optional: bool) -> Option<Icon> {
        if let Some(entry) = self.entries.borrow().get(path) {
            return entry.clone();
        }
        let entry = match self.source.load(path) {
            Ok(image) => Some(Icon { source: path.into(), image }),
            Err(err) if optional => {
                log::debug!("{err}");
                None
            }
            Err(err) => {
                log::warn!("{err}, icon skipped");
                None
            }
        };
        self.entries.borrow_mut().insert(path.to_owned(), entry.clone());
        entry
    }

    /// A fixed asset, `None` when missing or undecodable.
    pub fn get(&self, path: &str) -> Option<Icon> {
        if path.is_empty() {
            return None;
        }
        self.lookup(path, false)
    }

    /// Icon of a node in the given state: the state variant when it exists,
    /// else the plain icon.
    pub fn node_icon(&self, path: &str, state: NodeVisualState) -> Option<Icon> {
        if path.is_empty() {
            return None;
        }
        state_variant_path(path, state)
            .and_then(|variant| self.lookup(&variant, true))
            .or_else(|| self.lookup(path, false))
    }

    /// Forget everything, e.g. after the asset pack changed on disk.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl std::fmt::Debug for IconCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IconCache")
            .field("entries", &self.entries.borrow().len())
            .finish_non_exhaustive()
    }
}

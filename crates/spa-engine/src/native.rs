//! Dynamic binding to the native compressor library.
//!
//! The library exports a two-function C ABI:
//!
//! ```text
//! char *spa_compress(const char *input, size_t len, int level, int type, size_t *out_len);
//! void  spa_free_string(char *ptr);
//! ```
//!
//! `level` is 1..=3, `type` is 0 = html, 1 = css, 2 = js. The returned buffer
//! is owned by the library and must go back through `spa_free_string`.
//!
//! Resolution happens at most once per delegate; every failure along the way
//! (missing file, load error, missing symbol) marks the delegate unavailable
//! with a reason instead of panicking.

use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
use std::ffi::{c_char, c_int};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use libloading::Library;
use spa_core::{CompressError, CompressionConfig, CompressionLevel, ContentType, EngineChoice, Result};

use crate::backend::CompressorBackend;

const SYMBOL_COMPRESS: &[u8] = b"spa_compress\0";
const SYMBOL_FREE: &[u8] = b"spa_free_string\0";

/// Directories searched, in order, under the working directory and under the
/// executable's directory.
pub const SEARCH_DIRS: [&str; 6] = ["target/release", "target/debug", "build/release", "build", "lib", "native"];

type CompressFn = unsafe extern "C" fn(*const c_char, usize, c_int, c_int, *mut usize) -> *mut c_char;
type FreeFn = unsafe extern "C" fn(*mut c_char);

/// Platform file name of the native library (`libspa_native.so`, `spa_native.dll`, ...).
pub fn library_file_name() -> String {
    format!("{DLL_PREFIX}spa_native{DLL_SUFFIX}")
}

/// Candidate paths for the library under the given base directories.
///
/// The executable's own directory is tried before its sub-directories.
pub fn search_paths(cwd: Option<&Path>, exe_dir: Option<&Path>) -> Vec<PathBuf> {
    let name = library_file_name();
    let mut paths = Vec::new();
    if let Some(cwd) = cwd {
        paths.extend(SEARCH_DIRS.iter().map(|dir| cwd.join(dir).join(&name)));
    }
    if let Some(exe_dir) = exe_dir {
        paths.push(exe_dir.join(&name));
        paths.extend(SEARCH_DIRS.iter().map(|dir| exe_dir.join(dir).join(&name)));
    }
    paths
}

struct NativeLibrary {
    path: PathBuf,
    compress: CompressFn,
    free: FreeFn,
    // Keeps the function pointers above valid.
    _library: Library,
}

impl NativeLibrary {
    fn open(path: &Path) -> std::result::Result<Self, String> {
        // SAFETY: loading runs the library's initialisers; the candidate list
        // only contains files named after the spa_native library.
        let library = unsafe { Library::new(path) }.map_err(|e| format!("{}: {e}", path.display()))?;
        // SAFETY: the symbol types match the exported C ABI.
        let compress = unsafe { library.get::<CompressFn>(SYMBOL_COMPRESS).map(|s| *s) }
            .map_err(|e| format!("{}: missing spa_compress: {e}", path.display()))?;
        let free = unsafe { library.get::<FreeFn>(SYMBOL_FREE).map(|s| *s) }
            .map_err(|e| format!("{}: missing spa_free_string: {e}", path.display()))?;

        Ok(Self {
            path: path.to_path_buf(),
            compress,
            free,
            _library: library,
        })
    }
}

/// Lazily bound native compressor.
pub struct NativeDelegate {
    candidates: Vec<PathBuf>,
    binding: OnceLock<std::result::Result<NativeLibrary, String>>,
}

impl NativeDelegate {
    /// Delegate that tries `candidates` in order on first use.
    pub fn with_candidates(candidates: Vec<PathBuf>) -> Self {
        Self {
            candidates,
            binding: OnceLock::new(),
        }
    }

    /// Explicit library path from the config first, then the standard search list.
    pub fn from_config(config: &CompressionConfig) -> Self {
        let cwd = std::env::current_dir().ok();
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));

        let mut candidates: Vec<PathBuf> = config.native_library.iter().cloned().collect();
        candidates.extend(search_paths(cwd.as_deref(), exe_dir.as_deref()));
        Self::with_candidates(candidates)
    }

    /// Delegate that never binds.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            candidates: Vec::new(),
            binding: OnceLock::from(Err(reason.into())),
        }
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    fn binding(&self) -> &std::result::Result<NativeLibrary, String> {
        self.binding.get_or_init(|| self.load())
    }

    fn load(&self) -> std::result::Result<NativeLibrary, String> {
        let mut failures = Vec::new();
        for path in self.candidates.iter().filter(|p| p.is_file()) {
            match NativeLibrary::open(path) {
                Ok(library) => {
                    tracing::info!(path = %path.display(), "native compressor loaded");
                    return Ok(library);
                }
                Err(reason) => {
                    tracing::debug!(%reason, "native compressor candidate rejected");
                    failures.push(reason);
                }
            }
        }

        let reason = if failures.is_empty() {
            format!("{} not found in {} locations", library_file_name(), self.candidates.len())
        } else {
            failures.join("; ")
        };
        tracing::debug!(%reason, "native compressor unavailable");
        Err(reason)
    }

    pub fn is_available(&self) -> bool {
        self.binding().is_ok()
    }

    /// Why binding failed, once it has been attempted.
    pub fn unavailable_reason(&self) -> Option<&str> {
        match self.binding() {
            Ok(_) => None,
            Err(reason) => Some(reason.as_str()),
        }
    }

    /// Path of the bound library.
    pub fn library_path(&self) -> Option<&Path> {
        self.binding().as_ref().ok().map(|lib| lib.path.as_path())
    }

    /// Call `spa_compress` with a native level in `1..=3`.
    pub fn compress_raw(&self, content: &str, native_level: i32, ty: ContentType) -> Result<String> {
        let library = self
            .binding()
            .as_ref()
            .map_err(|reason| CompressError::NativeUnavailable(reason.clone()))?;
        if ty == ContentType::Json {
            return Err(CompressError::NativeExecution("json has no native minifier".into()));
        }

        let mut out_len = 0usize;
        // SAFETY: `content` outlives the call and its length is passed
        // explicitly; `out_len` is a valid write target.
        let ptr = unsafe {
            (library.compress)(
                content.as_ptr().cast::<c_char>(),
                content.len(),
                native_level.clamp(1, 3),
                ty.native_code(),
                &mut out_len,
            )
        };
        if ptr.is_null() {
            return Err(CompressError::NativeNullResult);
        }

        // SAFETY: the library guarantees `out_len` readable bytes at `ptr`
        // until the buffer is freed below.
        let bytes = unsafe { std::slice::from_raw_parts(ptr.cast::<u8>(), out_len) }.to_vec();
        unsafe { (library.free)(ptr) };

        String::from_utf8(bytes).map_err(|e| CompressError::NativeExecution(format!("non-UTF-8 output: {e}")))
    }
}

impl std::fmt::Debug for NativeDelegate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.binding.get() {
            None => "unresolved".to_string(),
            Some(Ok(lib)) => format!("loaded({})", lib.path.display()),
            Some(Err(reason)) => format!("unavailable({reason})"),
        };
        f.debug_struct("NativeDelegate")
            .field("candidates", &self.candidates.len())
            .field("state", &state)
            .finish()
    }
}

impl CompressorBackend for NativeDelegate {
    fn engine(&self) -> EngineChoice {
        EngineChoice::Native
    }

    fn is_available(&self) -> bool {
        NativeDelegate::is_available(self)
    }

    fn compress(&self, content: &str, level: CompressionLevel, ty: ContentType) -> Result<String> {
        self.compress_raw(content, level.native_level(), ty)
    }
}

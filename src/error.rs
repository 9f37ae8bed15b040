/// Crate-level error types for docnav pages and commands.
use std::path::PathBuf;

/// All errors in docnav carry enough context to be shown as a page body
/// without a debugger. Each variant names the package, file, or symbol involved.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Source file exceeds the loader's size limit.
    #[error("file too large ({size_bytes} bytes, max {max_bytes}): {}", file.display())]
    FileTooLarge {
        /// File that exceeded the size limit.
        file: PathBuf,
        /// Maximum allowed file size in bytes.
        max_bytes: u64,
        /// Actual file size in bytes.
        size_bytes: u64,
    },

    /// A page specifier could not be parsed.
    #[error("invalid page specifier `{spec}`: {reason}")]
    InvalidSpecifier {
        /// Why the specifier was rejected.
        reason: String,
        /// The specifier as given.
        spec: String,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON encoding or decoding failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// The package directory exists but holds no buildable Go files.
    #[error("no Go files in {}", dir.display())]
    NoGoFiles {
        /// Directory that was searched.
        dir: PathBuf,
    },

    /// No source root contains the requested package path.
    #[error("package not found: `{path}`")]
    PackageNotFound {
        /// Directories that were searched, in order.
        searched: Vec<PathBuf>,
        /// Package path as requested.
        path: String,
    },

    /// Tree-sitter failed to parse a source file or a printed declaration.
    #[error("parse failed: {}: {reason}", file.display())]
    ParseFailed {
        /// File that failed to parse.
        file: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// A referenced symbol does not exist in the package.
    #[error("symbol not found: `{symbol}` in {package}")]
    SymbolNotFound {
        /// Import path of the package that was searched.
        package: String,
        /// Exported names that are close to the requested one.
        suggestions: Vec<String>,
        /// Symbol name that was not found.
        symbol: String,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),
}

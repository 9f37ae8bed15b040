use std::path::{Path, PathBuf};

use crate::error::Error;

/// Default page prefix.
pub const DEFAULT_MARKER: &str = "godoc://";

/// Default wrap width for documentation text.
const DEFAULT_TEXT_WIDTH: usize = 76;

/// Name of the optional project configuration file.
const CONFIG_FILE: &str = ".docnav.toml";

/// Page rendering configuration loaded from `.docnav.toml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Indentation written before preformatted documentation lines.
    pub indent: String,
    /// Prefix that marks a buffer name as a page, such as `godoc://`.
    pub marker: String,
    /// Extra source roots searched after `GOROOT` and `GOPATH`.
    pub roots: Vec<PathBuf>,
    /// Column documentation paragraphs wrap at.
    pub text_width: usize,
}

/// Raw TOML structure for `.docnav.toml`.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct DocnavTomlConfig {
    /// See [`Config::indent`].
    indent: Option<String>,
    /// See [`Config::marker`].
    marker: Option<String>,
    /// See [`Config::roots`].
    #[serde(default)]
    roots: Vec<PathBuf>,
    /// See [`Config::text_width`].
    text_width: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        return Self {
            indent: "    ".to_string(),
            marker: DEFAULT_MARKER.to_string(),
            roots: Vec::new(),
            text_width: DEFAULT_TEXT_WIDTH,
        };
    }
}

impl Config {
    /// Load config from `.docnav.toml` in the given directory.
    /// Returns the defaults if the file doesn't exist. Returns an error if the
    /// file exists but is malformed.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(dir: &Path) -> Result<Self, Error> {
        let path = dir.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
        };

        let raw: DocnavTomlConfig = toml::from_str(&content)?;
        let defaults = Self::default();
        let roots = raw
            .roots
            .into_iter()
            .map(|root| return if root.is_absolute() { root } else { dir.join(root) })
            .collect();
        return Ok(Self {
            indent: raw.indent.unwrap_or(defaults.indent),
            marker: raw.marker.unwrap_or(defaults.marker),
            roots,
            text_width: raw.text_width.unwrap_or(defaults.text_width),
        });
    }
}

/// Everything page construction reads from the environment.
#[derive(Debug, Clone)]
pub struct Context {
    /// Rendering configuration.
    pub config: Config,
    /// Directory relative package paths resolve against.
    pub cwd: PathBuf,
    /// `GOPATH` entries.
    pub gopath: Vec<PathBuf>,
    /// `GOROOT`, when set.
    pub goroot: Option<PathBuf>,
}

impl Context {
    /// Capture `GOROOT`, `GOPATH` and the configuration of `cwd`.
    ///
    /// # Errors
    ///
    /// Returns any error from [`Config::load`].
    pub fn from_env(cwd: PathBuf) -> Result<Self, Error> {
        let config = Config::load(&cwd)?;
        let goroot = std::env::var_os("GOROOT").map(PathBuf::from);
        let gopath = std::env::var_os("GOPATH")
            .map(|raw| return std::env::split_paths(&raw).collect())
            .unwrap_or_default();
        return Ok(Self {
            config,
            cwd,
            gopath,
            goroot,
        });
    }

    /// Source roots in search order: `$GOROOT/src`, each `$GOPATH/src`, then
    /// the configured roots.
    pub fn source_roots(&self) -> Vec<PathBuf> {
        let mut roots = Vec::new();
        if let Some(goroot) = &self.goroot {
            roots.push(goroot.join("src"));
        }
        roots.extend(self.gopath.iter().map(|p| return p.join("src")));
        roots.extend(self.config.roots.iter().cloned());
        return roots;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "marker = \"doc:\"\nroots = [\"vendor\"]\n")
            .unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.marker, "doc:");
        assert_eq!(config.text_width, DEFAULT_TEXT_WIDTH);
        assert_eq!(config.roots, vec![dir.path().join("vendor")]);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "text_width = \"wide\"").unwrap();
        assert!(matches!(Config::load(dir.path()), Err(Error::TomlDe(_))));
    }

    #[test]
    fn roots_in_search_order() {
        let ctx = Context {
            config: Config { roots: vec!["/extra".into()], ..Config::default() },
            cwd: "/work".into(),
            gopath: vec!["/gopath".into()],
            goroot: Some("/goroot".into()),
        };
        assert_eq!(
            ctx.source_roots(),
            vec![PathBuf::from("/goroot/src"), "/gopath/src".into(), "/extra".into()]
        );
    }
}

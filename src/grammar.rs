/// Tree-sitter grammar setup and Go source file classification.
use std::path::Path;

use tree_sitter::{Language, Parser};

use crate::error::Error;

/// The Go tree-sitter language.
pub fn go_language() -> Language {
    return tree_sitter_go::LANGUAGE.into();
}

/// Whether `path` names a Go source file, tests included.
pub fn is_go_source(path: &Path) -> bool {
    return path.extension().and_then(|e| return e.to_str()) == Some("go");
}

/// Whether `path` names a Go test file.
pub fn is_test_source(path: &Path) -> bool {
    return path
        .file_name()
        .and_then(|n| return n.to_str())
        .is_some_and(|n| return n.ends_with("_test.go"));
}

/// A parser ready for Go source.
///
/// # Errors
///
/// Returns `Error::ParseFailed` if the grammar is incompatible with the
/// linked tree-sitter runtime.
pub fn go_parser(file: &Path) -> Result<Parser, Error> {
    let mut parser = Parser::new();
    parser
        .set_language(&go_language())
        .map_err(|err| return Error::ParseFailed {
            file: file.to_path_buf(),
            reason: err.to_string(),
        })?;
    return Ok(parser);
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn classifies_go_files() {
        assert!(is_go_source(&PathBuf::from("src/fmt/print.go")));
        assert!(is_go_source(&PathBuf::from("print_test.go")));
        assert!(!is_go_source(&PathBuf::from("README.md")));
        assert!(is_test_source(&PathBuf::from("fmt/example_test.go")));
        assert!(!is_test_source(&PathBuf::from("fmt/print.go")));
    }

    #[test]
    fn parser_accepts_go() {
        let mut parser = go_parser(Path::new("x.go")).unwrap();
        let tree = parser.parse("package x\n", None).unwrap();
        assert_eq!(tree.root_node().kind(), "source_file");
    }
}

/// Re-tokenization of printed declarations via tree-sitter leaves.
use std::path::Path;

use tree_sitter::{Node, Parser};

use crate::error::Error;
use crate::grammar;

/// Token classes the merger cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Line or block comment.
    Comment,
    /// Any identifier, including predeclared constants such as `nil`.
    Ident,
}

/// A token of printed text, by byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    /// Offset one past the last byte.
    pub end: usize,
    /// Token class.
    pub kind: TokenKind,
    /// Offset of the first byte.
    pub start: usize,
}

/// Classify a leaf node. Keywords, operators and literals yield `None`.
pub fn classify(node: Node<'_>) -> Option<TokenKind> {
    let kind = node.kind();
    if kind == "comment" {
        return Some(TokenKind::Comment);
    }
    if !node.is_named() {
        return None;
    }
    return match kind {
        "blank_identifier" | "false" | "field_identifier" | "identifier" | "iota"
        | "label_name" | "nil" | "package_identifier" | "true" | "type_identifier" => {
            Some(TokenKind::Ident)
        },
        _ => None,
    };
}

/// Whether a node is a literal whose inner nodes must not be split.
fn is_opaque(node: Node<'_>) -> bool {
    let kind = node.kind();
    return kind.ends_with("string_literal") || kind == "rune_literal";
}

/// Collect identifier and comment leaves in source order.
fn collect_tokens(node: Node<'_>, tokens: &mut Vec<Token>) {
    if node.child_count() == 0 || is_opaque(node) {
        if node.start_byte() == node.end_byte() {
            return;
        }
        if let Some(kind) = classify(node) {
            tokens.push(Token {
                end: node.end_byte(),
                kind,
                start: node.start_byte(),
            });
        }
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_tokens(child, tokens);
    }
}

/// Number of identifier leaves under `node`.
pub fn count_identifiers(node: Node<'_>) -> usize {
    let mut tokens = Vec::new();
    collect_tokens(node, &mut tokens);
    return tokens.iter().filter(|t| return t.kind == TokenKind::Ident).count();
}

/// Lexes printed declarations. Holds one parser for reuse across declarations.
pub struct Tokenizer {
    /// Go parser.
    parser: Parser,
}

impl Tokenizer {
    /// A tokenizer for Go text.
    ///
    /// # Errors
    ///
    /// Returns `Error::ParseFailed` if the grammar cannot be loaded.
    pub fn new() -> Result<Self, Error> {
        return Ok(Self {
            parser: grammar::go_parser(Path::new("<printed>"))?,
        });
    }

    /// Identifier and comment tokens of `text`, in order.
    ///
    /// # Errors
    ///
    /// Returns `Error::ParseFailed` if tree-sitter produces no tree.
    pub fn tokenize(&mut self, text: &str) -> Result<Vec<Token>, Error> {
        let tree = self.parser.parse(text, None).ok_or_else(|| return Error::ParseFailed {
            file: Path::new("<printed>").to_path_buf(),
            reason: "tokenizer re-parse failed".to_string(),
        })?;
        let mut tokens = Vec::new();
        collect_tokens(tree.root_node(), &mut tokens);
        return Ok(tokens);
    }
}

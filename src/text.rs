//! Documentation comment formatting.
//!
//! Doc text is split into blocks: paragraphs are re-wrapped, indented runs
//! are kept verbatim as preformatted blocks, and heading lines are set apart
//! and highlighted.
use crate::config::Config;
use crate::doc::DocBuilder;
use crate::types::HighlightGroup;

/// Characters that rule out a line as an implicit heading.
const NON_HEADING_CHARS: &str = ";:!?+*/=[]{}_^°&§~%#@<\">\\";

/// A block of documentation text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Section heading.
    Heading(String),
    /// Flowing text, lines joined by single spaces.
    Paragraph(String),
    /// Indented lines with the common indentation removed.
    Preformatted(Vec<String>),
}

/// Split doc text into blocks.
///
/// A heading is either a `# Title` line, or a lone single-line paragraph that
/// starts with an upper-case letter, ends in a letter or digit, holds no
/// punctuation, and sits between two paragraphs.
pub fn blocks(text: &str) -> Vec<Block> {
    let mut out = Vec::new();
    let mut para: Vec<&str> = Vec::new();
    let mut pre: Vec<&str> = Vec::new();
    for line in text.lines() {
        let blank = line.trim().is_empty();
        let indented = line.starts_with([' ', '\t']);
        if indented && !blank {
            flush_paragraph(&mut out, &mut para);
            pre.push(line);
            continue;
        }
        if blank {
            // Blank lines inside a preformatted run belong to it.
            if pre.is_empty() {
                flush_paragraph(&mut out, &mut para);
            } else {
                pre.push("");
            }
            continue;
        }
        flush_preformatted(&mut out, &mut pre);
        para.push(line);
    }
    flush_paragraph(&mut out, &mut para);
    flush_preformatted(&mut out, &mut pre);
    promote_headings(&mut out);
    return out;
}

/// Close a pending paragraph.
fn flush_paragraph(out: &mut Vec<Block>, para: &mut Vec<&str>) {
    if para.is_empty() {
        return;
    }
    let text = para.iter().map(|l| return l.trim()).collect::<Vec<_>>().join(" ");
    para.clear();
    match text.strip_prefix("# ") {
        Some(title) => out.push(Block::Heading(title.trim().to_string())),
        None => out.push(Block::Paragraph(text)),
    }
}

/// Close a pending preformatted run, dropping its trailing blank lines.
fn flush_preformatted(out: &mut Vec<Block>, pre: &mut Vec<&str>) {
    while pre.last().is_some_and(|l| return l.is_empty()) {
        pre.pop();
    }
    if pre.is_empty() {
        return;
    }
    let common = pre
        .iter()
        .filter(|l| return !l.is_empty())
        .map(|l| return l.len().saturating_sub(l.trim_start_matches([' ', '\t']).len()))
        .min()
        .unwrap_or(0);
    let lines = pre
        .iter()
        .map(|l| return l.get(common..).unwrap_or_default().trim_end().to_string())
        .collect();
    pre.clear();
    out.push(Block::Preformatted(lines));
}

/// Turn single-line paragraphs between two paragraphs into headings.
fn promote_headings(blocks: &mut [Block]) {
    for i in 1..blocks.len() {
        let prev_is_para = matches!(blocks.get(i.saturating_sub(1)), Some(Block::Paragraph(_)));
        let next_is_para = matches!(blocks.get(i.saturating_add(1)), Some(Block::Paragraph(_)));
        if !prev_is_para || !next_is_para {
            continue;
        }
        let heading = match blocks.get(i) {
            Some(Block::Paragraph(text)) if is_heading_line(text) => text.clone(),
            _ => continue,
        };
        if let Some(block) = blocks.get_mut(i) {
            *block = Block::Heading(heading);
        }
    }
}

/// Whether a paragraph reads as an implicit heading.
fn is_heading_line(line: &str) -> bool {
    let starts_upper = line.chars().next().is_some_and(char::is_uppercase);
    let ends_alnum = line.chars().last().is_some_and(char::is_alphanumeric);
    if !starts_upper || !ends_alnum || line.contains(|c| return NON_HEADING_CHARS.contains(c)) {
        return false;
    }
    // An apostrophe is only allowed as a possessive "'s".
    let mut rest = line;
    while let Some(i) = rest.find('\'') {
        let after = rest.get(i.saturating_add(1)..).unwrap_or_default();
        let possessive = after.strip_prefix('s').is_some_and(|s| return s.is_empty() || s.starts_with(' '));
        if !possessive {
            return false;
        }
        rest = after;
    }
    return true;
}

/// Greedy word wrap at `width` columns. Words longer than `width` get a line
/// of their own.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let needed = line.chars().count().saturating_add(word.chars().count()).saturating_add(1);
        if !line.is_empty() && needed > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    return lines;
}

/// Write doc text as formatted blocks separated by blank lines. Headings get
/// an extra blank line above and the header highlight. Every written line
/// ends with a newline; nothing is written for empty text.
pub fn write_doc(doc: &mut DocBuilder, text: &str, config: &Config) {
    for (i, block) in blocks(text).iter().enumerate() {
        if i > 0 {
            doc.write_str("\n");
        }
        match block {
            Block::Heading(title) => {
                if i > 0 {
                    doc.write_str("\n");
                }
                doc.highlighted(HighlightGroup::Header, |d| d.write_str(title));
                doc.write_str("\n");
            },
            Block::Paragraph(para) => {
                for line in wrap(para, config.text_width) {
                    doc.write_str(&line);
                    doc.write_str("\n");
                }
            },
            Block::Preformatted(lines) => {
                for line in lines {
                    if !line.is_empty() {
                        doc.write_str(&config.indent);
                        doc.write_str(line);
                    }
                    doc.write_str("\n");
                }
            },
        }
    }
}

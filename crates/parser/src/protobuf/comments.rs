//! Comment buffering and small name helpers used during extraction

use std::path::Path;

/// Comments seen since the last declaration that consumed them
#[derive(Debug, Default)]
pub(crate) struct CommentBuffer {
    lines: Vec<String>,
}

impl CommentBuffer {
    /// Buffer a raw comment node
    pub fn push(&mut self, raw: &str) {
        self.lines.push(comment_text(raw));
    }

    /// Hand out the buffered comments and clear the buffer
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }

    /// Drop buffered comments that no declaration claimed
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Strip comment markers from a raw comment node.
///
/// `// text` -> "text", `/* text */` and `/** text */` -> "text". Inner lines
/// of block comments lose their leading `*` decoration.
pub(crate) fn comment_text(raw: &str) -> String {
    let raw = raw.trim();

    if let Some(rest) = raw.strip_prefix("//") {
        return rest.trim().to_string();
    }

    let Some(inner) = raw
        .strip_prefix("/*")
        .and_then(|rest| rest.strip_suffix("*/"))
    else {
        return raw.to_string();
    };
    let inner = inner.strip_prefix('*').unwrap_or(inner);

    inner
        .lines()
        .map(|line| {
            let line = line.trim();
            line.strip_prefix('*').unwrap_or(line).trim()
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Proto package implied by an import path: its directory with `/` as `.`.
///
/// "google/protobuf/empty.proto" -> Some("google.protobuf"); a bare file name
/// has no package.
pub(crate) fn import_proto_package(import: &str) -> Option<String> {
    match import.rfind('/') {
        Some(idx) if idx > 0 => Some(import[..idx].replace('/', ".")),
        _ => None,
    }
}

/// Base name of a file, the key services are registered under
pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

//! The user include file and the texture library, searched for per-node
//! declarations such as `#declare Box_material`.

use tracing::warn;

use crate::error::ResourceError;

/// Remove `/* */` block comments, then `//` line comments.
///
/// A line comment runs up to (not including) the next newline, or to the end
/// of the input. An unterminated block comment is an error.
pub fn strip_comments(source: &str) -> Result<String, ResourceError> {
    let mut code = source.to_string();

    while let Some(start) = code.find("/*") {
        let Some(rel_end) = code[start + 2..].find("*/") else {
            return Err(ResourceError::UnterminatedComment { offset: start });
        };
        let end = start + 2 + rel_end + 2;
        code.replace_range(start..end, "");
    }

    while let Some(start) = code.find("//") {
        let end = code[start + 2..]
            .find('\n')
            .map(|rel| start + 2 + rel)
            .unwrap_or(code.len());
        code.replace_range(start..end, "");
    }

    Ok(code)
}

/// A comment-stripped include file held in memory.
///
/// A resource that failed to parse stays unusable for the whole run: every
/// lookup misses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludeResource {
    content: Option<String>,
}

impl IncludeResource {
    /// A resource without any declarations.
    pub fn empty() -> Self {
        Self {
            content: Some(String::new()),
        }
    }

    /// Strip comments from `source`, failing on an unterminated block comment.
    pub fn parse(source: &str) -> Result<Self, ResourceError> {
        Ok(Self {
            content: Some(strip_comments(source)?),
        })
    }

    /// Like [`IncludeResource::parse`], but a defective file is logged and
    /// turned into an unusable resource instead of an error.
    pub fn load(name: &str, source: &str) -> Self {
        match Self::parse(source) {
            Ok(resource) => resource,
            Err(err) => {
                warn!(resource = name, error = %err, "include file unusable, its declarations are ignored");
                Self { content: None }
            }
        }
    }

    pub fn is_usable(&self) -> bool {
        self.content.is_some()
    }

    /// True if the file contains `#declare <ident>` (prefix match, so
    /// `Box_` matches `#declare Box_material`).
    pub fn declares(&self, ident: &str) -> bool {
        self.mentions(&format!("#declare {ident}"))
    }

    /// True if `text` occurs anywhere outside comments.
    pub fn mentions(&self, text: &str) -> bool {
        self.content.as_deref().is_some_and(|c| c.contains(text))
    }
}

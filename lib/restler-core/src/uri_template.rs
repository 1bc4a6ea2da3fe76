//! Route templates such as `/users/{id}/posts/{post_id}`.

use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

use crate::{Error, Result};

/// Characters escaped in a substituted path segment.
///
/// Unreserved characters (`A-Z a-z 0-9 - . _ ~`) and sub-delimiters pass
/// through, while anything that would change the path structure is encoded.
pub const PATH_SEGMENT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\')
    .add(b'%');

/// Placeholder names of a route template, in order of appearance.
///
/// # Errors
///
/// Returns [`Error::UriBuild`] for unbalanced or nested braces and for
/// empty placeholder names.
///
/// # Example
///
/// ```
/// use restler_core::placeholders;
///
/// let names = placeholders("/repos/{owner}/{repo}").expect("well formed");
/// assert_eq!(names, ["owner", "repo"]);
/// assert!(placeholders("/users/{id").is_err());
/// ```
pub fn placeholders(template: &str) -> Result<Vec<&str>> {
    let mut names = Vec::new();
    let mut open: Option<usize> = None;

    for (index, ch) in template.char_indices() {
        match (ch, open) {
            ('{', None) => open = Some(index + 1),
            ('{', Some(_)) => return Err(Error::uri_build(template, "nested `{`")),
            ('}', None) => return Err(Error::uri_build(template, "unmatched `}`")),
            ('}', Some(start)) => {
                let name = template.get(start..index).unwrap_or_default().trim();
                if name.is_empty() {
                    return Err(Error::uri_build(template, "empty placeholder name"));
                }
                names.push(name);
                open = None;
            }
            _ => {}
        }
    }

    if open.is_some() {
        return Err(Error::uri_build(template, "unclosed `{`"));
    }
    Ok(names)
}

/// A route template declared on a remote method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UriTemplate(&'static str);

impl UriTemplate {
    /// Create a new template.
    #[must_use]
    pub const fn new(template: &'static str) -> Self {
        Self(template)
    }

    /// Get the template string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }

    /// Placeholder names, see [`placeholders`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::UriBuild`] if the template is malformed.
    pub fn placeholders(&self) -> Result<Vec<&'static str>> {
        placeholders(self.0)
    }

    /// Substitute every placeholder with its percent-encoded variable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UriBuild`] if the template is malformed or a
    /// placeholder has no matching variable.
    pub fn expand(&self, variables: &BTreeMap<String, String>) -> Result<String> {
        let mut expanded = String::with_capacity(self.0.len());
        let mut rest = self.0;

        for name in self.placeholders()? {
            let value = variables.get(name).ok_or_else(|| {
                Error::uri_build(self.0, format!("unresolved variable `{name}`"))
            })?;
            let Some((before, after)) = rest.split_once('{') else {
                break;
            };
            expanded.push_str(before);
            expanded.extend(utf8_percent_encode(value, PATH_SEGMENT_ENCODE_SET));
            rest = after.split_once('}').map_or("", |(_, tail)| tail);
        }

        expanded.push_str(rest);
        Ok(expanded)
    }
}

impl std::fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for UriTemplate {
    fn as_ref(&self) -> &str {
        self.0
    }
}

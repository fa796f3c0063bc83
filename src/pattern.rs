//! Compiled route patterns and the segment matcher.
//!
//! A pattern is a normalized path whose segments are either literal text or
//! a named parameter written as `{name}`:
//! ```ignore
//!  Pattern: /blog/{category}/{post}
//!
//!   /blog/rust/request-routers            match: category="rust", post="request-routers"
//!   /blog/rust/request-routers/           match (trailing slashes are normalized away)
//!   /blog/rust                            no match
//!   /blog/rust/request-routers/comments   no match
//! ```
//!
//! Parameters match exactly one segment. There are no catch-all or optional
//! segments, so a pattern only matches paths with the same number of segments.
use crate::error::{Error, Result};
use crate::params::Params;
use crate::path::normalize;

const PARAM_PREFIX: char = '{';
const PARAM_SUFFIX: char = '}';

/// One `/`-delimited component of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text that must appear verbatim in the request path.
    Literal(String),
    /// A named parameter capturing the whole request segment.
    Param(String),
}

impl Segment {
    fn parse(raw: &str) -> Segment {
        match raw
            .strip_prefix(PARAM_PREFIX)
            .and_then(|s| s.strip_suffix(PARAM_SUFFIX))
        {
            Some(name) => Segment::Param(name.to_owned()),
            None => Segment::Literal(raw.to_owned()),
        }
    }
}

/// A route path compiled once at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    raw: String,
    segments: Vec<Segment>,
}

impl Pattern {
    /// Compiles a declared route path.
    ///
    /// The path is normalized first, so `users/{id}/` and `/users/{id}` are
    /// the same pattern. Fails if a parameter has an empty name or if two
    /// parameters share a name.
    ///
    /// ```rust
    /// use ligero::pattern::{Pattern, Segment};
    ///
    /// let pattern = Pattern::compile("/users/{id}").unwrap();
    /// assert_eq!(
    ///     pattern.segments(),
    ///     &[Segment::Literal("users".into()), Segment::Param("id".into())]
    /// );
    ///
    /// assert!(Pattern::compile("/{a}/{a}").is_err());
    /// ```
    pub fn compile(path: &str) -> Result<Pattern> {
        let raw = normalize(path);
        let segments = split(&raw).map(Segment::parse).collect::<Vec<_>>();

        let mut names: Vec<&str> = Vec::new();
        for segment in &segments {
            if let Segment::Param(name) = segment {
                if name.is_empty() {
                    return Err(Error::malformed(&raw, "empty parameter name"));
                }
                if names.contains(&name.as_str()) {
                    return Err(Error::malformed(
                        &raw,
                        format!("duplicate parameter name '{}'", name),
                    ));
                }
                names.push(name);
            }
        }

        Ok(Pattern { raw, segments })
    }

    /// The normalized path this pattern was compiled from.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether this is the root pattern `/`.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether the pattern declares any parameters.
    pub fn has_params(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Param(_)))
    }

    /// Matches a normalized request path, without query string, against the
    /// pattern.
    ///
    /// Returns the bound parameters on success. Literal segments are compared
    /// case-sensitively and parameter values are the raw segment text, with
    /// no percent-decoding.
    ///
    /// ```rust
    /// use ligero::pattern::Pattern;
    ///
    /// let pattern = Pattern::compile("/greet/{name}").unwrap();
    ///
    /// let params = pattern.matches("/greet/World").unwrap();
    /// assert_eq!(params.get("name"), Some("World"));
    ///
    /// assert!(pattern.matches("/greet").is_none());
    /// assert!(pattern.matches("/Greet/World").is_none());
    /// ```
    pub fn matches(&self, path: &str) -> Option<Params> {
        let mut request = split(path);

        // the root pattern only matches the root path, and nothing else does
        if self.is_root() {
            return request.next().is_none().then(Params::default);
        }

        let mut params = Params::default();
        for segment in &self.segments {
            let part = request.next()?;
            match segment {
                Segment::Literal(text) if text != part => return None,
                Segment::Literal(_) => {}
                Segment::Param(name) => params.insert(name.as_str(), part),
            }
        }

        if request.next().is_some() {
            return None;
        }

        Some(params)
    }
}

/// Splits a path into its non-empty segments.
fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(path: &str) -> Pattern {
        Pattern::compile(path).unwrap()
    }

    #[test]
    fn compile_segments() {
        let pattern = compile("/users/{id}/posts/{post}");
        assert_eq!(pattern.as_str(), "/users/{id}/posts/{post}");
        assert_eq!(
            pattern.segments(),
            &[
                Segment::Literal("users".into()),
                Segment::Param("id".into()),
                Segment::Literal("posts".into()),
                Segment::Param("post".into()),
            ]
        );
        assert!(pattern.has_params());
        assert!(!pattern.is_root());
    }

    #[test]
    fn compile_normalizes() {
        assert_eq!(compile("users//{id}/").as_str(), "/users/{id}");
        assert_eq!(compile("").as_str(), "/");
        assert!(compile("").is_root());
        assert!(compile("///").is_root());
    }

    #[test]
    fn half_braces_are_literals() {
        let pattern = compile("/{a/b}/c{d}");
        assert_eq!(
            pattern.segments(),
            &[
                Segment::Literal("{a".into()),
                Segment::Literal("b}".into()),
                Segment::Literal("c{d}".into()),
            ]
        );
        assert!(!pattern.has_params());
    }

    #[test]
    fn malformed_patterns() {
        for path in &["/{}", "/a/{}/b", "/{id}/{id}", "/{x}/a/{y}/{x}"] {
            match Pattern::compile(path) {
                Err(Error::MalformedPattern { .. }) => {}
                other => panic!("expected malformed pattern for {}, got {:?}", path, other),
            }
        }
    }

    #[test]
    fn root_matches_only_root() {
        let root = compile("/");
        assert_eq!(root.matches("/"), Some(Params::default()));
        assert_eq!(root.matches(""), Some(Params::default()));
        assert_eq!(root.matches("/a"), None);
        assert_eq!(root.matches("/a/"), None);
    }

    #[test]
    fn non_root_never_matches_root() {
        assert_eq!(compile("/a").matches("/"), None);
        assert_eq!(compile("/{x}").matches("/"), None);
        assert_eq!(compile("/{x}").matches(""), None);
    }

    #[test]
    fn literal_matching() {
        let pattern = compile("/a/b");
        assert!(pattern.matches("/a/b").is_some());
        assert!(pattern.matches("/a/b/").is_some());
        assert!(pattern.matches("/A/b").is_none());
        assert!(pattern.matches("/a").is_none());
        assert!(pattern.matches("/a/b/c").is_none());
        assert!(pattern.matches("/a/bc").is_none());
    }

    #[test]
    fn param_capture() {
        let pattern = compile("/blog/{category}/{post}");

        let params = pattern.matches("/blog/rust/request-routers").unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("category"), Some("rust"));
        assert_eq!(params.get("post"), Some("request-routers"));

        assert!(pattern.matches("/blog/rust").is_none());
        assert!(pattern.matches("/blog/rust/request-routers/comments").is_none());
    }

    #[test]
    fn params_are_not_decoded() {
        let params = compile("/files/{name}").matches("/files/a%20b").unwrap();
        assert_eq!(params.get("name"), Some("a%20b"));
    }

    #[test]
    fn failed_match_binds_nothing() {
        // the first segment binds before the literal mismatch is found
        assert_eq!(compile("/{x}/b").matches("/a/c"), None);
    }

    #[test]
    fn matching_is_idempotent() {
        let pattern = compile("/a/{x}/{y}");
        let first = pattern.matches("/a/1/2");
        assert!(first.is_some());
        for _ in 0..3 {
            assert_eq!(pattern.matches("/a/1/2"), first);
        }
    }
}

//! Path normalization and context-path handling.

/// Returns the canonical form of a URL path.
///
/// The result always starts with a `/`, contains no runs of consecutive
/// slashes and has no trailing slash unless it is the root itself.
/// Every input has a canonical form, the empty string maps to `/`.
///
/// ```rust
/// use ligero::path::normalize;
///
/// assert_eq!(normalize(""), "/");
/// assert_eq!(normalize("a/b"), "/a/b");
/// assert_eq!(normalize("//a//b/"), "/a/b");
/// ```
pub fn normalize(path: &str) -> String {
    let mut buf = String::with_capacity(path.len() + 1);

    for segment in path.split('/').filter(|s| !s.is_empty()) {
        buf.push('/');
        buf.push_str(segment);
    }

    if buf.is_empty() {
        buf.push('/');
    }

    buf
}

/// Normalizes an application context path.
///
/// Surrounding whitespace is ignored, so a blank context path is the root.
pub fn normalize_context(context: &str) -> String {
    normalize(context.trim())
}

/// Removes the context path from the front of a normalized request path.
///
/// The context is removed as a plain prefix, so the remainder need not
/// start with a `/`. Paths outside the context are returned unchanged and
/// are then matched against the routes as they are.
///
/// ```rust
/// use ligero::path::strip_context;
///
/// assert_eq!(strip_context("/api/users/7", "/api"), "/users/7");
/// assert_eq!(strip_context("/api", "/api"), "/");
/// assert_eq!(strip_context("/other", "/api"), "/other");
/// assert_eq!(strip_context("/apix", "/api"), "x");
/// ```
pub fn strip_context(path: &str, context: &str) -> String {
    if context == "/" {
        return path.to_owned();
    }

    match path.strip_prefix(context) {
        Some("") => "/".to_owned(),
        Some(rest) => rest.to_owned(),
        None => path.to_owned(),
    }
}

//! Canonical paths for `@inherit` and `@use` references.
//!
//! Canonical paths are the cache keys of the resolver and the keys the
//! [`ContentStore`](crate::store::ContentStore) is queried with. They always use
//! forward slashes, never start with `/` and always end in `.prs`.
//!
//! Two reference forms exist:
//! - **relative** (`./x`, `../x`) - joined with the directory of the referencing
//!   file, collapsing `.` and `..` segments;
//! - **registry** (`@namespace/seg/...[@x.y.z]`) - used as-is, with an optional
//!   semver suffix that is kept on the [`PathReference`] but stripped from the path.
//!
//! Nothing here touches the filesystem.

use regex::Regex;
use std::sync::LazyLock;

use crate::ast::PathReference;
use crate::constants::PRS_EXTENSION;

static REGISTRY_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@([A-Za-z0-9_\-]+)/([A-Za-z0-9_\-./]+?)(?:@([0-9A-Za-z.+\-]+))?$")
        .expect("registry path pattern is valid")
});

/// Convert a path into its canonical form.
///
/// Backslashes become forward slashes, a leading `/` is stripped and `.prs` is
/// appended when missing.
///
/// ```rust
/// use prs_resolver::resolver::path::normalize;
///
/// assert_eq!(normalize("/project/main"), "project/main.prs");
/// assert_eq!(normalize("lib\\base.prs"), "lib/base.prs");
/// ```
#[must_use]
pub fn normalize(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let stripped = unified.strip_prefix('/').unwrap_or(&unified);
    if stripped.ends_with(PRS_EXTENSION) {
        stripped.to_string()
    } else {
        format!("{stripped}{PRS_EXTENSION}")
    }
}

/// Resolve a reference found in `from_file` to a canonical path.
///
/// Relative references are resolved against the directory of `from_file`.
/// A `..` that would climb above the root is dropped without error, so
/// `../../x` referenced from `a.prs` resolves to `x.prs`.
///
/// ```rust
/// use prs_resolver::ast::PathReference;
/// use prs_resolver::resolver::path::resolve_reference;
///
/// let parent = PathReference::parse("../shared/base");
/// assert_eq!(resolve_reference(&parent, "teams/web/app.prs"), "teams/shared/base.prs");
///
/// let registry = PathReference::parse("@core/security@1.2.0");
/// assert_eq!(resolve_reference(&registry, "teams/web/app.prs"), "@core/security.prs");
/// ```
#[must_use]
pub fn resolve_reference(reference: &PathReference, from_file: &str) -> String {
    if reference.is_relative {
        let from = from_file.replace('\\', "/");
        let mut segments: Vec<&str> = from.split('/').filter(|s| !s.is_empty()).collect();
        // Drop the file name, keep its directory.
        segments.pop();

        let raw = reference.raw.replace('\\', "/");
        for segment in raw.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                name => segments.push(name),
            }
        }
        return normalize(&segments.join("/"));
    }

    if let Some(captures) = REGISTRY_PATH.captures(&reference.raw)
        && let (Some(namespace), Some(rest)) = (captures.get(1), captures.get(2))
    {
        let has_version = captures
            .get(3)
            .is_some_and(|v| semver::Version::parse(v.as_str()).is_ok());
        if has_version {
            return normalize(&format!("@{}/{}", namespace.as_str(), rest.as_str()));
        }
    }

    normalize(&reference.raw)
}

impl PathReference {
    /// Classify a raw reference string.
    ///
    /// A version suffix is only recognized on registry references and only when it
    /// is a valid semantic version; otherwise it stays part of the path.
    ///
    /// ```rust
    /// use prs_resolver::ast::PathReference;
    ///
    /// let reference = PathReference::parse("@acme/rules/security@2.0.1");
    /// assert_eq!(reference.namespace.as_deref(), Some("acme"));
    /// assert_eq!(reference.segments, vec!["rules", "security"]);
    /// assert_eq!(reference.version.as_deref(), Some("2.0.1"));
    /// assert!(!reference.is_relative);
    /// ```
    pub fn parse(raw: &str) -> Self {
        let is_relative = raw.starts_with("./") || raw.starts_with("../");
        let mut reference = PathReference {
            raw: raw.to_string(),
            namespace: None,
            segments: Vec::new(),
            version: None,
            is_relative,
            loc: None,
        };

        if !is_relative
            && let Some(captures) = REGISTRY_PATH.captures(raw)
            && let (Some(namespace), Some(rest)) = (captures.get(1), captures.get(2))
        {
            let version = captures
                .get(3)
                .map(|v| v.as_str())
                .filter(|v| semver::Version::parse(v).is_ok());
            let path = match (version, captures.get(3)) {
                (None, Some(unparsed)) => format!("{}@{}", rest.as_str(), unparsed.as_str()),
                _ => rest.as_str().to_string(),
            };
            reference.namespace = Some(namespace.as_str().to_string());
            reference.segments = split_segments(&path);
            reference.version = version.map(str::to_string);
            return reference;
        }

        reference.segments = split_segments(raw);
        reference
    }
}

fn split_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .map(str::to_string)
        .collect()
}

//! Route classification: is this path protected, and which role area does it
//! target?
//!
//! Pure function of the path string and the configured prefix list. No
//! request or session types leak in here.

/// Classification of one request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteClass {
    /// Not under any protected prefix; the gate has nothing to say.
    Public,
    /// Under a protected prefix. `segment` is the path segment immediately
    /// after the prefix (`/dashboard/student/...` -> `student`), or `None`
    /// for the bare prefix itself.
    Protected {
        prefix: String,
        segment: Option<String>,
    },
}

/// Classify `path` against the configured protected prefixes.
///
/// Trailing slashes and empty segments normalize away: `/dashboard`,
/// `/dashboard/` and `/dashboard//` all classify as the bare protected root.
/// A path that merely shares characters with a prefix (`/dashboard-help`)
/// is public.
pub fn classify(path: &str, protected_prefixes: &[String]) -> RouteClass {
    let path = normalize(path);

    for prefix in protected_prefixes {
        let prefix = prefix.trim_end_matches('/');
        if prefix.is_empty() {
            continue;
        }

        if path == prefix {
            return RouteClass::Protected {
                prefix: prefix.to_string(),
                segment: None,
            };
        }

        if let Some(rest) = path.strip_prefix(prefix)
            && rest.starts_with('/')
        {
            let segment = rest
                .split('/')
                .find(|s| !s.is_empty())
                .map(|s| s.to_string());
            return RouteClass::Protected {
                prefix: prefix.to_string(),
                segment,
            };
        }
    }

    RouteClass::Public
}

fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

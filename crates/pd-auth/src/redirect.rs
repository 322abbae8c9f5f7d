//! Post-login redirect targets
//!
//! Every user-controlled `next` value passes through [`resolve_next_path`]
//! before it is used in a `Location` header. The result is always a
//! root-relative path on the current origin.

use url::{form_urlencoded, ParseError, Url};

/// Where users land when no usable destination was supplied
pub const DEFAULT_NEXT_PATH: &str = "/projects";

/// Reduce a caller-supplied destination to a safe same-origin path.
///
/// - absent or empty: [`DEFAULT_NEXT_PATH`]
/// - absolute `http(s)` URL: its path, query and fragment; the host is dropped
/// - anything else must already be a root-relative path
///
/// Never fails; unusable input degrades to the default path.
pub fn resolve_next_path(next: Option<&str>) -> String {
    let Some(raw) = next.filter(|s| !s.is_empty()) else {
        return DEFAULT_NEXT_PATH.to_string();
    };

    let candidate = match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => path_of(&url),
        Ok(_) => None,
        Err(ParseError::RelativeUrlWithoutBase) => Some(raw.to_string()),
        Err(_) => None,
    };

    match candidate {
        Some(path) if is_root_relative(&path) => path,
        _ => {
            tracing::debug!(next = %raw, "Rejected redirect target");
            DEFAULT_NEXT_PATH.to_string()
        }
    }
}

fn path_of(url: &Url) -> Option<String> {
    let mut path = url.path().to_string();
    if let Some(query) = url.query() {
        path.push('?');
        path.push_str(query);
    }
    if let Some(fragment) = url.fragment() {
        path.push('#');
        path.push_str(fragment);
    }
    Some(path)
}

/// A single leading slash followed by something other than a second slash
/// or backslash. Browsers treat `//host` and `/\host` as network paths and
/// silently drop tabs and newlines, so control characters are refused too.
fn is_root_relative(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.first() == Some(&b'/')
        && !matches!(bytes.get(1), Some(b'/') | Some(b'\\'))
        && !path.chars().any(|c| c.is_control())
}

/// Magic-link callback URL carrying an already-resolved destination
pub fn callback_url(origin: &str, next: &str) -> String {
    format!(
        "{}/auth/callback?next={}",
        origin.trim_end_matches('/'),
        encode(next)
    )
}

/// Login page URL that returns the user to `next` afterwards
pub fn login_url(next: &str) -> String {
    format!("/login?next={}", encode(next))
}

fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(next: &str) -> String {
        resolve_next_path(Some(next))
    }

    #[test]
    fn test_absent_and_empty_use_default() {
        assert_eq!(resolve_next_path(None), "/projects");
        assert_eq!(resolve(""), "/projects");
    }

    #[test]
    fn test_relative_path_passes_through() {
        assert_eq!(resolve("/admin/people"), "/admin/people");
        assert_eq!(resolve("/projects/4?tab=timeline#2025"), "/projects/4?tab=timeline#2025");
        assert_eq!(resolve("/"), "/");
    }

    #[test]
    fn test_absolute_url_keeps_only_path() {
        assert_eq!(resolve("https://evil.com/steal?x=1"), "/steal?x=1");
        assert_eq!(resolve("http://dash.example.org/projects/2#top"), "/projects/2#top");
        assert_eq!(resolve("https://evil.com"), "/");
    }

    #[test]
    fn test_protocol_relative_is_rejected() {
        assert_eq!(resolve("//evil.com/path"), "/projects");
        assert_eq!(resolve("/\\evil.com"), "/projects");
    }

    #[test]
    fn test_bare_strings_are_rejected() {
        assert_eq!(resolve("evil.com"), "/projects");
        assert_eq!(resolve("projects/1"), "/projects");
        assert_eq!(resolve("   "), "/projects");
    }

    #[test]
    fn test_other_schemes_are_rejected() {
        assert_eq!(resolve("javascript:alert(1)"), "/projects");
        assert_eq!(resolve("ftp://evil.com/file"), "/projects");
        assert_eq!(resolve("data:text/html,hi"), "/projects");
    }

    #[test]
    fn test_malformed_absolute_url_uses_default() {
        assert_eq!(resolve("http://"), "/projects");
        assert_eq!(resolve("https://exa mple.com/x"), "/projects");
        assert_eq!(resolve("http://[::1/x"), "/projects");
    }

    #[test]
    fn test_absolute_url_with_network_path_is_rejected() {
        assert_eq!(resolve("https://good.org//evil.com"), "/projects");
        assert_eq!(resolve("https://good.org/\\evil.com"), "/projects");
    }

    #[test]
    fn test_control_characters_are_rejected() {
        assert_eq!(resolve("/\t/evil.com"), "/projects");
        assert_eq!(resolve("/projects\n"), "/projects");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "",
            "/",
            "/admin/people",
            "https://evil.com/steal?x=1",
            "https://evil.com//double",
            "//evil.com/path",
            "/\\evil.com",
            "evil.com",
            "javascript:alert(1)",
            "http://",
            "https://x.org/a b?c=d e#f g",
            "/%2F%2Fevil.com",
            "https://x.org/%2F%2Fevil.com",
            "HTTPS://EVIL.COM/Upper",
            "/\t/evil.com",
        ];
        for input in inputs {
            let once = resolve(input);
            assert_eq!(resolve(&once), once, "input {:?}", input);
            assert!(once.starts_with('/'), "input {:?}", input);
            assert!(!once.starts_with("//"), "input {:?}", input);
        }
    }

    #[test]
    fn test_callback_url_encodes_next() {
        assert_eq!(
            callback_url("https://dash.example.org/", "/projects/4?tab=budget"),
            "https://dash.example.org/auth/callback?next=%2Fprojects%2F4%3Ftab%3Dbudget"
        );
    }

    #[test]
    fn test_login_url() {
        assert_eq!(login_url("/admin"), "/login?next=%2Fadmin");
    }
}

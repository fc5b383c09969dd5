//! Request cookie parsing and `Set-Cookie` rendering.
//!
//! Session cookies are opaque here: they are looked up and cleared by name,
//! their values are interpreted only by the auth provider.

use std::collections::BTreeMap;
use strum::Display;

/// Cookies sent by the client, keyed by name. The first occurrence of a
/// name wins, matching how browsers order more specific paths first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    cookies: BTreeMap<String, String>
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses one or more `Cookie` header values.
    pub fn parse<'a>(headers: impl IntoIterator<Item = &'a str>) -> Self {
        let mut cookies = BTreeMap::new();
        for header in headers {
            for pair in header.split(';') {
                let Some((name, value)) = pair.split_once('=') else {
                    continue;
                };
                let name = name.trim();
                if name.is_empty() {
                    continue;
                }
                let value = value.trim().trim_matches('"');
                cookies
                    .entry(name.to_string())
                    .or_insert_with(|| value.to_string());
            }
        }
        Self { cookies }
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Returns the percent-decoded value, falling back to the raw value when
    /// it is not valid percent-encoding.
    pub fn get_decoded(&self, name: &str) -> Option<String> {
        let raw = self.get(name)?;
        Some(
            urlencoding::decode(raw)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| raw.to_string())
        )
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    /// Names of the `name.0`, `name.1`, ... cookies a large value was split
    /// across, in order, stopping at the first gap.
    pub fn chunk_names(&self, name: &str) -> Vec<String> {
        (0..)
            .map(|i| format!("{name}.{i}"))
            .take_while(|chunk| self.contains(chunk))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SameSite {
    Strict,
    Lax,
    None
}

/// A cookie to be written back through a `Set-Cookie` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseCookie {
    pub name: String,
    pub value: String,
    pub path: String,
    pub max_age: Option<i64>,
    pub expire_now: bool,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: Option<SameSite>
}

const EPOCH_HTTP_DATE: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

impl ResponseCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: "/".to_string(),
            max_age: None,
            expire_now: false,
            http_only: false,
            secure: false,
            same_site: None
        }
    }

    /// A cookie that instructs the client to drop `name` immediately.
    pub fn expired(name: impl Into<String>) -> Self {
        Self {
            max_age: Some(0),
            expire_now: true,
            http_only: true,
            same_site: Some(SameSite::Lax),
            ..Self::new(name, "")
        }
    }

    pub fn max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    pub fn is_removal(&self) -> bool {
        self.expire_now
    }

    /// Renders the value of a `Set-Cookie` header.
    pub fn to_header_value(&self) -> String {
        let mut out = format!("{}={}; Path={}", self.name, self.value, self.path);
        if self.expire_now {
            out.push_str("; Expires=");
            out.push_str(EPOCH_HTTP_DATE);
        }
        if let Some(max_age) = self.max_age {
            out.push_str(&format!("; Max-Age={max_age}"));
        }
        if self.http_only {
            out.push_str("; HttpOnly");
        }
        if self.secure {
            out.push_str("; Secure");
        }
        if let Some(same_site) = self.same_site {
            out.push_str(&format!("; SameSite={same_site}"));
        }
        out
    }
}

impl std::fmt::Display for ResponseCookie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_header_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multiple_headers() {
        let jar = CookieJar::parse(["a=1; b=two", "c=\"quoted\"; a=ignored"]);
        assert_eq!(jar.get("a"), Some("1"));
        assert_eq!(jar.get("b"), Some("two"));
        assert_eq!(jar.get("c"), Some("quoted"));
        assert!(!jar.contains("d"));
    }

    #[test]
    fn test_parse_skips_garbage() {
        let jar = CookieJar::parse(["; =x; novalue; ok=1"]);
        assert_eq!(jar.get("ok"), Some("1"));
        assert!(!jar.contains(""));
        assert!(!jar.contains("novalue"));
    }

    #[test]
    fn test_chunk_names_stop_at_gap() {
        let jar = CookieJar::new()
            .with("sb-p-auth-token.0", "a")
            .with("sb-p-auth-token.1", "b")
            .with("sb-p-auth-token.3", "d");
        assert_eq!(
            jar.chunk_names("sb-p-auth-token"),
            vec!["sb-p-auth-token.0", "sb-p-auth-token.1"]
        );
        assert!(jar.chunk_names("other").is_empty());
    }

    #[test]
    fn test_get_decoded() {
        let jar = CookieJar::new().with("s", "%7B%22a%22%3A1%7D");
        assert_eq!(jar.get_decoded("s").as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_expired_cookie_header() {
        let cookie = ResponseCookie::expired("sb-demo-auth-token").secure(true);
        assert_eq!(
            cookie.to_header_value(),
            "sb-demo-auth-token=; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0; \
             HttpOnly; Secure; SameSite=Lax"
        );
        assert!(cookie.is_removal());
    }

    #[test]
    fn test_plain_cookie_header() {
        let cookie = ResponseCookie::new("k", "v")
            .max_age(3600)
            .same_site(SameSite::Strict);
        assert_eq!(
            cookie.to_header_value(),
            "k=v; Path=/; Max-Age=3600; SameSite=Strict"
        );
    }
}

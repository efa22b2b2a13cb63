use std::collections::BTreeMap;

/// Session cookies captured from responses and replayed on later requests.
#[derive(Debug, Clone, Default)]
pub struct CookieJar {
    cookies: BTreeMap<String, String>,
}

impl CookieJar {
    /// Store the `name=value` pair of a `Set-Cookie` header. Attributes
    /// (`Path`, `HttpOnly`, ...) are ignored; an empty value removes the cookie.
    pub fn absorb(&mut self, set_cookie: &str) {
        let pair = set_cookie.split(';').next().unwrap_or_default();
        let Some((name, value)) = pair.split_once('=') else {
            return;
        };
        let name = name.trim();
        if name.is_empty() {
            return;
        }

        let value = value.trim();
        if value.is_empty() {
            self.cookies.remove(name);
        } else {
            self.cookies.insert(name.to_string(), value.to_string());
        }
    }

    /// Value for a `Cookie` request header, if any cookies are held.
    pub fn header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        let pairs: Vec<String> = self
            .cookies
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        Some(pairs.join("; "))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.cookies.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorb_ignores_attributes() {
        let mut jar = CookieJar::default();
        jar.absorb("JSESSIONID=abc123; Path=/WebUntis; HttpOnly");
        assert_eq!(jar.get("JSESSIONID"), Some("abc123"));
        assert_eq!(jar.header().as_deref(), Some("JSESSIONID=abc123"));
    }

    #[test]
    fn header_joins_in_name_order() {
        let mut jar = CookieJar::default();
        jar.absorb("schoolname=\"_c2Nob29s\"; Path=/");
        jar.absorb("JSESSIONID=abc123");
        assert_eq!(
            jar.header().as_deref(),
            Some("JSESSIONID=abc123; schoolname=\"_c2Nob29s\"")
        );
    }

    #[test]
    fn later_cookie_replaces_and_empty_value_removes() {
        let mut jar = CookieJar::default();
        jar.absorb("JSESSIONID=first");
        jar.absorb("JSESSIONID=second");
        assert_eq!(jar.get("JSESSIONID"), Some("second"));

        jar.absorb("JSESSIONID=; Max-Age=0");
        assert!(jar.is_empty());
        assert_eq!(jar.header(), None);
    }

    #[test]
    fn malformed_headers_are_skipped() {
        let mut jar = CookieJar::default();
        jar.absorb("no-equals-sign");
        jar.absorb("=orphan");
        assert!(jar.is_empty());
    }
}

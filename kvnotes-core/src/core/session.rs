//! Anonymous per-browser sessions carried in a signed cookie.
//!
//! The session map is serialized to JSON, base64url-encoded, and stored as
//! the value of a cookie signed through [`cookie::CookieJar::signed_mut`].
//! The signing [`Key`] is derived from the configured secret with SHA-512.
//!
//! A cookie that is missing, malformed, or signed with a different secret
//! is treated as no session at all, so the visitor simply gets a fresh
//! one. Only the codec's construction can fail.

use crate::{NotesError, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use cookie::{Cookie, CookieJar, Key, SameSite};
use sha2::{Digest, Sha512};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Cookie name used when none is configured.
pub const DEFAULT_COOKIE_NAME: &str = "__crn_session";

/// Session key under which the anonymous user ID is stored.
pub const USER_ID_KEY: &str = "userId";

/// String-keyed values attached to one browser.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    values: BTreeMap<String, String>,
    modified: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
        self.modified = true;
    }

    /// Whether [`set`](Self::set) was called since the session was read.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// The anonymous user ID, if one has been assigned.
    pub fn user_id(&self) -> Option<&str> {
        self.get(USER_ID_KEY)
    }

    /// Returns the user ID, assigning a new random one on first visit.
    pub fn ensure_user_id(&mut self) -> String {
        if let Some(existing) = self.user_id() {
            return existing.to_string();
        }
        let user_id = Uuid::new_v4().to_string();
        self.set(USER_ID_KEY, user_id.clone());
        user_id
    }
}

/// Reads and writes [`Session`] cookies.
#[derive(Clone)]
pub struct SessionCodec {
    cookie_name: String,
    key: Key,
}

impl std::fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCodec")
            .field("cookie_name", &self.cookie_name)
            .finish_non_exhaustive()
    }
}

impl SessionCodec {
    /// # Errors
    ///
    /// Returns [`NotesError::InvalidSession`] if the cookie name or secret is empty.
    pub fn new(cookie_name: impl Into<String>, secret: impl AsRef<[u8]>) -> Result<Self> {
        let cookie_name = cookie_name.into();
        let secret = secret.as_ref();
        if cookie_name.is_empty() {
            return Err(NotesError::InvalidSession(
                "cookie name must not be empty".to_string(),
            ));
        }
        if secret.is_empty() {
            return Err(NotesError::InvalidSession(
                "session secret must not be empty".to_string(),
            ));
        }
        let key = Key::try_from(Sha512::digest(secret).as_slice())
            .map_err(|e| NotesError::InvalidSession(e.to_string()))?;
        Ok(Self { cookie_name, key })
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Builds the session carried by a request's `Cookie` header.
    pub fn read(&self, cookie_header: Option<&str>) -> Session {
        let mut jar = CookieJar::new();
        for cookie in Cookie::split_parse(cookie_header.unwrap_or_default()).flatten() {
            jar.add_original(cookie.into_owned());
        }
        if jar.get(&self.cookie_name).is_none() {
            return Session::new();
        }

        let values = jar
            .signed(&self.key)
            .get(&self.cookie_name)
            .and_then(|cookie| decode_values(cookie.value()));
        match values {
            Some(values) => Session {
                values,
                modified: false,
            },
            None => {
                log::warn!("discarding session cookie with a bad signature");
                Session::new()
            }
        }
    }

    /// Encodes `session` as a `Set-Cookie` header value.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::Json`] if the session map cannot be serialized.
    pub fn commit(&self, session: &Session) -> Result<String> {
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&session.values)?);
        let mut jar = CookieJar::new();
        jar.signed_mut(&self.key).add(
            Cookie::build((self.cookie_name.clone(), payload))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax),
        );
        jar.get(&self.cookie_name)
            .map(|cookie| cookie.to_string())
            .ok_or_else(|| {
                NotesError::InvalidSession("signed cookie was not stored".to_string())
            })
    }
}

fn decode_values(payload: &str) -> Option<BTreeMap<String, String>> {
    let json = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&json).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> SessionCodec {
        SessionCodec::new(DEFAULT_COOKIE_NAME, "test-secret").unwrap()
    }

    /// Extracts the `name=value` pair from a `Set-Cookie` value.
    fn cookie_pair(set_cookie: &str) -> &str {
        set_cookie.split(';').next().unwrap()
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(
            SessionCodec::new("c", ""),
            Err(NotesError::InvalidSession(_))
        ));
        assert!(matches!(
            SessionCodec::new("", "s"),
            Err(NotesError::InvalidSession(_))
        ));
    }

    #[test]
    fn test_missing_cookie_is_empty_session() {
        let session = codec().read(None);
        assert!(!session.has(USER_ID_KEY));
        assert!(!session.is_modified());
        let session = codec().read(Some("theme=dark"));
        assert_eq!(session.user_id(), None);
    }

    #[test]
    fn test_ensure_user_id_is_stable() {
        let mut session = Session::new();
        let first = session.ensure_user_id();
        assert!(session.is_modified());
        assert_eq!(session.ensure_user_id(), first);
        assert_eq!(session.get(USER_ID_KEY), Some(first.as_str()));
    }

    #[test]
    fn test_committed_cookie_reads_back() {
        let codec = codec();
        let mut session = Session::new();
        let user_id = session.ensure_user_id();

        let set_cookie = codec.commit(&session).unwrap();
        assert!(set_cookie.starts_with("__crn_session="));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("SameSite=Lax"));
        assert!(set_cookie.contains("Path=/"));

        let header = format!("theme=dark; {}; lang=en", cookie_pair(&set_cookie));
        let restored = codec.read(Some(&header));
        assert_eq!(restored.user_id(), Some(user_id.as_str()));
        assert!(!restored.is_modified());
    }

    #[test]
    fn test_tampered_cookie_is_discarded() {
        let codec = codec();
        let mut session = Session::new();
        session.set(USER_ID_KEY, "alice");
        let set_cookie = codec.commit(&session).unwrap();
        let (_, value) = cookie_pair(&set_cookie).split_once('=').unwrap();
        // Signed values are the base64 MAC (44 chars) followed by the payload.
        let signature = &value[..44];

        let mut forged = Session::new();
        forged.set(USER_ID_KEY, "mallory");
        let forged_payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&forged.values).unwrap());
        let header = format!("{DEFAULT_COOKIE_NAME}={signature}{forged_payload}");

        assert_eq!(codec.read(Some(&header)).user_id(), None);
    }

    #[test]
    fn test_other_secret_cannot_read_cookie() {
        let mut session = Session::new();
        session.ensure_user_id();
        let set_cookie = codec().commit(&session).unwrap();

        let other = SessionCodec::new(DEFAULT_COOKIE_NAME, "another-secret").unwrap();
        assert_eq!(other.read(Some(cookie_pair(&set_cookie))).user_id(), None);
    }

    #[test]
    fn test_garbage_cookie_is_discarded() {
        let header = format!("{DEFAULT_COOKIE_NAME}=not-a-session");
        assert_eq!(codec().read(Some(&header)), Session::new());
    }

    #[test]
    fn test_malformed_header_fragments_are_skipped() {
        let codec = codec();
        let mut session = Session::new();
        session.set(USER_ID_KEY, "alice");
        let set_cookie = codec.commit(&session).unwrap();

        let header = format!("junk; ; {}", cookie_pair(&set_cookie));
        assert_eq!(codec.read(Some(&header)).user_id(), Some("alice"));
    }
}

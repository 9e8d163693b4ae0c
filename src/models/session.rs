use std::fmt;

/// Validity window of a session token: 30 days in milliseconds.
pub const THIRTY_DAYS_MS: i64 = 30 * 24 * 60 * 60 * 1000;

/// Represents a signed, self-contained session token.
///
/// Wire format: `{created_at}:{expires_at}:{signature}`, where the
/// signature is the hex HMAC-SHA256 of `{created_at}:{expires_at}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    /// Issuance time, milliseconds since the Unix epoch.
    pub created_at: i64,
    /// Absolute expiry, milliseconds since the Unix epoch.
    pub expires_at: i64,
    /// Hex-encoded HMAC over [`SessionToken::payload`].
    pub signature: String,
}

/// The pieces of a token as they appeared on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSessionToken<'a> {
    /// Issuance time as sent by the client.
    pub created_at: &'a str,
    /// Expiry as sent by the client.
    pub expires_at: &'a str,
    /// Hex signature as sent by the client.
    pub signature: &'a str,
}

impl<'a> RawSessionToken<'a> {
    /// Splits a cookie value into exactly three colon-separated parts.
    pub fn split(token: &'a str) -> Option<Self> {
        let mut parts = token.split(':');
        let created_at = parts.next()?;
        let expires_at = parts.next()?;
        let signature = parts.next()?;
        if parts.next().is_some() {
            return None;
        }

        Some(Self {
            created_at,
            expires_at,
            signature,
        })
    }

    /// The signed portion, exactly as received.
    pub fn payload(&self) -> String {
        format!("{}:{}", self.created_at, self.expires_at)
    }

    /// Parses `(created_at, expires_at)`. `None` if either is not an integer.
    pub fn timestamps(&self) -> Option<(i64, i64)> {
        Some((self.created_at.parse().ok()?, self.expires_at.parse().ok()?))
    }
}

impl SessionToken {
    /// The string the signature covers.
    pub fn payload(&self) -> String {
        signing_payload(self.created_at, self.expires_at)
    }

    /// Parses the wire format. Returns `None` for anything malformed.
    pub fn parse(token: &str) -> Option<Self> {
        let raw = RawSessionToken::split(token)?;
        let (created_at, expires_at) = raw.timestamps()?;
        Some(Self {
            created_at,
            expires_at,
            signature: raw.signature.to_string(),
        })
    }

    /// Returns `true` if `now_ms` is past the expiry.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms > self.expires_at
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.created_at, self.expires_at, self.signature)
    }
}

/// Builds the string that gets signed for a token.
pub fn signing_payload(created_at: i64, expires_at: i64) -> String {
    format!("{}:{}", created_at, expires_at)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_formats_wire_form() {
        let token = SessionToken::parse("1000:2000:abcdef").unwrap();
        assert_eq!(token.created_at, 1000);
        assert_eq!(token.expires_at, 2000);
        assert_eq!(token.signature, "abcdef");
        assert_eq!(token.payload(), "1000:2000");
        assert_eq!(token.to_string(), "1000:2000:abcdef");
    }

    #[test]
    fn rejects_wrong_shapes() {
        assert!(SessionToken::parse("").is_none());
        assert!(SessionToken::parse("1000:2000").is_none());
        assert!(SessionToken::parse("1000:2000:sig:extra").is_none());
        assert!(SessionToken::parse("abc:2000:sig").is_none());
        assert!(SessionToken::parse("1000:2e3:sig").is_none());
    }

    #[test]
    fn raw_split_keeps_parts_verbatim() {
        let raw = RawSessionToken::split("0100:0200:sig").unwrap();
        assert_eq!(raw.payload(), "0100:0200");
        assert_eq!(raw.timestamps(), Some((100, 200)));
        assert_eq!(RawSessionToken::split("a:200:sig").unwrap().timestamps(), None);
    }

    #[test]
    fn expiry_is_inclusive_of_the_boundary() {
        let token = SessionToken::parse("0:100:sig").unwrap();
        assert!(!token.is_expired_at(100));
        assert!(token.is_expired_at(101));
    }

    #[test]
    fn thirty_days_in_milliseconds() {
        assert_eq!(THIRTY_DAYS_MS, 2_592_000_000);
    }
}

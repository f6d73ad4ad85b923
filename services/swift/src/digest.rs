use std::fmt::{Display, Formatter};
use std::str::FromStr;

use swiftsign_core::hash::{
    base64_hmac_sha512, hex_hmac_sha1, hex_hmac_sha256, hex_hmac_sha512, hmac_sha1,
    hmac_sha256, hmac_sha512, verify_hmac_sha1, verify_hmac_sha256, verify_hmac_sha512,
};
use swiftsign_core::Error;

/// Digest used to compute the HMAC of a temporary url.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Digest {
    /// HMAC-SHA1, kept for older clusters.
    Sha1,
    /// HMAC-SHA256.
    #[default]
    Sha256,
    /// HMAC-SHA512.
    Sha512,
}

impl Digest {
    /// Every digest, strongest last.
    pub const ALL: [Digest; 3] = [Digest::Sha1, Digest::Sha256, Digest::Sha512];

    /// Name as it appears in `/info` and in prefixed signatures.
    pub fn name(&self) -> &'static str {
        match self {
            Digest::Sha1 => "sha1",
            Digest::Sha256 => "sha256",
            Digest::Sha512 => "sha512",
        }
    }

    /// Raw HMAC bytes.
    pub fn hmac(&self, key: &[u8], content: &[u8]) -> Vec<u8> {
        match self {
            Digest::Sha1 => hmac_sha1(key, content),
            Digest::Sha256 => hmac_sha256(key, content),
            Digest::Sha512 => hmac_sha512(key, content),
        }
    }

    /// Check raw HMAC bytes in constant time.
    pub fn verify(&self, key: &[u8], content: &[u8], tag: &[u8]) -> bool {
        match self {
            Digest::Sha1 => verify_hmac_sha1(key, content, tag),
            Digest::Sha256 => verify_hmac_sha256(key, content, tag),
            Digest::Sha512 => verify_hmac_sha512(key, content, tag),
        }
    }

    /// Lowercase hex HMAC.
    pub fn hex_hmac(&self, key: &[u8], content: &[u8]) -> String {
        match self {
            Digest::Sha1 => hex_hmac_sha1(key, content),
            Digest::Sha256 => hex_hmac_sha256(key, content),
            Digest::Sha512 => hex_hmac_sha512(key, content),
        }
    }

    /// Signature in the form the `temp_url_sig` parameter carries.
    ///
    /// SHA1 and SHA256 are plain hex. SHA512 hex is 128 characters long, so it
    /// is sent as `sha512:<url safe base64>` instead.
    pub fn signature(&self, key: &[u8], content: &[u8]) -> String {
        match self {
            Digest::Sha512 => format!("{}:{}", self.name(), base64_hmac_sha512(key, content)),
            _ => self.hex_hmac(key, content),
        }
    }

    /// Guess the digest from the length of a hex signature.
    pub fn from_hex_len(len: usize) -> Option<Self> {
        match len {
            40 => Some(Digest::Sha1),
            64 => Some(Digest::Sha256),
            128 => Some(Digest::Sha512),
            _ => None,
        }
    }
}

impl Display for Digest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Digest {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha1" => Ok(Digest::Sha1),
            "sha256" => Ok(Digest::Sha256),
            "sha512" => Ok(Digest::Sha512),
            v => Err(Error::config_invalid(format!("unsupported temp url digest: {v}"))),
        }
    }
}

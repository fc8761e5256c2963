//! Assembly identity value type: display-name parsing and formatting

use std::fmt;
use std::str::FromStr;

use nupm_semver::Version;
use thiserror::Error;

use crate::architecture::ProcessorArchitecture;
use crate::comparer::AssemblyIdentityComparer;
use crate::culture::is_valid_culture;

/// Error type for assembly identity parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    #[error("assembly identity string is empty")]
    Empty,
    #[error("\"{0}\" is not a valid assembly identity")]
    InvalidFormat(String),
    #[error("assembly identity \"{0}\" is missing a short name")]
    MissingName(String),
    #[error("unknown assembly identity key \"{0}\"")]
    UnknownKey(String),
    #[error("duplicate assembly identity key \"{0}\"")]
    DuplicateKey(String),
    #[error("invalid assembly version \"{0}\"")]
    InvalidVersion(String),
    #[error("invalid culture \"{0}\"")]
    InvalidCulture(String),
    #[error("invalid public key token \"{0}\"")]
    InvalidToken(String),
    #[error("unknown processor architecture \"{0}\"")]
    InvalidArchitecture(String),
}

/// The identity of a .NET assembly: short name plus optional version,
/// culture, public key token, and processor architecture.
///
/// The textual form is the display name
/// `Name, Version=1.2.3.4, Culture=neutral, PublicKeyToken=0123456789ABCDEF`.
/// A `neutral` culture and a `null` token are represented as absent.
/// Equality and hashing compare every field, with the short name and
/// culture case-insensitive.
#[derive(Debug, Clone)]
pub struct AssemblyIdentity {
    short_name: String,
    version: Option<Version>,
    culture: Option<String>,
    public_key_token: Option<[u8; 8]>,
    architecture: ProcessorArchitecture,
    /// The parsed input with the token hex upper-cased, so `Display` can
    /// reconstruct it. Presentation state only; excluded from equality
    /// and hashing, and cleared by the builder methods.
    original: Option<String>,
}

impl AssemblyIdentity {
    /// An identity carrying only a short name.
    pub fn new(short_name: impl Into<String>) -> AssemblyIdentity {
        AssemblyIdentity {
            short_name: short_name.into(),
            version: None,
            culture: None,
            public_key_token: None,
            architecture: ProcessorArchitecture::None,
            original: None,
        }
    }

    pub fn with_version(mut self, version: Version) -> AssemblyIdentity {
        self.version = Some(version);
        self.original = None;
        self
    }

    pub fn with_culture(mut self, culture: impl Into<String>) -> AssemblyIdentity {
        self.culture = Some(culture.into());
        self.original = None;
        self
    }

    pub fn with_public_key_token(mut self, token: [u8; 8]) -> AssemblyIdentity {
        self.public_key_token = Some(token);
        self.original = None;
        self
    }

    pub fn with_architecture(mut self, architecture: ProcessorArchitecture) -> AssemblyIdentity {
        self.architecture = architecture;
        self.original = None;
        self
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    /// The culture tag; `None` for culture-neutral assemblies.
    pub fn culture(&self) -> Option<&str> {
        self.culture.as_deref()
    }

    pub fn public_key_token(&self) -> Option<&[u8; 8]> {
        self.public_key_token.as_ref()
    }

    pub fn architecture(&self) -> ProcessorArchitecture {
        self.architecture
    }

    pub fn has_public_key_token(&self) -> bool {
        self.public_key_token.is_some()
    }

    /// Parse a display name, returning `None` on failure.
    pub fn try_parse(text: &str) -> Option<AssemblyIdentity> {
        AssemblyIdentity::parse(text).ok()
    }

    /// Parse a display name.
    ///
    /// The short name is the first comma-separated token; the rest are
    /// `Key=Value` pairs with case-insensitive keys. Unknown or repeated
    /// keys are errors.
    pub fn parse(text: &str) -> Result<AssemblyIdentity, IdentityError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(IdentityError::Empty);
        }

        let mut tokens = trimmed.split(',');
        let short_name = tokens.next().unwrap_or("").trim();
        if short_name.is_empty() || short_name.contains('=') {
            return Err(IdentityError::MissingName(trimmed.to_string()));
        }

        let mut identity = AssemblyIdentity::new(short_name);
        let mut seen = [false; 4];
        for token in tokens {
            let token = token.trim();
            let (key, value) = token
                .split_once('=')
                .ok_or_else(|| IdentityError::InvalidFormat(trimmed.to_string()))?;
            let key = key.trim();
            let value = value.trim();

            if key.eq_ignore_ascii_case("Version") {
                claim(&mut seen[0], key)?;
                identity.version = Some(parse_identity_version(value)?);
            } else if key.eq_ignore_ascii_case("Culture") {
                claim(&mut seen[1], key)?;
                identity.culture = parse_culture(value)?;
            } else if key.eq_ignore_ascii_case("PublicKeyToken") {
                claim(&mut seen[2], key)?;
                identity.public_key_token = parse_token(value)?;
            } else if key.eq_ignore_ascii_case("processorArchitecture") {
                claim(&mut seen[3], key)?;
                identity.architecture = value
                    .parse()
                    .map_err(|_| IdentityError::InvalidArchitecture(value.to_string()))?;
            } else {
                return Err(IdentityError::UnknownKey(key.to_string()));
            }
        }

        identity.original = Some(uppercase_token_hex(trimmed));
        Ok(identity)
    }

    /// The display name; same as `to_string`.
    pub fn display_name(&self) -> String {
        self.to_string()
    }
}

fn claim(slot: &mut bool, key: &str) -> Result<(), IdentityError> {
    if *slot {
        return Err(IdentityError::DuplicateKey(key.to_string()));
    }
    *slot = true;
    Ok(())
}

/// `X.Y[.Z[.R]]`: two to four dot-separated integers, nothing else.
fn parse_identity_version(value: &str) -> Result<Version, IdentityError> {
    let invalid = || IdentityError::InvalidVersion(value.to_string());
    let parts = value.split('.').count();
    if !(2..=4).contains(&parts) {
        return Err(invalid());
    }
    let version = Version::parse(value).map_err(|_| invalid())?;
    if version.is_prerelease() || version.has_metadata() {
        return Err(invalid());
    }
    Ok(version)
}

fn parse_culture(value: &str) -> Result<Option<String>, IdentityError> {
    if value.eq_ignore_ascii_case("neutral") {
        return Ok(None);
    }
    if !is_valid_culture(value) {
        return Err(IdentityError::InvalidCulture(value.to_string()));
    }
    Ok(Some(value.to_string()))
}

fn parse_token(value: &str) -> Result<Option<[u8; 8]>, IdentityError> {
    if value.eq_ignore_ascii_case("null") {
        return Ok(None);
    }
    if value.len() != 16 || !value.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(IdentityError::InvalidToken(value.to_string()));
    }
    let bytes = value.as_bytes();
    let mut token = [0u8; 8];
    for (i, slot) in token.iter_mut().enumerate() {
        *slot = (hex_value(bytes[2 * i]) << 4) | hex_value(bytes[2 * i + 1]);
    }
    Ok(Some(token))
}

fn hex_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => b - b'A' + 10,
    }
}

/// The input byte for byte, except a public-key-token hex value is
/// upper-cased.
fn uppercase_token_hex(text: &str) -> String {
    let segments: Vec<String> = text
        .split(',')
        .map(|segment| match segment.split_once('=') {
            Some((key, value))
                if key.trim().eq_ignore_ascii_case("PublicKeyToken")
                    && value.trim().len() == 16
                    && value.trim().bytes().all(|b| b.is_ascii_hexdigit()) =>
            {
                format!("{key}={}", value.to_ascii_uppercase())
            }
            _ => segment.to_string(),
        })
        .collect();
    segments.join(",")
}

impl fmt::Display for AssemblyIdentity {
    /// Reconstructs the parsed input when available (with the token hex
    /// upper-cased). Otherwise emits the canonical display name: the
    /// `Version`/`Culture`/`PublicKeyToken` triple when a version or token
    /// is present, and the architecture when it is not `None`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(original) = &self.original {
            return f.write_str(original);
        }
        f.write_str(&self.short_name)?;
        if self.version.is_some() || self.public_key_token.is_some() {
            match &self.version {
                Some(version) => write!(f, ", Version={}", version.format("x.y.z.r"))?,
                None => f.write_str(", Version=0.0.0.0")?,
            }
            write!(f, ", Culture={}", self.culture.as_deref().unwrap_or("neutral"))?;
            match &self.public_key_token {
                Some(token) => {
                    f.write_str(", PublicKeyToken=")?;
                    for byte in token {
                        write!(f, "{byte:02X}")?;
                    }
                }
                None => f.write_str(", PublicKeyToken=null")?,
            }
        }
        if self.architecture != ProcessorArchitecture::None {
            write!(f, ", processorArchitecture={}", self.architecture)?;
        }
        Ok(())
    }
}

impl FromStr for AssemblyIdentity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssemblyIdentity::parse(s)
    }
}

impl PartialEq for AssemblyIdentity {
    fn eq(&self, other: &Self) -> bool {
        AssemblyIdentityComparer::default().equals(self, other)
    }
}

impl Eq for AssemblyIdentity {}

impl std::hash::Hash for AssemblyIdentity {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        AssemblyIdentityComparer::default().feed(self, state);
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for AssemblyIdentity {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for AssemblyIdentity {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        AssemblyIdentity::parse(&text).map_err(serde::de::Error::custom)
    }
}

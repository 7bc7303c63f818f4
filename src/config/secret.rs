//! Connection string secret
//!
//! The PostgreSQL connection string usually embeds a password, so it is kept
//! inside a [`secrecy::Secret`]: zeroized on drop, redacted in `Debug`, and
//! only readable through `expose_secret()`. Anything printed or logged goes
//! through [`SecretValue::redacted_connection_string`].
//!
//! ```rust
//! use patient_import::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let conn = secret_string("postgresql://postgres:pw@db:5432/patients".to_string());
//! assert_eq!(conn.expose_secret().redacted_connection_string(), "postgresql://***@db:5432/patients");
//! assert!(!format!("{conn:?}").contains("pw"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// Raw connection string held inside a [`SecretString`]
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }

    /// Scheme and host part only; user and password before `@` are masked
    pub fn redacted_connection_string(&self) -> String {
        match self.0.rsplit_once('@') {
            Some((_, host)) => format!("postgresql://***@{host}"),
            None => "postgresql://***".to_string(),
        }
    }
}

impl Serialize for SecretValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.redacted_connection_string())
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// Connection string as loaded from configuration
pub type SecretString = Secret<SecretValue>;

/// Wraps a connection string read from the config file or environment
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue(value))
}

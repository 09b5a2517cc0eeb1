// models/src/identifiers.rs

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::{ValidationError, ValidationResult};

const MAX_IDENTIFIER_LEN: usize = u8::MAX as usize;

// The hospital backend hands out ids as JSON numbers on some endpoints and as
// strings on others, so both are accepted on the way in.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawIdentifier {
    Text(String),
    Integer(i64),
}

impl From<RawIdentifier> for String {
    fn from(raw: RawIdentifier) -> Self {
        match raw {
            RawIdentifier::Text(s) => s,
            RawIdentifier::Integer(i) => i.to_string(),
        }
    }
}

fn validate(value: String) -> ValidationResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.len() > MAX_IDENTIFIER_LEN {
        return Err(ValidationError::InvalidIdentifierLength);
    }
    Ok(trimmed.to_string())
}

macro_rules! backend_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier. The value is trimmed and must be
            /// between 1 and 255 bytes long.
            pub fn new(value: impl Into<String>) -> ValidationResult<Self> {
                validate(value.into()).map(Self)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> ValidationResult<Self> {
                Self::new(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = RawIdentifier::deserialize(deserializer)?;
                Self::new(String::from(raw)).map_err(serde::de::Error::custom)
            }
        }
    };
}

backend_identifier!(
    /// Identifier of a hospital as issued by the hospital backend.
    HospitalId
);

backend_identifier!(
    /// Identifier of an admission request as issued by the hospital backend.
    RequestId
);

#[cfg(test)]
mod tests {
    use super::{HospitalId, RequestId};
    use crate::errors::ValidationError;
    use core::str::FromStr;

    #[test]
    fn should_not_create_empty_identifier() {
        let identifier = HospitalId::new("   ");
        assert_eq!(identifier.unwrap_err(), ValidationError::InvalidIdentifierLength);
    }

    #[test]
    fn should_not_create_too_long_identifier() {
        let identifier = RequestId::new("a".repeat(256));
        assert_eq!(identifier.unwrap_err(), ValidationError::InvalidIdentifierLength);
    }

    #[test]
    fn should_trim_identifier() {
        let identifier = HospitalId::from_str(" 42 ").unwrap();
        assert_eq!(identifier.as_str(), "42");
    }

    #[test]
    fn should_deserialize_numeric_and_text_ids() {
        let numeric: RequestId = serde_json::from_str("17").unwrap();
        let text: RequestId = serde_json::from_str("\"17\"").unwrap();
        assert_eq!(numeric, text);

        let guid: HospitalId = serde_json::from_str("\"3f2a-77\"").unwrap();
        assert_eq!(guid.to_string(), "3f2a-77");
    }

    #[test]
    fn should_reject_blank_id_in_payload() {
        assert!(serde_json::from_str::<HospitalId>("\"\"").is_err());
    }
}

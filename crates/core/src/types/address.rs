//! Delivery address and Brazilian postal code (CEP).

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PostalCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PostalCodeError {
    /// Wrong number of digits.
    #[error("postal code must have {expected} digits (got {actual})")]
    InvalidLength {
        /// Required digit count.
        expected: usize,
        /// Digits found in the input.
        actual: usize,
    },
    /// Contains something other than digits and a single separator.
    #[error("postal code may only contain digits and '-'")]
    NonDigit,
}

/// An 8-digit CEP, stored without separator.
///
/// ## Examples
///
/// ```
/// use coffee_delivery_core::PostalCode;
///
/// assert_eq!(PostalCode::parse("01001-000").unwrap().as_str(), "01001000");
/// assert!(PostalCode::parse("0100100").is_err());
/// assert!(PostalCode::parse("0100a000").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostalCode(String);

impl PostalCode {
    /// Number of digits in a CEP.
    pub const LENGTH: usize = 8;

    /// Parse a `PostalCode`, accepting `01001000` and `01001-000`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input contains non-digits (other than `-`)
    /// or does not have exactly eight digits.
    pub fn parse(s: &str) -> Result<Self, PostalCodeError> {
        let trimmed = s.trim();
        if trimmed.chars().any(|c| !c.is_ascii_digit() && c != '-') {
            return Err(PostalCodeError::NonDigit);
        }

        let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
        if digits.len() != Self::LENGTH {
            return Err(PostalCodeError::InvalidLength {
                expected: Self::LENGTH,
                actual: digits.len(),
            });
        }

        Ok(Self(digits))
    }

    /// Returns the eight digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the code in `00000-000` form.
    #[must_use]
    pub fn formatted(&self) -> String {
        let (head, tail) = self.0.split_at(5);
        format!("{head}-{tail}")
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PostalCode {
    type Err = PostalCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PostalCode {
    type Error = PostalCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PostalCode> for String {
    fn from(code: PostalCode) -> Self {
        code.0
    }
}

/// Where the order should be delivered.
///
/// `number` and `complement` are optional; every other field is required
/// before an order can be confirmed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    pub postal_code: Option<PostalCode>,
    pub street: String,
    pub number: String,
    pub complement: String,
    pub neighborhood: String,
    pub city: String,
    /// Two-letter state abbreviation (UF).
    pub state: String,
}

impl DeliveryAddress {
    /// Name of the first required field that is still blank, if any.
    #[must_use]
    pub fn first_missing_field(&self) -> Option<&'static str> {
        if self.postal_code.is_none() {
            return Some("postal_code");
        }
        [
            ("street", &self.street),
            ("neighborhood", &self.neighborhood),
            ("city", &self.city),
            ("state", &self.state),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }

    /// Whether all required fields are filled in.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.first_missing_field().is_none()
    }
}

//! Payment method chosen at checkout.
//!
//! Payment happens on delivery; the method is only recorded with the order.

use serde::{Deserialize, Serialize};

/// How the shopper will pay the courier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Cash,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreditCard => write!(f, "credit_card"),
            Self::DebitCard => write!(f, "debit_card"),
            Self::Cash => write!(f, "cash"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "credit_card" | "credit" => Ok(Self::CreditCard),
            "debit_card" | "debit" => Ok(Self::DebitCard),
            "cash" => Ok(Self::Cash),
            _ => Err(format!("invalid payment method: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_from_str_agree() {
        for method in [
            PaymentMethod::CreditCard,
            PaymentMethod::DebitCard,
            PaymentMethod::Cash,
        ] {
            assert_eq!(method.to_string().parse::<PaymentMethod>().unwrap(), method);
        }
    }

    #[test]
    fn test_short_aliases() {
        assert_eq!("debit".parse::<PaymentMethod>().unwrap(), PaymentMethod::DebitCard);
        assert!("pix".parse::<PaymentMethod>().is_err());
    }
}

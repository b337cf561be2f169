//! [`Money`]-related definitions.

use std::{fmt, str::FromStr};

use rust_decimal::{prelude::ToPrimitive as _, Decimal};

use crate::define_kind;

/// Monetary amount paired with its [`Currency`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Money {
    /// Amount of this [`Money`].
    pub amount: Decimal,

    /// [`Currency`] the amount is denominated in.
    pub currency: Currency,
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { amount, currency } = self;
        // Whole amounts print without a trailing `.00`.
        if amount.is_integer() {
            write!(f, "{}{currency}", amount.to_i128().expect("integer"))
        } else {
            write!(f, "{amount}{currency}")
        }
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Shortest well-formed input is `0` plus a three-letter code.
        if s.len() < 4 {
            return Err("too short");
        }

        let (amount, code) = s.split_at(s.len() - 3);
        Ok(Self {
            amount: Decimal::from_str(amount).map_err(|_| "invalid amount")?,
            currency: Currency::from_str(code)
                .map_err(|_| "invalid currency")?,
        })
    }
}

define_kind! {
    #[doc = "Currency of a [`Money`] amount."]
    enum Currency {
        #[doc = "Euro."]
        Eur = 1,

        #[doc = "US Dollar."]
        Usd = 2,

        #[doc = "Israeli New Shekel."]
        Ils = 3,
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! [`juniper`] integration.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Money in `{major}.{minor}{currency}` format, where:
    /// - `major` is an integer;
    /// - `minor` is an optional integer;
    /// - `currency` is a three-letter currency code.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Money = super::Money;

    impl Money {
        fn to_output<S: ScalarValue>(m: &Money) -> Value<S> {
            Value::scalar(m.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            let s = input.as_string_value().ok_or_else(|| {
                format!(
                    "Cannot parse `Money` input scalar from non-string \
                     value: {input}",
                )
            })?;
            Self::from_str(s)
                .map_err(|e| format!("Cannot parse `Money` input scalar: {e}"))
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::{Currency, Money};

    fn decimal(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn from_str() {
        assert_eq!(
            Money::from_str("125000EUR").unwrap(),
            Money {
                amount: decimal("125000"),
                currency: Currency::Eur,
            },
        );

        assert_eq!(
            Money::from_str("99.95USD").unwrap(),
            Money {
                amount: decimal("99.95"),
                currency: Currency::Usd,
            },
        );

        assert_eq!(
            Money::from_str("470000ILS").unwrap(),
            Money {
                amount: decimal("470000"),
                currency: Currency::Ils,
            },
        );

        assert!(Money::from_str("125000").is_err());
        assert!(Money::from_str("125000Eu").is_err());
        assert!(Money::from_str("125000Euros").is_err());

        assert!(Money::from_str("125000.00EUR").is_ok());
        assert!(Money::from_str("125000.0EUR").is_ok());
        assert!(Money::from_str("125000EUR").is_ok());
    }

    #[test]
    fn to_string() {
        assert_eq!(
            Money {
                amount: decimal("125000.50"),
                currency: Currency::Eur,
            }
            .to_string(),
            "125000.50EUR",
        );

        assert_eq!(
            Money {
                amount: decimal("125000.00"),
                currency: Currency::Ils,
            }
            .to_string(),
            "125000ILS",
        );
        assert_eq!(
            Money {
                amount: decimal("125000"),
                currency: Currency::Usd,
            }
            .to_string(),
            "125000USD",
        );
    }
}

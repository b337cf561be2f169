//! Mortgage amortization math.

use common::{Money, Percent};
use rust_decimal::{Decimal, MathematicalOps as _};

/// Financing terms of a mortgage offer.
#[derive(Clone, Copy, Debug)]
pub struct Terms {
    /// Loan-to-value ratio of the financed part.
    pub ltv: Percent,

    /// Annual interest rate.
    pub annual_rate: Percent,

    /// Term of the loan, in months.
    pub months: u32,
}

/// Calculates the fixed monthly payment for buying at the provided price
/// under the provided [`Terms`].
///
/// Uses the standard annuity formula `M = P·r(1+r)^n / ((1+r)^n − 1)` with
/// the monthly rate `r` and the term `n` in months. A zero rate collapses
/// into plain linear amortization (the formula's limit as `r → 0`), and a
/// zero term yields [`None`], since there is no payment to speak of.
#[must_use]
pub fn monthly_payment(price: &Money, terms: &Terms) -> Option<Money> {
    if terms.months == 0 {
        return None;
    }

    let principal = price.amount * terms.ltv.as_fraction();
    let months = Decimal::from(terms.months);
    let rate = terms.annual_rate.as_fraction() / Decimal::from(12_u8);

    let amount = if rate.is_zero() {
        principal / months
    } else {
        let compounded = (Decimal::ONE + rate)
            .powi(i64::from(terms.months));
        principal * rate * compounded / (compounded - Decimal::ONE)
    };

    Some(Money {
        amount: amount.round_dp(2),
        currency: price.currency,
    })
}

#[cfg(test)]
mod spec {
    use common::{money::Currency, Money, Percent};
    use rust_decimal::Decimal;

    use super::{monthly_payment, Terms};

    fn percent(s: &str) -> Percent {
        s.parse().unwrap()
    }

    fn eur(amount: &str) -> Money {
        Money {
            amount: amount.parse().unwrap(),
            currency: Currency::Eur,
        }
    }

    #[test]
    fn zero_term_yields_nothing() {
        let terms = Terms {
            ltv: percent("50"),
            annual_rate: percent("5"),
            months: 0,
        };

        assert_eq!(monthly_payment(&eur("100000"), &terms), None);
    }

    #[test]
    fn zero_rate_is_linear() {
        let terms = Terms {
            ltv: percent("50"),
            annual_rate: percent("0"),
            months: 100,
        };

        // 100000 × 0.5 / 100 months.
        assert_eq!(monthly_payment(&eur("100000"), &terms), Some(eur("500")));
    }

    #[test]
    fn annuity_matches_reference_value() {
        let terms = Terms {
            ltv: percent("100"),
            annual_rate: percent("6"),
            months: 360,
        };

        // Textbook case: 100000 at 6% over 30 years is 599.55 a month.
        let payment = monthly_payment(&eur("100000"), &terms).unwrap();
        assert_eq!(payment.amount, "599.55".parse::<Decimal>().unwrap());
    }

    #[test]
    fn annuity_approaches_linear_as_rate_vanishes() {
        let linear = monthly_payment(
            &eur("120000"),
            &Terms {
                ltv: percent("100"),
                annual_rate: percent("0"),
                months: 120,
            },
        )
        .unwrap();
        let near_zero = monthly_payment(
            &eur("120000"),
            &Terms {
                ltv: percent("100"),
                annual_rate: percent("0.001"),
                months: 120,
            },
        )
        .unwrap();

        let diff = (near_zero.amount - linear.amount).abs();
        assert!(diff < Decimal::ONE);
    }
}

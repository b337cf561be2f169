//! GraphQL scalar definitions.

use std::{fmt, marker::PhantomData, str::FromStr};

use derive_more::{Display, From, Into};
use juniper::{
    GraphQLScalar, GraphQLType, InputValue, ParseScalarResult,
    ParseScalarValue, ScalarToken, ScalarValue, Value,
};

/// Plug-in for `#[graphql(with = ..)]` attributes, transporting a newtype
/// scalar through the [`FromStr`]/[`Display`] impls of its `As`
/// representation.
///
/// The target type must implement [`TryFrom`] and [`AsRef`] for `As`.
///
/// [`Display`]: fmt::Display
#[derive(Debug)]
pub struct Via<As>(PhantomData<As>);

impl<As> Via<As> {
    /// Renders the target type into a scalar [`Value`] through the
    /// [`Display`] impl of `As`.
    ///
    /// [`Display`]: fmt::Display
    pub fn to_output<T, S>(value: &T) -> Value<S>
    where
        As: fmt::Display,
        T: AsRef<As>,
        S: ScalarValue,
    {
        Value::from(value.as_ref().to_string())
    }

    /// Parses the target type out of a scalar [`Value`] through the
    /// [`FromStr`] impl of `As`.
    ///
    /// # Errors
    ///
    /// If the input is not a string, doesn't parse as `As`, or doesn't
    /// convert into the target type.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    pub fn from_input<T, S>(input: &InputValue<S>) -> Result<T, String>
    where
        As: FromStr + fmt::Display,
        As::Err: fmt::Display,
        T: TryFrom<As> + GraphQLType<S, TypeInfo = ()>,
        T::Error: fmt::Display,
        S: ScalarValue,
    {
        let s = input.as_string_value().ok_or_else(|| {
            format!(
                "Cannot parse input scalar `{}`: expected string input \
                 value, found: {input}",
                T::name(&()).expect("always has a name"),
            )
        })?;
        s.parse::<As>()
            .map_err(|e| {
                format!(
                    "Cannot parse input scalar `{}` from \"{s}\" string: {e}",
                    T::name(&()).expect("always has a name"),
                )
            })?
            .try_into()
            .map_err(|e| {
                format!(
                    "Cannot parse input scalar `{}`: {e}",
                    T::name(&()).expect("always has a name"),
                )
            })
    }

    /// Parses the provided [`ScalarToken`] as a [`String`].
    ///
    /// # Errors
    ///
    /// If the token is not a string one.
    pub fn parse_token<S: ScalarValue>(
        value: ScalarToken<'_>,
    ) -> ParseScalarResult<S> {
        <String as ParseScalarValue<S>>::from_str(value)
    }
}

/// Arbitrary-precision decimal number in base-10 string representation.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[graphql(name = "Decimal", with = Self, parse_token(String))]
pub struct Decimal(rust_decimal::Decimal);

impl Decimal {
    /// Converts this [`Decimal`] into its scalar [`Value`].
    fn to_output<S: ScalarValue>(v: &Self) -> Value<S> {
        Value::scalar(v.0.to_string())
    }

    /// Parses a [`Decimal`] from the provided [`InputValue`].
    fn from_input<S: ScalarValue>(
        input: &InputValue<S>,
    ) -> Result<Self, String> {
        input
            .as_string_value()
            .ok_or_else(|| {
                format!(
                    "Cannot parse `Decimal` input scalar from \
                     non-string value: {input}",
                )
            })
            .and_then(|s| {
                rust_decimal::Decimal::from_str(s).map(Self).map_err(|e| {
                    format!("Cannot parse `Decimal` input scalar: {e}")
                })
            })
    }
}

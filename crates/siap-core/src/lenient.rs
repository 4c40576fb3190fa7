//! Forgiving deserialisers for values typed into HTML forms.
//!
//! Browsers send numbers as numbers, numeric strings, empty strings or
//! `null` depending on the widget. These helpers map all of them onto a
//! single Rust representation so the rest of the crate never sees the
//! difference.

use serde::{Deserialize, Deserializer, de::Error as _};
use serde_json::Value;

/// Amount of money; absent, `null` and `""` become `None`.
///
/// Only finite amounts are accepted: `"inf"` and `"NaN"` parse as `f64` but
/// are rejected here.
pub fn amount<'de, D>(d: D) -> Result<Option<f64>, D::Error>
where
  D: Deserializer<'de>,
{
  let value = match Option::<Value>::deserialize(d)? {
    None | Some(Value::Null) => return Ok(None),
    Some(Value::Number(n)) => n
      .as_f64()
      .ok_or_else(|| D::Error::custom(format!("amount out of range: {n}")))?,
    Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
    Some(Value::String(s)) => s
      .trim()
      .parse::<f64>()
      .map_err(|_| D::Error::custom(format!("not a number: {s:?}")))?,
    Some(other) => return Err(D::Error::custom(format!("expected a number, got {other}"))),
  };

  if !value.is_finite() {
    return Err(D::Error::custom(format!("amount is not finite: {value}")));
  }
  Ok(Some(value))
}

/// Like [`amount`], with absent values read as zero.
pub fn amount_or_zero<'de, D>(d: D) -> Result<f64, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(amount(d)?.unwrap_or(0.0))
}

/// A whole number such as a count of days.
pub fn count<'de, D>(d: D) -> Result<Option<i64>, D::Error>
where
  D: Deserializer<'de>,
{
  match Option::<Value>::deserialize(d)? {
    None | Some(Value::Null) => Ok(None),
    Some(Value::Number(n)) => n
      .as_i64()
      .or_else(|| n.as_f64().filter(|f| is_whole_i64(*f)).map(|f| f as i64))
      .map(Some)
      .ok_or_else(|| D::Error::custom(format!("not a whole number: {n}"))),
    Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
    Some(Value::String(s)) => s
      .trim()
      .parse::<i64>()
      .map(Some)
      .map_err(|_| D::Error::custom(format!("not a whole number: {s:?}"))),
    Some(other) => Err(D::Error::custom(format!("expected a whole number, got {other}"))),
  }
}

/// Whether `f` is a whole number that `as i64` converts without saturating.
fn is_whole_i64(f: f64) -> bool {
  // `i64::MAX as f64` rounds up to 2^63, which is already out of range.
  f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64
}

/// A checkbox: booleans, `0`/`1`, and `"true"`/`"false"` are all accepted.
pub fn flag<'de, D>(d: D) -> Result<bool, D::Error>
where
  D: Deserializer<'de>,
{
  Ok(match Option::<Value>::deserialize(d)? {
    None | Some(Value::Null) => false,
    Some(Value::Bool(b)) => b,
    Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
    Some(Value::String(s)) => !matches!(s.trim(), "" | "0" | "false"),
    Some(other) => return Err(D::Error::custom(format!("expected a flag, got {other}"))),
  })
}

#[cfg(test)]
mod tests {
  use serde::Deserialize;
  use serde_json::json;

  #[derive(Debug, Deserialize)]
  struct Form {
    #[serde(default, deserialize_with = "super::amount")]
    amount: Option<f64>,
    #[serde(default, deserialize_with = "super::count")]
    days:   Option<i64>,
    #[serde(default, deserialize_with = "super::flag")]
    ticked: bool,
  }

  fn parse(v: serde_json::Value) -> Form { serde_json::from_value(v).unwrap() }

  #[test]
  fn missing_and_blank_values_are_absent() {
    let f = parse(json!({}));
    assert_eq!(f.amount, None);
    assert_eq!(f.days, None);
    assert!(!f.ticked);

    let f = parse(json!({ "amount": "", "days": null, "ticked": "" }));
    assert_eq!(f.amount, None);
    assert_eq!(f.days, None);
    assert!(!f.ticked);
  }

  #[test]
  fn numeric_strings_are_parsed() {
    let f = parse(json!({ "amount": " 1500000.5 ", "days": "4", "ticked": "true" }));
    assert_eq!(f.amount, Some(1_500_000.5));
    assert_eq!(f.days, Some(4));
    assert!(f.ticked);
  }

  #[test]
  fn whole_floats_count_as_days() {
    assert_eq!(parse(json!({ "days": 3.0 })).days, Some(3));
    assert!(serde_json::from_value::<Form>(json!({ "days": 2.5 })).is_err());
  }

  #[test]
  fn out_of_range_days_are_rejected() {
    assert!(serde_json::from_value::<Form>(json!({ "days": 1e30 })).is_err());
    assert!(serde_json::from_value::<Form>(json!({ "days": -1e30 })).is_err());
    assert_eq!(parse(json!({ "days": 1e15 })).days, Some(1_000_000_000_000_000));
  }

  #[test]
  fn non_finite_amounts_are_rejected() {
    for bad in ["inf", "-inf", "infinity", "NaN", " nan "] {
      assert!(
        serde_json::from_value::<Form>(json!({ "amount": bad })).is_err(),
        "{bad:?} was accepted"
      );
    }
  }

  #[test]
  fn garbage_is_rejected() {
    assert!(serde_json::from_value::<Form>(json!({ "amount": "abc" })).is_err());
    assert!(serde_json::from_value::<Form>(json!({ "amount": [1] })).is_err());
  }
}

//! The six operations exposed by the example library
//!
//! These are plain safe functions. The C boundary in `sobind-ffi` only
//! converts arguments and results; all semantics live here.

use serde_json::Value;
use std::cmp::Ordering;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::random::RandomSource;

/// Largest `n` whose factorial fits in an `i64`
pub const MAX_FACTORIAL_INPUT: i64 = 20;

/// Compute `n!`
///
/// Negative input is an invalid argument. Inputs above
/// [`MAX_FACTORIAL_INPUT`] overflow `i64` and are reported as
/// [`Error::Overflow`] instead of wrapping or saturating.
pub fn factorial(n: i64) -> Result<i64> {
    if n < 0 {
        return Err(Error::invalid_argument(
            "n",
            format!("factorial is undefined for negative input {}", n),
        ));
    }

    (2..=n).try_fold(1i64, |acc, k| {
        acc.checked_mul(k).ok_or_else(|| {
            debug!(n, "factorial overflowed at k = {}", k);
            Error::overflow(
                "factorial",
                format!("{}! exceeds the 64-bit range (max input is {})", n, MAX_FACTORIAL_INPUT),
            )
        })
    })
}

/// Build a greeting for `name`
pub fn greet(name: &str) -> String {
    format!("Hello, {}!", name)
}

/// Concatenate `s` with itself `count` times
///
/// A count of zero or less yields an empty string. A result the allocator
/// refuses is [`Error::Memory`].
pub fn repeat_string(s: &str, count: i64) -> Result<String> {
    if count <= 0 || s.is_empty() {
        return Ok(String::new());
    }

    let count = usize::try_from(count)
        .map_err(|_| Error::overflow("repeat_string", format!("count {} does not fit in usize", count)))?;

    // A String can hold at most isize::MAX bytes
    let total = s
        .len()
        .checked_mul(count)
        .filter(|&total| total <= isize::MAX as usize)
        .ok_or_else(|| {
            Error::overflow(
                "repeat_string",
                format!("{} bytes repeated {} times is too large", s.len(), count),
            )
        })?;

    // Refused allocations must surface as errors, never as an abort
    let mut out = String::new();
    out.try_reserve_exact(total).map_err(|e| {
        debug!(total, "allocation refused");
        Error::memory("repeat_string", format!("cannot allocate {} bytes: {}", total, e))
    })?;

    trace!(total, "repeating string");
    for _ in 0..count {
        out.push_str(s);
    }
    Ok(out)
}

/// Uppercase `s` and add emphasis
pub fn shout(s: &str) -> String {
    let mut out = s.to_uppercase();
    out.push('!');
    out
}

/// Flip a fair coin drawn from `source`
pub fn maybe<R: RandomSource + ?Sized>(source: &mut R) -> bool {
    source.next_bool()
}

/// Exact numeric value of a JSON number
#[derive(Debug, Clone, Copy)]
enum NumberKey {
    Int(i128),
    Float(f64),
}

impl NumberKey {
    fn of(value: &Value) -> Option<Self> {
        let number = match value {
            Value::Number(number) => number,
            _ => return None,
        };
        if let Some(i) = number.as_i64() {
            Some(Self::Int(i128::from(i)))
        } else if let Some(u) = number.as_u64() {
            Some(Self::Int(i128::from(u)))
        } else {
            number.as_f64().map(Self::Float)
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (*self, *other) {
            (Self::Int(a), Self::Int(b)) => a.cmp(&b),
            // JSON floats are finite, and 0.0 equals -0.0
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            (Self::Int(a), Self::Float(b)) => cmp_int_float(a, b),
            (Self::Float(a), Self::Int(b)) => cmp_int_float(b, a).reverse(),
        }
    }
}

/// Compare an integer with a finite float without rounding either
fn cmp_int_float(int: i128, float: f64) -> Ordering {
    // 2^127; every finite f64 inside (-2^127, 2^127) truncates to an exact i128
    const BOUND: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;
    if float >= BOUND {
        return Ordering::Less;
    }
    if float < -BOUND {
        return Ordering::Greater;
    }

    let whole = float.trunc();
    match int.cmp(&(whole as i128)) {
        Ordering::Equal => 0.0f64.partial_cmp(&(float - whole)).unwrap_or(Ordering::Equal),
        unequal => unequal,
    }
}

/// Sort a JSON array of numbers in ascending order
///
/// The input must be a JSON array whose elements are all numbers. Equal
/// values keep their relative order, and each number keeps its textual kind
/// (an integer stays an integer). Output is compact JSON.
pub fn sort_json_array(json: &str) -> Result<String> {
    let parsed: Value = serde_json::from_str(json)?;

    let items = match parsed {
        Value::Array(items) => items,
        other => {
            return Err(Error::invalid_argument(
                "json",
                format!("expected a JSON array of numbers, found {}", json_kind(&other)),
            ))
        }
    };

    let mut keyed = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let key = NumberKey::of(&item).ok_or_else(|| {
            Error::invalid_argument(
                "json",
                format!("element {} is {}, not a number", index, json_kind(&item)),
            )
        })?;
        keyed.push((key, item));
    }

    // sort_by is stable
    keyed.sort_by(|a, b| a.0.compare(&b.0));

    let sorted: Vec<Value> = keyed.into_iter().map(|(_, v)| v).collect();
    debug!(len = sorted.len(), "sorted json array");
    Ok(serde_json::to_string(&sorted)?)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

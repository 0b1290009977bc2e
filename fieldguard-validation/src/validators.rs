// Built-in rules

use crate::{FieldValue, Params, RuleRegistry};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

type Outcome = Result<(), String>;

// Common regex patterns
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$").unwrap()
});

static URL_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").unwrap());

static UUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$").unwrap()
});

static ALPHA_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\p{L}\p{M}]+$").unwrap());

static ALPHA_NUM_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\p{M}\p{Nd}]+$").unwrap());

static ALPHA_DASH_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\p{M}\p{Nd}_-]+$").unwrap());

static ALPHA_SPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\p{M}\p{Nd}_ -]+$").unwrap());

static NUMERIC_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-+]?[0-9]+$").unwrap());

/// Register every built-in rule
pub(crate) fn register_builtin(registry: &mut RuleRegistry) {
    registry
        .register_fn("required", required)
        .register_fn("between", between)
        .register_fn("min", min)
        .register_fn("max", max)
        .register_fn("len", len)
        .register_fn("digits", digits)
        .register_fn("digits_between", digits_between)
        .register_fn("numeric", numeric)
        .register_fn("numeric_between", numeric_between)
        .register_fn("float", float)
        .register_fn("bool", boolean)
        .register_fn("email", email)
        .register_fn("url", url)
        .register_fn("uuid", uuid)
        .register_fn("alpha", alpha)
        .register_fn("alpha_num", alpha_num)
        .register_fn("alpha_dash", alpha_dash)
        .register_fn("alpha_space", alpha_space)
        .register_fn("ip", ip)
        .register_fn("ip_v4", ip_v4)
        .register_fn("ip_v6", ip_v6)
        .register_fn("json", json)
        .register_fn("regex", regex_match)
        .register_fn("in", one_of)
        .register_fn("not_in", not_one_of)
        .register_fn("date", date)
        .register_fn("lat", latitude)
        .register_fn("lon", longitude);
}

fn ensure(passed: bool, message: impl FnOnce() -> String) -> Outcome {
    if passed { Ok(()) } else { Err(message()) }
}

fn param<'a>(params: &Params<'a>, index: usize) -> &'a str {
    params.get(index).unwrap_or("?")
}

/// Value for size comparisons: numbers by value, everything sized by length
fn measure(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Number(n) => n.as_f64(),
        other => other.size().map(|s| s as f64),
    }
}

/// Digit string of a value: digit-only strings and non-negative integers
fn digit_string(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            Some(s.clone())
        }
        FieldValue::Number(n) => n.as_u64().map(|n| n.to_string()),
        _ => None,
    }
}

/// Numeric value of integers and integer strings
fn numeric_value(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Number(n) if n.is_i64() || n.is_u64() => n.as_f64(),
        FieldValue::String(s) if NUMERIC_REGEX.is_match(s) => s.parse().ok(),
        _ => None,
    }
}

fn matches(value: &FieldValue, regex: &Regex) -> bool {
    value
        .to_scalar_string()
        .is_some_and(|s| regex.is_match(&s))
}

// Presence

fn required(field: &str, value: &FieldValue, _: &Params<'_>) -> Outcome {
    let present = match value {
        v if v.is_nil() => false,
        FieldValue::String(s) => !s.trim().is_empty(),
        FieldValue::Array(items) => !items.is_empty(),
        FieldValue::Object(entries) => !entries.is_empty(),
        _ => true,
    };
    ensure(present, || format!("The {} field is required", field))
}

// Size

fn between(field: &str, value: &FieldValue, params: &Params<'_>) -> Outcome {
    let passed = match (params.range::<f64>(), measure(value)) {
        (Some((lo, hi)), Some(v)) => v >= lo && v <= hi,
        _ => false,
    };
    ensure(passed, || {
        format!(
            "The {} field must be between {} and {}",
            field,
            param(params, 0),
            param(params, 1)
        )
    })
}

fn min(field: &str, value: &FieldValue, params: &Params<'_>) -> Outcome {
    let passed = match (params.parse_at::<f64>(0), measure(value)) {
        (Some(lo), Some(v)) => v >= lo,
        _ => false,
    };
    ensure(passed, || {
        format!("The {} field must be minimum {}", field, param(params, 0))
    })
}

fn max(field: &str, value: &FieldValue, params: &Params<'_>) -> Outcome {
    let passed = match (params.parse_at::<f64>(0), measure(value)) {
        (Some(hi), Some(v)) => v <= hi,
        _ => false,
    };
    ensure(passed, || {
        format!("The {} field must be maximum {}", field, param(params, 0))
    })
}

fn len(field: &str, value: &FieldValue, params: &Params<'_>) -> Outcome {
    let actual = match value {
        // Digits of the integer part, sign and fraction excluded
        FieldValue::Number(n) => Some(
            n.to_string()
                .bytes()
                .take_while(|b| *b != b'.')
                .filter(u8::is_ascii_digit)
                .count(),
        ),
        other => other.size(),
    };
    let passed = match (params.parse_at::<usize>(0), actual) {
        (Some(expected), Some(actual)) => expected == actual,
        _ => false,
    };
    ensure(passed, || {
        format!("The {} field must be length of {}", field, param(params, 0))
    })
}

// Digits and numbers

fn digits(field: &str, value: &FieldValue, params: &Params<'_>) -> Outcome {
    let passed = match (params.parse_at::<usize>(0), digit_string(value)) {
        (Some(count), Some(d)) => d.len() == count,
        _ => false,
    };
    ensure(passed, || {
        format!("The {} field must be {} digits", field, param(params, 0))
    })
}

fn digits_between(field: &str, value: &FieldValue, params: &Params<'_>) -> Outcome {
    let passed = match (params.range::<usize>(), digit_string(value)) {
        (Some((lo, hi)), Some(d)) => (lo..=hi).contains(&d.len()),
        _ => false,
    };
    ensure(passed, || {
        format!(
            "The {} field must be digits between {} and {}",
            field,
            param(params, 0),
            param(params, 1)
        )
    })
}

fn numeric(field: &str, value: &FieldValue, _: &Params<'_>) -> Outcome {
    ensure(numeric_value(value).is_some(), || {
        format!("The {} field must be numeric", field)
    })
}

fn numeric_between(field: &str, value: &FieldValue, params: &Params<'_>) -> Outcome {
    let passed = match (params.range::<f64>(), numeric_value(value)) {
        (Some((lo, hi)), Some(v)) => v >= lo && v <= hi,
        _ => false,
    };
    ensure(passed, || {
        format!(
            "The {} field must be numeric value between {} and {}",
            field,
            param(params, 0),
            param(params, 1)
        )
    })
}

fn float(field: &str, value: &FieldValue, _: &Params<'_>) -> Outcome {
    ensure(value.as_f64().is_some(), || {
        format!("The {} field must be a float value", field)
    })
}

fn boolean(field: &str, value: &FieldValue, _: &Params<'_>) -> Outcome {
    let passed = match value {
        FieldValue::Bool(_) => true,
        FieldValue::String(s) => matches!(s.as_str(), "true" | "false" | "1" | "0"),
        _ => false,
    };
    ensure(passed, || format!("The {} field must be a boolean", field))
}

fn latitude(field: &str, value: &FieldValue, _: &Params<'_>) -> Outcome {
    let passed = value.as_f64().is_some_and(|v| (-90.0..=90.0).contains(&v));
    ensure(passed, || {
        format!("The {} field must contain valid latitude", field)
    })
}

fn longitude(field: &str, value: &FieldValue, _: &Params<'_>) -> Outcome {
    let passed = value
        .as_f64()
        .is_some_and(|v| (-180.0..=180.0).contains(&v));
    ensure(passed, || {
        format!("The {} field must contain valid longitude", field)
    })
}

// Formats

fn email(field: &str, value: &FieldValue, _: &Params<'_>) -> Outcome {
    ensure(matches(value, &EMAIL_REGEX), || {
        format!("The {} field must be a valid email address", field)
    })
}

fn url(field: &str, value: &FieldValue, _: &Params<'_>) -> Outcome {
    ensure(matches(value, &URL_REGEX), || {
        format!("The {} field format is invalid", field)
    })
}

fn uuid(field: &str, value: &FieldValue, _: &Params<'_>) -> Outcome {
    ensure(matches(value, &UUID_REGEX), || {
        format!("The {} field must contain valid UUID", field)
    })
}

fn alpha(field: &str, value: &FieldValue, _: &Params<'_>) -> Outcome {
    ensure(matches(value, &ALPHA_REGEX), || {
        format!("The {} may only contain letters", field)
    })
}

fn alpha_num(field: &str, value: &FieldValue, _: &Params<'_>) -> Outcome {
    ensure(matches(value, &ALPHA_NUM_REGEX), || {
        format!("The {} may only contain letters and numbers", field)
    })
}

fn alpha_dash(field: &str, value: &FieldValue, _: &Params<'_>) -> Outcome {
    ensure(matches(value, &ALPHA_DASH_REGEX), || {
        format!("The {} may only contain letters, numbers, and dashes", field)
    })
}

fn alpha_space(field: &str, value: &FieldValue, _: &Params<'_>) -> Outcome {
    ensure(matches(value, &ALPHA_SPACE_REGEX), || {
        format!("The {} may contain letters, numbers, dashes, space", field)
    })
}

fn ip(field: &str, value: &FieldValue, _: &Params<'_>) -> Outcome {
    let passed = value.as_str().is_some_and(|s| s.parse::<IpAddr>().is_ok());
    ensure(passed, || {
        format!("The {} field must be a valid IP address", field)
    })
}

fn ip_v4(field: &str, value: &FieldValue, _: &Params<'_>) -> Outcome {
    let passed = value.as_str().is_some_and(|s| s.parse::<Ipv4Addr>().is_ok());
    ensure(passed, || {
        format!("The {} field must be a valid IPv4 address", field)
    })
}

fn ip_v6(field: &str, value: &FieldValue, _: &Params<'_>) -> Outcome {
    let passed = value.as_str().is_some_and(|s| s.parse::<Ipv6Addr>().is_ok());
    ensure(passed, || {
        format!("The {} field must be a valid IPv6 address", field)
    })
}

fn json(field: &str, value: &FieldValue, _: &Params<'_>) -> Outcome {
    let passed = value
        .as_str()
        .is_some_and(|s| serde_json::from_str::<serde_json::Value>(s).is_ok());
    ensure(passed, || {
        format!("The {} field must be a valid JSON string", field)
    })
}

fn regex_match(field: &str, value: &FieldValue, params: &Params<'_>) -> Outcome {
    // An uncompilable pattern fails the field rather than the call
    let passed = params
        .raw()
        .and_then(|pattern| Regex::new(pattern).ok())
        .is_some_and(|re| matches(value, &re));
    ensure(passed, || format!("The {} field format is invalid", field))
}

fn one_of(field: &str, value: &FieldValue, params: &Params<'_>) -> Outcome {
    let passed = value
        .to_scalar_string()
        .is_some_and(|s| params.as_slice().contains(&s.as_str()));
    ensure(passed, || {
        format!(
            "The {} field must be one of {}",
            field,
            params.as_slice().join(", ")
        )
    })
}

fn not_one_of(field: &str, value: &FieldValue, params: &Params<'_>) -> Outcome {
    let passed = value
        .to_scalar_string()
        .is_some_and(|s| !params.as_slice().contains(&s.as_str()));
    ensure(passed, || {
        format!(
            "The {} field must not be any of {}",
            field,
            params.as_slice().join(", ")
        )
    })
}

fn date(field: &str, value: &FieldValue, params: &Params<'_>) -> Outcome {
    let formats: &[&str] = match params.get(0) {
        None => &["%Y-%m-%d", "%Y/%m/%d"],
        Some("dd-mm-yyyy") => &["%d-%m-%Y", "%d/%m/%Y"],
        Some(_) => &[],
    };
    let passed = value.as_str().is_some_and(|s| {
        formats
            .iter()
            .any(|fmt| NaiveDate::parse_from_str(s, fmt).is_ok())
    });
    ensure(passed, || {
        format!(
            "The {} field must be a valid date format. e.g: yyyy-mm-dd, yyyy/mm/dd etc",
            field
        )
    })
}

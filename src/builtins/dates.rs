// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Date parsing and locale aware formatting with unicode date tokens
//! (`dd.MM.yyyy`, `E, MMM d h:mm a`).

use crate::builtins::utils::opt_string;
use crate::builtins::Func;
use crate::error::{ExprError, Result};
use crate::expr::Call;
use crate::interpreter::Interpreter;
use crate::value::Value;

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};

pub fn register(m: &mut HashMap<&'static str, Func>) {
    m.insert("formatDate", Func::FormatDate);
}

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parse an ISO 8601 date or date-time.
///
/// Offsets are accepted but not applied; the wall clock time as written is
/// what gets formatted.
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local());
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

struct Locale {
    months: [&'static str; 12],
    short_months: [&'static str; 12],
    weekdays: [&'static str; 7],
    short_weekdays: [&'static str; 7],
    // Before and after the common era: abbreviated, wide, narrow.
    eras: [[&'static str; 2]; 3],
    day_periods: [&'static str; 2],
    default_format: &'static str,
}

const ENGLISH: Locale = Locale {
    months: [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ],
    short_months: [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ],
    weekdays: [
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
        "Sunday",
    ],
    short_weekdays: ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
    eras: [["BC", "AD"], ["Before Christ", "Anno Domini"], ["B", "A"]],
    day_periods: ["AM", "PM"],
    default_format: "M/d/yy",
};

const NORWEGIAN: Locale = Locale {
    months: [
        "januar",
        "februar",
        "mars",
        "april",
        "mai",
        "juni",
        "juli",
        "august",
        "september",
        "oktober",
        "november",
        "desember",
    ],
    short_months: [
        "jan", "feb", "mar", "apr", "mai", "jun", "jul", "aug", "sep", "okt", "nov", "des",
    ],
    weekdays: [
        "mandag", "tirsdag", "onsdag", "torsdag", "fredag", "lørdag", "søndag",
    ],
    short_weekdays: ["man", "tir", "ons", "tor", "fre", "lør", "søn"],
    eras: [
        ["f.Kr.", "e.Kr."],
        ["før Kristus", "etter Kristus"],
        ["f.Kr.", "e.Kr."],
    ],
    day_periods: ["a.m.", "p.m."],
    default_format: "dd.MM.yyyy",
};

fn locale(language: &str) -> &'static Locale {
    match language {
        "nb" | "nn" | "no" => &NORWEGIAN,
        _ => &ENGLISH,
    }
}

fn narrow(name: &str) -> String {
    name.chars().take(1).flat_map(char::to_uppercase).collect()
}

fn padded(n: impl Into<i64>, width: usize) -> String {
    let n = n.into();
    if n < 0 {
        format!("-{:0width$}", -n)
    } else {
        format!("{n:0width$}")
    }
}

/// Text for a run of `count` repetitions of the pattern letter `letter`.
/// `None` for unsupported tokens.
fn field(locale: &Locale, dt: &NaiveDateTime, letter: char, count: usize) -> Option<String> {
    let month = dt.month0() as usize;
    let weekday = dt.weekday().num_days_from_monday() as usize;
    let year = dt.year();
    let era = usize::from(year > 0);
    let hour12 = match dt.hour() % 12 {
        0 => 12,
        h => h,
    };

    Some(match (letter, count) {
        ('G', 1..=3) => locale.eras[0][era].to_string(),
        ('G', 4) => locale.eras[1][era].to_string(),
        ('G', 5) => locale.eras[2][era].to_string(),

        // Year of era: 1 BC follows 1 AD.
        ('y', 2) => padded((if year > 0 { year } else { 1 - year }) % 100, 2),
        ('y', _) => padded(if year > 0 { year } else { 1 - year }, count),
        // Proleptic year, signed.
        ('u', _) => padded(year, count),

        ('M', 1 | 2) => padded(dt.month(), count),
        ('M', 3) => locale.short_months[month].to_string(),
        ('M', 4) => locale.months[month].to_string(),
        ('M', 5) => narrow(locale.months[month]),

        ('d', 1 | 2) => padded(dt.day(), count),

        ('E', 1..=3) => locale.short_weekdays[weekday].to_string(),
        ('E', 4) => locale.weekdays[weekday].to_string(),
        ('E', 5) => narrow(locale.weekdays[weekday]),

        ('a', 1..=3) => locale.day_periods[usize::from(dt.hour() >= 12)].to_string(),
        ('h', 1 | 2) => padded(hour12, count),
        ('H', 1 | 2) => padded(dt.hour(), count),
        ('m', 1 | 2) => padded(dt.minute(), count),
        ('s', 1 | 2) => padded(dt.second(), count),
        ('S', 1..=3) => {
            let millis = (dt.nanosecond() / 1_000_000).min(999);
            format!("{millis:03}")[..count].to_string()
        }

        _ => return None,
    })
}

/// Format `dt` with a unicode date pattern, or with the default pattern of
/// `language` when none is given. Text between single quotes is copied
/// verbatim and `''` is a literal quote.
///
/// Fails with the offending token when the pattern uses an unsupported one.
pub fn format_with_pattern(
    language: &str,
    dt: &NaiveDateTime,
    format: Option<&str>,
) -> core::result::Result<String, String> {
    let locale = locale(language);
    let chars: Vec<char> = format.unwrap_or(locale.default_format).chars().collect();
    let mut out = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '\'' {
            i += 1;
            if chars.get(i) == Some(&'\'') {
                out.push('\'');
                i += 1;
                continue;
            }
            while i < chars.len() {
                if chars[i] == '\'' {
                    if chars.get(i + 1) == Some(&'\'') {
                        out.push('\'');
                        i += 2;
                        continue;
                    }
                    break;
                }
                out.push(chars[i]);
                i += 1;
            }
            i += 1;
            continue;
        }
        if !c.is_ascii_alphabetic() {
            out.push(c);
            i += 1;
            continue;
        }

        let count = chars[i..].iter().take_while(|&&d| d == c).count();
        match field(locale, dt, c, count) {
            Some(text) => out.push_str(&text),
            None => return Err(chars[i..i + count].iter().collect()),
        }
        i += count;
    }

    Ok(out)
}

pub fn format_date(interp: &Interpreter, call: &Call, args: &[Value]) -> Result<Value> {
    let Some(date) = opt_string(args, 0) else {
        return Ok(Value::Null);
    };
    let Some(dt) = parse_date(date) else {
        return Err(ExprError::TypeCoercion {
            path: call.path.to_string(),
            expected: "date",
            found: args[0].to_string(),
        });
    };
    let format = opt_string(args, 1);
    let language = &interp.sources().language.current_language;
    match format_with_pattern(language, &dt, format) {
        Ok(text) => Ok(Value::from(text)),
        Err(token) => Err(ExprError::runtime(
            &call.path,
            format!(
                "unsupported date format token `{token}` in '{}'",
                format.unwrap_or_default()
            ),
        )),
    }
}

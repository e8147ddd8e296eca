use crate::iata::is_iata_code;
use crate::search::{FlightSearch, DATE_FORMAT};
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;

pub const DEFAULT_ADULTS: u8 = 1;
pub const MIN_ADULTS: i64 = 1;
pub const MAX_ADULTS: i64 = 8;

/// Rejection reasons for a search query, checked in declaration order.
/// The display strings are returned to clients verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required query parameters")]
    MissingParameters,
    #[error("invalid IATA code format")]
    InvalidIataCode,
    #[error("invalid date format")]
    InvalidDate,
    #[error("date cannot be in the past")]
    PastDate,
    #[error("invalid value for adults")]
    InvalidAdults,
    #[error("invalid value for non_stop")]
    InvalidNonStop,
}

/// Validate raw query parameters against today's date.
pub fn parse_search_today(params: &HashMap<String, String>) -> Result<FlightSearch, ValidationError> {
    parse_search(params, Utc::now().date_naive())
}

/// Validate raw query parameters into a [`FlightSearch`].
///
/// Empty values are treated as absent. The first failing rule wins.
pub fn parse_search(
    params: &HashMap<String, String>,
    today: NaiveDate,
) -> Result<FlightSearch, ValidationError> {
    let param = |key: &str| params.get(key).map(String::as_str).filter(|v| !v.is_empty());

    // 1. Required fields
    let (origin, destination, date) = match (param("origin"), param("destination"), param("date")) {
        (Some(o), Some(d), Some(dt)) => (o, d, dt),
        _ => return Err(ValidationError::MissingParameters),
    };

    // 2. Airport codes
    if !is_iata_code(origin) || !is_iata_code(destination) {
        return Err(ValidationError::InvalidIataCode);
    }

    // 3. Strict YYYY-MM-DD
    let departure_date = parse_date(date).ok_or(ValidationError::InvalidDate)?;

    // 4. Not before today
    if departure_date < today {
        return Err(ValidationError::PastDate);
    }

    // 5. Passenger count
    let adults = match param("adults") {
        None => DEFAULT_ADULTS,
        Some(raw) => match raw.parse::<i64>() {
            Ok(n) if (MIN_ADULTS..=MAX_ADULTS).contains(&n) => n as u8,
            _ => return Err(ValidationError::InvalidAdults),
        },
    };

    // 6. Non-stop flag
    let non_stop = match param("non_stop") {
        None => false,
        Some(raw) => parse_bool(raw).ok_or(ValidationError::InvalidNonStop)?,
    };

    Ok(FlightSearch {
        origin: origin.to_string(),
        destination: destination.to_string(),
        departure_date,
        adults,
        non_stop,
    })
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    // chrono tolerates padding and signs inside numeric fields; require the exact shape first.
    let bytes = raw.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

/// Accepts the usual spellings: 1/t/T/TRUE/true/True and 0/f/F/FALSE/false/False.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

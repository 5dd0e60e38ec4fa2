//! Argument validation for the query layer.
//!
//! Typed checks (ranges, date shape) live here alongside the dynamic checks
//! used by [`crate::api`], where arguments arrive as JSON and their type is not
//! known up front.

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::QueryError;

pub const MIN_YEAR: i64 = 1;
pub const MAX_YEAR: i64 = 9999;

// ---------------------------------------------------------------------------
// Value checks
// ---------------------------------------------------------------------------

/// Company names are compared after trimming; any string is acceptable.
pub fn company_name(name: &str) -> &str {
    name.trim()
}

/// A year in `[MIN_YEAR, MAX_YEAR]`.
pub fn year(value: i64, param: &'static str, func: &'static str) -> Result<i32, QueryError> {
    if value < MIN_YEAR {
        return Err(QueryError::value(
            func,
            format!("'{param}' must be >= {MIN_YEAR}, got {value}."),
        ));
    }
    if value > MAX_YEAR {
        return Err(QueryError::value(
            func,
            format!("'{param}' must be <= {MAX_YEAR}, got {value}."),
        ));
    }
    // Bounded above, so the conversion cannot fail.
    Ok(value as i32)
}

/// A non-negative count.
pub fn count(n: i64, func: &'static str) -> Result<usize, QueryError> {
    usize::try_from(n).map_err(|_| QueryError::value(func, format!("'n' must be >= 0, got {n}.")))
}

/// A date in strict `YYYY-MM-DD` form: no time, no offset, no partial date,
/// no other separators.
pub fn date_string(
    value: &str,
    param: &'static str,
    func: &'static str,
) -> Result<NaiveDate, QueryError> {
    let s = value.trim();
    if s.is_empty() {
        return Err(QueryError::value(func, format!("'{param}' must not be empty.")));
    }
    let malformed = || QueryError::value(func, format!("'{param}' must be 'YYYY-MM-DD', got {s:?}."));

    let b = s.as_bytes();
    let shape_ok = b.len() == 10
        && b[4] == b'-'
        && b[7] == b'-'
        && b
            .iter()
            .enumerate()
            .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit());
    if !shape_ok {
        return Err(malformed());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| malformed())
}

/// A `startDate`/`endDate` pair of strict dates, start not after end.
pub fn date_range(
    start: &str,
    end: &str,
    func: &'static str,
) -> Result<(NaiveDate, NaiveDate), QueryError> {
    let from = date_string(start, "startDate", func)?;
    let to = date_string(end, "endDate", func)?;
    if from > to {
        return Err(QueryError::value(
            func,
            format!("startDate ({:?}) must not be after endDate ({:?}).", start.trim(), end.trim()),
        ));
    }
    Ok((from, to))
}

/// A `startYear`/`endYear` pair of valid years, start not after end.
pub fn year_range(start: i64, end: i64, func: &'static str) -> Result<(i32, i32), QueryError> {
    let from = year(start, "startYear", func)?;
    let to = year(end, "endYear", func)?;
    if from > to {
        return Err(QueryError::value(
            func,
            format!("startYear ({start}) must not exceed endYear ({end})."),
        ));
    }
    Ok((from, to))
}

// ---------------------------------------------------------------------------
// Dynamic type checks
// ---------------------------------------------------------------------------

/// Describe a JSON value the way error messages report it.
pub fn describe(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(b) => format!("bool ({b})"),
        Value::Number(n) if n.is_f64() => format!("'float' ({n})"),
        Value::Number(n) => format!("'int' ({n})"),
        Value::String(s) => format!("'str' ({s:?})"),
        Value::Array(_) => format!("'list' ({value})"),
        Value::Object(_) => format!("'dict' ({value})"),
    }
}

/// Require a string. Null, numbers, booleans and containers are type errors.
pub fn expect_str<'a>(
    value: &'a Value,
    param: &'static str,
    func: &'static str,
) -> Result<&'a str, QueryError> {
    value.as_str().ok_or_else(|| QueryError::Type {
        func,
        param,
        expected: "a string",
        got: describe(value),
    })
}

/// Require an integer. Booleans and floats are rejected even when they carry
/// an integral value.
pub fn expect_int(value: &Value, param: &'static str, func: &'static str) -> Result<i64, QueryError> {
    let type_error = || QueryError::Type {
        func,
        param,
        expected: "an integer",
        got: describe(value),
    };
    match value {
        Value::Number(n) if n.is_i64() => n.as_i64().ok_or_else(type_error),
        // Only integers beyond i64::MAX reach here.
        Value::Number(n) if n.is_u64() => Ok(i64::MAX),
        _ => Err(type_error()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    const F: &str = "test";

    #[test]
    fn year_bounds() {
        assert_eq!(year(1, "year", F).unwrap(), 1);
        assert_eq!(year(9999, "year", F).unwrap(), 9999);
        for bad in [0, -1, -2020, 10000, i64::MAX] {
            assert_eq!(year(bad, "year", F).unwrap_err().kind(), ErrorKind::Value);
        }
    }

    #[test]
    fn count_rejects_negative() {
        assert_eq!(count(0, F).unwrap(), 0);
        assert_eq!(count(5, F).unwrap(), 5);
        assert_eq!(count(-1, F).unwrap_err().kind(), ErrorKind::Value);
        assert_eq!(count(-100, F).unwrap_err().kind(), ErrorKind::Value);
    }

    #[test]
    fn strict_dates() {
        assert_eq!(
            date_string(" 2020-01-01 ", "startDate", F).unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
        );
        for bad in [
            "",
            "   ",
            "not-a-date",
            "2020",
            "01-02-03",
            "01/01/2020",
            "2020/01/01",
            "2020-01-01Z",
            "2020-01-01T00:00:00+05:30",
            "2020-1-01",
            "2020-02-30",
        ] {
            let err = date_string(bad, "startDate", F).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Value, "{bad:?}");
        }
    }

    #[test]
    fn date_ranges() {
        let day = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        assert_eq!(
            date_range("1957-10-04", "1957-10-04", F).unwrap(),
            (day(1957, 10, 4), day(1957, 10, 4))
        );
        assert_eq!(
            date_range("2020-01-01", " 2020-12-31 ", F).unwrap(),
            (day(2020, 1, 1), day(2020, 12, 31))
        );
        for (start, end) in [
            ("2020-12-31", "2020-01-01"),
            ("not-a-date", "2020-12-31"),
            ("2020-01-01", ""),
            ("2020", "2020-12-31"),
        ] {
            let err = date_range(start, end, F).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Value, "{start:?}..{end:?}");
        }
    }

    #[test]
    fn year_ranges() {
        assert_eq!(year_range(1967, 1969, F).unwrap(), (1967, 1969));
        assert_eq!(year_range(2020, 2020, F).unwrap(), (2020, 2020));
        for (start, end) in [(2020, 2010), (0, 2020), (2020, 10000), (-5, -1)] {
            let err = year_range(start, end, F).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Value, "{start}..{end}");
        }
    }

    #[test]
    fn dynamic_strings() {
        assert_eq!(expect_str(&json!("SpaceX"), "companyName", F).unwrap(), "SpaceX");
        for bad in [json!(null), json!(123), json!(3.14), json!(["NASA"]), json!({}), json!(true)] {
            let err = expect_str(&bad, "companyName", F).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Type, "{bad}");
        }
    }

    #[test]
    fn dynamic_integers_reject_bool_and_float() {
        assert_eq!(expect_int(&json!(2020), "year", F).unwrap(), 2020);
        assert_eq!(expect_int(&json!(-5), "n", F).unwrap(), -5);
        for bad in [json!(true), json!(false), json!(2020.0), json!("2020"), json!(null), json!([2020])] {
            let err = expect_int(&bad, "year", F).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Type, "{bad}");
        }
    }

    #[test]
    fn describe_matches_reported_types() {
        assert_eq!(describe(&json!(true)), "bool (true)");
        assert_eq!(describe(&json!(null)), "None");
        assert_eq!(describe(&json!("5")), "'str' (\"5\")");
        assert_eq!(describe(&json!(5.0)), "'float' (5.0)");
    }
}

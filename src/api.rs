//! Dynamic call surface: an operation name plus JSON arguments in, a JSON
//! result out.
//!
//! This is the boundary where argument *types* are checked. The typed methods
//! on [`MissionStore`] only ever see well-typed input.

use serde_json::{json, Value};

use crate::error::QueryError;
use crate::store::MissionStore;
use crate::validate::{expect_int, expect_str};

/// Names accepted by [`call`].
pub const OPERATIONS: [&str; 9] = [
    "getMissionCountByCompany",
    "getSuccessRate",
    "getMissionsByDateRange",
    "getTopCompaniesByMissionCount",
    "getMissionStatusCount",
    "getMissionsByYear",
    "getMostUsedRocket",
    "getAverageMissionsPerYear",
    "reloadData",
];

/// Run `op` against `store` with positional `args`.
pub fn call(store: &MissionStore, op: &str, args: &[Value]) -> Result<Value, QueryError> {
    match op {
        "getMissionCountByCompany" => {
            let [name] = arity::<1>(op, args)?;
            let name = expect_str(name, "companyName", "getMissionCountByCompany")?;
            Ok(json!(store.mission_count_by_company(name)?))
        }
        "getSuccessRate" => {
            let [name] = arity::<1>(op, args)?;
            let name = expect_str(name, "companyName", "getSuccessRate")?;
            Ok(json!(store.success_rate(name)?))
        }
        "getMissionsByDateRange" => {
            let [start, end] = arity::<2>(op, args)?;
            let start = expect_str(start, "startDate", "getMissionsByDateRange")?;
            let end = expect_str(end, "endDate", "getMissionsByDateRange")?;
            Ok(json!(store.missions_by_date_range(start, end)?))
        }
        "getTopCompaniesByMissionCount" => {
            let [n] = arity::<1>(op, args)?;
            let n = expect_int(n, "n", "getTopCompaniesByMissionCount")?;
            Ok(json!(store.top_companies_by_mission_count(n)?))
        }
        "getMissionStatusCount" => {
            let [] = arity::<0>(op, args)?;
            let counts = store.mission_status_count()?;
            let map: serde_json::Map<String, Value> = counts
                .labelled()
                .into_iter()
                .map(|(label, n)| (label.to_string(), json!(n)))
                .collect();
            Ok(Value::Object(map))
        }
        "getMissionsByYear" => {
            let [year] = arity::<1>(op, args)?;
            let year = expect_int(year, "year", "getMissionsByYear")?;
            Ok(json!(store.missions_by_year(year)?))
        }
        "getMostUsedRocket" => {
            let [] = arity::<0>(op, args)?;
            Ok(json!(store.most_used_rocket()?))
        }
        "getAverageMissionsPerYear" => {
            let [start, end] = arity::<2>(op, args)?;
            let start = expect_int(start, "startYear", "getAverageMissionsPerYear")?;
            let end = expect_int(end, "endYear", "getAverageMissionsPerYear")?;
            Ok(json!(store.average_missions_per_year(start, end)?))
        }
        "reloadData" => {
            let path = match args {
                [] | [Value::Null] => None,
                [path] => Some(expect_str(path, "csvPath", "reloadData")?),
                _ => return Err(arity_error("reloadData", "0 or 1", args.len())),
            };
            let dataset = store.reload(path)?;
            Ok(json!({ "records": dataset.len() }))
        }
        other => Err(QueryError::UnknownOperation(other.to_string())),
    }
}

fn arity<'a, const N: usize>(op: &str, args: &'a [Value]) -> Result<&'a [Value; N], QueryError> {
    <&[Value; N]>::try_from(args).map_err(|_| arity_error(op, &N.to_string(), args.len()))
}

fn arity_error(op: &str, expected: &str, got: usize) -> QueryError {
    QueryError::Type {
        func: operation_name(op),
        param: "arguments",
        expected: "a fixed number of arguments",
        got: format!("{got} (expected {expected})"),
    }
}

fn operation_name(op: &str) -> &'static str {
    OPERATIONS.iter().find(|o| **o == op).copied().unwrap_or("call")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{tests::record, Dataset};
    use crate::error::ErrorKind;

    fn store() -> MissionStore {
        let mut records = vec![
            record("RVSN USSR", "1957-10-04", "Sputnik 8K71PS", "Success"),
            record("SpaceX", "2020-05-30", "Falcon 9", "Success"),
            record("SpaceX", "2020-07-20", "Falcon 9", "Failure"),
        ];
        records[0].mission = "Sputnik-1".into();
        MissionStore::from_dataset(Dataset::from_records(records))
    }

    fn kind(op: &str, args: Value) -> ErrorKind {
        let args = args.as_array().cloned().unwrap_or_default();
        call(&store(), op, &args).unwrap_err().kind()
    }

    #[test]
    fn results_are_plain_json() {
        let s = store();
        assert_eq!(call(&s, "getMissionCountByCompany", &[json!("SpaceX")]).unwrap(), json!(2));
        assert_eq!(call(&s, "getSuccessRate", &[json!("SpaceX")]).unwrap(), json!(50.0));
        assert_eq!(
            call(&s, "getMissionsByDateRange", &[json!("1957-01-01"), json!("1957-12-31")]).unwrap(),
            json!(["Sputnik-1"])
        );
        assert_eq!(
            call(&s, "getTopCompaniesByMissionCount", &[json!(1)]).unwrap(),
            json!([["SpaceX", 2]])
        );
        assert_eq!(
            call(&s, "getMissionStatusCount", &[]).unwrap(),
            json!({"Success": 2, "Failure": 1, "Partial Failure": 0, "Prelaunch Failure": 0})
        );
        assert_eq!(call(&s, "getMissionsByYear", &[json!(2020)]).unwrap(), json!(2));
        assert_eq!(call(&s, "getMostUsedRocket", &[]).unwrap(), json!("Falcon 9"));
        assert_eq!(
            call(&s, "getAverageMissionsPerYear", &[json!(2020), json!(2020)]).unwrap(),
            json!(2.0)
        );
    }

    #[test]
    fn string_parameters_reject_other_types() {
        for bad in [json!(null), json!(123), json!(3.14), json!(["NASA"]), json!({}), json!(true)] {
            assert_eq!(kind("getMissionCountByCompany", json!([bad.clone()])), ErrorKind::Type);
            assert_eq!(kind("getSuccessRate", json!([bad])), ErrorKind::Type);
        }
        assert_eq!(kind("getMissionsByDateRange", json!([null, "2020-12-31"])), ErrorKind::Type);
        assert_eq!(kind("getMissionsByDateRange", json!(["2020-01-01", null])), ErrorKind::Type);
        assert_eq!(kind("getMissionsByDateRange", json!([20200101, "2020-12-31"])), ErrorKind::Type);
        assert_eq!(kind("getMissionsByDateRange", json!([["2020-01-01"], "2020-12-31"])), ErrorKind::Type);
    }

    #[test]
    fn integer_parameters_reject_bool_float_and_strings() {
        for bad in [json!(null), json!("5"), json!(5.0), json!(true), json!([5])] {
            assert_eq!(kind("getTopCompaniesByMissionCount", json!([bad.clone()])), ErrorKind::Type);
            assert_eq!(kind("getMissionsByYear", json!([bad])), ErrorKind::Type);
        }
        assert_eq!(kind("getAverageMissionsPerYear", json!([true, 2020])), ErrorKind::Type);
        assert_eq!(kind("getAverageMissionsPerYear", json!([2010, 2020.0])), ErrorKind::Type);
        assert_eq!(kind("getAverageMissionsPerYear", json!(["2010", 2020])), ErrorKind::Type);
    }

    #[test]
    fn well_typed_bad_values_are_value_errors() {
        assert_eq!(kind("getTopCompaniesByMissionCount", json!([-1])), ErrorKind::Value);
        assert_eq!(kind("getMissionsByYear", json!([10000])), ErrorKind::Value);
        assert_eq!(kind("getMissionsByDateRange", json!(["", "2020-12-31"])), ErrorKind::Value);
        assert_eq!(kind("getAverageMissionsPerYear", json!([2020, 2010])), ErrorKind::Value);
    }

    #[test]
    fn arity_and_unknown_operations() {
        assert_eq!(kind("getMissionsByYear", json!([])), ErrorKind::Type);
        assert_eq!(kind("getMostUsedRocket", json!([1])), ErrorKind::Type);
        assert!(matches!(
            call(&store(), "dropTable", &[]),
            Err(QueryError::UnknownOperation(_))
        ));
    }
}

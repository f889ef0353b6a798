use cc_errors::Problem;

use crate::domain::DomainError;

pub fn to_problem(err: &DomainError, instance: &str) -> Problem {
    Problem::new(err.kind(), err.to_string(), instance)
}

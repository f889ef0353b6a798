use axum::http::StatusCode;

/// The closed set of error kinds a Control Core module may surface,
/// taken directly from the control plane's error-handling contract.
/// Every module's `DomainError` maps onto exactly one of these before
/// it reaches the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Unauthenticated,
    Forbidden,
    Validation,
    Conflict,
    NotFound,
    UpstreamFailure,
    ProductionLocked,
    SchemaDriftFatal,
    Internal,
}

impl ErrorKind {
    #[must_use]
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden | ErrorKind::ProductionLocked => StatusCode::FORBIDDEN,
            ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::UpstreamFailure => StatusCode::BAD_GATEWAY,
            ErrorKind::SchemaDriftFatal | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            ErrorKind::Unauthenticated => "unauthenticated",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::Validation => "validation",
            ErrorKind::Conflict => "conflict",
            ErrorKind::NotFound => "not_found",
            ErrorKind::UpstreamFailure => "upstream_failure",
            ErrorKind::ProductionLocked => "production_locked",
            ErrorKind::SchemaDriftFatal => "schema_drift_fatal",
            ErrorKind::Internal => "internal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_locked_is_forbidden() {
        assert_eq!(ErrorKind::ProductionLocked.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn schema_drift_is_fatal_five_hundred() {
        assert_eq!(ErrorKind::SchemaDriftFatal.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

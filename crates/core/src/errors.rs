use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("invalid pricing request: `{field}` {reason}")]
    InvalidRequest { field: &'static str, reason: String },
    #[error("price predictor fault: {0}")]
    PredictorFault(String),
    #[error("margin is undefined because the recommended price is zero")]
    DivisionByZero,
    #[error("`{field}` cannot be reported in cents (got {value})")]
    UnrepresentableAmount { field: &'static str, value: String },
}

impl PricingError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidRequest { field, reason: reason.into() }
    }

    /// Stable machine-readable class, used as the `error_class` in log events.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::InvalidRequest { .. } => "invalid_request",
            Self::PredictorFault(_) => "predictor_fault",
            Self::DivisionByZero => "division_by_zero",
            Self::UnrepresentableAmount { .. } => "unrepresentable_amount",
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The pricing request could not be processed. Check inputs and try again."
            }
            Self::ServiceUnavailable { .. } => {
                "The pricing model is temporarily unavailable. Please retry shortly."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. }
            | Self::ServiceUnavailable { correlation_id, .. }
            | Self::Internal { correlation_id, .. } => correlation_id,
        }
    }
}

impl PricingError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::ServiceUnavailable { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<PricingError> for InterfaceError {
    fn from(value: PricingError) -> Self {
        let message = value.to_string();
        match value {
            PricingError::InvalidRequest { .. } | PricingError::DivisionByZero => {
                Self::BadRequest { message, correlation_id: "unassigned".to_owned() }
            }
            PricingError::PredictorFault(_) => {
                Self::ServiceUnavailable { message, correlation_id: "unassigned".to_owned() }
            }
            // the decision was computed; only the rounded report failed
            PricingError::UnrepresentableAmount { .. } => {
                Self::Internal { message, correlation_id: "unassigned".to_owned() }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{InterfaceError, PricingError};

    #[test]
    fn invalid_request_maps_to_bad_request_interface_error() {
        let interface = PricingError::invalid("cost", "must be finite").into_interface("req-1");

        assert!(matches!(
            interface,
            InterfaceError::BadRequest {
                ref correlation_id,
                ..
            } if correlation_id == "req-1"
        ));
        assert_eq!(
            interface.user_message(),
            "The pricing request could not be processed. Check inputs and try again."
        );
    }

    #[test]
    fn predictor_fault_is_distinct_from_bad_input() {
        let interface =
            PricingError::PredictorFault("returned NaN".to_owned()).into_interface("req-2");

        assert!(matches!(interface, InterfaceError::ServiceUnavailable { .. }));
        assert_eq!(interface.correlation_id(), "req-2");
        assert_eq!(
            interface.user_message(),
            "The pricing model is temporarily unavailable. Please retry shortly."
        );
    }

    #[test]
    fn division_by_zero_is_reported_as_bad_request() {
        let interface = PricingError::DivisionByZero.into_interface("req-3");

        assert!(matches!(interface, InterfaceError::BadRequest { .. }));
        assert_eq!(PricingError::DivisionByZero.error_class(), "division_by_zero");
    }

    #[test]
    fn unrepresentable_amount_is_an_internal_error() {
        let error = PricingError::UnrepresentableAmount {
            field: "recommended_price",
            value: "1e40".to_owned(),
        };
        assert_eq!(error.error_class(), "unrepresentable_amount");

        let interface = error.into_interface("req-4");
        assert!(matches!(interface, InterfaceError::Internal { .. }));
        assert_eq!(interface.correlation_id(), "req-4");
        assert_eq!(interface.user_message(), "An unexpected internal error occurred.");
    }

    #[test]
    fn invalid_request_message_names_the_field() {
        let error = PricingError::invalid("installation_cost", "must not be negative (got -1)");

        assert_eq!(
            error.to_string(),
            "invalid pricing request: `installation_cost` must not be negative (got -1)"
        );
    }
}

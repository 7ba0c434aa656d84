// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::payload::PayloadError;
use ward_roster::CoreError;
use ward_roster_domain::DomainError;
use ward_roster_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The caller could not be resolved to an active staff member.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The caller is known but may not perform the action.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain, core and persistence errors and represent
/// the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the caller does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The change collides with an existing record. Nothing was written.
    Conflict {
        /// A human-readable description of the collision.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict { message } => write!(f, "Conflict: {message}"),
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<PayloadError> for ApiError {
    fn from(err: PayloadError) -> Self {
        Self::InvalidInput {
            field: String::from(err.field()),
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::EmptyRotation { .. } => ApiError::DomainRuleViolation {
            rule: String::from("non_empty_rotation"),
            message,
        },
        DomainError::InvalidDateRange { .. } => ApiError::InvalidInput {
            field: String::from("end_date"),
            message,
        },
        DomainError::MalformedPayloadKey { key, .. }
        | DomainError::MalformedPayloadValue { key, .. } => ApiError::InvalidInput {
            field: key,
            message,
        },
        DomainError::InvalidTaskCategory(_) => ApiError::InvalidInput {
            field: String::from("category"),
            message,
        },
        DomainError::InvalidStaffRole(_) => ApiError::InvalidInput {
            field: String::from("role"),
            message,
        },
        DomainError::InvalidStatus(_) => ApiError::InvalidInput {
            field: String::from("status"),
            message,
        },
        DomainError::InvalidStatusTransition { .. } => ApiError::DomainRuleViolation {
            rule: String::from("status_transition"),
            message,
        },
        DomainError::ShiftNotEligibleForReview { .. } => ApiError::DomainRuleViolation {
            rule: String::from("review_eligibility"),
            message,
        },
        DomainError::InvalidName(_) => ApiError::InvalidInput {
            field: String::from("name"),
            message,
        },
        DomainError::InvalidTime(_) => ApiError::InvalidInput {
            field: String::from("time"),
            message,
        },
        DomainError::DateParseError { .. } => ApiError::InvalidInput {
            field: String::from("date"),
            message,
        },
        DomainError::InvalidMonth { .. } => ApiError::InvalidInput {
            field: String::from("month"),
            message,
        },
        DomainError::InvalidRotationLength { .. } => ApiError::InvalidInput {
            field: String::from("length_in_days"),
            message,
        },
        DomainError::InvalidRotationDay { .. } => ApiError::InvalidInput {
            field: String::from("day_number"),
            message,
        },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}

/// Translates a persistence error into an API error.
///
/// `resource_type` names what the caller was working on and is used for
/// not-found reports.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError, resource_type: &str) -> ApiError {
    match err {
        PersistenceError::Conflict(msg) => ApiError::Conflict { message: msg },
        PersistenceError::NotFound(msg) => ApiError::ResourceNotFound {
            resource_type: resource_type.to_string(),
            message: msg,
        },
        PersistenceError::ReferenceNotFound(msg) => ApiError::ResourceNotFound {
            resource_type: String::from("Reference"),
            message: msg,
        },
        PersistenceError::Referenced(msg) => ApiError::DomainRuleViolation {
            rule: String::from("protected_reference"),
            message: msg,
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}

//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes.

use jobescrow_core::domain::DomainError;
use jobescrow_core::error::AppError;
use jsonrpsee::types::ErrorObjectOwned;
use serde_json::json;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const NOT_FOUND: i32 = 4001;
    pub const INVALID_STATE: i32 = 4002;
    pub const THROTTLED: i32 = 4003;
    pub const UNAUTHORIZED: i32 = 4004;
    pub const INSUFFICIENT_FUNDS: i32 = 4005;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const DB_ERROR: i32 = 5001;
}

/// Errors raised by the RPC layer itself
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("Failed to build server on {addr}: {reason}")]
    Bind { addr: String, reason: String },

    #[error("Failed to register method {method}: {reason}")]
    Register { method: &'static str, reason: String },
}

/// Rejection returned when the token bucket is empty
pub fn throttled() -> ErrorObjectOwned {
    ErrorObjectOwned::owned(
        code::THROTTLED,
        "Rate limit exceeded. Please slow down.",
        None::<()>,
    )
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    match err {
        AppError::Domain(e) => domain_error(e),
        AppError::Validation(msg) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, msg, None::<()>)
        }
        AppError::NotFound(msg) => ErrorObjectOwned::owned(code::NOT_FOUND, msg, None::<()>),
        AppError::Conflict(msg) => ErrorObjectOwned::owned(code::INVALID_STATE, msg, None::<()>),
        AppError::Database(msg) => ErrorObjectOwned::owned(code::DB_ERROR, msg, None::<()>),
        AppError::Serialization(e) => {
            ErrorObjectOwned::owned(code::INTERNAL_ERROR, e.to_string(), None::<()>)
        }
        AppError::Config(msg) | AppError::Internal(msg) => {
            ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>)
        }
    }
}

fn domain_error(err: DomainError) -> ErrorObjectOwned {
    let message = err.to_string();
    match err {
        DomainError::Unauthorized {
            job_id,
            caller,
            role,
        } => ErrorObjectOwned::owned(
            code::UNAUTHORIZED,
            message,
            Some(json!({ "job_id": job_id, "caller": caller, "required_role": role })),
        ),
        DomainError::InvalidStateTransition {
            job_id,
            from,
            operation,
        } => ErrorObjectOwned::owned(
            code::INVALID_STATE,
            message,
            Some(json!({ "job_id": job_id, "status": from, "operation": operation })),
        ),
        DomainError::InsufficientFunds {
            account,
            requested,
            available,
        } => ErrorObjectOwned::owned(
            code::INSUFFICIENT_FUNDS,
            message,
            Some(json!({ "account": account, "requested": requested, "available": available })),
        ),
        DomainError::JobNotFound(job_id) => ErrorObjectOwned::owned(
            code::NOT_FOUND,
            message,
            Some(json!({ "job_id": job_id })),
        ),
        DomainError::InvalidAddress(_) | DomainError::ValidationError(_) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, message, None::<()>)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobescrow_core::domain::Role;

    #[test]
    fn test_domain_errors_get_distinct_codes() {
        let unauthorized = to_rpc_error(
            DomainError::Unauthorized {
                job_id: 1,
                caller: "mallory".to_string(),
                role: Role::Owner,
            }
            .into(),
        );
        assert_eq!(unauthorized.code(), code::UNAUTHORIZED);

        let invalid = to_rpc_error(
            DomainError::InvalidStateTransition {
                job_id: 1,
                from: "DELETED".to_string(),
                operation: "delete".to_string(),
            }
            .into(),
        );
        assert_eq!(invalid.code(), code::INVALID_STATE);

        let funds = to_rpc_error(
            DomainError::InsufficientFunds {
                account: "owner".to_string(),
                requested: 3,
                available: 0,
            }
            .into(),
        );
        assert_eq!(funds.code(), code::INSUFFICIENT_FUNDS);

        let missing = to_rpc_error(DomainError::JobNotFound(9).into());
        assert_eq!(missing.code(), code::NOT_FOUND);
    }

    #[test]
    fn test_insufficient_funds_carries_data() {
        let err = to_rpc_error(
            DomainError::InsufficientFunds {
                account: "owner".to_string(),
                requested: 3,
                available: 1,
            }
            .into(),
        );
        let data: serde_json::Value =
            serde_json::from_str(err.data().map(|d| d.get()).unwrap()).unwrap();
        assert_eq!(data["requested"], 3);
        assert_eq!(data["available"], 1);
    }

    #[test]
    fn test_app_errors() {
        assert_eq!(
            to_rpc_error(AppError::Conflict("moved".into())).code(),
            code::INVALID_STATE
        );
        assert_eq!(
            to_rpc_error(AppError::Database("locked".into())).code(),
            code::DB_ERROR
        );
        assert_eq!(
            to_rpc_error(AppError::Validation("bad".into())).code(),
            code::VALIDATION_ERROR
        );
    }
}

//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes.

use cmdrelay_core::error::AppError;
use jsonrpsee::types::ErrorObjectOwned;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const DB_ERROR: i32 = 5001;
    pub const SYSTEM_ERROR: i32 = 5002;
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    let code = match &err {
        AppError::Validation(_) | AppError::Domain(_) | AppError::Serialization(_) => {
            code::VALIDATION_ERROR
        }
        AppError::Database(_) => code::DB_ERROR,
        AppError::Io(_) | AppError::Transport(_) => code::SYSTEM_ERROR,
        AppError::Config(_) | AppError::Internal(_) => code::INTERNAL_ERROR,
    };
    ErrorObjectOwned::owned(code, err.to_string(), None::<()>)
}

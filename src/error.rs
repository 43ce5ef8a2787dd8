//! Unified error type for licensekit
//!
//! Every module declares its own error enum close to the code that raises
//! it; they all flow through this module for consistent handling at the
//! crate boundary.

use thiserror::Error;

use crate::crypto::arith::ArithError;
use crate::crypto::curve::CurveError;
use crate::crypto::ecdsa::EcdsaError;
use crate::keystore::KeystoreError;
use crate::license::{CodeError, SaltError};

/// Main error type for all licensekit operations
#[derive(Debug, Error)]
pub enum LicenseError {
    #[error(transparent)]
    Arith(#[from] ArithError),
    #[error(transparent)]
    Curve(#[from] CurveError),
    #[error(transparent)]
    Ecdsa(#[from] EcdsaError),
    #[error(transparent)]
    Code(#[from] CodeError),
    #[error(transparent)]
    Salt(#[from] SaltError),
    #[error(transparent)]
    Keystore(#[from] KeystoreError),
}

/// Result type alias for licensekit operations
pub type LicenseResult<T> = Result<T, LicenseError>;

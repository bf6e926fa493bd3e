//! Error types for asset loading and start-up

use crate::backend::BackendError;
use std::fmt;
use std::path::PathBuf;

/// Why an asset is unavailable
///
/// `AssetMissing` and `AssetLoadFailed` are never fatal: the resource set
/// substitutes a fallback and carries on. Only `CriticalAssetFailure` can
/// stop start-up, and only when strict asset checking is enabled.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetError {
    /// The file does not exist
    AssetMissing(PathBuf),

    /// The file exists but could not be decoded or uploaded
    AssetLoadFailed { path: PathBuf, reason: String },

    /// Not even a generated placeholder could be created
    CriticalAssetFailure(String),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AssetError::AssetMissing(path) => write!(f, "Asset missing: {}", path.display()),
            AssetError::AssetLoadFailed { path, reason } => {
                write!(f, "Failed to load {}: {}", path.display(), reason)
            }
            AssetError::CriticalAssetFailure(reason) => {
                write!(f, "Critical asset failure: {}", reason)
            }
        }
    }
}

impl std::error::Error for AssetError {}

/// Anything that ends the program with a non-zero exit code
#[derive(Debug)]
pub enum AppError {
    Init(String),
    Backend(BackendError),
    Asset(AssetError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Init(msg) => write!(f, "Initialization failed: {}", msg),
            AppError::Backend(e) => write!(f, "{}", e),
            AppError::Asset(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AppError {}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Init(msg)
    }
}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        AppError::Backend(err)
    }
}

impl From<AssetError> for AppError {
    fn from(err: AssetError) -> Self {
        AppError::Asset(err)
    }
}

//! Error taxonomy for the simulation core
//!
//! Only configuration mistakes are errors. Per-tick computations are total,
//! and entities leaving the world are ordinary lifecycle transitions.

use core::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimError {
    /// A shoot/equip request named a bullet kind that is not configured
    UnknownBulletKind(u8),
    /// A spawn request named an enemy kind that is not configured
    UnknownEnemyKind(u8),
    /// Configuration failed validation
    InvalidConfig(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownBulletKind(kind) => write!(f, "unknown bullet kind: {kind}"),
            Self::UnknownEnemyKind(kind) => write!(f, "unknown enemy kind: {kind}"),
            Self::InvalidConfig(reason) => write!(f, "invalid config: {reason}"),
        }
    }
}

impl std::error::Error for SimError {}

pub type SimResult<T> = Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_kind() {
        assert_eq!(SimError::UnknownBulletKind(9).to_string(), "unknown bullet kind: 9");
        assert_eq!(SimError::UnknownEnemyKind(0).to_string(), "unknown enemy kind: 0");
        assert_eq!(
            SimError::InvalidConfig("no enemies".into()).to_string(),
            "invalid config: no enemies"
        );
    }
}

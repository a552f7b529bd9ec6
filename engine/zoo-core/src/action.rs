//! Actions accepted by `Env::step`.
//!
//! Harnesses hand actions over either as a bare integer or as a one-element
//! int64 array (the shape `random_action` produces). Both are accepted.

use serde::{Deserialize, Serialize};

use crate::error::{EnvError, EnvResult};

/// Discrete action as delivered by a training harness
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Action {
    Scalar(i64),
    Array(Vec<i64>),
}

impl Action {
    /// Collapse the action into a scalar.
    ///
    /// Shape-(1,) arrays are squeezed to their single element. Any other
    /// array shape is rejected.
    pub fn squeeze(&self) -> EnvResult<i64> {
        match self {
            Action::Scalar(a) => Ok(*a),
            Action::Array(values) if values.len() == 1 => Ok(values[0]),
            Action::Array(values) => Err(EnvError::InvalidAction(format!(
                "expected a scalar or shape (1,) array, got shape ({},)",
                values.len()
            ))),
        }
    }
}

impl From<i64> for Action {
    fn from(value: i64) -> Self {
        Action::Scalar(value)
    }
}

impl From<Vec<i64>> for Action {
    fn from(values: Vec<i64>) -> Self {
        Action::Array(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_squeeze() {
        assert_eq!(Action::Scalar(1).squeeze().unwrap(), 1);
    }

    #[test]
    fn test_single_element_array_squeeze() {
        assert_eq!(Action::Array(vec![0]).squeeze().unwrap(), 0);
    }

    #[test]
    fn test_wide_array_rejected() {
        let err = Action::Array(vec![0, 1]).squeeze().unwrap_err();
        assert!(matches!(err, EnvError::InvalidAction(msg) if msg.contains("(2,)")));
    }

    #[test]
    fn test_empty_array_rejected() {
        assert!(Action::Array(Vec::new()).squeeze().is_err());
    }

    #[test]
    fn test_untagged_json() {
        let scalar: Action = serde_json::from_str("1").unwrap();
        let array: Action = serde_json::from_str("[1]").unwrap();
        assert_eq!(scalar, Action::Scalar(1));
        assert_eq!(array, Action::Array(vec![1]));
    }
}

//! Error types for scene construction and loading

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("invalid {op} argument {arg}: {value} is not a finite number")]
    InvalidTransform {
        op: &'static str,
        arg: &'static str,
        value: f64,
    },

    #[error("{op} takes {expected} arguments, got {got}")]
    TransformArity {
        op: &'static str,
        expected: &'static str,
        got: usize,
    },

    #[error("'{0}' is reserved and cannot be set as an attribute")]
    ReservedAttribute(String),

    #[error("invalid {tag} geometry: {reason}")]
    InvalidGeometry { tag: &'static str, reason: String },

    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scene TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

impl SceneError {
    pub fn invalid_geometry(tag: &'static str, reason: impl Into<String>) -> Self {
        SceneError::InvalidGeometry {
            tag,
            reason: reason.into(),
        }
    }

    pub fn arity(op: &'static str, expected: &'static str, got: usize) -> Self {
        SceneError::TransformArity { op, expected, got }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = SceneError::InvalidTransform {
            op: "translate",
            arg: "tx",
            value: f64::NAN,
        };
        assert_eq!(
            err.to_string(),
            "invalid translate argument tx: NaN is not a finite number"
        );

        let err = SceneError::arity("scale", "1 or 2", 3);
        assert_eq!(err.to_string(), "scale takes 1 or 2 arguments, got 3");

        let err = SceneError::invalid_geometry("circle", "r must not be negative (got -1)");
        assert_eq!(
            err.to_string(),
            "invalid circle geometry: r must not be negative (got -1)"
        );
    }

    #[test]
    fn test_toml_errors_convert() {
        let toml_err = toml::from_str::<toml::Table>("not = = toml").unwrap_err();
        let err: SceneError = toml_err.into();
        assert!(matches!(err, SceneError::Toml(_)));
    }
}

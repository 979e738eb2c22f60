use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnipError {
    /// The price argument is not an integer. Raised before any storage access.
    InvalidInput { raw: String },

    /// A week record file without the header + data line structure.
    CorruptStorage { path: PathBuf, lines: usize },
}

impl fmt::Display for TurnipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnipError::InvalidInput { raw } => {
                write!(f, "Wrong input type! Price should be an integer (got {raw:?}).")
            }
            TurnipError::CorruptStorage { path, lines } => write!(
                f,
                "week record {} is corrupt: expected at least 2 lines, found {lines}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for TurnipError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_message_names_the_raw_value() {
        let err = TurnipError::InvalidInput {
            raw: "abc".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Wrong input type! Price should be an integer (got \"abc\")."
        );
    }

    #[test]
    fn survives_a_trip_through_anyhow() {
        let err: anyhow::Error = TurnipError::CorruptStorage {
            path: PathBuf::from("x.csv"),
            lines: 1,
        }
        .into();
        assert!(matches!(
            err.downcast_ref::<TurnipError>(),
            Some(TurnipError::CorruptStorage { lines: 1, .. })
        ));
    }
}

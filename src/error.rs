use thiserror::Error;

/// Errors surfaced by the ponchie core.
///
/// Drawing and session operations never fail: invalid calls are no-ops.
/// Everything here happens at startup (vocabulary, config) or at export time.
#[derive(Debug, Error)]
pub enum PonchieError {
    #[error("vocabulary list `{0}` is empty")]
    EmptyVocabulary(&'static str),

    #[error("vocabulary list `{list}` has an empty entry at index {index}")]
    EmptyWordPart { list: &'static str, index: usize },

    #[error("vocabulary file `{file}` could not be loaded: {reason}")]
    VocabularyData { file: String, reason: String },

    #[error("invalid colour `{0}`, expected #rrggbb")]
    InvalidColor(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PonchieError>;

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn parse_count(s: &str) -> Result<u32> {
        Ok(serde_json::from_str(s)?)
    }

    #[test]
    fn test_json_errors_convert() {
        assert_matches!(parse_count("7"), Ok(7));
        let err = parse_count("\"seven\"").unwrap_err();
        assert_matches!(err, PonchieError::Json(_));
        assert!(err.to_string().starts_with("invalid JSON: "));
    }

    #[test]
    fn test_io_errors_are_transparent() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = PonchieError::from(io);
        assert_eq!(err.to_string(), "no such file");
    }
}

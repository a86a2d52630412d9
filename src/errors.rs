use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid screen bounds: {width}x{height} (width and height must be positive)")]
    InvalidBounds { width: i32, height: i32 },

    #[error("{what} within {timeout_ms} ms")]
    Timeout { what: &'static str, timeout_ms: u64 },

    #[error("Input error: {0}")]
    Input(String),

    #[error("Surface error: {0}")]
    Surface(String),

    #[error("Launch error: {0}")]
    Launch(String),

    #[error(
        "Trace mismatch at line {index}: expected {expected:?}, got {actual:?} \
         ({expected_len} lines expected, {actual_len} received)"
    )]
    TraceMismatch {
        index: usize,
        expected: String,
        actual: String,
        expected_len: usize,
        actual_len: usize,
    },

    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialize error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl serde::Serialize for ProbeError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(self.to_string().as_str())
    }
}

pub type ProbeResult<T> = Result<T, ProbeError>;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown label type {0}")]
    UnknownLabel(String),

    #[error("Malformed record{}: {reason}", line_suffix(.line))]
    MalformedRecord { line: Option<usize>, reason: String },

    #[error("Invalid bounding box ({xmin}, {ymin}, {xmax}, {ymax})")]
    GeometryViolation {
        xmin: i32,
        ymin: i32,
        xmax: i32,
        ymax: i32,
    },

    #[error("Video stream exhausted: track {track_id} needs frame {frame}")]
    StreamExhausted { track_id: u32, frame: u32 },

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    #[error("Config Error: {0}")]
    Config(String),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Shape Error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "opencv")]
    #[error("OpenCV Error: {0}")]
    OpenCv(#[from] opencv::Error),
}

fn line_suffix(line: &Option<usize>) -> String {
    line.map(|n| format!(" at line {}", n)).unwrap_or_default()
}

impl Error {
    pub fn malformed<S: Into<String>>(reason: S) -> Self {
        Self::MalformedRecord {
            line: None,
            reason: reason.into(),
        }
    }

    /// Attaches a 1-based line number to a parse failure.
    pub fn at_line(self, line: usize) -> Self {
        match self {
            Self::MalformedRecord { reason, .. } => Self::MalformedRecord {
                line: Some(line),
                reason,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_message() {
        let err = Error::malformed("missing field `label`");
        assert_eq!(err.to_string(), "Malformed record: missing field `label`");

        let err = err.at_line(12);
        assert_eq!(
            err.to_string(),
            "Malformed record at line 12: missing field `label`"
        );
    }

    #[test]
    fn test_at_line_keeps_other_errors() {
        let err = Error::UnknownLabel("Dog".to_string()).at_line(3);

        assert_eq!(err.to_string(), "Unknown label type Dog");
    }
}

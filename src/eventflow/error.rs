/*!
# Stream Error Handling

Error types for the event streaming core.

## Error Categories

- **Source Errors**: failures reported by a producer through
  [`EventStream::error`](crate::EventStream::error); carried as the stream's
  stored terminal signal and replayed to late subscribers
- **Window Errors**: rejected window configurations (zero-sized windows,
  zero steps, non-positive session gaps)

## Error Propagation

A stream-level error is a one-time terminal signal, not a language-level
exception: it is delivered to every registered observer's `on_error` callback
and stored on the stream, which is permanently inert afterward. Because the
same stored value is fanned out to every observer and replayed to any late
subscriber, `StreamError` is `Clone`.

The [`StreamResult`] alias covers fallible construction paths such as the
window factories.
*/

/// Result type for fallible streaming operations.
pub type StreamResult<T> = Result<T, StreamError>;

/// Error types for stream construction and terminal signaling.
///
/// Each variant carries the context relevant to its failure mode. Variants
/// are `Clone` so a single stored terminal error can be fanned out to every
/// observer, and `PartialEq` so tests can assert on exact payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    /// Failure reported by the producer feeding a stream.
    ///
    /// This is the payload of the stream's terminal `error` signal. It is
    /// delivered once to every registered observer and then replayed to any
    /// observer that subscribes after the stream turned terminal.
    #[error("stream source failed: {message}")]
    Source {
        /// Human-readable description of the producer failure
        message: String,
    },

    /// Rejected window configuration.
    ///
    /// Returned by the window factories before any subscription happens,
    /// e.g. for a zero-sized tumbling window or a non-positive session gap.
    #[error("invalid window configuration: {message}")]
    InvalidWindow {
        /// Description of the rejected parameter
        message: String,
    },
}

impl StreamError {
    /// Create a producer failure signal.
    pub fn source(message: impl Into<String>) -> Self {
        Self::Source {
            message: message.into(),
        }
    }

    /// Create a window configuration error.
    pub fn invalid_window(message: impl Into<String>) -> Self {
        Self::InvalidWindow {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_display() {
        let err = StreamError::source("exchange feed dropped");
        assert_eq!(err.to_string(), "stream source failed: exchange feed dropped");
    }

    #[test]
    fn test_invalid_window_display() {
        let err = StreamError::invalid_window("window_size must be at least 1");
        assert_eq!(
            err.to_string(),
            "invalid window configuration: window_size must be at least 1"
        );
    }

    #[test]
    fn test_errors_compare_by_payload() {
        assert_eq!(StreamError::source("a"), StreamError::source("a"));
        assert_ne!(StreamError::source("a"), StreamError::source("b"));
        assert_ne!(StreamError::source("a"), StreamError::invalid_window("a"));
    }
}

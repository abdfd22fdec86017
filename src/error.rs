use thiserror::Error;

/// Fatal errors raised while building or running a chain.
///
/// Plans failing contiguity or population checks are not errors; they are
/// classified into `Filtered::rejected` instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SamplerError {
    /// The graph, plan, or sampler settings can never produce a valid chain.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// No valid source/candidate pair was found within the retry bound.
    #[error("no valid proposal after {attempts} attempts (last examined source node: {})",
        last_source.map_or_else(|| "none".to_string(), |id| id.to_string()))]
    RetryExhausted { attempts: usize, last_source: Option<u32> },
}

impl SamplerError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

pub type Result<T, E = SamplerError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_exhausted_reports_last_source() {
        let err = SamplerError::RetryExhausted { attempts: 10, last_source: Some(17) };
        assert_eq!(err.to_string(), "no valid proposal after 10 attempts (last examined source node: 17)");

        let err = SamplerError::RetryExhausted { attempts: 3, last_source: None };
        assert!(err.to_string().ends_with("(last examined source node: none)"));
    }

    #[test]
    fn configuration_error_carries_message() {
        let err = SamplerError::config("no node satisfies district-size window [5, 7]");
        assert_eq!(err.to_string(), "configuration error: no node satisfies district-size window [5, 7]");
    }
}

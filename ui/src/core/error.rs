//! Errors surfaced to the host's error channel.

use thiserror::Error;

/// Error group shown by the host next to setup problems.
pub const SETUP_GROUP: &str = "setup";

/// Schema problems detected before any data is processed. Rendering is aborted for the refresh.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("Missing required pivot field(s): {}. Please ensure both are selected and placed in the Pivot section.", .fields.join(", "))]
    MissingPivots { fields: Vec<String> },
    #[error("Missing required dimension(s): {}. Please ensure both are selected.", .fields.join(", "))]
    MissingDimensions { fields: Vec<String> },
    #[error("Missing measure field. Please select one measure to plot.")]
    MissingMeasure,
}

impl SetupError {
    pub fn group(&self) -> &'static str {
        SETUP_GROUP
    }

    /// Field names the user still has to add to the query.
    pub fn missing_fields(&self) -> &[String] {
        match self {
            Self::MissingPivots { fields } | Self::MissingDimensions { fields } => fields,
            Self::MissingMeasure => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pivot_message_enumerates_fields() {
        let err = SetupError::MissingPivots {
            fields: vec!["wbr_template.cycle".into(), "wbr_template.type".into()],
        };
        assert_eq!(
            err.to_string(),
            "Missing required pivot field(s): wbr_template.cycle, wbr_template.type. \
             Please ensure both are selected and placed in the Pivot section."
        );
        assert_eq!(err.group(), "setup");
        assert_eq!(err.missing_fields().len(), 2);
    }
}

use thiserror::Error;

/// Errors raised while resolving pin labels. Every variant aborts the run.
#[derive(Debug, Error)]
pub enum PinLabelError {
    #[error("Component {component} not found in {source_name}")]
    ComponentNotFound {
        component: String,
        source_name: String,
    },

    #[error("Pin {pin} in spreadsheet not found in component")]
    PinNotFound { pin: String },

    #[error("Bad leg position '{side}' for pin {pin}")]
    InvalidLegPosition { pin: String, side: String },

    #[error("Label coordinate for pin {pin} is out of range")]
    CoordinateOverflow { pin: String },

    #[error("{source_name}:{line}: {reason}")]
    MalformedLine {
        source_name: String,
        line: usize,
        reason: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PinLabelError {
    pub(crate) fn component_not_found(component: &str, source_name: &str) -> Self {
        PinLabelError::ComponentNotFound {
            component: component.to_string(),
            source_name: source_name.to_string(),
        }
    }

    pub(crate) fn malformed(source_name: &str, line: usize, reason: impl Into<String>) -> Self {
        PinLabelError::MalformedLine {
            source_name: source_name.to_string(),
            line,
            reason: reason.into(),
        }
    }
}

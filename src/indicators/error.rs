use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IndicatorError {
    #[error("insufficient data for {indicator}: need {required} values, got {available}")]
    InsufficientData {
        indicator: &'static str,
        required: usize,
        available: usize,
    },
    #[error("{indicator} window must be at least 1")]
    ZeroWindow { indicator: &'static str },
}

impl IndicatorError {
    pub(crate) fn check_len(
        indicator: &'static str,
        required: usize,
        available: usize,
    ) -> Result<(), Self> {
        if available < required {
            return Err(IndicatorError::InsufficientData {
                indicator,
                required,
                available,
            });
        }
        Ok(())
    }
}

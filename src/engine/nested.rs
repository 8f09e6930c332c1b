use crate::config::EngineConfig;
use crate::filter::ValidatedFilters;
use crate::frame::Frame;
use crate::validator::{FilterValidationError, FilterValidator};
use super::apply;
use super::error::ProcessError;

/// Something that can filter a frame or a Parquet payload
pub trait FilterProcessor {
    fn apply_filters_from_bytes(&self, parquet_bytes: &[u8]) -> Result<Frame, ProcessError>;

    fn apply_filters_from_frame(&self, frame: Frame) -> Result<Frame, ProcessError>;

    /// Same processor with the columns aggregation dropped
    fn without_aggregation(&self) -> Self
    where
        Self: Sized;
}

/// Filters nested data against a validated request.
///
/// Construction validates every expression up front, so an invalid request
/// never touches data.
#[derive(Debug, Clone)]
pub struct NestedFilterProcessor {
    validator: FilterValidator,
    filters: ValidatedFilters,
    config: EngineConfig,
}

impl NestedFilterProcessor {
    pub fn new(validator: FilterValidator, config: EngineConfig) -> Result<Self, FilterValidationError> {
        let filters = validator.validate()?;
        Ok(Self { validator, filters, config })
    }

    pub fn validator(&self) -> &FilterValidator {
        &self.validator
    }

    pub fn filters(&self) -> &ValidatedFilters {
        &self.filters
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl FilterProcessor for NestedFilterProcessor {
    fn apply_filters_from_bytes(&self, parquet_bytes: &[u8]) -> Result<Frame, ProcessError> {
        apply::apply_filters_from_bytes(parquet_bytes, &self.filters, &self.config)
    }

    fn apply_filters_from_frame(&self, frame: Frame) -> Result<Frame, ProcessError> {
        apply::apply_filters_from_frame(frame, &self.filters, &self.config)
    }

    fn without_aggregation(&self) -> Self {
        Self {
            validator: self.validator.without_aggregation(),
            filters: self.filters.without_aggregation(),
            config: self.config.clone(),
        }
    }
}

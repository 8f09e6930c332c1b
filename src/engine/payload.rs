use tracing::{debug, error};
use crate::filter::ValidatedFilters;
use crate::frame::Frame;
use super::apply::apply_filters_from_frame;
use super::error::ProcessError;
use super::nested::{FilterProcessor, NestedFilterProcessor};

/// Outcome of filtering one dataset out of a batch
#[derive(Debug, Clone, PartialEq)]
pub struct FramePayload {
    pub dataset_id: String,
    pub frame: Frame,
    /// Set when decoding or filtering failed; `frame` is then empty
    pub error: Option<String>,
}

impl FramePayload {
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Decode and filter each `(dataset_id, parquet_bytes)` payload on its own.
///
/// The columns aggregation is never applied here; see [`aggregate_payloads`].
/// A failure is recorded on the payload instead of aborting the batch, and
/// payloads that filter down to nothing are dropped.
pub fn filter_payloads<I, S, B>(processor: &NestedFilterProcessor, payloads: I) -> Vec<FramePayload>
where
    I: IntoIterator<Item = (S, B)>,
    S: Into<String>,
    B: AsRef<[u8]>,
{
    let processor = processor.without_aggregation();
    payloads
        .into_iter()
        .filter_map(|(dataset_id, bytes)| {
            let dataset_id = dataset_id.into();
            match processor.apply_filters_from_bytes(bytes.as_ref()) {
                Ok(frame) if frame.is_empty() => {
                    debug!(dataset_id = %dataset_id, "no rows left, payload skipped");
                    None
                }
                Ok(frame) => Some(FramePayload { dataset_id, frame, error: None }),
                Err(err) => {
                    error!(dataset_id = %dataset_id, "{}", err);
                    Some(FramePayload {
                        dataset_id,
                        frame: Frame::default(),
                        error: Some(err.to_string()),
                    })
                }
            }
        })
        .collect()
}

/// Stack the successful payloads (relabelled `0..n`) and apply the columns
/// aggregation to the combined frame, if the request has one.
pub fn aggregate_payloads(
    processor: &NestedFilterProcessor,
    payloads: &[FramePayload],
) -> Result<Frame, ProcessError> {
    let frames: Vec<Frame> = payloads
        .iter()
        .filter(|payload| !payload.is_failed())
        .map(|payload| payload.frame.clone())
        .collect();
    let combined = Frame::concat(&frames).reset_index();

    match &processor.filters().columns_aggregation {
        Some(columns_aggregation) => {
            let filters = ValidatedFilters {
                columns_aggregation: Some(columns_aggregation.clone()),
                ..Default::default()
            };
            apply_filters_from_frame(combined, &filters, processor.config())
        }
        None => Ok(combined),
    }
}

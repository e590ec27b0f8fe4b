use crate::tracking::{TrackingDataset, TrackingFrame};

/// `floor(timestamp * frame_rate)`, or `None` when the product is not a valid index.
pub fn target_frame_index(timestamp_s: f64, frame_rate: f64) -> Option<usize> {
    let raw = (timestamp_s * frame_rate).floor();
    if !raw.is_finite() || raw < 0.0 || raw >= usize::MAX as f64 {
        return None;
    }
    Some(raw as usize)
}

pub fn frame_at(dataset: &TrackingDataset, timestamp_s: f64) -> Option<&TrackingFrame> {
    let index = target_frame_index(timestamp_s, dataset.frame_rate)?;
    dataset.frames.get(index)
}

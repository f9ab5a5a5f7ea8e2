//! Automatic change/no-change thresholding

mod otsu;

pub use otsu::{auto_threshold, otsu_threshold, threshold_mask, Histogram, ThresholdMethod, MAX_BUCKETS};

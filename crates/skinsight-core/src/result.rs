//! Wire types exchanged with the classification service.

use serde::{Deserialize, Serialize};

use crate::labels::{SkinCondition, label_for_index};

/// Body of the service's health check (`GET /`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub message: String,
}

/// Error envelope the service returns alongside a 5xx status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// A single classification, as returned by `POST /classify-image` and as
/// each element of `GET /previous-classifications`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub class_idx: i64,
    /// Server-relative path of the stored image, e.g. `/uploads/lesion.jpg`.
    pub image_url: String,
    /// Per-class confidence, positionally aligned with [`SkinCondition::ALL`].
    pub probabilities: Vec<f64>,
}

impl ClassificationResult {
    pub fn predicted(&self) -> Option<SkinCondition> {
        SkinCondition::from_index(self.class_idx)
    }

    pub fn predicted_label(&self) -> &'static str {
        label_for_index(self.class_idx)
    }

    /// `(label, probability)` for every entry in `probabilities`.
    pub fn scores(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.probabilities
            .iter()
            .enumerate()
            .map(|(i, &p)| (label_for_index(i as i64), p))
    }

    pub fn probability_sum(&self) -> f64 {
        self.probabilities.iter().sum()
    }

    /// Whether the probabilities sum to 1.0 within `tolerance`.
    pub fn is_normalised(&self, tolerance: f64) -> bool {
        (self.probability_sum() - 1.0).abs() <= tolerance
    }
}

/// Render a probability as a percentage with two decimals: `0.1234` → `12.34%`.
pub fn format_percent(p: f64) -> String {
    format!("{:.2}%", p * 100.0)
}

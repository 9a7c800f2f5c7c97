//! The fixed three-label skin-condition scheme.
//!
//! The inference service reports its prediction as a bare `class_idx` and a
//! positional `probabilities` array. Both index into this scheme:
//!
//! | index | label             |
//! |-------|-------------------|
//! | 0     | atopic dermatitis |
//! | 1     | eczema            |
//! | 2     | melanoma          |

use std::fmt;

/// Placeholder shown for indices the scheme does not know about.
pub const UNKNOWN_LABEL: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkinCondition {
    AtopicDermatitis,
    Eczema,
    Melanoma,
}

impl SkinCondition {
    /// All conditions in index order.
    pub const ALL: [SkinCondition; 3] = [Self::AtopicDermatitis, Self::Eczema, Self::Melanoma];

    /// Map a class index from the service onto the scheme.
    pub fn from_index(idx: i64) -> Option<Self> {
        usize::try_from(idx)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::AtopicDermatitis => "atopic dermatitis",
            Self::Eczema => "eczema",
            Self::Melanoma => "melanoma",
        }
    }
}

impl fmt::Display for SkinCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Label text for a class index, falling back to [`UNKNOWN_LABEL`].
pub fn label_for_index(idx: i64) -> &'static str {
    SkinCondition::from_index(idx)
        .map(|c| c.label())
        .unwrap_or(UNKNOWN_LABEL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_follow_scheme_order() {
        assert_eq!(SkinCondition::from_index(0), Some(SkinCondition::AtopicDermatitis));
        assert_eq!(SkinCondition::from_index(1), Some(SkinCondition::Eczema));
        assert_eq!(SkinCondition::from_index(2), Some(SkinCondition::Melanoma));
    }

    #[test]
    fn from_index_follows_all() {
        for (i, c) in SkinCondition::ALL.iter().enumerate() {
            assert_eq!(SkinCondition::from_index(i as i64), Some(*c));
        }
    }

    #[test]
    fn out_of_range_indices() {
        assert_eq!(SkinCondition::from_index(3), None);
        assert_eq!(SkinCondition::from_index(-1), None);
        assert_eq!(SkinCondition::from_index(i64::MAX), None);
    }

    #[test]
    fn labels() {
        assert_eq!(label_for_index(0), "atopic dermatitis");
        assert_eq!(label_for_index(1), "eczema");
        assert_eq!(label_for_index(2), "melanoma");
        assert_eq!(label_for_index(7), UNKNOWN_LABEL);
    }

    #[test]
    fn display_uses_label() {
        assert_eq!(SkinCondition::Melanoma.to_string(), "melanoma");
    }
}

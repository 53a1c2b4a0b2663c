//! Label catalog: activity display names and anomaly advisories.

use std::fmt;

/// Display name for activity indices outside the catalog
pub const UNKNOWN_ACTIVITY: &str = "Unknown";

/// Advisory returned for anomaly labels outside the catalog
pub const NO_SUGGESTION: &str = "No suggestion available.";

/// Physical activity recognised by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Activity {
    /// Seated, low motion
    Sitting,
    /// Upright, low motion
    Standing,
    /// Moderate periodic motion
    Walking,
    /// High periodic motion
    Running,
    /// Lying down, low motion
    Sleeping,
}

impl Activity {
    /// All activities in class-index order
    pub const ALL: [Activity; 5] = [
        Activity::Sitting,
        Activity::Standing,
        Activity::Walking,
        Activity::Running,
        Activity::Sleeping,
    ];

    /// Map a classifier output index to an activity
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            Activity::Sitting => "Sitting",
            Activity::Standing => "Standing",
            Activity::Walking => "Walking",
            Activity::Running => "Running",
            Activity::Sleeping => "Sleeping",
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Display name for an activity index, or [`UNKNOWN_ACTIVITY`]
pub fn activity_label(index: usize) -> &'static str {
    Activity::from_index(index).map_or(UNKNOWN_ACTIVITY, |a| a.label())
}

/// Physiological finding reported by the anomaly head
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnomalyKind {
    /// Elevated heart rate
    Tachycardia,
    /// Depressed heart rate
    Bradycardia,
    /// Severely low blood oxygen
    CriticalHypoxia,
    /// Moderately low blood oxygen
    CompensatedHypoxia,
    /// Readings implausible for a worn sensor
    PossibleSensorError,
    /// Rare pattern the model has little support for
    UnusualRare,
    /// Vitals within range
    Normal,
    /// Label emitted by the model that the catalog does not know
    Unrecognized(String),
}

impl AnomalyKind {
    /// Parse a decoder label. Matching is exact.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Tachycardia" => AnomalyKind::Tachycardia,
            "Bradycardia" => AnomalyKind::Bradycardia,
            "Critical Hypoxia" => AnomalyKind::CriticalHypoxia,
            "Compensated Hypoxia" => AnomalyKind::CompensatedHypoxia,
            "Possible Sensor Error" => AnomalyKind::PossibleSensorError,
            "Unusual (rare)" => AnomalyKind::UnusualRare,
            "Normal" => AnomalyKind::Normal,
            other => AnomalyKind::Unrecognized(other.to_string()),
        }
    }

    /// Canonical label, as produced by the decoder
    pub fn label(&self) -> &str {
        match self {
            AnomalyKind::Tachycardia => "Tachycardia",
            AnomalyKind::Bradycardia => "Bradycardia",
            AnomalyKind::CriticalHypoxia => "Critical Hypoxia",
            AnomalyKind::CompensatedHypoxia => "Compensated Hypoxia",
            AnomalyKind::PossibleSensorError => "Possible Sensor Error",
            AnomalyKind::UnusualRare => "Unusual (rare)",
            AnomalyKind::Normal => "Normal",
            AnomalyKind::Unrecognized(label) => label,
        }
    }

    /// Advisory text shown to the wearer
    pub fn suggestion(&self) -> &'static str {
        match self {
            AnomalyKind::Tachycardia => "High heart rate detected. Please relax or rest.",
            AnomalyKind::Bradycardia => "Low heart rate detected. If dizzy, seek help.",
            AnomalyKind::CriticalHypoxia => "Severely low oxygen. Seek emergency care now.",
            AnomalyKind::CompensatedHypoxia => "Low oxygen levels. Try resting and deep breaths.",
            AnomalyKind::PossibleSensorError => "Please adjust the sensor and try again.",
            AnomalyKind::UnusualRare => "Unusual pattern detected. Recheck or consult doctor.",
            AnomalyKind::Normal => "Vitals are within a healthy range. Keep monitoring.",
            AnomalyKind::Unrecognized(_) => NO_SUGGESTION,
        }
    }

    /// Every finding except `Normal` is reported to the alerting gateway
    pub fn requires_alert(&self) -> bool {
        !matches!(self, AnomalyKind::Normal)
    }

    /// Whether the label belongs to the catalog
    pub fn is_recognized(&self) -> bool {
        !matches!(self, AnomalyKind::Unrecognized(_))
    }
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_indices() {
        assert_eq!(activity_label(0), "Sitting");
        assert_eq!(activity_label(2), "Walking");
        assert_eq!(activity_label(4), "Sleeping");
        assert_eq!(activity_label(5), UNKNOWN_ACTIVITY);
        assert_eq!(activity_label(usize::MAX), UNKNOWN_ACTIVITY);
    }

    #[test]
    fn test_anomaly_labels_round_trip() {
        for label in [
            "Tachycardia",
            "Bradycardia",
            "Critical Hypoxia",
            "Compensated Hypoxia",
            "Possible Sensor Error",
            "Unusual (rare)",
            "Normal",
        ] {
            let kind = AnomalyKind::from_label(label);
            assert!(kind.is_recognized(), "{label} should be recognized");
            assert_eq!(kind.label(), label);
            assert_ne!(kind.suggestion(), NO_SUGGESTION);
        }
    }

    #[test]
    fn test_suggestions() {
        let suggestion = |label: &str| AnomalyKind::from_label(label).suggestion();
        assert_eq!(
            suggestion("Normal"),
            "Vitals are within a healthy range. Keep monitoring."
        );
        assert_eq!(
            suggestion("Critical Hypoxia"),
            "Severely low oxygen. Seek emergency care now."
        );
        assert_eq!(suggestion("Arrhythmia"), NO_SUGGESTION);
        // Matching is case-sensitive
        assert_eq!(suggestion("normal"), NO_SUGGESTION);
    }

    #[test]
    fn test_only_normal_skips_alert() {
        assert!(!AnomalyKind::Normal.requires_alert());
        assert!(AnomalyKind::Tachycardia.requires_alert());
        assert!(AnomalyKind::from_label("Arrhythmia").requires_alert());
    }

    #[test]
    fn test_unrecognized_keeps_label() {
        let kind = AnomalyKind::from_label("Arrhythmia");
        assert_eq!(kind, AnomalyKind::Unrecognized("Arrhythmia".into()));
        assert_eq!(kind.to_string(), "Arrhythmia");
    }
}

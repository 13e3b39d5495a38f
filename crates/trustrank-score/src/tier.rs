use serde::Serialize;

/// Reputation band for a 0-100 trust score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustLevel {
    VeryReliable,
    Reliable,
    Neutral,
    Unreliable,
    NotReliable,
}

impl TrustLevel {
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Self::VeryReliable
        } else if score >= 60.0 {
            Self::Reliable
        } else if score >= 40.0 {
            Self::Neutral
        } else if score >= 20.0 {
            Self::Unreliable
        } else {
            Self::NotReliable
        }
    }

    /// Label shown in the mobile client.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::VeryReliable => "Très fiable",
            Self::Reliable => "Fiable",
            Self::Neutral => "Neutre",
            Self::Unreliable => "Peu fiable",
            Self::NotReliable => "Non fiable",
        }
    }

    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::VeryReliable => "#10b981",
            Self::Reliable => "#3b82f6",
            Self::Neutral => "#f59e0b",
            Self::Unreliable => "#ef4444",
            Self::NotReliable => "#991b1b",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_boundaries() {
        assert_eq!(TrustLevel::from_score(100.0), TrustLevel::VeryReliable);
        assert_eq!(TrustLevel::from_score(80.0), TrustLevel::VeryReliable);
        assert_eq!(TrustLevel::from_score(79.99), TrustLevel::Reliable);
        assert_eq!(TrustLevel::from_score(60.0), TrustLevel::Reliable);
        assert_eq!(TrustLevel::from_score(40.0), TrustLevel::Neutral);
        assert_eq!(TrustLevel::from_score(20.0), TrustLevel::Unreliable);
        assert_eq!(TrustLevel::from_score(19.9), TrustLevel::NotReliable);
        assert_eq!(TrustLevel::from_score(0.0), TrustLevel::NotReliable);
    }

    #[test]
    fn nan_is_lowest_band() {
        assert_eq!(TrustLevel::from_score(f64::NAN), TrustLevel::NotReliable);
    }

    #[test]
    fn colors_are_hex() {
        for level in [
            TrustLevel::VeryReliable,
            TrustLevel::Reliable,
            TrustLevel::Neutral,
            TrustLevel::Unreliable,
            TrustLevel::NotReliable,
        ] {
            assert!(level.color().starts_with('#'));
            assert_eq!(level.color().len(), 7);
        }
    }
}

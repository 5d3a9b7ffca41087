use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Focus,
    Break,
}

impl Phase {
    /// The phase the countdown rolls into when this one completes.
    pub fn other(self) -> Self {
        match self {
            Phase::Focus => Phase::Break,
            Phase::Break => Phase::Focus,
        }
    }
}

/// Nominal phase lengths in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Durations {
    pub focus_min: u64,
    pub break_min: u64,
}

impl Durations {
    /// Nominal length of `phase` in minutes.
    pub fn duration_min(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Focus => self.focus_min,
            Phase::Break => self.break_min,
        }
    }

    /// Nominal length of `phase` in seconds.
    ///
    /// Uses saturating arithmetic to prevent overflow with large values.
    pub fn duration_secs(&self, phase: Phase) -> u64 {
        self.duration_min(phase).saturating_mul(60)
    }
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            focus_min: 25,
            break_min: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_durations() {
        let d = Durations::default();
        assert_eq!(d.duration_secs(Phase::Focus), 25 * 60);
        assert_eq!(d.duration_secs(Phase::Break), 5 * 60);
    }

    #[test]
    fn other_flips_phase() {
        assert_eq!(Phase::Focus.other(), Phase::Break);
        assert_eq!(Phase::Break.other(), Phase::Focus);
    }

    #[test]
    fn duration_secs_saturates() {
        let d = Durations {
            focus_min: u64::MAX,
            break_min: 5,
        };
        assert_eq!(d.duration_secs(Phase::Focus), u64::MAX);
    }
}

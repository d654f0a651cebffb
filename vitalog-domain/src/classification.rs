use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Clinical category for a systolic/diastolic pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    /// Normal blood pressure
    #[serde(rename = "normal")]
    Normal,

    /// Elevated blood pressure
    #[serde(rename = "elevated")]
    Elevated,

    /// Stage 1 hypertension
    #[serde(rename = "hypertension_stage_1")]
    HypertensionStage1,

    /// Stage 2 hypertension
    #[serde(rename = "hypertension_stage_2")]
    HypertensionStage2,

    /// Hypertensive crisis
    #[serde(rename = "hypertensive_crisis")]
    HypertensiveCrisis,

    /// The pair matched no band of the classification table
    #[serde(rename = "undefined")]
    Undefined,
}

impl Category {
    /// Stable machine-readable name of the category.
    pub fn name(&self) -> &'static str {
        match self {
            Category::Normal => "normal",
            Category::Elevated => "elevated",
            Category::HypertensionStage1 => "hypertension_stage_1",
            Category::HypertensionStage2 => "hypertension_stage_2",
            Category::HypertensiveCrisis => "hypertensive_crisis",
            Category::Undefined => "undefined",
        }
    }

    /// Human-readable label for tables and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Normal => "Normal",
            Category::Elevated => "Elevated",
            Category::HypertensionStage1 => "Hypertension Stage 1",
            Category::HypertensionStage2 => "Hypertension Stage 2",
            Category::HypertensiveCrisis => "Hypertensive Crisis",
            Category::Undefined => "Undefined",
        }
    }

    /// Presentation color (hex) used for charts and highlighted rows.
    pub fn color(&self) -> &'static str {
        match self {
            Category::Normal => "#4CAF50",
            Category::Elevated => "#FFC107",
            Category::HypertensionStage1 => "#FF9800",
            Category::HypertensionStage2 => "#F44336",
            Category::HypertensiveCrisis => "#B71C1C",
            Category::Undefined => "#666666",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the classification table. A pair matches when both the
/// systolic and the diastolic value fall inside the band.
struct Band {
    category: Category,
    systolic: RangeInclusive<u16>,
    diastolic: RangeInclusive<u16>,
}

/// Classification table, probed top to bottom; the first matching band wins.
/// Shared edges (180/120 is the top of stage 2 and the floor of crisis)
/// therefore resolve to the earlier band.
const BANDS: [Band; 5] = [
    Band {
        category: Category::Normal,
        systolic: 0..=120,
        diastolic: 0..=80,
    },
    Band {
        category: Category::Elevated,
        systolic: 120..=129,
        diastolic: 0..=80,
    },
    Band {
        category: Category::HypertensionStage1,
        systolic: 130..=139,
        diastolic: 80..=89,
    },
    Band {
        category: Category::HypertensionStage2,
        systolic: 140..=180,
        diastolic: 90..=120,
    },
    Band {
        category: Category::HypertensiveCrisis,
        systolic: 180..=999,
        diastolic: 120..=999,
    },
];

/// Classify a systolic/diastolic pair against the classification table.
///
/// Pairs that fall between bands (a systolic value in one band with a
/// diastolic value in another, such as 125/85) classify as `Undefined`.
pub fn classify(systolic: u16, diastolic: u16) -> Category {
    BANDS
        .iter()
        .find(|band| band.systolic.contains(&systolic) && band.diastolic.contains(&diastolic))
        .map_or(Category::Undefined, |band| band.category)
}

//! Generation stage value object

use std::fmt;

use serde::Serialize;

/// Where a generation run is
///
/// Runs move strictly forward:
/// `Loading → Linting → Generating → Writing → ApplyingSideEffects →
/// PostGeneration → Done`. `Failed` is reachable from the first five.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStage {
    Loading,
    Linting,
    Generating,
    Writing,
    ApplyingSideEffects,
    PostGeneration,
    Done,
    Failed,
}

impl GenerationStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationStage::Loading => "loading",
            GenerationStage::Linting => "linting",
            GenerationStage::Generating => "generating",
            GenerationStage::Writing => "writing",
            GenerationStage::ApplyingSideEffects => "applying_side_effects",
            GenerationStage::PostGeneration => "post_generation",
            GenerationStage::Done => "done",
            GenerationStage::Failed => "failed",
        }
    }

    /// Whether a run in this stage may still fail
    pub fn can_fail(&self) -> bool {
        matches!(
            self,
            GenerationStage::Loading
                | GenerationStage::Linting
                | GenerationStage::Generating
                | GenerationStage::Writing
                | GenerationStage::ApplyingSideEffects
        )
    }

    /// Human label for progress output
    pub fn label(&self) -> &'static str {
        match self {
            GenerationStage::Loading => "Loading graph",
            GenerationStage::Linting => "Linting",
            GenerationStage::Generating => "Generating workspace",
            GenerationStage::Writing => "Writing workspace",
            GenerationStage::ApplyingSideEffects => "Applying side effects",
            GenerationStage::PostGeneration => "Running post-generation actions",
            GenerationStage::Done => "Done",
            GenerationStage::Failed => "Failed",
        }
    }
}

impl fmt::Display for GenerationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_early_stages_can_fail() {
        assert!(GenerationStage::Loading.can_fail());
        assert!(GenerationStage::ApplyingSideEffects.can_fail());
        assert!(!GenerationStage::PostGeneration.can_fail());
        assert!(!GenerationStage::Done.can_fail());
    }

    #[test]
    fn stages_are_ordered() {
        assert!(GenerationStage::Loading < GenerationStage::Linting);
        assert!(GenerationStage::Writing < GenerationStage::ApplyingSideEffects);
    }
}

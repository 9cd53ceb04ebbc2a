/// Stage of a run as reported to progress callbacks.
#[derive(Debug, Clone, PartialEq)]
pub enum RunStage {
    LoadingScenario,
    CheckingCache,
    LoadingCachedResult,
    Compiling,
    Running { step: usize, total: usize },
    SavingResults,
    Completed,
}

impl RunStage {
    pub fn label(&self) -> &'static str {
        match self {
            Self::LoadingScenario => "loading scenario",
            Self::CheckingCache => "checking cache",
            Self::LoadingCachedResult => "loading cached run",
            Self::Compiling => "configuring model",
            Self::Running { .. } => "running",
            Self::SavingResults => "saving results",
            Self::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
}

impl RunProgressEvent {
    pub fn stage(stage: RunStage, elapsed_wall_s: f64, message: Option<String>) -> Self {
        Self {
            stage,
            elapsed_wall_s,
            message,
        }
    }

    /// Fraction of simulation steps done, when running.
    pub fn fraction_complete(&self) -> Option<f64> {
        match self.stage {
            RunStage::Running { step, total } if total > 0 => {
                Some((step + 1) as f64 / total as f64)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_counts_the_initial_step() {
        let event = RunProgressEvent::stage(RunStage::Running { step: 0, total: 4 }, 0.0, None);
        assert_eq!(event.fraction_complete(), Some(0.25));
        let event = RunProgressEvent::stage(RunStage::Running { step: 3, total: 4 }, 0.0, None);
        assert_eq!(event.fraction_complete(), Some(1.0));
        let event = RunProgressEvent::stage(RunStage::Compiling, 0.0, None);
        assert_eq!(event.fraction_complete(), None);
    }
}

mod executor;
mod pipeline;
mod types;

pub use pipeline::{plan, run};
pub use types::{
    ReleaseOptions, ReleasePlan, ReleasePlanStatus, ReleasePlanStep, ReleaseRun,
    ReleaseRunStatus, ReleaseStepResult, ReleaseStepStatus,
};

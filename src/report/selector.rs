use crate::db::models::runs::RunModel;
use crate::error::TrackerError;

/// The runs a report compares: the current run, the prior runs exposed for
/// per-cell deltas, and the run the Δ Avg column compares against.
#[derive(Debug)]
pub struct RunSelection {
    pub current: RunModel,
    /// Up to `lookback_runs` runs preceding the current one, most recent
    /// first. May be shorter when the store holds fewer runs.
    pub prev_runs: Vec<RunModel>,
    /// Run at `avg_prev_offset` behind the current one. Falls back to the
    /// nearest prior run when the store is shallower than the offset, and
    /// to `None` when there is no prior run at all.
    pub prev_run_for_avg: Option<RunModel>,
}

impl RunSelection {
    /// Ids of every run the report will read observations for.
    pub fn run_ids(&self) -> Vec<i64> {
        let mut ids = vec![self.current.id];
        ids.extend(self.prev_runs.iter().map(|r| r.id));
        if let Some(run) = &self.prev_run_for_avg {
            if !ids.contains(&run.id) {
                ids.push(run.id);
            }
        }
        ids
    }
}

/// Pure selection over an already-fetched run list ordered most recent
/// first. `avg_prev_offset` counts back from the current run and must be
/// >= 1 (validated at config load).
pub fn select_runs(
    runs: &[RunModel],
    lookback_runs: usize,
    avg_prev_offset: usize,
) -> Result<RunSelection, TrackerError> {
    let current = runs.first().cloned().ok_or(TrackerError::NoRuns)?;

    let prev_runs: Vec<RunModel> = runs
        .iter()
        .skip(1)
        .take(lookback_runs)
        .cloned()
        .collect();

    let prev_run_for_avg = runs
        .get(avg_prev_offset)
        .or_else(|| prev_runs.first().map(|_| &runs[1]))
        .cloned();

    Ok(RunSelection {
        current,
        prev_runs,
        prev_run_for_avg,
    })
}

/// How many runs `select_runs` needs to see to honor both lookbacks.
pub fn runs_to_fetch(lookback_runs: usize, avg_prev_offset: usize) -> i64 {
    (lookback_runs.max(avg_prev_offset) + 1) as i64
}

use api::{BiomarkerResult, Status};
use serde::{Deserialize, Serialize};

/// Status counts for one result set.
///
/// `Low` and `High` both count as abnormal; statuses the backend invents later
/// only count toward `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub normal: usize,
    pub near: usize,
    pub abnormal: usize,
    pub total: usize,
}

pub fn summarize(results: &[BiomarkerResult]) -> Summary {
    results.iter().fold(
        Summary {
            total: results.len(),
            ..Summary::default()
        },
        |mut summary, result| {
            match result.status {
                Status::Normal => summary.normal += 1,
                Status::Near => summary.near += 1,
                status if status.is_abnormal() => summary.abnormal += 1,
                _ => {}
            }
            summary
        },
    )
}

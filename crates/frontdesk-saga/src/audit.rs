use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StepStatus {
    Running,
    Executed,
    Failed,
    Compensated,
    CompensationFailed,
}

impl StepStatus {
    fn marker(self) -> &'static str {
        match self {
            Self::Running => "…",
            Self::Executed => "✓",
            Self::Failed => "✗",
            Self::Compensated => "↩",
            Self::CompensationFailed => "⚠",
        }
    }
}

#[derive(Debug)]
pub struct StepRecord {
    /// Position of the step in the saga.
    pub index: usize,
    pub name: String,
    pub status: StepStatus,
    pub started_at: Instant,
    /// Last time the status changed.
    pub completed_at: Option<Instant>,
    /// Set once the step has executed and could therefore be compensated.
    pub compensation_description: Option<String>,
}

/// What happened to each step of one saga run, in execution order.
#[derive(Debug, Default)]
pub struct SagaAuditLog {
    records: Vec<StepRecord>,
}

impl SagaAuditLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_start(&mut self, index: usize, name: &str) {
        self.records.push(StepRecord {
            index,
            name: name.to_string(),
            status: StepStatus::Running,
            started_at: Instant::now(),
            completed_at: None,
            compensation_description: None,
        });
    }

    pub(crate) fn record_success(&mut self, compensation_description: String) {
        if let Some(record) = self.records.last_mut() {
            record.status = StepStatus::Executed;
            record.completed_at = Some(Instant::now());
            record.compensation_description = Some(compensation_description);
        }
    }

    pub(crate) fn record_failure(&mut self) {
        if let Some(record) = self.records.last_mut() {
            record.status = StepStatus::Failed;
            record.completed_at = Some(Instant::now());
        }
    }

    pub(crate) fn record_compensated(&mut self, index: usize) {
        self.set_status(index, StepStatus::Compensated);
    }

    pub(crate) fn record_compensation_failed(&mut self, index: usize) {
        self.set_status(index, StepStatus::CompensationFailed);
    }

    fn set_status(&mut self, index: usize, status: StepStatus) {
        if let Some(record) = self.records.iter_mut().find(|r| r.index == index) {
            record.status = status;
            record.completed_at = Some(Instant::now());
        }
    }

    #[must_use]
    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    #[must_use]
    pub fn status_of(&self, name: &str) -> Option<StepStatus> {
        self.records
            .iter()
            .find(|record| record.name == name)
            .map(|record| record.status)
    }

    /// Names of the steps that were rolled back, in rollback order.
    #[must_use]
    pub fn compensated_steps(&self) -> Vec<&str> {
        self.records
            .iter()
            .rev()
            .filter(|record| record.status == StepStatus::Compensated)
            .map(|record| record.name.as_str())
            .collect()
    }

    /// One line per step, prefixed with a status marker.
    #[must_use]
    pub fn summary(&self) -> String {
        self.records
            .iter()
            .map(|record| format!("{} {}", record.status.marker(), record.name))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn started_step_is_running_until_it_finishes() {
        let mut log = SagaAuditLog::new();
        log.record_start(0, "generate_identifiers");

        assert_eq!(log.records()[0].status, StepStatus::Running);
        assert!(log.records()[0].completed_at.is_none());

        log.record_success("no action needed".to_string());

        let record = &log.records()[0];
        assert_eq!(record.status, StepStatus::Executed);
        assert!(record.completed_at.is_some());
        assert_eq!(
            record.compensation_description.as_deref(),
            Some("no action needed")
        );
    }

    #[test]
    fn failure_marks_the_latest_step() {
        let mut log = SagaAuditLog::new();
        log.record_start(0, "resolve_identity");
        log.record_success("delete profile and identity".to_string());
        log.record_start(1, "insert_doctor");
        log.record_failure();

        assert_eq!(log.status_of("resolve_identity"), Some(StepStatus::Executed));
        assert_eq!(log.status_of("insert_doctor"), Some(StepStatus::Failed));
    }

    #[test]
    fn compensation_is_tracked_by_index_not_name() {
        let mut log = SagaAuditLog::new();
        log.record_start(0, "write_row");
        log.record_success("delete row".to_string());
        log.record_start(1, "write_row");
        log.record_success("delete row".to_string());

        log.record_compensated(1);

        assert_eq!(log.records()[0].status, StepStatus::Executed);
        assert_eq!(log.records()[1].status, StepStatus::Compensated);
    }

    #[test]
    fn compensated_steps_are_listed_in_rollback_order() {
        let mut log = SagaAuditLog::new();
        for (index, name) in ["reserve_bed", "open_admission", "link_bed"]
            .into_iter()
            .enumerate()
        {
            log.record_start(index, name);
            log.record_success(format!("undo {name}"));
        }
        log.record_start(3, "notify");
        log.record_failure();
        log.record_compensated(2);
        log.record_compensated(1);
        log.record_compensation_failed(0);

        assert_eq!(log.compensated_steps(), vec!["link_bed", "open_admission"]);
        assert_eq!(
            log.summary(),
            "⚠ reserve_bed\n↩ open_admission\n↩ link_bed\n✗ notify"
        );
    }
}

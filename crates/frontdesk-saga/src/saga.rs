use std::fmt::Debug;
use std::marker::PhantomData;

use tracing::{debug, warn};

use crate::audit::SagaAuditLog;
use crate::cloneable::CloneableAny;
use crate::erased::ErasedStep;
use crate::error::{CompensationError, SagaError};

/// A built saga, ready to run any number of times.
///
/// Steps run in order, each fed the previous step's output. If a step fails,
/// the completed steps are compensated last-completed-first.
pub struct Saga<Input, Output, Ctx, Err> {
    steps: Vec<Box<dyn ErasedStep<Ctx, Err>>>,
    _phantom: PhantomData<(Input, Output)>,
}

/// A completed step whose output is held until the run either succeeds or
/// rolls back.
struct Completed {
    index: usize,
    output: Box<dyn CloneableAny>,
}

impl<Input, Output, Ctx, Err> Saga<Input, Output, Ctx, Err>
where
    Input: Clone + Send + 'static,
    Output: Send + 'static,
    Err: Debug,
{
    pub(crate) fn from_steps(steps: Vec<Box<dyn ErasedStep<Ctx, Err>>>) -> Self {
        Self {
            steps,
            _phantom: PhantomData,
        }
    }

    #[must_use]
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|step| step.name()).collect()
    }

    /// Run the saga.
    ///
    /// # Errors
    ///
    /// Returns [`SagaError::StepFailed`] when a step fails and every
    /// compensation succeeds, or [`SagaError::CompensationFailed`] when some
    /// compensation fails too.
    pub fn execute(&self, ctx: &Ctx, input: Input) -> Result<Output, SagaError<Err>> {
        self.run(ctx, input).0
    }

    /// Like [`Saga::execute`], also returning the audit log of the run.
    pub fn execute_with_audit(
        &self,
        ctx: &Ctx,
        input: Input,
    ) -> (Result<Output, SagaError<Err>>, SagaAuditLog) {
        self.run(ctx, input)
    }

    fn run(&self, ctx: &Ctx, input: Input) -> (Result<Output, SagaError<Err>>, SagaAuditLog) {
        let mut audit_log = SagaAuditLog::new();
        let mut completed: Vec<Completed> = Vec::with_capacity(self.steps.len());
        let last_index = self.steps.len().saturating_sub(1);

        let mut carried: Box<dyn CloneableAny> = Box::new(input);

        for (index, step) in self.steps.iter().enumerate() {
            audit_log.record_start(index, step.name());
            debug!(step = step.name(), index, "executing saga step");

            match step.execute_erased(ctx, carried) {
                Ok(output) => {
                    audit_log.record_success(step.compensation_description());

                    if index == last_index {
                        let output = output
                            .into_any()
                            .downcast::<Output>()
                            .expect("type-state builder guarantees the final output type");
                        debug!(steps = self.steps.len(), "saga completed");
                        return (Ok(*output), audit_log);
                    }

                    completed.push(Completed {
                        index,
                        output: output.clone_box(),
                    });
                    carried = output;
                }
                Err(error) => {
                    audit_log.record_failure();
                    warn!(
                        step = step.name(),
                        error = ?error,
                        to_compensate = completed.len(),
                        "saga step failed, rolling back"
                    );
                    let saga_error =
                        self.roll_back(ctx, &mut audit_log, completed, step.name(), error);
                    return (Err(saga_error), audit_log);
                }
            }
        }

        unreachable!("type-state builder never produces a saga without steps")
    }

    fn roll_back(
        &self,
        ctx: &Ctx,
        audit_log: &mut SagaAuditLog,
        mut completed: Vec<Completed>,
        failed_step: &str,
        step_error: Err,
    ) -> SagaError<Err> {
        let mut compensation_errors = Vec::new();

        while let Some(Completed { index, output }) = completed.pop() {
            let step = &self.steps[index];
            let description = step.compensation_description();

            match step.compensate_erased(ctx, output) {
                Ok(()) => {
                    debug!(step = step.name(), %description, "compensated");
                    audit_log.record_compensated(index);
                }
                Err(error) => {
                    warn!(step = step.name(), %description, error = ?error, "compensation failed");
                    audit_log.record_compensation_failed(index);
                    compensation_errors.push(CompensationError {
                        step: step.name().to_string(),
                        description,
                        error,
                    });
                }
            }
        }

        if compensation_errors.is_empty() {
            SagaError::StepFailed {
                step: failed_step.to_string(),
                source: step_error,
            }
        } else {
            SagaError::CompensationFailed {
                failed_step: failed_step.to_string(),
                step_error,
                compensation_errors,
            }
        }
    }
}

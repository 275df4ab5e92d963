/// One locally committed unit of work in a saga.
///
/// `Context` carries the shared collaborators (repositories, providers,
/// configuration) and is never passed between steps. `Input` and `Output`
/// are the data flowing forward through the saga.
pub trait SagaStep: Send + Sync {
    type Input: Clone + Send + 'static;

    /// Also handed back to [`SagaStep::compensate`] on rollback, so it must
    /// record everything the step created.
    type Output: Clone + Send + 'static;

    type Context;

    type Error;

    /// Stable name used in logs, audit records and error messages.
    fn name(&self) -> &'static str;

    /// # Errors
    ///
    /// Returns an error if the step could not complete. A failing step must
    /// leave nothing behind: only completed steps are compensated.
    fn execute(&self, ctx: &Self::Context, input: Self::Input)
    -> Result<Self::Output, Self::Error>;

    /// Undo the effects recorded in `output`.
    ///
    /// Runs only when a later step fails. Read-only steps keep the default
    /// no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the undo could not be applied.
    fn compensate(&self, ctx: &Self::Context, output: Self::Output) -> Result<(), Self::Error> {
        let _ = (ctx, output);
        Ok(())
    }

    fn compensation_description(&self) -> String {
        format!("undo {}", self.name())
    }
}

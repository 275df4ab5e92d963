use crate::cloneable::CloneableAny;
use crate::step::SagaStep;

/// Object-safe view of a [`SagaStep`] with its payload types erased, so
/// steps with different input/output types share one `Vec`.
pub(crate) trait ErasedStep<Ctx, Err> {
    fn name(&self) -> &'static str;

    fn execute_erased(
        &self,
        ctx: &Ctx,
        input: Box<dyn CloneableAny>,
    ) -> Result<Box<dyn CloneableAny>, Err>;

    fn compensate_erased(&self, ctx: &Ctx, output: Box<dyn CloneableAny>) -> Result<(), Err>;

    fn compensation_description(&self) -> String;
}

pub(crate) struct StepWrapper<S> {
    step: S,
}

impl<S> StepWrapper<S> {
    pub(crate) fn new(step: S) -> Self {
        Self { step }
    }
}

impl<S> ErasedStep<S::Context, S::Error> for StepWrapper<S>
where
    S: SagaStep,
{
    fn name(&self) -> &'static str {
        self.step.name()
    }

    fn execute_erased(
        &self,
        ctx: &S::Context,
        input: Box<dyn CloneableAny>,
    ) -> Result<Box<dyn CloneableAny>, S::Error> {
        let input = input
            .into_any()
            .downcast::<S::Input>()
            .expect("type-state builder guarantees the step input type");
        let output = self.step.execute(ctx, *input)?;
        Ok(Box::new(output))
    }

    fn compensate_erased(
        &self,
        ctx: &S::Context,
        output: Box<dyn CloneableAny>,
    ) -> Result<(), S::Error> {
        let output = output
            .into_any()
            .downcast::<S::Output>()
            .expect("saga stores each step's own output for compensation");
        self.step.compensate(ctx, *output)
    }

    fn compensation_description(&self) -> String {
        self.step.compensation_description()
    }
}

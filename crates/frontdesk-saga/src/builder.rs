use std::fmt::Debug;
use std::marker::PhantomData;

use crate::erased::{ErasedStep, StepWrapper};
use crate::saga::Saga;
use crate::step::SagaStep;

/// Builder state before the first step is added.
pub struct Empty;

/// Builder state once at least one step exists; tracks the last output type.
pub struct HasSteps<LastOutput>(PhantomData<LastOutput>);

/// Type-state builder for [`Saga`].
///
/// Each added step must accept the previous step's output, and `build()` is
/// only available once a step exists. Both rules are checked at compile time:
///
/// ```compile_fail
/// use frontdesk_saga::{SagaBuilder, SagaStep};
///
/// struct AllocatePosition;
/// impl SagaStep for AllocatePosition {
///     type Input = ();
///     type Output = u32;
///     type Context = ();
///     type Error = ();
///     fn name(&self) -> &'static str { "allocate_position" }
///     fn execute(&self, _: &(), _: ()) -> Result<u32, ()> { Ok(1) }
/// }
///
/// struct InsertDoctor;
/// impl SagaStep for InsertDoctor {
///     type Input = String;
///     type Output = String;
///     type Context = ();
///     type Error = ();
///     fn name(&self) -> &'static str { "insert_doctor" }
///     fn execute(&self, _: &(), code: String) -> Result<String, ()> { Ok(code) }
/// }
///
/// // InsertDoctor takes a String, AllocatePosition yields a u32.
/// let saga = SagaBuilder::new()
///     .first_step(AllocatePosition)
///     .then(InsertDoctor)
///     .build();
/// ```
///
/// ```compile_fail
/// use frontdesk_saga::SagaBuilder;
///
/// let saga = SagaBuilder::<(), (), (), ()>::new().build();
/// ```
pub struct SagaBuilder<Input, Output, Ctx, Err, State> {
    steps: Vec<Box<dyn ErasedStep<Ctx, Err>>>,
    _phantom: PhantomData<(Input, Output, State)>,
}

impl<Ctx, Err> SagaBuilder<(), (), Ctx, Err, Empty> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            _phantom: PhantomData,
        }
    }

    /// The saga's input type becomes this step's input type.
    #[must_use]
    pub fn first_step<S>(
        self,
        step: S,
    ) -> SagaBuilder<S::Input, S::Output, Ctx, Err, HasSteps<S::Output>>
    where
        S: SagaStep<Context = Ctx, Error = Err> + 'static,
    {
        self.push(step)
    }
}

impl<Ctx, Err> Default for SagaBuilder<(), (), Ctx, Err, Empty> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Input, CurrentOutput, Ctx, Err>
    SagaBuilder<Input, CurrentOutput, Ctx, Err, HasSteps<CurrentOutput>>
{
    #[must_use]
    pub fn then<S>(self, step: S) -> SagaBuilder<Input, S::Output, Ctx, Err, HasSteps<S::Output>>
    where
        S: SagaStep<Input = CurrentOutput, Context = Ctx, Error = Err> + 'static,
    {
        self.push(step)
    }

    #[must_use]
    pub fn build(self) -> Saga<Input, CurrentOutput, Ctx, Err>
    where
        Input: Clone + Send + 'static,
        CurrentOutput: Send + 'static,
        Err: Debug,
    {
        Saga::from_steps(self.steps)
    }
}

impl<Input, Output, Ctx, Err, State> SagaBuilder<Input, Output, Ctx, Err, State> {
    fn push<S, NextInput, NextOutput>(
        self,
        step: S,
    ) -> SagaBuilder<NextInput, NextOutput, Ctx, Err, HasSteps<NextOutput>>
    where
        S: SagaStep<Context = Ctx, Error = Err> + 'static,
    {
        let mut steps = self.steps;
        steps.push(Box::new(StepWrapper::new(step)));
        SagaBuilder {
            steps,
            _phantom: PhantomData,
        }
    }
}

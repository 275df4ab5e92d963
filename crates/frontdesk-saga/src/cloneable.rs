use std::any::Any;

/// A boxed step payload that can be duplicated without knowing its type.
///
/// Every completed step's output is kept twice: once to feed the next step,
/// once for its own compensation.
pub(crate) trait CloneableAny: Any + Send {
    fn clone_box(&self) -> Box<dyn CloneableAny>;

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;
}

impl<T> CloneableAny for T
where
    T: Clone + Send + 'static,
{
    fn clone_box(&self) -> Box<dyn CloneableAny> {
        Box::new(self.clone())
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

/// A type that collects the steps taken by a rewrite.
///
/// [`StepCollector`] is also implemented for the unit type `()`. This is useful when the caller
/// does not care about the steps, only the rewritten tree.
pub trait StepCollector<S> {
    /// Adds a step to the collector.
    fn push(&mut self, step: S);
}

impl<S> StepCollector<S> for () {
    #[inline]
    fn push(&mut self, _: S) {}
}

impl<S> StepCollector<S> for Vec<S> {
    #[inline]
    fn push(&mut self, step: S) {
        self.push(step);
    }
}

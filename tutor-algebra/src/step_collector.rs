/// A sink for the rewrites a simplification performs.
///
/// The simplifiers push one record per rewrite. Pass `&mut ()` to discard the records when only the
/// rewritten expression is needed, or a `Vec` to keep them in the order they happened, which is
/// the order they are shown to the student.
pub trait StepCollector<S> {
    /// Records a rewrite.
    fn push(&mut self, step: S);
}

impl<S> StepCollector<S> for () {
    #[inline]
    fn push(&mut self, _: S) {}
}

impl<S> StepCollector<S> for Vec<S> {
    #[inline]
    fn push(&mut self, step: S) {
        Vec::push(self, step);
    }
}

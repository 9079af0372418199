/// A value that was produced even though something went wrong along the way.
///
/// `diagnostic` carries the failure, if any. The caller decides whether to
/// surface it; `value` is always usable.
#[derive(Debug)]
pub struct BestEffort<T, E> {
    pub value: T,
    pub diagnostic: Option<E>,
}

impl<T, E> BestEffort<T, E> {
    pub fn ok(value: T) -> Self {
        Self {
            value,
            diagnostic: None,
        }
    }

    pub fn degraded(value: T, diagnostic: E) -> Self {
        Self {
            value,
            diagnostic: Some(diagnostic),
        }
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.diagnostic.is_some()
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T: Default, E> BestEffort<T, E> {
    pub fn empty(diagnostic: E) -> Self {
        Self::degraded(T::default(), diagnostic)
    }
}

use alloc::boxed::Box;
use core::{error::Error, fmt};

use triomphe::Arc;
use unsize::CoerceUnsize;

/// Anything that can sit behind a [`Cause`] handle.
///
/// Every `Error + Send + Sync` type qualifies through the blanket impl. Boxed
/// errors go through [`BoxedCause`], since `Box<dyn Error>` does not itself
/// implement `Error`.
pub(crate) trait SharedCause: 'static + Send + Sync {
    fn as_error(&self) -> &(dyn Error + 'static);
}

impl<E> SharedCause for E
where
    E: Error + Send + Sync + 'static,
{
    fn as_error(&self) -> &(dyn Error + 'static) {
        self
    }
}

struct BoxedCause(Box<dyn Error + Send + Sync + 'static>);

impl SharedCause for BoxedCause {
    fn as_error(&self) -> &(dyn Error + 'static) {
        &*self.0
    }
}

/// A shared, read-only reference to the error a node wraps.
#[derive(Clone)]
pub(crate) struct Cause(Arc<dyn SharedCause>);

impl Cause {
    pub(crate) fn new<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self(Arc::new(error).unsize(unsize::Coercion!(to dyn SharedCause)))
    }

    pub(crate) fn from_boxed(error: Box<dyn Error + Send + Sync + 'static>) -> Self {
        Self(Arc::new(BoxedCause(error)).unsize(unsize::Coercion!(to dyn SharedCause)))
    }

    #[inline]
    pub(crate) fn as_error(&self) -> &(dyn Error + 'static) {
        self.0.as_error()
    }
}

impl fmt::Debug for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_error(), f)
    }
}

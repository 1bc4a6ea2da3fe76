//! Lazily executed invocations.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use crate::{Argument, Dispatcher, MethodDescription, Result};

/// A captured call that runs only when [`Callable::call`] is awaited.
///
/// Every call maps and executes anew; nothing is cached.
pub struct Callable<T> {
    dispatcher: Dispatcher,
    method: &'static MethodDescription,
    args: Vec<Argument>,
    _output: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Callable<T> {
    pub(crate) const fn new(
        dispatcher: Dispatcher,
        method: &'static MethodDescription,
        args: Vec<Argument>,
    ) -> Self {
        Self {
            dispatcher,
            method,
            args,
            _output: PhantomData,
        }
    }

    /// Execute the captured call.
    ///
    /// # Errors
    ///
    /// Returns the error of this execution, including mapping errors.
    pub async fn call(&self) -> Result<T> {
        self.dispatcher.direct(self.method, self.args.clone()).await
    }

    /// The method this callable invokes.
    #[must_use]
    pub const fn method(&self) -> &'static MethodDescription {
        self.method
    }
}

impl<T> Clone for Callable<T> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
            method: self.method,
            args: self.args.clone(),
            _output: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for Callable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callable")
            .field("method", &self.method.name)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

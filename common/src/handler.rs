//! [`Handler`] abstraction.

use std::future::Future;

/// Anything that can be asked to execute an operation.
///
/// `Args` is the operation itself; implementors pick what running it yields.
pub trait Handler<Args = ()> {
    /// Value produced by a successful execution.
    type Ok;

    /// Error produced by a failed execution.
    type Err;

    /// Executes the given operation.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}

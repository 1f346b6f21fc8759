//! Request scoping: the context object handed to every call and the
//! type-keyed state it carries.

mod context;
mod state;

pub use context::{RequestContext, RequestId};
pub use state::{RequestState, RequestStateError};

pub mod stream;
pub mod touch;

pub use stream::StreamClosed;
pub use touch::{classify, EventKind};

mod codec;
mod error;
mod id;
mod node;
mod tree;

pub use crate::codec::*;
pub use crate::error::*;
pub use crate::id::*;
pub use crate::node::*;
pub use crate::tree::*;

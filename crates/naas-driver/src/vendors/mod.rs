pub mod cisco;
pub mod common;
pub mod juniper;

pub use cisco::*;
pub use common::*;
pub use juniper::*;

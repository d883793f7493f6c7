//! Client-facing request types and provider payload types

mod requests;
mod runware;

pub use requests::*;
pub use runware::*;

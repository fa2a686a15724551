//! Localized page generation.

mod error;
mod page;

pub use error::GenerateError;
pub use page::{Generator, RenderedPage};

pub mod layout;
pub mod text;
pub mod tokenizer;
pub mod traits;

pub mod prelude {
    pub use super::layout::prelude::*;
    pub use super::text::prelude::*;
    pub use super::traits::{ExtractionPass, Parser};
}

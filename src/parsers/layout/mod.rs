pub mod builtin;
pub mod dto;
pub mod profile;
pub mod registry;

pub mod prelude {
    pub use super::dto::ProfileSpec;
    pub use super::profile::{AmountSelection, LayoutProfile};
    pub use super::registry::FormatRegistry;
}

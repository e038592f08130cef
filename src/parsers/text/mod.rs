pub mod dto;
pub mod parser;
pub mod types;

pub mod prelude {
    pub use super::dto::{RawLine, RawTransaction};
    pub use super::parser::TextStatementParser;
    pub use super::types::{StatementAmount, StatementDate};
}

pub mod corpus;
pub mod diagram;
pub mod error;
pub mod message;
pub mod reports;
pub mod results;
pub mod svg;

#![forbid(unsafe_code)]

pub mod cli;
pub mod enrich;
pub mod extract;
pub mod fetch;
pub mod logging;
pub mod paginate;
pub mod pipeline;
pub mod records;
pub mod rules;
pub mod sources;
pub mod store;

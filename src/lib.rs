pub mod config;
pub mod era;
pub mod error;
pub mod kpi;
pub mod normalize;
pub mod numeric;
pub mod output;
pub mod pipeline;
pub mod records;
pub mod sources;
pub mod summary;
pub mod text;

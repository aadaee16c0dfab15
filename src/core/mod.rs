pub mod logging;

// Content catalog: ingestion, source registry, resolution
pub mod catalog;

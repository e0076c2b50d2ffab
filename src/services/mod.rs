// Core data path
pub mod ingestion;
pub mod resolver;
pub mod synthesis;

// Views built on resolved data
pub mod dashboard;
pub mod routes;

// Direct store management
pub mod orders;

pub use ingestion::{IngestReport, IngestionPipeline, RowFailure, SeedReport};
pub use resolver::{DataSourceResolver, FallbackReason, Provenance, Resolution};

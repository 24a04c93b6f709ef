//! Discovery and enrichment pipelines

mod acquisition;
mod enrichment;

pub use acquisition::{AcquisitionPipeline, AcquisitionReport, CategoryReport, SearchArea};
pub use enrichment::{EnrichmentOutcome, EnrichmentPipeline};

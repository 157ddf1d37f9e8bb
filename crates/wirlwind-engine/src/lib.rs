//! Collection Registry, Normalize, Output Shaper, and the per-collection
//! pipeline that chains parser chain → normalize → shape → driver
//! post-process (spec §2 items 4 and 6, §4.4, §4.5).

mod error;
mod normalize;
mod pipeline;
mod registry;
mod shaper;

pub use error::{Error, Result};
pub use normalize::{coerce_schema, rename_fields, CoercionWarning};
pub use pipeline::{run_pipeline, PipelineContext, PipelineResult};
pub use registry::CollectionRegistry;
pub use shaper::shape;

pub mod engine;
pub mod pipeline;

pub use crate::domain::model::{
    Classification, ClassificationRun, ClassifiedProject, DomainCatalog, SourceWorkbook,
};
pub use crate::domain::ports::{Classifier, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;

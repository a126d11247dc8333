pub mod store_graph;

pub use store_graph::{demo_catalog, GraphCatalog};

use crate::core::interests::Interest;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeSet;

/// Projected fields of a `Course` node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseRecord {
    pub course_name: String,
    pub duration: String,
    pub time: String,
    pub fees: String,
}

#[async_trait]
pub trait CourseCatalog: Send + Sync {
    /// At most one course whose name is in `interests`. Which one wins among
    /// several matches is left to the store.
    async fn recommend(&self, interests: &BTreeSet<Interest>) -> Result<Option<CourseRecord>>;
}

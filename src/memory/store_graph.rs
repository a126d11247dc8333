use anyhow::{Context, Result};
use async_trait::async_trait;
use neo4rs::{query, Graph, Row};
use serde_json::Value;
use std::collections::BTreeSet;

use super::{CourseCatalog, CourseRecord};
use crate::core::interests::{labels, Interest};
use crate::core::state::GraphConfig;

const RECOMMEND_QUERY: &str = "
    MATCH (c:Course)
    WHERE c.name IN $interests
    RETURN c.name AS course_name, c.duration AS duration, c.time AS time, c.fees AS fees
    LIMIT 1
";

const SEED_QUERY: &str = "
    MERGE (c:Course { name: $name })
    SET c.duration = $duration, c.time = $time, c.fees = $fees
";

/// Course lookup over a long-lived Bolt connection.
pub struct GraphCatalog {
    graph: Graph,
}

impl GraphCatalog {
    pub async fn connect(config: &GraphConfig) -> Result<Self> {
        let graph = Graph::new(config.uri.as_str(), config.user.as_str(), config.password.as_str())
            .await
            .with_context(|| format!("Failed to connect to graph at {}", config.uri))?;
        tracing::info!(uri = %config.uri, "graph connected");
        Ok(Self { graph })
    }

    /// Upserts `Course` nodes by name.
    pub async fn seed_courses(&self, courses: &[CourseRecord]) -> Result<()> {
        for course in courses {
            let q = query(SEED_QUERY)
                .param("name", course.course_name.as_str())
                .param("duration", course.duration.as_str())
                .param("time", course.time.as_str())
                .param("fees", course.fees.as_str());
            self.graph
                .run(q)
                .await
                .with_context(|| format!("Failed to seed course {}", course.course_name))?;
        }
        Ok(())
    }
}

#[async_trait]
impl CourseCatalog for GraphCatalog {
    async fn recommend(&self, interests: &BTreeSet<Interest>) -> Result<Option<CourseRecord>> {
        if interests.is_empty() {
            return Ok(None);
        }

        let q = query(RECOMMEND_QUERY).param("interests", labels(interests));
        let mut rows = self
            .graph
            .execute(q)
            .await
            .context("Course recommendation query failed")?;

        match rows.next().await? {
            Some(row) => Ok(Some(row_to_course(&row)?)),
            None => Ok(None),
        }
    }
}

/// Shown for a property that exists on the row but is null.
pub const UNLISTED: &str = "not listed";

fn row_to_course(row: &Row) -> Result<CourseRecord> {
    let field = |key: &str| -> Result<String> {
        let value = row
            .get::<Value>(key)
            .with_context(|| format!("Course row has no usable `{}` column", key))?;
        Ok(display_property(&value))
    };

    Ok(CourseRecord {
        course_name: field("course_name")?,
        duration: field("duration")?,
        time: field("time")?,
        fees: field("fees")?,
    })
}

/// Node properties are free-form: strings pass through, anything else is rendered.
fn display_property(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => UNLISTED.to_string(),
        other => other.to_string(),
    }
}

/// Starter catalog written by `zoro seed`, one course per known interest.
pub fn demo_catalog() -> Vec<CourseRecord> {
    let course = |name: &str, duration: &str, time: &str, fees: &str| CourseRecord {
        course_name: name.to_string(),
        duration: duration.to_string(),
        time: time.to_string(),
        fees: fees.to_string(),
    };

    vec![
        course("Python", "3 months", "2 hours", "$100"),
        course("Data Science", "6 months", "3 hours", "$300"),
        course("Flutter", "4 months", "2 hours", "$200"),
        course("MERN Stack", "5 months", "3 hours", "$250"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use neo4rs::{BoltList, BoltNull, BoltType};

    fn course_row(fields: Vec<(&str, BoltType)>) -> Row {
        let (keys, values): (Vec<BoltType>, Vec<BoltType>) = fields
            .into_iter()
            .map(|(k, v)| (BoltType::from(k), v))
            .unzip();
        Row::new(BoltList::from(keys), BoltList::from(values))
    }

    #[test]
    fn test_row_with_string_properties() -> Result<()> {
        let row = course_row(vec![
            ("course_name", BoltType::from("Python")),
            ("duration", BoltType::from("3 months")),
            ("time", BoltType::from("2 hours")),
            ("fees", BoltType::from("$100")),
        ]);

        let course = row_to_course(&row)?;
        assert_eq!(
            course,
            CourseRecord {
                course_name: "Python".to_string(),
                duration: "3 months".to_string(),
                time: "2 hours".to_string(),
                fees: "$100".to_string(),
            }
        );
        Ok(())
    }

    #[test]
    fn test_row_with_numeric_and_null_properties() -> Result<()> {
        let row = course_row(vec![
            ("course_name", BoltType::from("Flutter")),
            ("duration", BoltType::from(4i64)),
            ("time", BoltType::Null(BoltNull)),
            ("fees", BoltType::from(100i64)),
        ]);

        let course = row_to_course(&row)?;
        assert_eq!(course.course_name, "Flutter");
        assert_eq!(course.duration, "4");
        assert_eq!(course.time, UNLISTED);
        assert_eq!(course.fees, "100");
        Ok(())
    }

    #[test]
    fn test_row_without_column_is_error() {
        let row = course_row(vec![
            ("course_name", BoltType::from("Python")),
            ("duration", BoltType::from("3 months")),
            ("time", BoltType::from("2 hours")),
        ]);

        let err = row_to_course(&row).unwrap_err();
        assert!(format!("{:#}", err).contains("`fees`"));
    }

    #[test]
    fn test_demo_catalog_covers_every_interest() {
        let names: BTreeSet<String> = demo_catalog().into_iter().map(|c| c.course_name).collect();
        for interest in Interest::PRIORITY {
            assert!(names.contains(interest.label()), "missing {}", interest);
        }
    }

    #[test]
    fn test_query_is_capped_to_one_row() {
        assert!(RECOMMEND_QUERY.contains("c.name IN $interests"));
        assert!(RECOMMEND_QUERY.trim_end().ends_with("LIMIT 1"));
    }

    // Needs a local Neo4j with the default credentials.
    #[tokio::test]
    #[ignore]
    async fn test_seeded_python_course_is_recommended() -> Result<()> {
        let catalog = GraphCatalog::connect(&GraphConfig::default()).await?;
        catalog.seed_courses(&demo_catalog()).await?;

        let found = catalog
            .recommend(&BTreeSet::from([Interest::Python]))
            .await?
            .context("expected a Python course")?;
        assert_eq!(found.course_name, "Python");
        assert_eq!(found.duration, "3 months");
        assert_eq!(found.time, "2 hours");
        assert_eq!(found.fees, "$100");

        assert_eq!(catalog.recommend(&BTreeSet::new()).await?, None);
        Ok(())
    }
}

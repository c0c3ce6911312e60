//! In-memory measure and issue store written out as JSON.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use sensor_model::{
    Issue, IssueRecorder, IssueSink, MeasureValue, MeasurementSink, Metric, PersistError,
    ResourceHandle,
};
use serde::Serialize;

/// Measures and issues of one resource.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResourceRecord {
    pub measures: BTreeMap<Metric, MeasureValue>,
    pub issues: Vec<Issue>,
}

/// Collects everything the sensors save during one run.
///
/// A measure can be saved once per resource; a second save of the same
/// metric is rejected. Only files accept issues.
///
/// Resources are keyed by their key alone. A file saved both as a plain file
/// and as a unit test file is one resource, shown with the unit test kind.
#[derive(Debug, Default)]
pub struct MeasureStore {
    resources: BTreeMap<String, StoredResource>,
}

#[derive(Debug)]
struct StoredResource {
    handle: ResourceHandle,
    record: ResourceRecord,
}

impl MeasureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resources(&self) -> impl Iterator<Item = (&ResourceHandle, &ResourceRecord)> {
        self.resources
            .values()
            .map(|stored| (&stored.handle, &stored.record))
    }

    pub fn measure(&self, resource: &ResourceHandle, metric: Metric) -> Option<&MeasureValue> {
        self.resources
            .get(resource.key())?
            .record
            .measures
            .get(&metric)
    }

    pub fn issue_count(&self) -> usize {
        self.resources
            .values()
            .map(|stored| stored.record.issues.len())
            .sum()
    }

    /// Record of `resource`, upgrading the stored kind when `resource` is
    /// more specific.
    fn record_mut(&mut self, resource: &ResourceHandle) -> &mut ResourceRecord {
        let stored = self
            .resources
            .entry(resource.key().to_string())
            .or_insert_with(|| StoredResource {
                handle: resource.clone(),
                record: ResourceRecord::default(),
            });
        if resource.kind() > stored.handle.kind() {
            stored.handle = resource.clone();
        }
        &mut stored.record
    }

    /// Serializes the store, stamped with the current UTC time.
    pub fn to_json(&self, project: &str) -> Result<String> {
        let resources = self
            .resources()
            .map(|(resource, record)| ResourceEntry { resource, record })
            .collect();
        let report = StoreReport {
            project,
            generated_at: Utc::now().to_rfc3339(),
            resources,
        };
        serde_json::to_string_pretty(&report).context("serialize measures")
    }

    pub fn write_json(&self, project: &str, path: &Path) -> Result<()> {
        let json = self.to_json(project)?;
        fs::write(path, json).with_context(|| format!("write {}", path.display()))
    }
}

impl MeasurementSink for MeasureStore {
    fn persist(
        &mut self,
        resource: &ResourceHandle,
        metric: Metric,
        value: MeasureValue,
    ) -> Result<(), PersistError> {
        let record = self.record_mut(resource);
        if record.measures.contains_key(&metric) {
            return Err(PersistError::DuplicateMeasure {
                resource: resource.key().to_string(),
                metric,
            });
        }
        record.measures.insert(metric, value);
        Ok(())
    }
}

impl IssueSink for MeasureStore {
    fn issuable(&mut self, resource: &ResourceHandle) -> Option<Box<dyn IssueRecorder + '_>> {
        if !resource.is_file() {
            return None;
        }
        let record = self.record_mut(resource);
        Some(Box::new(IssueList {
            issues: &mut record.issues,
        }))
    }
}

struct IssueList<'a> {
    issues: &'a mut Vec<Issue>,
}

impl IssueRecorder for IssueList<'_> {
    fn record(&mut self, issue: Issue) -> Result<(), PersistError> {
        self.issues.push(issue);
        Ok(())
    }
}

#[derive(Serialize)]
struct StoreReport<'a> {
    project: &'a str,
    generated_at: String,
    resources: Vec<ResourceEntry<'a>>,
}

#[derive(Serialize)]
struct ResourceEntry<'a> {
    resource: &'a ResourceHandle,
    #[serde(flatten)]
    record: &'a ResourceRecord,
}

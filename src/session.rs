use tracing::info;

use crate::model::InsightRecord;

/// The last computed insight table, tied to the model that produced it.
///
/// Owned by whoever drives the dashboard; switching model drops the table.
#[derive(Debug, Default)]
pub struct Session {
    model: Option<String>,
    table: Option<Vec<InsightRecord>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached table for `model`, computing it when the model changed or nothing is cached.
    pub fn insights<F, E>(&mut self, model: &str, compute: F) -> Result<&[InsightRecord], E>
    where
        F: FnOnce() -> Result<Vec<InsightRecord>, E>,
    {
        if self.model.as_deref() != Some(model) {
            if self.model.is_some() {
                info!("🔁 Model changed to {model}, dropping cached insights");
            }
            self.invalidate();
            self.model = Some(model.to_string());
        }
        if self.table.is_none() {
            self.table = Some(compute()?);
        }
        Ok(self.table.as_deref().unwrap_or_default())
    }

    /// Seed the cache with a table that was loaded rather than generated.
    pub fn store(&mut self, model: &str, table: Vec<InsightRecord>) {
        self.model = Some(model.to_string());
        self.table = Some(table);
    }

    pub fn invalidate(&mut self) {
        self.table = None;
    }

    pub fn cached(&self) -> Option<&[InsightRecord]> {
        self.table.as_deref()
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }
}

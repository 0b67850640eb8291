//! Per-call options

use crate::types::ProcessMode;

/// Options for reading a table
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Base override
    pub base: Option<String>,
    /// Only records visible in this view, in its order
    pub view: Option<String>,
    /// Only return these fields
    pub fields: Vec<String>,
    /// Airtable formula records must satisfy
    pub filter_by_formula: Option<String>,
    /// Cap on the total number of records
    pub max_records: Option<u32>,
    /// Records per page (Airtable allows up to 100)
    pub page_size: Option<u32>,
    /// Processing override
    pub process: ProcessMode,
    /// Query Airtable directly rather than through the cache
    pub direct: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            base: None,
            view: None,
            fields: Vec::new(),
            filter_by_formula: None,
            max_records: None,
            page_size: None,
            process: ProcessMode::Inherit,
            direct: true,
        }
    }
}

impl FetchOptions {
    /// Create default fetch options (direct, inherited processing)
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    #[must_use]
    pub fn view(mut self, view: impl Into<String>) -> Self {
        self.view = Some(view.into());
        self
    }

    #[must_use]
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    #[must_use]
    pub fn filter_by_formula(mut self, formula: impl Into<String>) -> Self {
        self.filter_by_formula = Some(formula.into());
        self
    }

    #[must_use]
    pub fn max_records(mut self, max: u32) -> Self {
        self.max_records = Some(max);
        self
    }

    #[must_use]
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    #[must_use]
    pub fn process(mut self, mode: ProcessMode) -> Self {
        self.process = mode;
        self
    }

    /// Read through the caching middleware when one is configured
    #[must_use]
    pub fn via_cache(mut self) -> Self {
        self.direct = false;
        self
    }

    /// Query parameters for the list endpoint, without the page cursor
    pub(crate) fn query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(view) = &self.view {
            query.push(("view".to_string(), view.clone()));
        }
        for field in &self.fields {
            query.push(("fields[]".to_string(), field.clone()));
        }
        if let Some(formula) = &self.filter_by_formula {
            query.push(("filterByFormula".to_string(), formula.clone()));
        }
        if let Some(max) = self.max_records {
            query.push(("maxRecords".to_string(), max.to_string()));
        }
        if let Some(size) = self.page_size {
            query.push(("pageSize".to_string(), size.to_string()));
        }
        query
    }
}

/// Options for create and update
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// Base override
    pub base: Option<String>,
    /// Processing override
    pub process: ProcessMode,
    /// Send null values so Airtable clears those fields; ignored on create
    pub keep_none: bool,
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    #[must_use]
    pub fn process(mut self, mode: ProcessMode) -> Self {
        self.process = mode;
        self
    }

    #[must_use]
    pub fn keep_none(mut self, keep_none: bool) -> Self {
        self.keep_none = keep_none;
        self
    }
}

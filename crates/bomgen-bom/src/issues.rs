use thiserror::Error;

/// Non-fatal problem found during BOM generation.
///
/// Issues never abort the run; they are logged at discovery and flip the
/// final verdict to "There were issues found".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Issue {
    #[error("Component without MPN: {reference}")]
    MissingMpn { reference: String },

    #[error("No SKU specified for: {reference}")]
    MissingSku { reference: String },

    #[error("Element count in SKU and MPN not equal for {mpn}. Ignoring this component")]
    MultipartCountMismatch { mpn: String },

    #[error("Component missing MPN and value: {reference}")]
    MissingMpnAndValue { reference: String },

    /// A component reached grouping without an MPN. Earlier stages are
    /// supposed to make that impossible, so this indicates a defect, but a
    /// partial BOM is still more useful than an aborted run.
    #[error("Component without MPN where all components should already have MPNs (programming bug): {reference}")]
    MissingMpnAtGrouping { reference: String },

    #[error("There were {} components without supplier ({mpns:?})", .mpns.len())]
    NoSupplier { mpns: Vec<String> },

    #[error("Part not found at {supplier}: {sku}")]
    PartNotFound { supplier: String, sku: String },

    #[error("Not enough in stock at {supplier} for {mpn} (need {needed}, have {stock})")]
    InsufficientStock {
        supplier: String,
        mpn: String,
        needed: u32,
        stock: i64,
    },
}

/// Accumulator for non-fatal issues.
///
/// Each pushed issue is logged immediately so a human watching the run sees
/// problems as they are found; the collected list drives the final verdict.
#[derive(Debug, Default)]
pub struct IssueSink {
    issues: Vec<Issue>,
}

impl IssueSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, issue: Issue) {
        log::error!("{issue}");
        self.issues.push(issue);
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

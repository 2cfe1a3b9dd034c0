//! One user's view of a loaded dataset.
//!
//! A session classifies its dataset once, keeps the facet-filtered rows,
//! and answers pivot and drill-down requests against that same row set.

use std::collections::BTreeMap;

use crate::data::{classify, ClassifiedRow};
use crate::drilldown::{resolve, CellRef, DrilldownOptions, DrilldownOutcome};
use crate::query::{aggregate, facet_options, Facet, FacetFilter, PivotResult, PivotView};
use crate::source::{DateRange, Dataset};

#[derive(Debug, Clone)]
pub struct Session {
    range: DateRange,
    notice: Option<String>,
    rows: Vec<ClassifiedRow>,
    facets: FacetFilter,
    filtered: Vec<ClassifiedRow>,
}

impl Session {
    pub fn new(dataset: Dataset) -> Self {
        let rows = classify(&dataset.records);
        tracing::debug!(rows = rows.len(), range = %dataset.range, "session started");
        Self {
            range: dataset.range,
            notice: dataset.notice,
            filtered: rows.clone(),
            rows,
            facets: FacetFilter::new(),
        }
    }

    pub fn range(&self) -> &DateRange {
        &self.range
    }

    /// Message to show instead of tables when the dataset is empty.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Every classified row, ignoring facets.
    pub fn rows(&self) -> &[ClassifiedRow] {
        &self.rows
    }

    pub fn facets(&self) -> &FacetFilter {
        &self.facets
    }

    /// Replace the facet selection and recompute the filtered rows.
    pub fn set_facets(&mut self, facets: FacetFilter) {
        self.filtered = facets.apply(&self.rows);
        self.facets = facets;
        tracing::debug!(
            rows = self.rows.len(),
            filtered = self.filtered.len(),
            "applied facets"
        );
    }

    /// Rows passing the current facets; pivots and drill-downs both read these.
    pub fn filtered(&self) -> &[ClassifiedRow] {
        &self.filtered
    }

    /// Options for every facet, taken from the unfiltered rows.
    pub fn facet_options(&self) -> BTreeMap<Facet, Vec<String>> {
        facet_options(&self.rows)
    }

    pub fn pivot(&self, view: PivotView) -> PivotResult {
        aggregate(&self.filtered, &view.spec())
    }

    pub fn drilldown(
        &self,
        view: PivotView,
        cell: &CellRef,
        options: &DrilldownOptions,
    ) -> DrilldownOutcome {
        resolve(
            cell,
            &view.spec(),
            &self.filtered,
            &view.detail_columns(),
            options,
        )
    }
}

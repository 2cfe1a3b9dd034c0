//! Facet filtering of classified rows.
//!
//! Each facet holds a set of allowed values. A row passes when, for every
//! facet that has a selection, its value is in that selection. Facets with
//! no selection impose no constraint.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::{ClassifiedRow, Field};
use crate::error::ConvdashError;

use super::predicate::{Condition, Predicate};

/// A user-selectable filter dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Facet {
    City,
    VehicleType,
    MasterService,
    ServiceType,
    Person,
    Source,
}

impl Facet {
    pub const ALL: [Facet; 6] = [
        Facet::City,
        Facet::VehicleType,
        Facet::MasterService,
        Facet::ServiceType,
        Facet::Person,
        Facet::Source,
    ];

    /// Row column the facet filters on.
    pub fn field(self) -> Field {
        match self {
            Facet::City => Field::City,
            Facet::VehicleType => Field::VehicleType,
            Facet::MasterService => Field::MasterService,
            Facet::ServiceType => Field::ServiceType,
            Facet::Person => Field::Person,
            Facet::Source => Field::Source,
        }
    }

    /// Command-line name.
    pub fn name(self) -> &'static str {
        match self {
            Facet::City => "city",
            Facet::VehicleType => "vehicle-type",
            Facet::MasterService => "service",
            Facet::ServiceType => "service-type",
            Facet::Person => "person",
            Facet::Source => "source",
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Facet {
    type Err = ConvdashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "city" => Ok(Facet::City),
            "vehicle-type" | "vehicle_type" | "vehicle" => Ok(Facet::VehicleType),
            "service" | "master-service" | "master_service" => Ok(Facet::MasterService),
            "service-type" | "service_type" => Ok(Facet::ServiceType),
            "person" | "name" | "crm_admin_name" => Ok(Facet::Person),
            "source" | "user_source" => Ok(Facet::Source),
            _ => Err(ConvdashError::InvalidFacet(s.to_string())),
        }
    }
}

/// Selected values per facet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetFilter {
    selections: BTreeMap<Facet, BTreeSet<String>>,
}

impl FacetFilter {
    /// Create a filter with no selections (passes every row).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: allow the given values for a facet, adding to any existing selection.
    pub fn select<I, S>(mut self, facet: Facet, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entry = self.selections.entry(facet).or_default();
        entry.extend(values.into_iter().map(Into::into));
        if entry.is_empty() {
            self.selections.remove(&facet);
        }
        self
    }

    /// Builder: drop the selection for a facet.
    pub fn clear(mut self, facet: Facet) -> Self {
        self.selections.remove(&facet);
        self
    }

    /// Allowed values for a facet, `None` when unconstrained.
    pub fn selection(&self, facet: Facet) -> Option<&BTreeSet<String>> {
        self.selections.get(&facet).filter(|s| !s.is_empty())
    }

    /// True when no facet constrains rows.
    pub fn is_empty(&self) -> bool {
        self.selections.values().all(BTreeSet::is_empty)
    }

    /// Membership conditions for every constrained facet.
    pub fn to_predicate(&self) -> Predicate {
        Facet::ALL
            .into_iter()
            .filter_map(|facet| {
                self.selection(facet)
                    .map(|values| Condition::is_in(facet.field(), values.iter().cloned()))
            })
            .fold(Predicate::new(), Predicate::and)
    }

    pub fn matches(&self, row: &ClassifiedRow) -> bool {
        self.to_predicate().matches(row)
    }

    /// Rows passing every constrained facet, in input order.
    pub fn apply(&self, rows: &[ClassifiedRow]) -> Vec<ClassifiedRow> {
        self.to_predicate().apply(rows)
    }
}

/// Sorted distinct values of every facet, for populating filter controls.
pub fn facet_options(rows: &[ClassifiedRow]) -> BTreeMap<Facet, Vec<String>> {
    Facet::ALL
        .into_iter()
        .map(|facet| {
            let values: BTreeSet<String> = rows.iter().map(|r| r.value(facet.field())).collect();
            (facet, values.into_iter().collect())
        })
        .collect()
}

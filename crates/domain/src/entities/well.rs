//! Well entity - a physical well drilled from a cluster pad.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entities::{Borehole, Location};
use crate::ids::{LocationId, WellId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Well {
    pub id: WellId,
    /// The cluster (a `LocationType::Cluster` location) the well belongs to
    pub cluster_id: LocationId,
    pub code: String,
    pub name: String,
    pub status: Option<String>,
    pub category: Option<String>,
    pub purpose: Option<String>,
    pub visible: bool,
    pub position: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWell {
    pub cluster_id: LocationId,
    pub name: String,
    pub code: Option<String>,
    pub status: Option<String>,
    pub category: Option<String>,
    pub purpose: Option<String>,
    pub visible: bool,
    pub position: Option<i64>,
}

impl NewWell {
    pub fn new(cluster_id: LocationId, name: impl Into<String>) -> Self {
        Self {
            cluster_id,
            name: name.into(),
            code: None,
            status: None,
            category: None,
            purpose: None,
            visible: true,
            position: None,
        }
    }
}

/// Column patch for a well update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WellPatch {
    pub cluster_id: Option<LocationId>,
    pub name: Option<String>,
    pub code: Option<String>,
    pub status: Option<Option<String>>,
    pub category: Option<Option<String>>,
    pub purpose: Option<Option<String>>,
    pub visible: Option<bool>,
    pub position: Option<i64>,
}

impl WellPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Conditions for listing wells; all set conditions must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WellFilter {
    pub cluster_id: Option<LocationId>,
    pub status: Option<String>,
    pub visible: Option<bool>,
}

impl WellFilter {
    pub fn in_cluster(cluster_id: LocationId) -> Self {
        Self {
            cluster_id: Some(cluster_id),
            ..Self::default()
        }
    }
}

/// A well decorated with its boreholes and the cluster's ancestry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WellWithBoreholes {
    #[serde(flatten)]
    pub well: Well,
    pub boreholes: Vec<Borehole>,
    pub boreholes_count: usize,
    /// Root-first chain ending with the cluster
    pub location_hierarchy: Vec<Location>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WellFullInfo {
    #[serde(flatten)]
    pub well: Well,
    pub cluster: Option<Location>,
    pub hierarchy: Vec<Location>,
    pub boreholes: Vec<Borehole>,
}

/// Count of visible wells sharing one status/category/purpose combination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WellGroupCount {
    pub total: u64,
    pub status: Option<String>,
    pub category: Option<String>,
    pub purpose: Option<String>,
}

/// Visible-well counts for a cluster, broken down three ways.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClusterStatistics {
    pub total_wells: u64,
    pub by_status: BTreeMap<String, u64>,
    pub by_category: BTreeMap<String, u64>,
    pub by_purpose: BTreeMap<String, u64>,
}

impl ClusterStatistics {
    /// Fold grouped counts into per-dimension totals. Empty or missing
    /// dimension values count toward the total only.
    pub fn from_counts(counts: impl IntoIterator<Item = WellGroupCount>) -> Self {
        let mut stats = Self::default();
        for count in counts {
            stats.total_wells += count.total;
            tally(&mut stats.by_status, count.status, count.total);
            tally(&mut stats.by_category, count.category, count.total);
            tally(&mut stats.by_purpose, count.purpose, count.total);
        }
        stats
    }
}

fn tally(bucket: &mut BTreeMap<String, u64>, key: Option<String>, total: u64) {
    if let Some(key) = key.filter(|k| !k.is_empty()) {
        *bucket.entry(key).or_insert(0) += total;
    }
}

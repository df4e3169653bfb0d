//! Location entity - nodes of the organization → cluster hierarchy
//!
//! Parent/child links are stored as a plain `parent_id` column. The derived
//! fields (`children`, `level`) are filled in by
//! [`LocationForest`](crate::aggregates::LocationForest) on every build and
//! are never written back.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::LocationId;

/// The kind of node in the location hierarchy, outermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    /// Operating company; the only type allowed at the root
    Organization,
    /// Regional production unit
    Tpp,
    /// Field group (oil and gas production shop)
    Cdng,
    Field,
    /// Well pad; wells attach here
    Cluster,
    /// Unrecognised stored value, kept so corrupt rows still load
    #[serde(other)]
    Unknown,
}

/// Where a location type may be placed in the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentRule {
    /// Must not have a parent.
    Root,
    /// Parent must be of exactly this type.
    Under(LocationType),
}

impl LocationType {
    /// Known types, outermost first.
    pub const ALL: [LocationType; 5] = [
        Self::Organization,
        Self::Tpp,
        Self::Cdng,
        Self::Field,
        Self::Cluster,
    ];

    /// Get the string representation for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Organization => "organization",
            Self::Tpp => "tpp",
            Self::Cdng => "cdng",
            Self::Field => "field",
            Self::Cluster => "cluster",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a stored type name (case-insensitive). Never fails.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "organization" => Self::Organization,
            "tpp" => Self::Tpp,
            "cdng" => Self::Cdng,
            "field" => Self::Field,
            "cluster" => Self::Cluster,
            _ => Self::Unknown,
        }
    }

    /// The placement rule for this type; `None` for [`LocationType::Unknown`].
    pub fn parent_rule(&self) -> Option<ParentRule> {
        match self {
            Self::Organization => Some(ParentRule::Root),
            Self::Tpp => Some(ParentRule::Under(Self::Organization)),
            Self::Cdng => Some(ParentRule::Under(Self::Tpp)),
            Self::Field => Some(ParentRule::Under(Self::Cdng)),
            Self::Cluster => Some(ParentRule::Under(Self::Field)),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ParentRule {
    /// Check a placement given the parent's type (`None` = no parent).
    pub fn admits(&self, parent_type: Option<LocationType>) -> bool {
        match (self, parent_type) {
            (Self::Root, None) => true,
            (Self::Under(required), Some(actual)) => *required == actual,
            _ => false,
        }
    }
}

/// A location row plus the fields derived at cache-build time.
///
/// Simple data struct with public fields: the hierarchy invariants belong to
/// the forest that owns a set of locations, not to a single row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub parent_id: Option<LocationId>,
    #[serde(rename = "type")]
    pub location_type: LocationType,
    pub code: String,
    pub name: String,
    /// Sort key among siblings
    pub position: i64,
    /// Opaque geo payload (GeoJSON or "lat,lon"); not interpreted here
    pub coordinates: Option<String>,
    pub description: Option<String>,
    /// Additional persisted attributes, stored as a JSON object
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,

    // Derived; recomputed on every forest build
    #[serde(default)]
    pub children: Vec<LocationId>,
    #[serde(default)]
    pub level: u32,
}

impl Location {
    pub fn new(
        id: LocationId,
        location_type: LocationType,
        code: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            parent_id: None,
            location_type,
            code: code.into(),
            name: name.into(),
            position: id.get(),
            coordinates: None,
            description: None,
            extra: Map::new(),
            children: Vec::new(),
            level: 0,
        }
    }

    pub fn with_parent(mut self, parent_id: LocationId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_position(mut self, position: i64) -> Self {
        self.position = position;
        self
    }

    pub fn with_coordinates(mut self, coordinates: impl Into<String>) -> Self {
        self.coordinates = Some(coordinates.into());
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn has_coordinates(&self) -> bool {
        self.coordinates
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty())
    }
}

/// Fields for inserting a location. `code` and `position` are filled in by
/// the directory when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLocation {
    pub parent_id: Option<LocationId>,
    #[serde(rename = "type")]
    pub location_type: LocationType,
    pub name: String,
    pub code: Option<String>,
    pub position: Option<i64>,
    pub coordinates: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub extra: Map<String, Value>,
}

impl NewLocation {
    pub fn new(location_type: LocationType, name: impl Into<String>) -> Self {
        Self {
            parent_id: None,
            location_type,
            name: name.into(),
            code: None,
            position: None,
            coordinates: None,
            description: None,
            extra: Map::new(),
        }
    }

    pub fn under(mut self, parent_id: LocationId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

/// Column patch for an update; `None` leaves the column untouched.
///
/// Nullable columns use `Option<Option<_>>` so a patch can clear them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationPatch {
    pub parent_id: Option<Option<LocationId>>,
    #[serde(rename = "type")]
    pub location_type: Option<LocationType>,
    pub name: Option<String>,
    pub code: Option<String>,
    pub position: Option<i64>,
    pub coordinates: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub extra: Option<Map<String, Value>>,
}

impl LocationPatch {
    pub fn is_empty(&self) -> bool {
        self.parent_id.is_none()
            && self.location_type.is_none()
            && self.name.is_none()
            && self.code.is_none()
            && self.position.is_none()
            && self.coordinates.is_none()
            && self.description.is_none()
            && self.extra.is_none()
    }
}

/// Filter for listing locations.
///
/// Only one dimension is applied per call: `location_type` wins when set,
/// otherwise `parent_id` (where `Some(None)` selects roots), otherwise
/// everything is returned. The two are never combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocationFilter {
    pub location_type: Option<LocationType>,
    pub parent_id: Option<Option<LocationId>>,
}

/// The single filter dimension a [`LocationFilter`] resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterScope {
    All,
    Type(LocationType),
    Parent(Option<LocationId>),
}

impl LocationFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_type(location_type: LocationType) -> Self {
        Self {
            location_type: Some(location_type),
            parent_id: None,
        }
    }

    pub fn by_parent(parent_id: Option<LocationId>) -> Self {
        Self {
            location_type: None,
            parent_id: Some(parent_id),
        }
    }

    pub fn scope(&self) -> FilterScope {
        match (self.location_type, self.parent_id) {
            (Some(location_type), _) => FilterScope::Type(location_type),
            (None, Some(parent_id)) => FilterScope::Parent(parent_id),
            (None, None) => FilterScope::All,
        }
    }

    pub fn matches(&self, location: &Location) -> bool {
        match self.scope() {
            FilterScope::All => true,
            FilterScope::Type(location_type) => location.location_type == location_type,
            FilterScope::Parent(parent_id) => location.parent_id == parent_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: i64) -> LocationId {
        LocationId::new(raw).expect("positive id")
    }

    #[test]
    fn only_organization_may_be_root() {
        for location_type in LocationType::ALL {
            let rule = location_type.parent_rule().expect("known type");
            assert_eq!(
                rule.admits(None),
                location_type == LocationType::Organization,
                "{location_type}"
            );
        }
    }

    #[test]
    fn each_type_requires_the_next_outer_type() {
        let rule = LocationType::Cluster.parent_rule().expect("known type");
        assert!(rule.admits(Some(LocationType::Field)));
        assert!(!rule.admits(Some(LocationType::Cdng)));
        assert!(!rule.admits(None));
    }

    #[test]
    fn unknown_type_has_no_rule() {
        assert_eq!(LocationType::parse("pipeline"), LocationType::Unknown);
        assert!(LocationType::Unknown.parent_rule().is_none());
    }

    #[test]
    fn type_filter_takes_precedence_over_parent() {
        let filter = LocationFilter {
            location_type: Some(LocationType::Cluster),
            parent_id: Some(Some(id(7))),
        };
        assert_eq!(filter.scope(), FilterScope::Type(LocationType::Cluster));

        let cluster_elsewhere =
            Location::new(id(9), LocationType::Cluster, "c9", "C9").with_parent(id(3));
        assert!(filter.matches(&cluster_elsewhere));
    }

    #[test]
    fn parent_filter_can_select_roots() {
        let filter = LocationFilter::by_parent(None);
        let root = Location::new(id(1), LocationType::Organization, "org", "Org");
        let child = Location::new(id(2), LocationType::Tpp, "tpp", "TPP").with_parent(id(1));
        assert!(filter.matches(&root));
        assert!(!filter.matches(&child));
    }

    #[test]
    fn blank_coordinates_do_not_count() {
        let location = Location::new(id(4), LocationType::Cluster, "c", "C").with_coordinates("  ");
        assert!(!location.has_coordinates());
        assert!(location.with_coordinates("55.1,61.4").has_coordinates());
    }
}

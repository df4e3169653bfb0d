//! Location forest - the repaired, leveled hierarchy built from raw rows.
//!
//! Rows arrive as an adjacency list that may be hand-edited: a location can
//! name itself as parent, point at a parent that no longer exists, or sit on
//! a parent cycle. The forest never rejects such input. It rewrites the
//! offending parent links to "no parent", records what it changed, and
//! builds the tree from what remains.
//!
//! # Arena layout
//!
//! All locations live in one `Vec` in load order, indexed by id. Parent and
//! child links are ids, never references, so cycles in the data cannot turn
//! into ownership cycles. The nested [`LocationNode`] tree handed to
//! presentation code is a separate, fully derived copy rebuilt on every
//! [`LocationForest::build`].
//!
//! Parent chains deeper than [`MAX_DEPTH`] are cut into separate trees, so
//! the nested copy (and anything walking it recursively) stays shallow no
//! matter what the rows say.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::entities::{Location, LocationFilter, LocationType};
use crate::ids::LocationId;

/// Deepest level a location may sit at. Its children are detached and
/// start trees of their own.
pub const MAX_DEPTH: u32 = 64;

/// A structural defect found and repaired while building the forest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HierarchyRepair {
    /// `parent_id` pointed at the location itself; now a root.
    SelfParent { id: LocationId },
    /// `parent_id` did not resolve to a loaded location; now a root.
    DanglingParent {
        id: LocationId,
        missing_parent: LocationId,
    },
    /// These locations formed a parent cycle; each is now a root.
    Cycle { members: Vec<LocationId> },
    /// A second row with an already-seen id was dropped.
    DuplicateId { id: LocationId },
    /// `parent` sat at [`MAX_DEPTH`]; `id` was detached and is now a root.
    DepthExceeded { id: LocationId, parent: LocationId },
}

/// A location with its children materialized, for tree presentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationNode {
    #[serde(flatten)]
    pub location: Location,
    pub sublocations: Vec<LocationNode>,
}

impl LocationNode {
    /// Number of nodes in this subtree, including itself.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .sublocations
            .iter()
            .map(LocationNode::subtree_len)
            .sum::<usize>()
    }
}

/// The full location hierarchy: flat map, forest and repair log.
#[derive(Debug, Clone, Default)]
pub struct LocationForest {
    locations: Vec<Location>,
    index: HashMap<LocationId, usize>,
    roots: Vec<LocationNode>,
    repairs: Vec<HierarchyRepair>,
}

impl LocationForest {
    /// Build the forest from raw rows.
    ///
    /// Rows are first put in load order (`parent_id` with roots first, then
    /// `position`, then `name`); the sort is stable, so rows already ordered
    /// by the store keep their order. Derived fields on the input are
    /// ignored and recomputed.
    pub fn build(rows: impl IntoIterator<Item = Location>) -> Self {
        let mut rows: Vec<Location> = rows.into_iter().collect();
        rows.sort_by(load_order);

        let mut repairs = Vec::new();
        let mut locations: Vec<Location> = Vec::with_capacity(rows.len());
        let mut index = HashMap::with_capacity(rows.len());

        for mut location in rows {
            if index.contains_key(&location.id) {
                repairs.push(HierarchyRepair::DuplicateId { id: location.id });
                continue;
            }
            location.children.clear();
            location.level = 0;
            if location.parent_id == Some(location.id) {
                location.parent_id = None;
                repairs.push(HierarchyRepair::SelfParent { id: location.id });
            }
            index.insert(location.id, locations.len());
            locations.push(location);
        }

        for location in &mut locations {
            if let Some(parent_id) = location.parent_id {
                if !index.contains_key(&parent_id) {
                    location.parent_id = None;
                    repairs.push(HierarchyRepair::DanglingParent {
                        id: location.id,
                        missing_parent: parent_id,
                    });
                }
            }
        }

        break_cycles(&mut locations, &index, &mut repairs);

        // Parent -> child edges, by index, in load order.
        for slot in 0..locations.len() {
            let parent_slot = locations[slot]
                .parent_id
                .and_then(|parent_id| index.get(&parent_id).copied());
            if let Some(parent_slot) = parent_slot {
                let child_id = locations[slot].id;
                locations[parent_slot].children.push(child_id);
            }
        }

        let mut root_slots: Vec<usize> = (0..locations.len())
            .filter(|&slot| locations[slot].parent_id.is_none())
            .collect();

        assign_levels(&mut locations, &index, &mut root_slots, &mut repairs);

        let roots = materialize(&root_slots, &locations, &index);

        Self {
            locations,
            index,
            roots,
            repairs,
        }
    }

    pub fn get(&self, id: LocationId) -> Option<&Location> {
        self.index.get(&id).map(|&slot| &self.locations[slot])
    }

    /// First location in load order with exactly this code.
    pub fn find_by_code(&self, code: &str) -> Option<&Location> {
        self.locations.iter().find(|location| location.code == code)
    }

    /// All locations in load order.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }

    /// Top level of the forest, in load order.
    pub fn roots(&self) -> &[LocationNode] {
        &self.roots
    }

    pub fn repairs(&self) -> &[HierarchyRepair] {
        &self.repairs
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn filter(&self, filter: &LocationFilter) -> Vec<&Location> {
        self.locations
            .iter()
            .filter(|location| filter.matches(location))
            .collect()
    }

    pub fn by_type(&self, location_type: LocationType) -> Vec<&Location> {
        self.filter(&LocationFilter::by_type(location_type))
    }

    /// Direct children of `id`, in sibling order.
    pub fn children_of(&self, id: LocationId) -> Vec<&Location> {
        self.get(id)
            .map(|location| {
                location
                    .children
                    .iter()
                    .filter_map(|child_id| self.get(*child_id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The chain from the root down to `id`, inclusive.
    ///
    /// Walks `parent_id` upward and stops at the first parent that does not
    /// resolve. `None` only when `id` itself is unknown.
    pub fn ancestry(&self, id: LocationId) -> Option<Vec<&Location>> {
        let start = self.get(id)?;
        let mut chain = vec![start];
        let mut current = start;

        // Cycles are broken at build time; the bound only guards against a
        // forest assembled some other way.
        while let Some(parent) = current.parent_id.and_then(|parent_id| self.get(parent_id)) {
            if chain.len() > self.locations.len() {
                break;
            }
            chain.push(parent);
            current = parent;
        }

        chain.reverse();
        Some(chain)
    }
}

/// `ORDER BY parent_id, position, name` with NULL parents first.
fn load_order(a: &Location, b: &Location) -> Ordering {
    a.parent_id
        .cmp(&b.parent_id)
        .then(a.position.cmp(&b.position))
        .then_with(|| a.name.cmp(&b.name))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

/// Follow every parent chain once; any chain that comes back to a location
/// already on the current path is a cycle, and every member of it is
/// demoted to root. Locations hanging off a cycle keep their parent.
fn break_cycles(
    locations: &mut [Location],
    index: &HashMap<LocationId, usize>,
    repairs: &mut Vec<HierarchyRepair>,
) {
    let mut marks = vec![Mark::Unvisited; locations.len()];
    let mut path: Vec<usize> = Vec::new();

    for start in 0..locations.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }

        path.clear();
        let mut current = Some(start);
        while let Some(slot) = current {
            match marks[slot] {
                Mark::Done => break,
                Mark::OnPath => {
                    if let Some(from) = path.iter().position(|&s| s == slot) {
                        let members = path[from..]
                            .iter()
                            .map(|&member| {
                                locations[member].parent_id = None;
                                locations[member].id
                            })
                            .collect();
                        repairs.push(HierarchyRepair::Cycle { members });
                    }
                    break;
                }
                Mark::Unvisited => {
                    marks[slot] = Mark::OnPath;
                    path.push(slot);
                    current = locations[slot]
                        .parent_id
                        .and_then(|parent_id| index.get(&parent_id).copied());
                }
            }
        }

        for &slot in &path {
            marks[slot] = Mark::Done;
        }
    }
}

/// Depth-first from every root. A location at [`MAX_DEPTH`] loses its
/// children to `root_slots`, where they restart at level 0.
fn assign_levels(
    locations: &mut [Location],
    index: &HashMap<LocationId, usize>,
    root_slots: &mut Vec<usize>,
    repairs: &mut Vec<HierarchyRepair>,
) {
    let mut pending: Vec<(usize, u32)> = root_slots.iter().map(|&slot| (slot, 0)).collect();

    while let Some((slot, level)) = pending.pop() {
        locations[slot].level = level;

        if level >= MAX_DEPTH {
            let parent = locations[slot].id;
            for child_id in std::mem::take(&mut locations[slot].children) {
                if let Some(&child_slot) = index.get(&child_id) {
                    locations[child_slot].parent_id = None;
                    repairs.push(HierarchyRepair::DepthExceeded { id: child_id, parent });
                    root_slots.push(child_slot);
                    pending.push((child_slot, 0));
                }
            }
            continue;
        }

        pending.extend(
            locations[slot]
                .children
                .iter()
                .filter_map(|child_id| index.get(child_id))
                .map(|&child_slot| (child_slot, level + 1)),
        );
    }
}

/// Build the nested copy bottom-up: breadth-first order from the roots,
/// then walk it backwards so every child node exists before its parent.
fn materialize(
    root_slots: &[usize],
    locations: &[Location],
    index: &HashMap<LocationId, usize>,
) -> Vec<LocationNode> {
    let mut order: Vec<usize> = Vec::with_capacity(locations.len());
    order.extend_from_slice(root_slots);
    let mut cursor = 0;
    while cursor < order.len() {
        let slot = order[cursor];
        cursor += 1;
        order.extend(
            locations[slot]
                .children
                .iter()
                .filter_map(|child_id| index.get(child_id).copied()),
        );
    }

    let mut built: Vec<Option<LocationNode>> = (0..locations.len()).map(|_| None).collect();
    for &slot in order.iter().rev() {
        let location = &locations[slot];
        let sublocations = location
            .children
            .iter()
            .filter_map(|child_id| index.get(child_id))
            .filter_map(|&child_slot| built[child_slot].take())
            .collect();
        built[slot] = Some(LocationNode {
            location: location.clone(),
            sublocations,
        });
    }

    root_slots
        .iter()
        .filter_map(|&slot| built[slot].take())
        .collect()
}

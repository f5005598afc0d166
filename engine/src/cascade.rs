// engine/src/cascade.rs

use serde_json::json;
use std::collections::BTreeMap;
use tracing::debug;

use models::{Collection, EntityId, HierarchyResult};
use storage::{EntityRepository, WriteBatch};

/// One parent→child containment edge of the hierarchy.
#[derive(Debug, Clone, Copy)]
pub struct HierarchyEdge {
    pub parent: Collection,
    pub child: Collection,
    /// Foreign-key field on child rows pointing at the parent.
    pub parent_field: &'static str,
}

/// The containment chain. Every level reuses the same walk below; adding a
/// level (e.g. positions under services) is an entry here, not new code.
pub const HIERARCHY_EDGES: &[HierarchyEdge] = &[
    HierarchyEdge {
        parent: Collection::HealthSystems,
        child: Collection::Hospitals,
        parent_field: "health_system_id",
    },
    HierarchyEdge {
        parent: Collection::Hospitals,
        child: Collection::Departments,
        parent_field: "hospital_id",
    },
    HierarchyEdge {
        parent: Collection::Departments,
        child: Collection::Services,
        parent_field: "department_id",
    },
];

/// entity-type-name → rows transitioned active→inactive.
pub type CascadeCounts = BTreeMap<&'static str, u64>;

fn child_edges(parent: Collection) -> impl Iterator<Item = &'static HierarchyEdge> {
    HIERARCHY_EDGES.iter().filter(move |e| e.parent == parent)
}

/// Collections reachable beneath `root` through the edge table.
fn descendant_collections(root: Collection) -> Vec<Collection> {
    let mut found = Vec::new();
    let mut frontier = vec![root];
    while let Some(parent) = frontier.pop() {
        for edge in child_edges(parent) {
            if !found.contains(&edge.child) {
                found.push(edge.child);
                frontier.push(edge.child);
            }
        }
    }
    found
}

/// Plans the deactivation cascade for an entity into `batch`: every
/// descendant row observed active gets an `is_active: false` patch and is
/// counted; already-inactive rows are neither patched nor counted, so
/// re-running the cascade over a deactivated subtree yields all-zero
/// counts. Inactive rows are still walked, so active stragglers beneath an
/// inactive parent are caught.
///
/// The caller owns the batch: the parent's own flip and this cascade commit
/// together or not at all. Activation never goes through here — reactivating
/// a parent leaves previously cascaded children inactive by contract.
pub async fn plan_deactivation_cascade(
    repo: &dyn EntityRepository,
    root_collection: Collection,
    root_id: EntityId,
    batch: &mut WriteBatch,
) -> HierarchyResult<CascadeCounts> {
    let mut counts: CascadeCounts = descendant_collections(root_collection)
        .into_iter()
        .map(|c| (c.as_str(), 0))
        .collect();

    let mut frontier = vec![(root_collection, root_id)];
    while let Some((collection, id)) = frontier.pop() {
        for edge in child_edges(collection) {
            let children = repo
                .query_by_foreign_key(edge.child, edge.parent_field, &id.as_value())
                .await?;
            for child in children {
                if child.is_active() {
                    let mut partial = models::Document::new();
                    partial.insert("is_active".to_string(), json!(false));
                    batch.patch(child.id, partial);
                    *counts.entry(edge.child.as_str()).or_insert(0) += 1;
                }
                frontier.push((edge.child, child.id));
            }
        }
    }

    debug!(root = %root_id, ?counts, "planned deactivation cascade");
    Ok(counts)
}

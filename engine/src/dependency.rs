// engine/src/dependency.rs

use serde_json::Value;
use std::collections::BTreeSet;

use models::{Blocker, Collection, EntityId, HierarchyResult};
use storage::{EntityRepository, StoredDocument};

/// Result of a hard-delete dependency check.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteCheck {
    pub can_delete: bool,
    /// One entry per blocking entity type, counting rows that *exist* —
    /// deletion safety is about referential existence, not activity.
    pub blockers: Vec<Blocker>,
}

impl DeleteCheck {
    fn from_counts(counts: Vec<(Collection, u64)>) -> Self {
        let blockers: Vec<Blocker> = counts
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(collection, count)| Blocker {
                entity_type: collection.as_str().to_string(),
                count,
            })
            .collect();
        DeleteCheck {
            can_delete: blockers.is_empty(),
            blockers,
        }
    }
}

/// Read-only, side-effect-free check of whether `stored` can be hard-deleted
/// without orphaning dependents. Walks the full subtree, not just immediate
/// children: a health system can be apparently childless at the hospital
/// level while departments still point at it through the denormalized
/// `health_system_id` field.
pub async fn can_delete(
    repo: &dyn EntityRepository,
    stored: &StoredDocument,
) -> HierarchyResult<DeleteCheck> {
    match stored.collection {
        Collection::HealthSystems => health_system_check(repo, stored.id).await,
        Collection::Hospitals => hospital_check(repo, stored.id).await,
        Collection::Departments => department_check(repo, stored.id).await,
        // Leaves of the hierarchy, and rows outside it, have no dependents
        // this core tracks.
        _ => Ok(DeleteCheck {
            can_delete: true,
            blockers: Vec::new(),
        }),
    }
}

async fn health_system_check(
    repo: &dyn EntityRepository,
    id: EntityId,
) -> HierarchyResult<DeleteCheck> {
    let hospitals = repo
        .query_by_foreign_key(Collection::Hospitals, "health_system_id", &id.as_value())
        .await?;

    // Departments under those hospitals, unioned with departments that
    // reference the system only via the denormalized back-reference.
    let mut department_ids: BTreeSet<EntityId> = BTreeSet::new();
    for hospital in &hospitals {
        for department in repo
            .query_by_foreign_key(Collection::Departments, "hospital_id", &hospital.id.as_value())
            .await?
        {
            department_ids.insert(department.id);
        }
    }
    for orphan in repo
        .query_by_foreign_key(Collection::Departments, "health_system_id", &id.as_value())
        .await?
    {
        department_ids.insert(orphan.id);
    }

    let mut service_count = 0u64;
    for department_id in &department_ids {
        service_count += count_services(repo, *department_id).await?;
    }

    // Seeded default job types travel with their system and never block;
    // custom ones do.
    let custom_job_types = repo
        .query_by_foreign_key(Collection::JobTypes, "health_system_id", &id.as_value())
        .await?
        .into_iter()
        .filter(|row| row.doc.get("is_default") != Some(&Value::Bool(true)))
        .count() as u64;

    Ok(DeleteCheck::from_counts(vec![
        (Collection::Hospitals, hospitals.len() as u64),
        (Collection::Departments, department_ids.len() as u64),
        (Collection::Services, service_count),
        (Collection::JobTypes, custom_job_types),
    ]))
}

async fn hospital_check(repo: &dyn EntityRepository, id: EntityId) -> HierarchyResult<DeleteCheck> {
    let departments = repo
        .query_by_foreign_key(Collection::Departments, "hospital_id", &id.as_value())
        .await?;
    let mut service_count = 0u64;
    for department in &departments {
        service_count += count_services(repo, department.id).await?;
    }
    Ok(DeleteCheck::from_counts(vec![
        (Collection::Departments, departments.len() as u64),
        (Collection::Services, service_count),
    ]))
}

async fn department_check(
    repo: &dyn EntityRepository,
    id: EntityId,
) -> HierarchyResult<DeleteCheck> {
    let services = count_services(repo, id).await?;
    Ok(DeleteCheck::from_counts(vec![(
        Collection::Services,
        services,
    )]))
}

async fn count_services(repo: &dyn EntityRepository, department_id: EntityId) -> HierarchyResult<u64> {
    Ok(repo
        .query_by_foreign_key(Collection::Services, "department_id", &department_id.as_value())
        .await?
        .len() as u64)
}

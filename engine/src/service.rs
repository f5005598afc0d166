// engine/src/service.rs

use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

use models::hierarchy::{AuditAction, Department, HealthSystem, Hospital, JobType, Service};
use models::{
    slug, Collection, Document, EntityId, HierarchyError, HierarchyResult, ValidationError,
};
use security::{authorize, Access, EntityScope, IdentityResolver};
use storage::{EntityRepository, StoredDocument, WriteBatch};

use crate::audit::AuditRecorder;
use crate::cascade::{plan_deactivation_cascade, CascadeCounts};
use crate::dependency::{can_delete as dependency_check, DeleteCheck};
use crate::scope::resolve_entity_scope;

/// Result of `create_health_system`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedHealthSystem {
    pub id: EntityId,
    pub job_types_created: usize,
}

/// Result of `toggle_active` / `set_active`.
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleOutcome {
    pub is_active: bool,
    /// Present only when the transition was a deactivation.
    pub cascade_affected: Option<CascadeCounts>,
}

/// The mutation and query surface over the hierarchy.
///
/// Every mutation follows the same shape: resolve identity (hard) →
/// authorize against the target's scope → plan all writes into one
/// `WriteBatch` → append the audit entry → commit once. A failure at any
/// step before commit leaves no writes and no audit row.
#[derive(Debug, Clone)]
pub struct HierarchyService {
    repo: Arc<dyn EntityRepository>,
    identity: IdentityResolver,
    recorder: AuditRecorder,
}

impl HierarchyService {
    pub fn new(repo: Arc<dyn EntityRepository>) -> Self {
        let identity = IdentityResolver::new(Arc::clone(&repo));
        HierarchyService {
            repo,
            identity,
            recorder: AuditRecorder::new(),
        }
    }

    pub fn repository(&self) -> &Arc<dyn EntityRepository> {
        &self.repo
    }

    // --- mutations ---

    /// Creates a health system and seeds the default job-type set for it,
    /// all in one batch. The derived slug must be unique across all health
    /// systems.
    pub async fn create_health_system(
        &self,
        subject: Option<&str>,
        name: &str,
    ) -> HierarchyResult<CreatedHealthSystem> {
        let user = self.identity.require(subject).await?;
        // Health systems have no parent scope; the empty scope admits only
        // super_admin through the policy table.
        authorize(&user, &EntityScope::default(), Access::Full)?;

        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        let slug = slug::derive_slug(name)?;
        if self
            .repo
            .query_by_unique_key(Collection::HealthSystems, "slug", &json!(slug))
            .await?
            .is_some()
        {
            return Err(ValidationError::DuplicateSlug(slug).into());
        }

        let system = HealthSystem::new(name.to_string(), slug.clone(), user.id);
        let job_types = JobType::default_set(system.id);

        let mut batch = WriteBatch::new();
        batch.insert_entity(&system)?;
        for job_type in &job_types {
            batch.insert_entity(job_type)?;
        }
        self.recorder.append(
            &mut batch,
            user.id,
            AuditAction::Create,
            Collection::HealthSystems,
            system.id,
            changes(&[
                ("name", json!(name)),
                ("slug", json!(slug)),
                ("job_types_created", json!(job_types.len())),
            ]),
        )?;
        self.repo.commit(batch).await?;

        info!(id = %system.id, %slug, "created health system");
        Ok(CreatedHealthSystem {
            id: system.id,
            job_types_created: job_types.len(),
        })
    }

    pub async fn create_hospital(
        &self,
        subject: Option<&str>,
        health_system_id: EntityId,
        name: &str,
    ) -> HierarchyResult<EntityId> {
        let user = self.identity.require(subject).await?;
        let parent = self.require_row(health_system_id, Collection::HealthSystems).await?;
        let scope = resolve_entity_scope(self.repo.as_ref(), &parent).await?;
        authorize(&user, &scope, Access::Full)?;

        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }

        let hospital = Hospital::new(health_system_id, name.to_string());
        let mut batch = WriteBatch::new();
        batch.insert_entity(&hospital)?;
        self.recorder.append(
            &mut batch,
            user.id,
            AuditAction::Create,
            Collection::Hospitals,
            hospital.id,
            changes(&[
                ("name", json!(name)),
                ("health_system_id", health_system_id.as_value()),
            ]),
        )?;
        self.repo.commit(batch).await?;

        info!(id = %hospital.id, "created hospital");
        Ok(hospital.id)
    }

    /// Creates a department under a hospital. The department's
    /// `health_system_id` is always copied from the hospital, never caller
    /// supplied, so the denormalization invariant holds from birth.
    pub async fn create_department(
        &self,
        subject: Option<&str>,
        hospital_id: EntityId,
        name: &str,
    ) -> HierarchyResult<EntityId> {
        let user = self.identity.require(subject).await?;
        let hospital = self.require_row(hospital_id, Collection::Hospitals).await?;
        let scope = resolve_entity_scope(self.repo.as_ref(), &hospital).await?;
        authorize(&user, &scope, Access::Full)?;

        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        let health_system_id = hospital
            .foreign_key("health_system_id")
            .ok_or(ValidationError::MalformedField("health_system_id"))?;

        let department = Department::new(hospital_id, health_system_id, name.to_string());
        let mut batch = WriteBatch::new();
        batch.insert_entity(&department)?;
        self.recorder.append(
            &mut batch,
            user.id,
            AuditAction::Create,
            Collection::Departments,
            department.id,
            changes(&[
                ("name", json!(name)),
                ("hospital_id", hospital_id.as_value()),
                ("health_system_id", health_system_id.as_value()),
            ]),
        )?;
        self.repo.commit(batch).await?;

        info!(id = %department.id, "created department");
        Ok(department.id)
    }

    pub async fn create_service(
        &self,
        subject: Option<&str>,
        department_id: EntityId,
        name: &str,
        provider_capacity: u32,
    ) -> HierarchyResult<EntityId> {
        let user = self.identity.require(subject).await?;
        let department = self.require_row(department_id, Collection::Departments).await?;
        let scope = resolve_entity_scope(self.repo.as_ref(), &department).await?;
        authorize(&user, &scope, Access::Full)?;

        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }

        let service = Service::new(department_id, name.to_string(), provider_capacity);
        let mut batch = WriteBatch::new();
        batch.insert_entity(&service)?;
        self.recorder.append(
            &mut batch,
            user.id,
            AuditAction::Create,
            Collection::Services,
            service.id,
            changes(&[
                ("name", json!(name)),
                ("department_id", department_id.as_value()),
                ("provider_capacity", json!(provider_capacity)),
            ]),
        )?;
        self.repo.commit(batch).await?;

        info!(id = %service.id, "created service");
        Ok(service.id)
    }

    /// Flips an entity's `is_active` flag. Deactivation cascades to every
    /// currently-active descendant in the same atomic batch; activation
    /// never cascades — children previously deactivated by a cascade stay
    /// inactive until reactivated level by level.
    pub async fn toggle_active(
        &self,
        subject: Option<&str>,
        id: EntityId,
    ) -> HierarchyResult<ToggleOutcome> {
        // Identity first, like every other mutation; an anonymous caller
        // must not learn from the error whether the id exists.
        self.identity.require(subject).await?;
        let current = self
            .repo
            .get(id)
            .await?
            .ok_or(HierarchyError::NotFound(id))?
            .is_active();
        self.set_active(subject, id, !current).await
    }

    /// Explicit-target variant of [`toggle_active`](Self::toggle_active);
    /// setting an already-inactive subtree inactive again is a no-op cascade
    /// reporting zero counts at every level.
    pub async fn set_active(
        &self,
        subject: Option<&str>,
        id: EntityId,
        active: bool,
    ) -> HierarchyResult<ToggleOutcome> {
        let user = self.identity.require(subject).await?;
        let stored = self.repo.get(id).await?.ok_or(HierarchyError::NotFound(id))?;
        let scope = resolve_entity_scope(self.repo.as_ref(), &stored).await?;
        authorize(&user, &scope, Access::Full)?;

        let mut batch = WriteBatch::new();
        batch.patch(id, changes(&[("is_active", json!(active))]));

        let cascade_affected = if active {
            None
        } else {
            Some(
                plan_deactivation_cascade(self.repo.as_ref(), stored.collection, id, &mut batch)
                    .await?,
            )
        };

        let mut audit_changes = changes(&[("is_active", json!(active))]);
        if let Some(counts) = &cascade_affected {
            audit_changes.insert("cascade_affected".to_string(), json!(counts));
        }
        self.recorder.append(
            &mut batch,
            user.id,
            if active {
                AuditAction::Activate
            } else {
                AuditAction::Deactivate
            },
            stored.collection,
            id,
            audit_changes,
        )?;
        self.repo.commit(batch).await?;

        info!(%id, active, "toggled entity");
        Ok(ToggleOutcome {
            is_active: active,
            cascade_affected,
        })
    }

    /// Hard-deletes an entity. The dependency walk runs again here, inside
    /// the mutation, so a row created after an earlier `can_delete` said
    /// yes still blocks with `Conflict` — the standalone check is advisory
    /// only. Deleting a health system removes its seeded job types in the
    /// same batch.
    pub async fn delete(&self, subject: Option<&str>, id: EntityId) -> HierarchyResult<()> {
        let user = self.identity.require(subject).await?;
        let stored = self.repo.get(id).await?.ok_or(HierarchyError::NotFound(id))?;
        let scope = resolve_entity_scope(self.repo.as_ref(), &stored).await?;
        authorize(&user, &scope, Access::Full)?;

        let check = dependency_check(self.repo.as_ref(), &stored).await?;
        if !check.can_delete {
            debug!(%id, blockers = check.blockers.len(), "delete blocked");
            return Err(HierarchyError::Conflict {
                blockers: check.blockers,
            });
        }

        let mut batch = WriteBatch::new();
        if stored.collection == Collection::HealthSystems {
            for job_type in self
                .repo
                .query_by_foreign_key(Collection::JobTypes, "health_system_id", &id.as_value())
                .await?
            {
                batch.delete(job_type.id);
            }
        }
        batch.delete(id);

        let mut audit_changes = Document::new();
        if let Some(name) = stored.doc.get("name") {
            audit_changes.insert("name".to_string(), name.clone());
        }
        self.recorder.append(
            &mut batch,
            user.id,
            AuditAction::Delete,
            stored.collection,
            id,
            audit_changes,
        )?;
        self.repo.commit(batch).await?;

        info!(%id, collection = %stored.collection, "deleted entity");
        Ok(())
    }

    // --- reads ---

    /// Dependency check as an authorized read: no writes, no audit entry.
    pub async fn can_delete(
        &self,
        subject: Option<&str>,
        id: EntityId,
    ) -> HierarchyResult<DeleteCheck> {
        let user = self.identity.require(subject).await?;
        let stored = self.repo.get(id).await?.ok_or(HierarchyError::NotFound(id))?;
        let scope = resolve_entity_scope(self.repo.as_ref(), &stored).await?;
        authorize(&user, &scope, Access::ReadOnly)?;
        dependency_check(self.repo.as_ref(), &stored).await
    }

    /// Lists rows of one collection, optionally filtered to a parent id,
    /// trimmed to what the caller may read. An unresolvable identity yields
    /// an empty collection, never an error.
    pub async fn list(
        &self,
        subject: Option<&str>,
        collection: Collection,
        parent: Option<EntityId>,
    ) -> HierarchyResult<Vec<StoredDocument>> {
        let Some(user) = self.identity.resolve(subject).await? else {
            return Ok(Vec::new());
        };

        let rows = match (parent, parent_field(collection)) {
            (Some(parent_id), Some(field)) => {
                self.repo
                    .query_by_foreign_key(collection, field, &parent_id.as_value())
                    .await?
            }
            _ => self.repo.scan(collection).await?,
        };

        let mut visible = Vec::new();
        for row in rows {
            let scope = resolve_entity_scope(self.repo.as_ref(), &row).await?;
            if authorize(&user, &scope, Access::ReadOnly).is_ok() {
                visible.push(row);
            }
        }
        Ok(visible)
    }

    /// Point read. Absent identity, absent row, and out-of-scope row are
    /// all `None` — callers cannot distinguish them.
    pub async fn get(
        &self,
        subject: Option<&str>,
        id: EntityId,
    ) -> HierarchyResult<Option<StoredDocument>> {
        let Some(user) = self.identity.resolve(subject).await? else {
            return Ok(None);
        };
        let Some(stored) = self.repo.get(id).await? else {
            return Ok(None);
        };
        let scope = resolve_entity_scope(self.repo.as_ref(), &stored).await?;
        match authorize(&user, &scope, Access::ReadOnly) {
            Ok(()) => Ok(Some(stored)),
            Err(_) => Ok(None),
        }
    }

    // --- helpers ---

    async fn require_row(
        &self,
        id: EntityId,
        collection: Collection,
    ) -> HierarchyResult<StoredDocument> {
        match self.repo.get(id).await? {
            Some(stored) if stored.collection == collection => Ok(stored),
            _ => Err(HierarchyError::NotFound(id)),
        }
    }
}

/// Parent-foreign-key field used by `list` when a parent filter is given.
fn parent_field(collection: Collection) -> Option<&'static str> {
    match collection {
        Collection::Hospitals | Collection::JobTypes => Some("health_system_id"),
        Collection::Departments => Some("hospital_id"),
        Collection::Services => Some("department_id"),
        Collection::HealthSystems | Collection::Users | Collection::AuditLogs => None,
    }
}

fn changes(pairs: &[(&str, serde_json::Value)]) -> Document {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_string(), value.clone()))
        .collect()
}

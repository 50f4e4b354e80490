use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{instrument, warn};

use crate::auth::permissions::static_defaults_for_role;
use crate::db::DbPool;
use crate::entities::{permission_grants, permission_revokes, role_permissions, user_permission_overrides, users};
use crate::errors::ServiceError;

/// The effective permission set for one user, with a per-key breakdown of
/// which source decided it.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ResolvedPermissions {
    pub user_id: i64,
    pub role: String,
    pub permissions: BTreeSet<String>,
    /// Per-key source that decided each effective permission:
    /// "role-default", "override", "legacy-grant" or "legacy-revoke".
    pub sources: BTreeMap<String, String>,
    /// The raw per-source lists the merge actually used.
    pub breakdown: PermissionBreakdown,
}

/// The source lists behind a resolution, kept verbatim for audit/UI
/// display. `base` is the role-default list actually used (table rows or
/// the static fallback), the rest restate the override and legacy rows.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct PermissionBreakdown {
    pub base: BTreeSet<String>,
    pub override_grants: BTreeSet<String>,
    pub override_denies: BTreeSet<String>,
    pub legacy_grants: BTreeSet<String>,
    pub legacy_revokes: BTreeSet<String>,
}

impl PermissionBreakdown {
    pub fn from_inputs(inputs: &PermissionInputs) -> Self {
        let mut breakdown = Self {
            base: inputs.role_defaults.iter().cloned().collect(),
            legacy_grants: inputs.legacy_grants.iter().cloned().collect(),
            legacy_revokes: inputs.legacy_revokes.iter().cloned().collect(),
            ..Default::default()
        };
        for (key, allowed) in &inputs.overrides {
            if *allowed {
                breakdown.override_grants.insert(key.clone());
            } else {
                breakdown.override_denies.insert(key.clone());
            }
        }
        breakdown
    }
}

/// Raw inputs to [`merge_permission_sources`], one entry per source row.
#[derive(Debug, Default)]
pub struct PermissionInputs {
    /// Keys allowed by the user's role (table rows or static fallback).
    pub role_defaults: Vec<String>,
    /// Per-user overrides: (perm_key, allowed).
    pub overrides: Vec<(String, bool)>,
    /// Legacy grant rows.
    pub legacy_grants: Vec<String>,
    /// Legacy revoke rows.
    pub legacy_revokes: Vec<String>,
}

/// Merge the four permission sources into an effective set.
///
/// Precedence, weakest to strongest: role defaults, then per-user overrides,
/// then legacy grants, then legacy revokes. A legacy revoke always wins, even
/// over an explicit override that allows the key.
pub fn merge_permission_sources(inputs: &PermissionInputs) -> (BTreeSet<String>, BTreeMap<String, String>) {
    let mut effective: BTreeSet<String> = BTreeSet::new();
    let mut sources: BTreeMap<String, String> = BTreeMap::new();

    for key in &inputs.role_defaults {
        effective.insert(key.clone());
        sources.insert(key.clone(), "role-default".to_string());
    }

    for (key, allowed) in &inputs.overrides {
        if *allowed {
            effective.insert(key.clone());
        } else {
            effective.remove(key);
        }
        sources.insert(key.clone(), "override".to_string());
    }

    for key in &inputs.legacy_grants {
        if effective.insert(key.clone()) {
            sources.insert(key.clone(), "legacy-grant".to_string());
        }
    }

    for key in &inputs.legacy_revokes {
        effective.remove(key);
        sources.insert(key.clone(), "legacy-revoke".to_string());
    }

    (effective, sources)
}

/// Resolves effective permissions from role defaults, per-user overrides and
/// the legacy grant/revoke tables. Each source degrades independently: a
/// query failure in one source is logged and treated as empty rather than
/// failing the whole resolution.
pub struct PermissionResolver {
    db: Arc<DbPool>,
}

impl PermissionResolver {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn resolve(&self, user_id: i64, role: &str) -> Result<ResolvedPermissions, ServiceError> {
        let inputs = PermissionInputs {
            role_defaults: self.load_role_defaults(role).await,
            overrides: self.load_overrides(user_id).await,
            legacy_grants: self.load_legacy_grants(user_id).await,
            legacy_revokes: self.load_legacy_revokes(user_id).await,
        };

        let (permissions, sources) = merge_permission_sources(&inputs);
        let breakdown = PermissionBreakdown::from_inputs(&inputs);

        Ok(ResolvedPermissions {
            user_id,
            role: role.to_string(),
            permissions,
            sources,
            breakdown,
        })
    }

    /// Resolve for a user looked up by id. 404 when the user does not exist
    /// or is soft-deleted.
    pub async fn resolve_for_user(&self, user_id: i64) -> Result<ResolvedPermissions, ServiceError> {
        let user = users::Entity::find_by_id(user_id)
            .filter(users::Column::IsDeleted.eq(false))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", user_id)))?;

        self.resolve(user.id, &user.role).await
    }

    /// Role defaults come from the `role_permissions` table; when the table
    /// has no rows for the role (or the query fails) the built-in defaults
    /// for that role apply, falling back to the viewer set for unknown roles.
    async fn load_role_defaults(&self, role: &str) -> Vec<String> {
        match role_permissions::Entity::find()
            .filter(role_permissions::Column::Role.eq(role))
            .all(&*self.db)
            .await
        {
            Ok(rows) if !rows.is_empty() => rows
                .into_iter()
                .filter(|r| r.allowed)
                .map(|r| r.perm_key)
                .collect(),
            Ok(_) => static_defaults_for_role(role)
                .iter()
                .map(|k| k.to_string())
                .collect(),
            Err(e) => {
                warn!(role, error = %e, "role_permissions query failed, using static defaults");
                static_defaults_for_role(role)
                    .iter()
                    .map(|k| k.to_string())
                    .collect()
            }
        }
    }

    async fn load_overrides(&self, user_id: i64) -> Vec<(String, bool)> {
        match user_permission_overrides::Entity::find()
            .filter(user_permission_overrides::Column::UserId.eq(user_id))
            .all(&*self.db)
            .await
        {
            Ok(rows) => rows.into_iter().map(|r| (r.perm_key, r.allowed)).collect(),
            Err(e) => {
                warn!(user_id, error = %e, "override query failed, treating as empty");
                Vec::new()
            }
        }
    }

    async fn load_legacy_grants(&self, user_id: i64) -> Vec<String> {
        match permission_grants::Entity::find()
            .filter(permission_grants::Column::UserId.eq(user_id))
            .all(&*self.db)
            .await
        {
            Ok(rows) => rows.into_iter().map(|r| r.perm_key).collect(),
            Err(e) => {
                warn!(user_id, error = %e, "legacy grant query failed, treating as empty");
                Vec::new()
            }
        }
    }

    async fn load_legacy_revokes(&self, user_id: i64) -> Vec<String> {
        match permission_revokes::Entity::find()
            .filter(permission_revokes::Column::UserId.eq(user_id))
            .all(&*self.db)
            .await
        {
            Ok(rows) => rows.into_iter().map(|r| r.perm_key).collect(),
            Err(e) => {
                warn!(user_id, error = %e, "legacy revoke query failed, treating as empty");
                Vec::new()
            }
        }
    }

    /// Upsert a per-user override for one permission key.
    #[instrument(skip(self))]
    pub async fn set_override(
        &self,
        user_id: i64,
        perm_key: &str,
        allowed: bool,
    ) -> Result<user_permission_overrides::Model, ServiceError> {
        users::Entity::find_by_id(user_id)
            .filter(users::Column::IsDeleted.eq(false))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", user_id)))?;

        let existing = user_permission_overrides::Entity::find()
            .filter(user_permission_overrides::Column::UserId.eq(user_id))
            .filter(user_permission_overrides::Column::PermKey.eq(perm_key))
            .one(&*self.db)
            .await?;

        let model = match existing {
            Some(row) => {
                let mut active: user_permission_overrides::ActiveModel = row.into();
                active.allowed = Set(allowed);
                active.update(&*self.db).await?
            }
            None => {
                let active = user_permission_overrides::ActiveModel {
                    user_id: Set(user_id),
                    perm_key: Set(perm_key.to_string()),
                    allowed: Set(allowed),
                    ..Default::default()
                };
                active.insert(&*self.db).await?
            }
        };

        Ok(model)
    }

    /// Remove a per-user override, letting the role default (or legacy rows)
    /// decide the key again. 404 when no such override exists.
    #[instrument(skip(self))]
    pub async fn clear_override(&self, user_id: i64, perm_key: &str) -> Result<(), ServiceError> {
        let existing = user_permission_overrides::Entity::find()
            .filter(user_permission_overrides::Column::UserId.eq(user_id))
            .filter(user_permission_overrides::Column::PermKey.eq(perm_key))
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "No override for user {} and key {}",
                    user_id, perm_key
                ))
            })?;

        user_permission_overrides::Entity::delete_by_id(existing.id)
            .exec(&*self.db)
            .await?;
        Ok(())
    }
}

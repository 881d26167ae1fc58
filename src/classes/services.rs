use tracing::{debug, info};
use uuid::Uuid;

use super::{
    dto::ClassDraft,
    random::roll_class,
    repo::ClassRepository,
    repo_types::CharacterClass,
    validation::validate,
};
use crate::error::AppError;

const RESOURCE: &str = "CharacterClass";

pub async fn create_class(
    repo: &dyn ClassRepository,
    draft: ClassDraft,
) -> Result<CharacterClass, AppError> {
    let class = validate(&draft)?;
    let created = repo.insert(class).await?;
    info!(class_id = %created.id, name = %created.name, "character class created");
    Ok(created)
}

pub async fn create_random_class(repo: &dyn ClassRepository) -> Result<CharacterClass, AppError> {
    let draft = roll_class(&mut rand::thread_rng());
    debug!(?draft, "rolled random class");
    create_class(repo, draft).await
}

pub async fn get_class(repo: &dyn ClassRepository, id: Uuid) -> Result<CharacterClass, AppError> {
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(RESOURCE, id))
}

pub async fn list_classes(repo: &dyn ClassRepository) -> Result<Vec<CharacterClass>, AppError> {
    Ok(repo.list().await?)
}

/// Merges the patch over the stored record and re-validates the result.
pub async fn update_class(
    repo: &dyn ClassRepository,
    id: Uuid,
    patch: ClassDraft,
) -> Result<CharacterClass, AppError> {
    let current = get_class(repo, id).await?;
    let class = validate(&patch.merged_over(&current))?;
    let updated = repo
        .replace(id, class)
        .await?
        .ok_or_else(|| AppError::not_found(RESOURCE, id))?;
    info!(class_id = %id, "character class updated");
    Ok(updated)
}

pub async fn delete_class(
    repo: &dyn ClassRepository,
    id: Uuid,
) -> Result<CharacterClass, AppError> {
    let deleted = repo
        .delete(id)
        .await?
        .ok_or_else(|| AppError::not_found(RESOURCE, id))?;
    info!(class_id = %id, "character class deleted");
    Ok(deleted)
}

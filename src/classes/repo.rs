use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::repo_types::{CharacterClass, NewCharacterClass};

#[async_trait]
pub trait ClassRepository: Send + Sync {
    async fn insert(&self, class: NewCharacterClass) -> anyhow::Result<CharacterClass>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<CharacterClass>>;
    /// Oldest first.
    async fn list(&self) -> anyhow::Result<Vec<CharacterClass>>;
    /// Overwrites every field of an existing record. `None` if the id is unknown.
    async fn replace(
        &self,
        id: Uuid,
        class: NewCharacterClass,
    ) -> anyhow::Result<Option<CharacterClass>>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<CharacterClass>>;
}

const COLUMNS: &str =
    "id, name, hp, mana, speed, strength, intelligence, agility, description, version";

#[derive(Clone)]
pub struct PgClassRepository {
    db: PgPool,
}

impl PgClassRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ClassRepository for PgClassRepository {
    async fn insert(&self, class: NewCharacterClass) -> anyhow::Result<CharacterClass> {
        let sql = format!(
            r#"
            INSERT INTO character_classes
                (id, name, hp, mana, speed, strength, intelligence, agility, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, CharacterClass>(&sql)
            .bind(Uuid::new_v4())
            .bind(&class.name)
            .bind(class.hp)
            .bind(class.mana)
            .bind(class.speed)
            .bind(class.strength)
            .bind(class.intelligence)
            .bind(class.agility)
            .bind(&class.description)
            .fetch_one(&self.db)
            .await
            .context("insert character class")?;
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<CharacterClass>> {
        let sql = format!("SELECT {COLUMNS} FROM character_classes WHERE id = $1");
        let row = sqlx::query_as::<_, CharacterClass>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .context("find character class")?;
        Ok(row)
    }

    async fn list(&self) -> anyhow::Result<Vec<CharacterClass>> {
        let sql = format!("SELECT {COLUMNS} FROM character_classes ORDER BY created_at ASC, id");
        let rows = sqlx::query_as::<_, CharacterClass>(&sql)
            .fetch_all(&self.db)
            .await
            .context("list character classes")?;
        Ok(rows)
    }

    async fn replace(
        &self,
        id: Uuid,
        class: NewCharacterClass,
    ) -> anyhow::Result<Option<CharacterClass>> {
        let sql = format!(
            r#"
            UPDATE character_classes
               SET name = $2, hp = $3, mana = $4, speed = $5, strength = $6,
                   intelligence = $7, agility = $8, description = $9
             WHERE id = $1
            RETURNING {COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, CharacterClass>(&sql)
            .bind(id)
            .bind(&class.name)
            .bind(class.hp)
            .bind(class.mana)
            .bind(class.speed)
            .bind(class.strength)
            .bind(class.intelligence)
            .bind(class.agility)
            .bind(&class.description)
            .fetch_optional(&self.db)
            .await
            .context("update character class")?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<CharacterClass>> {
        let sql = format!("DELETE FROM character_classes WHERE id = $1 RETURNING {COLUMNS}");
        let row = sqlx::query_as::<_, CharacterClass>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .context("delete character class")?;
        Ok(row)
    }
}

/// Process-local store used when no database is configured, and by tests.
#[derive(Default)]
pub struct MemoryClassRepository {
    rows: RwLock<Vec<CharacterClass>>,
}

#[async_trait]
impl ClassRepository for MemoryClassRepository {
    async fn insert(&self, class: NewCharacterClass) -> anyhow::Result<CharacterClass> {
        let record = class.into_record(Uuid::new_v4(), 0);
        self.rows.write().await.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<CharacterClass>> {
        Ok(self.rows.read().await.iter().find(|c| c.id == id).cloned())
    }

    async fn list(&self) -> anyhow::Result<Vec<CharacterClass>> {
        Ok(self.rows.read().await.clone())
    }

    async fn replace(
        &self,
        id: Uuid,
        class: NewCharacterClass,
    ) -> anyhow::Result<Option<CharacterClass>> {
        let mut rows = self.rows.write().await;
        let Some(slot) = rows.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        *slot = class.into_record(id, slot.version);
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<Option<CharacterClass>> {
        let mut rows = self.rows.write().await;
        let removed = rows
            .iter()
            .position(|c| c.id == id)
            .map(|idx| rows.remove(idx));
        Ok(removed)
    }
}

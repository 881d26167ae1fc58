use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Character class record as stored and returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct CharacterClass {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub hp: i32,
    pub mana: i32,
    pub speed: i32,
    pub strength: i32,
    pub intelligence: i32,
    pub agility: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "__v")]
    pub version: i32, // revision counter
}

/// Validated, coerced field set ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCharacterClass {
    pub name: String,
    pub hp: i32,
    pub mana: i32,
    pub speed: i32,
    pub strength: i32,
    pub intelligence: i32,
    pub agility: i32,
    pub description: Option<String>,
}

impl NewCharacterClass {
    pub fn into_record(self, id: Uuid, version: i32) -> CharacterClass {
        CharacterClass {
            id,
            name: self.name,
            hp: self.hp,
            mana: self.mana,
            speed: self.speed,
            strength: self.strength,
            intelligence: self.intelligence,
            agility: self.agility,
            description: self.description,
            version,
        }
    }
}

use serde::{Deserialize, Deserializer};

use super::repo_types::CharacterClass;

/// Raw numeric input. Clients may send numbers or string-encoded numbers;
/// anything else is kept so validation can report it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StatInput {
    Int(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

impl From<i32> for StatInput {
    fn from(v: i32) -> Self {
        StatInput::Int(v.into())
    }
}

/// Raw text input. Numbers and booleans are cast to their string form during validation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TextInput {
    Text(String),
    Other(serde_json::Value),
}

impl From<&str> for TextInput {
    fn from(s: &str) -> Self {
        TextInput::Text(s.to_string())
    }
}

/// Absent stays `None`, explicit `null` becomes `Some(None)`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Request body for create and the patch body for update.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClassDraft {
    #[serde(default)]
    pub name: Option<TextInput>,
    #[serde(default)]
    pub hp: Option<StatInput>,
    #[serde(default)]
    pub mana: Option<StatInput>,
    #[serde(default)]
    pub speed: Option<StatInput>,
    #[serde(default)]
    pub strength: Option<StatInput>,
    #[serde(default)]
    pub intelligence: Option<StatInput>,
    #[serde(default)]
    pub agility: Option<StatInput>,
    /// `Some(None)` clears the stored description on update.
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<TextInput>>,
}

impl ClassDraft {
    /// Fills every field the patch leaves out with the stored value.
    pub fn merged_over(self, current: &CharacterClass) -> ClassDraft {
        ClassDraft {
            name: self.name.or_else(|| Some(current.name.as_str().into())),
            hp: self.hp.or_else(|| Some(current.hp.into())),
            mana: self.mana.or_else(|| Some(current.mana.into())),
            speed: self.speed.or_else(|| Some(current.speed.into())),
            strength: self.strength.or_else(|| Some(current.strength.into())),
            intelligence: self
                .intelligence
                .or_else(|| Some(current.intelligence.into())),
            agility: self.agility.or_else(|| Some(current.agility.into())),
            description: self
                .description
                .or_else(|| Some(current.description.as_deref().map(TextInput::from))),
        }
    }
}

use std::collections::BTreeMap;

use super::dto::{ClassDraft, StatInput, TextInput};
use super::repo_types::NewCharacterClass;

/// Field name → human-readable message for every rule a draft broke.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("CharacterClass validation failed")]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn into_fields(self) -> BTreeMap<String, String> {
        self.fields
    }

    fn add(&mut self, field: &str, message: String) {
        self.fields.insert(field.to_string(), message);
    }

    fn required(&mut self, field: &str) {
        self.add(field, format!("field `{}` is required.", field));
    }
}

enum Coerced {
    Missing,
    Value(i64),
    Invalid(String),
}

fn coerce(input: Option<&StatInput>) -> Coerced {
    let Some(input) = input else {
        return Coerced::Missing;
    };
    match input {
        StatInput::Int(v) => Coerced::Value(*v),
        StatInput::Float(f) => integral(*f).map_or_else(|| Coerced::Invalid(f.to_string()), Coerced::Value),
        StatInput::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Coerced::Missing;
            }
            if let Ok(v) = trimmed.parse::<i64>() {
                return Coerced::Value(v);
            }
            trimmed
                .parse::<f64>()
                .ok()
                .and_then(integral)
                .map_or_else(|| Coerced::Invalid(format!("{:?}", s)), Coerced::Value)
        }
        StatInput::Other(v) => Coerced::Invalid(v.to_string()),
    }
}

fn integral(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Strings pass through, numbers and booleans take their string form.
fn cast_text(errors: &mut ValidationErrors, field: &str, input: &TextInput) -> Option<String> {
    match input {
        TextInput::Text(s) => Some(s.clone()),
        TextInput::Other(v @ (serde_json::Value::Number(_) | serde_json::Value::Bool(_))) => {
            Some(v.to_string())
        }
        TextInput::Other(v) => {
            errors.add(
                field,
                format!("field `{}` ({}) could not be cast to a string.", field, v),
            );
            None
        }
    }
}

fn check_stat(
    errors: &mut ValidationErrors,
    field: &str,
    input: Option<&StatInput>,
    min: i32,
) -> Option<i32> {
    match coerce(input) {
        Coerced::Missing => {
            errors.required(field);
            None
        }
        Coerced::Invalid(raw) => {
            errors.add(
                field,
                format!("field `{}` ({}) could not be cast to an integer.", field, raw),
            );
            None
        }
        Coerced::Value(v) if v < i64::from(min) => {
            errors.add(
                field,
                format!(
                    "field `{}` ({}) is less than minimum allowed value ({}).",
                    field, v, min
                ),
            );
            None
        }
        Coerced::Value(v) => match i32::try_from(v) {
            Ok(v) => Some(v),
            Err(_) => {
                errors.add(
                    field,
                    format!("field `{}` ({}) could not be cast to an integer.", field, v),
                );
                None
            }
        },
    }
}

/// Coerces and checks a draft. Every failing field is reported, not just the first.
pub fn validate(draft: &ClassDraft) -> Result<NewCharacterClass, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = match draft.name.as_ref() {
        None => {
            errors.required("name");
            None
        }
        Some(input) => match cast_text(&mut errors, "name", input) {
            Some(n) if n.is_empty() => {
                errors.required("name");
                None
            }
            other => other,
        },
    };
    let hp = check_stat(&mut errors, "hp", draft.hp.as_ref(), 1);
    let mana = check_stat(&mut errors, "mana", draft.mana.as_ref(), 0);
    let speed = check_stat(&mut errors, "speed", draft.speed.as_ref(), 1);
    let strength = check_stat(&mut errors, "strength", draft.strength.as_ref(), 1);
    let intelligence = check_stat(&mut errors, "intelligence", draft.intelligence.as_ref(), 1);
    let agility = check_stat(&mut errors, "agility", draft.agility.as_ref(), 1);
    let description = match &draft.description {
        Some(Some(input)) => cast_text(&mut errors, "description", input),
        _ => None,
    };

    match (name, hp, mana, speed, strength, intelligence, agility) {
        (
            Some(name),
            Some(hp),
            Some(mana),
            Some(speed),
            Some(strength),
            Some(intelligence),
            Some(agility),
        ) if errors.is_empty() => Ok(NewCharacterClass {
            name,
            hp,
            mana,
            speed,
            strength,
            intelligence,
            agility,
            description,
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft(value: serde_json::Value) -> ClassDraft {
        serde_json::from_value(value).expect("draft should deserialize")
    }

    fn complete() -> serde_json::Value {
        json!({
            "name": "Monk",
            "hp": 50,
            "mana": 50,
            "speed": 10,
            "strength": 15,
            "intelligence": 20,
            "agility": 5
        })
    }

    fn without(field: &str) -> ClassDraft {
        let mut v = complete();
        v.as_object_mut().unwrap().remove(field);
        draft(v)
    }

    fn with(field: &str, value: serde_json::Value) -> ClassDraft {
        let mut v = complete();
        v.as_object_mut().unwrap().insert(field.to_string(), value);
        draft(v)
    }

    #[test]
    fn accepts_complete_draft() {
        let class = validate(&draft(complete())).expect("valid");
        assert_eq!(class.name, "Monk");
        assert_eq!(class.hp, 50);
        assert_eq!(class.description, None);
    }

    #[test]
    fn every_field_is_required() {
        for field in ["name", "hp", "mana", "speed", "strength", "intelligence", "agility"] {
            let errs = validate(&without(field)).unwrap_err();
            assert_eq!(
                errs.get(field),
                Some(format!("field `{}` is required.", field).as_str())
            );
            assert_eq!(errs.fields().len(), 1, "only {} should fail", field);
        }
    }

    #[test]
    fn hp_must_be_at_least_one() {
        let errs = validate(&with("hp", json!(0))).unwrap_err();
        assert_eq!(
            errs.get("hp"),
            Some("field `hp` (0) is less than minimum allowed value (1).")
        );
    }

    #[test]
    fn mana_may_be_zero_but_not_negative() {
        assert!(validate(&with("mana", json!(0))).is_ok());
        let errs = validate(&with("mana", json!(-1))).unwrap_err();
        assert_eq!(
            errs.get("mana"),
            Some("field `mana` (-1) is less than minimum allowed value (0).")
        );
    }

    #[test]
    fn remaining_stats_have_minimum_one() {
        for (field, value) in [("speed", -1), ("strength", -1), ("intelligence", -1), ("agility", -99)] {
            let errs = validate(&with(field, json!(value))).unwrap_err();
            assert_eq!(
                errs.get(field),
                Some(
                    format!(
                        "field `{}` ({}) is less than minimum allowed value (1).",
                        field, value
                    )
                    .as_str()
                )
            );
        }
    }

    #[test]
    fn string_numbers_are_coerced() {
        let class = validate(&draft(json!({
            "name": "Warrior",
            "hp": "50",
            "mana": " 0 ",
            "speed": "10",
            "strength": "15",
            "intelligence": "20.0",
            "agility": 5.0
        })))
        .expect("valid");
        assert_eq!(class.hp, 50);
        assert_eq!(class.mana, 0);
        assert_eq!(class.intelligence, 20);
        assert_eq!(class.agility, 5);
    }

    #[test]
    fn coerced_strings_are_bound_checked() {
        let errs = validate(&with("hp", json!("0"))).unwrap_err();
        assert_eq!(
            errs.get("hp"),
            Some("field `hp` (0) is less than minimum allowed value (1).")
        );
    }

    #[test]
    fn blank_values_count_as_missing() {
        let errs = validate(&with("name", json!(""))).unwrap_err();
        assert_eq!(errs.get("name"), Some("field `name` is required."));
        let errs = validate(&with("speed", json!("  "))).unwrap_err();
        assert_eq!(errs.get("speed"), Some("field `speed` is required."));
        let errs = validate(&with("hp", json!(null))).unwrap_err();
        assert_eq!(errs.get("hp"), Some("field `hp` is required."));
    }

    #[test]
    fn uncoercible_values_are_reported() {
        let errs = validate(&with("hp", json!("abc"))).unwrap_err();
        assert_eq!(
            errs.get("hp"),
            Some("field `hp` (\"abc\") could not be cast to an integer.")
        );
        let errs = validate(&with("speed", json!(1.5))).unwrap_err();
        assert_eq!(
            errs.get("speed"),
            Some("field `speed` (1.5) could not be cast to an integer.")
        );
        let errs = validate(&with("agility", json!(true))).unwrap_err();
        assert!(errs.get("agility").unwrap().contains("could not be cast"));
        let errs = validate(&with("strength", json!(5_000_000_000_i64))).unwrap_err();
        assert!(errs.get("strength").unwrap().contains("could not be cast"));
    }

    #[test]
    fn reports_all_failures_at_once() {
        let errs = validate(&draft(json!({ "hp": 0, "mana": -5 }))).unwrap_err();
        assert_eq!(errs.fields().len(), 7);
        assert!(errs.get("hp").unwrap().contains("(0)"));
        assert!(errs.get("mana").unwrap().contains("(-5)"));
        assert_eq!(errs.get("name"), Some("field `name` is required."));
    }

    #[test]
    fn scalar_text_is_cast_to_string() {
        let class = validate(&with("name", json!(42))).expect("valid");
        assert_eq!(class.name, "42");
        let class = validate(&with("description", json!(true))).expect("valid");
        assert_eq!(class.description.as_deref(), Some("true"));
    }

    #[test]
    fn structured_text_is_reported() {
        let errs = validate(&with("name", json!({ "first": "Monk" }))).unwrap_err();
        assert_eq!(
            errs.get("name"),
            Some("field `name` ({\"first\":\"Monk\"}) could not be cast to a string.")
        );
        let errs = validate(&with("description", json!([1, 2]))).unwrap_err();
        assert_eq!(
            errs.get("description"),
            Some("field `description` ([1,2]) could not be cast to a string.")
        );
    }

    #[test]
    fn null_description_is_none() {
        let class = validate(&with("description", json!(null))).expect("valid");
        assert_eq!(class.description, None);
    }

    #[test]
    fn description_is_optional_and_kept() {
        let class = validate(&with("description", json!("quiet fists"))).expect("valid");
        assert_eq!(class.description.as_deref(), Some("quiet fists"));
    }
}

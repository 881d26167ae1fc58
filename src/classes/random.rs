use rand::{seq::SliceRandom, Rng};

use super::dto::{ClassDraft, StatInput};

const PROFESSIONS: &[&str] = &[
    "Alchemist",
    "Apothecary",
    "Archivist",
    "Armorer",
    "Astronomer",
    "Bard",
    "Blacksmith",
    "Bounty Hunter",
    "Cartographer",
    "Chef",
    "Courier",
    "Diplomat",
    "Engineer",
    "Falconer",
    "Ferryman",
    "Fletcher",
    "Gravedigger",
    "Herbalist",
    "Innkeeper",
    "Jeweler",
    "Librarian",
    "Locksmith",
    "Mason",
    "Miner",
    "Navigator",
    "Physician",
    "Sailor",
    "Scribe",
    "Shepherd",
    "Smuggler",
    "Tailor",
    "Tanner",
    "Watchman",
    "Woodcutter",
];

/// Rolls a complete draft: hp in 8..=20, every other stat in 3..=18.
pub fn roll_class<R: Rng>(rng: &mut R) -> ClassDraft {
    let name = PROFESSIONS.choose(rng).copied().unwrap_or("Adventurer");
    let mut stat = |lo: i32, hi: i32| Some(StatInput::from(rng.gen_range(lo..=hi)));
    ClassDraft {
        name: Some(name.into()),
        hp: stat(8, 20),
        mana: stat(3, 18),
        speed: stat(3, 18),
        strength: stat(3, 18),
        intelligence: stat(3, 18),
        agility: stat(3, 18),
        description: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classes::validation::validate;

    #[test]
    fn rolled_classes_always_validate() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let class = validate(&roll_class(&mut rng)).expect("rolled class should be valid");
            assert!((8..=20).contains(&class.hp));
            for v in [class.mana, class.speed, class.strength, class.intelligence, class.agility] {
                assert!((3..=18).contains(&v));
            }
            assert!(PROFESSIONS.contains(&class.name.as_str()));
        }
    }
}

// src/world/src/content.rs
//! The built-in three-scene world.

use crate::scene::{
    Direction, Npc, ObjectKind, Position, Scene, SceneObject, Shop, ShopEntry, ShrineEffect,
    Transition,
};

pub const START_SCENE: &str = "village";

/// Village, forest and cave, connected in a line. The village is safe
/// ground; the forest and cave roll random encounters.
pub fn default_scenes() -> Vec<Scene> {
    vec![village(), forest(), cave()]
}

fn village() -> Scene {
    Scene {
        id: "village".to_string(),
        name: "Eldervale".to_string(),
        description: "A quiet village at the forest's edge.".to_string(),
        start_position: Position::new(2, 2),
        has_random_encounters: false,
        encounter_rate: 0.0,
        map: vec![
            "############".to_string(),
            "#..........#".to_string(),
            "#..........#".to_string(),
            "#....~~....#".to_string(),
            "#...........".to_string(),
            "#..........#".to_string(),
            "#..........#".to_string(),
            "############".to_string(),
        ],
        npcs: vec![
            Npc {
                id: "elder".to_string(),
                name: "Elder Rowan".to_string(),
                position: Position::new(5, 2),
                dialogue: vec![
                    "Welcome, traveler. The forest has grown dangerous.".to_string(),
                    "Speak with the shopkeeper before you set out.".to_string(),
                    "The old shrine by the pond still remembers its blessing.".to_string(),
                ],
                quests: vec!["welcome_quest".to_string()],
                shop: None,
            },
            Npc {
                id: "shopkeeper".to_string(),
                name: "Marla the Shopkeeper".to_string(),
                position: Position::new(8, 5),
                dialogue: vec![
                    "Potions, blades, whatever keeps you breathing.".to_string(),
                    "Wolf pelts fetch a fair price these days.".to_string(),
                ],
                quests: Vec::new(),
                shop: Some(Shop {
                    items: vec![
                        ShopEntry {
                            item_id: "health_potion".to_string(),
                            price: 20,
                            stock: 10,
                        },
                        ShopEntry {
                            item_id: "mana_potion".to_string(),
                            price: 15,
                            stock: 10,
                        },
                        ShopEntry {
                            item_id: "iron_sword".to_string(),
                            price: 50,
                            stock: 1,
                        },
                        ShopEntry {
                            item_id: "leather_armor".to_string(),
                            price: 40,
                            stock: 1,
                        },
                    ],
                }),
            },
        ],
        objects: vec![SceneObject {
            position: Position::new(3, 5),
            kind: ObjectKind::Shrine(ShrineEffect::Save),
        }],
        transitions: vec![Transition {
            position: Position::new(11, 4),
            destination: "forest".to_string(),
            direction: Direction::East,
        }],
    }
}

fn forest() -> Scene {
    Scene {
        id: "forest".to_string(),
        name: "Whisperwood".to_string(),
        description: "Old trees crowd the path. Things move between them.".to_string(),
        start_position: Position::new(1, 2),
        has_random_encounters: true,
        encounter_rate: 0.25,
        map: vec![
            "############".to_string(),
            "#..........#".to_string(),
            "...........#".to_string(),
            "#..........#".to_string(),
            "#..~~~.....#".to_string(),
            "#...........".to_string(),
            "#..........#".to_string(),
            "############".to_string(),
        ],
        npcs: Vec::new(),
        objects: vec![SceneObject {
            position: Position::new(8, 3),
            kind: ObjectKind::Chest {
                contents: Some("health_potion".to_string()),
            },
        }],
        transitions: vec![
            Transition {
                position: Position::new(0, 2),
                destination: "village".to_string(),
                direction: Direction::West,
            },
            Transition {
                position: Position::new(11, 5),
                destination: "cave".to_string(),
                direction: Direction::East,
            },
        ],
    }
}

fn cave() -> Scene {
    Scene {
        id: "cave".to_string(),
        name: "Hollow Deep".to_string(),
        description: "A damp cave. Something large breathes in the dark.".to_string(),
        start_position: Position::new(1, 2),
        has_random_encounters: true,
        encounter_rate: 0.35,
        map: vec![
            "##########".to_string(),
            "#........#".to_string(),
            "...#.....#".to_string(),
            "#..#.....#".to_string(),
            "#........#".to_string(),
            "#........#".to_string(),
            "##########".to_string(),
        ],
        npcs: Vec::new(),
        objects: vec![
            SceneObject {
                position: Position::new(8, 1),
                kind: ObjectKind::Chest {
                    contents: Some("steel_sword".to_string()),
                },
            },
            SceneObject {
                position: Position::new(5, 5),
                kind: ObjectKind::Shrine(ShrineEffect::Heal),
            },
        ],
        transitions: vec![Transition {
            position: Position::new(0, 2),
            destination: "forest".to_string(),
            direction: Direction::West,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_are_rectangular() {
        for scene in default_scenes() {
            let width = scene.width();
            assert!(width > 0, "{} has an empty map", scene.id);
            for (y, row) in scene.map.iter().enumerate() {
                assert_eq!(
                    row.chars().count() as i32,
                    width,
                    "{} row {y} has the wrong width",
                    scene.id
                );
            }
        }
    }

    #[test]
    fn start_positions_and_interactables_sit_on_walkable_tiles() {
        for scene in default_scenes() {
            assert!(
                scene.is_walkable(scene.start_position),
                "{} start is blocked",
                scene.id
            );
            for npc in &scene.npcs {
                assert!(scene.is_walkable(npc.position), "{} npc blocked", scene.id);
            }
            for object in &scene.objects {
                assert!(
                    scene.is_walkable(object.position),
                    "{} object blocked",
                    scene.id
                );
            }
            for transition in &scene.transitions {
                assert!(
                    scene.is_walkable(transition.position),
                    "{} transition blocked",
                    scene.id
                );
            }
        }
    }

    #[test]
    fn every_transition_destination_exists() {
        let scenes = default_scenes();
        for scene in &scenes {
            for transition in &scene.transitions {
                assert!(
                    scenes.iter().any(|s| s.id == transition.destination),
                    "{} points at unknown scene {}",
                    scene.id,
                    transition.destination
                );
            }
        }
    }
}

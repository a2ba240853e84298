//! Game state access
//!
//! The resolver reads variables, switches and database entries through
//! [`GameState`]. [`GameSnapshot`] is an in-memory implementation.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::directive::EntityKind;

/// A database entry that can be shown as icon + name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub icon_index: u32,
    pub name: String,
}

impl Entity {
    pub fn new(icon_index: u32, name: impl Into<String>) -> Self {
        Self {
            icon_index,
            name: name.into(),
        }
    }
}

/// Read-only view of the host's game state
pub trait GameState {
    /// Value of a numeric variable (0 when unset)
    fn variable(&self, id: usize) -> i64;

    /// Value of a switch (false when unset)
    fn switch(&self, id: usize) -> bool;

    /// Look up a database entry
    fn entity(&self, kind: EntityKind, id: usize) -> Option<Entity>;

    /// Name of an actor
    fn actor_name(&self, id: usize) -> Option<String>;

    /// Name of the party member at a 1-based position
    fn party_member_name(&self, index: usize) -> Option<String>;

    /// Currency unit shown by `\G`
    fn currency_unit(&self) -> String;
}

/// In-memory game state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameSnapshot {
    pub variables: FxHashMap<usize, i64>,
    pub switches: FxHashMap<usize, bool>,
    pub items: FxHashMap<usize, Entity>,
    pub weapons: FxHashMap<usize, Entity>,
    pub armors: FxHashMap<usize, Entity>,
    pub skills: FxHashMap<usize, Entity>,
    pub states: FxHashMap<usize, Entity>,
    pub actors: FxHashMap<usize, String>,
    /// Actor ids in party order
    pub party: Vec<usize>,
    pub currency_unit: String,
}

impl GameSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_variable(&mut self, id: usize, value: i64) {
        self.variables.insert(id, value);
    }

    pub fn set_switch(&mut self, id: usize, value: bool) {
        self.switches.insert(id, value);
    }

    pub fn set_entity(&mut self, kind: EntityKind, id: usize, entity: Entity) {
        self.table_mut(kind).insert(id, entity);
    }

    pub fn with_variable(mut self, id: usize, value: i64) -> Self {
        self.set_variable(id, value);
        self
    }

    pub fn with_switch(mut self, id: usize, value: bool) -> Self {
        self.set_switch(id, value);
        self
    }

    pub fn with_entity(mut self, kind: EntityKind, id: usize, icon_index: u32, name: &str) -> Self {
        self.set_entity(kind, id, Entity::new(icon_index, name));
        self
    }

    pub fn with_actor(mut self, id: usize, name: &str) -> Self {
        self.actors.insert(id, name.to_string());
        self
    }

    fn table(&self, kind: EntityKind) -> &FxHashMap<usize, Entity> {
        match kind {
            EntityKind::Item => &self.items,
            EntityKind::Weapon => &self.weapons,
            EntityKind::Armor => &self.armors,
            EntityKind::Skill => &self.skills,
            EntityKind::State => &self.states,
        }
    }

    fn table_mut(&mut self, kind: EntityKind) -> &mut FxHashMap<usize, Entity> {
        match kind {
            EntityKind::Item => &mut self.items,
            EntityKind::Weapon => &mut self.weapons,
            EntityKind::Armor => &mut self.armors,
            EntityKind::Skill => &mut self.skills,
            EntityKind::State => &mut self.states,
        }
    }
}

impl GameState for GameSnapshot {
    fn variable(&self, id: usize) -> i64 {
        self.variables.get(&id).copied().unwrap_or(0)
    }

    fn switch(&self, id: usize) -> bool {
        self.switches.get(&id).copied().unwrap_or(false)
    }

    fn entity(&self, kind: EntityKind, id: usize) -> Option<Entity> {
        self.table(kind).get(&id).cloned()
    }

    fn actor_name(&self, id: usize) -> Option<String> {
        self.actors.get(&id).cloned()
    }

    fn party_member_name(&self, index: usize) -> Option<String> {
        let actor_id = *self.party.get(index.checked_sub(1)?)?;
        self.actor_name(actor_id)
    }

    fn currency_unit(&self) -> String {
        self.currency_unit.clone()
    }
}

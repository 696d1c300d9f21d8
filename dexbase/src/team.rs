use crate::resource;
use crate::{Pokemon, Session, Type};

use std::collections::BTreeMap;
use std::sync::Arc;

/// A bounded, ordered roster of Pokémon.
///
/// The same Pokémon may appear more than once.
#[derive(Debug, Clone, Default)]
pub struct Team {
    members: Vec<Pokemon>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("the team already has {} members", Team::CAPACITY)]
pub struct Full;

impl Team {
    pub const CAPACITY: usize = 6;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, pokemon: Pokemon) -> Result<(), Full> {
        if self.is_full() {
            return Err(Full);
        }

        self.members.push(pokemon);

        Ok(())
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    pub fn members(&self) -> &[Pokemon] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= Self::CAPACITY
    }
}

/// Aggregate matchups of a team.
///
/// Only types with a non-zero count are present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub weaknesses: BTreeMap<Type, usize>,
    pub resistances: BTreeMap<Type, usize>,
    pub coverage: BTreeMap<Type, usize>,
}

impl Summary {
    /// Counts how many members are weak or resistant to each type.
    pub fn tally<'a>(members: impl IntoIterator<Item = &'a Pokemon>) -> Self {
        let mut summary = Self::default();

        for member in members {
            count(&mut summary.weaknesses, member.matchups.weaknesses.iter().copied());
            count(
                &mut summary.resistances,
                member.matchups.resistances.iter().copied(),
            );
        }

        summary
    }

    /// Counts types hit super effectively by one attacking type.
    pub fn cover(&mut self, targets: impl IntoIterator<Item = Type>) {
        count(&mut self.coverage, targets);
    }

    /// Tallies the members and fetches the offensive coverage of every
    /// member's types.
    ///
    /// Coverage lookups that fail are skipped.
    pub async fn fetch(members: Arc<[Pokemon]>, session: &Session) -> Self {
        let mut summary = Self::tally(members.iter());

        for member in members.iter() {
            for ty in &member.types {
                match session.fetch::<resource::Type>(&format!("type/{ty}")).await {
                    Ok(resource) => summary.cover(
                        resource
                            .damage_relations
                            .double_damage_to
                            .iter()
                            .filter_map(|target| target.name.parse().ok()),
                    ),
                    Err(error) => {
                        log::warn!("Missing coverage of {ty} for {}: {error}", member.name);
                    }
                }
            }
        }

        summary
    }
}

fn count(counts: &mut BTreeMap<Type, usize>, types: impl IntoIterator<Item = Type>) {
    for ty in types {
        *counts.entry(ty).or_default() += 1;
    }
}

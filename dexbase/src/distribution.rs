use crate::{Pokemon, Type};

use std::collections::BTreeMap;

/// How often each type, ability and egg group occurs among some Pokémon.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Distribution {
    pub types: BTreeMap<Type, usize>,
    pub abilities: BTreeMap<String, usize>,
    pub egg_groups: BTreeMap<String, usize>,
}

impl Distribution {
    pub fn new<'a>(pokemon: impl IntoIterator<Item = &'a Pokemon>) -> Self {
        let mut distribution = Self::default();

        for pokemon in pokemon {
            for ty in &pokemon.types {
                *distribution.types.entry(*ty).or_default() += 1;
            }

            for ability in &pokemon.abilities {
                *distribution.abilities.entry(ability.clone()).or_default() += 1;
            }

            for egg_group in &pokemon.egg_groups {
                *distribution.egg_groups.entry(egg_group.clone()).or_default() += 1;
            }
        }

        distribution
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.abilities.is_empty() && self.egg_groups.is_empty()
    }
}

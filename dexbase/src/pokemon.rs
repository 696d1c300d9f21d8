use crate::resolver::{self, Filters};
use crate::resource;
use crate::{Matchups, Result, Session, Type};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// An assembled snapshot of a Pokémon and its defensive matchups.
#[derive(Debug, Clone, PartialEq)]
pub struct Pokemon {
    pub id: Id,
    pub name: String,
    pub generation: Generation,
    pub types: Vec<Type>,
    pub abilities: Vec<String>,
    pub hidden_ability: Option<String>,
    pub egg_groups: Vec<String>,
    pub stats: Stats,
    pub sprite: Option<String>,
    pub shiny_sprite: Option<String>,
    pub matchups: Matchups,
}

impl Pokemon {
    /// Fetches and assembles a single Pokémon.
    ///
    /// Returns `None` when it does not belong to the given generation.
    pub async fn fetch(
        name: &str,
        generation: Option<Generation>,
        session: &Session,
    ) -> Result<Option<Self>> {
        let details: resource::Pokemon = session.fetch(&format!("pokemon/{name}")).await?;

        let species_name = details
            .species
            .as_ref()
            .map_or(name, |species| species.name.as_str());

        let species: resource::Species = session
            .fetch(&format!("pokemon-species/{species_name}"))
            .await?;

        let id = Id(details.id);

        if generation.is_some_and(|generation| generation != id.generation()) {
            return Ok(None);
        }

        let types = types(&details);
        let matchups = Matchups::fetch(&types, session).await?;

        Ok(Some(Self::assemble(details, species, matchups)))
    }

    /// Builds a [`Pokemon`] out of its raw API resources.
    pub fn assemble(
        details: resource::Pokemon,
        species: resource::Species,
        matchups: Matchups,
    ) -> Self {
        let id = Id(details.id);
        let types = types(&details);
        let stats = Stats::from_resource(&details.stats);

        let (hidden, abilities): (Vec<_>, Vec<_>) = details
            .abilities
            .into_iter()
            .partition(|ability| ability.is_hidden);

        Self {
            id,
            name: display_name(&details.name),
            generation: id.generation(),
            types,
            abilities: abilities
                .into_iter()
                .map(|ability| ability.ability.name)
                .collect(),
            hidden_ability: hidden.into_iter().next().map(|ability| ability.ability.name),
            egg_groups: species
                .egg_groups
                .into_iter()
                .map(|egg_group| egg_group.name)
                .collect(),
            stats,
            sprite: details.sprites.front_default,
            shiny_sprite: details.sprites.front_shiny,
            matchups,
        }
    }

    pub fn sprite(&self, shiny: bool) -> Option<&str> {
        if shiny {
            self.shiny_sprite.as_deref()
        } else {
            self.sprite.as_deref()
        }
    }

    /// Non-hidden abilities followed by the hidden one, if any.
    pub fn all_abilities(&self) -> impl Iterator<Item = &str> {
        self.abilities
            .iter()
            .chain(&self.hidden_ability)
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(pub(crate) u32);

impl Id {
    pub fn new(number: u32) -> Self {
        Self(number)
    }

    pub fn number(self) -> u32 {
        self.0
    }

    pub fn generation(self) -> Generation {
        Generation::from_id(self)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A coarse era derived from the national dex number.
///
/// Numbers are banded into blocks of 156; anything past the eighth block
/// (including alternate forms, numbered from 10001) is placed in the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Generation(u8);

impl Generation {
    pub const BAND: u32 = 156;
    pub const LATEST: u8 = 8;

    pub const ALL: [Self; Self::LATEST as usize] = [
        Self(1),
        Self(2),
        Self(3),
        Self(4),
        Self(5),
        Self(6),
        Self(7),
        Self(8),
    ];

    pub fn new(generation: u8) -> Option<Self> {
        (1..=Self::LATEST)
            .contains(&generation)
            .then_some(Self(generation))
    }

    pub fn from_id(id: Id) -> Self {
        let band = id.0.saturating_sub(1) / Self::BAND + 1;

        Self(band.min(u32::from(Self::LATEST)) as u8)
    }

    pub fn number(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub special_attack: u32,
    pub special_defense: u32,
    pub speed: u32,
}

impl Stats {
    const NAMES: [&str; 6] = [
        "hp",
        "attack",
        "defense",
        "special-attack",
        "special-defense",
        "speed",
    ];

    pub const LABELS: [&str; 6] = [
        "HP",
        "Attack",
        "Defense",
        "Special Attack",
        "Special Defense",
        "Speed",
    ];

    /// Looks stats up by name, falling back to their usual position.
    fn from_resource(stats: &[resource::Stat]) -> Self {
        let base_stat = |index: usize| {
            stats
                .iter()
                .find(|stat| stat.stat.name == Self::NAMES[index])
                .or_else(|| stats.get(index))
                .map_or(0, |stat| stat.base_stat)
        };

        Self {
            hp: base_stat(0),
            attack: base_stat(1),
            defense: base_stat(2),
            special_attack: base_stat(3),
            special_defense: base_stat(4),
            speed: base_stat(5),
        }
    }

    pub fn values(self) -> [u32; 6] {
        [
            self.hp,
            self.attack,
            self.defense,
            self.special_attack,
            self.special_defense,
            self.speed,
        ]
    }

    pub fn total(self) -> u32 {
        self.values().into_iter().sum()
    }
}

/// Resolves the filters and assembles every candidate, in name order.
pub async fn search(filters: &Filters, session: &Session) -> Vec<Pokemon> {
    let candidates = resolver::resolve(filters, session).await;

    assemble(&candidates, filters.generation, session).await
}

/// Assembles each named Pokémon, one after the other.
///
/// Pokémon whose resources cannot be fetched are skipped.
pub async fn assemble<'a>(
    names: impl IntoIterator<Item = &'a String>,
    generation: Option<Generation>,
    session: &Session,
) -> Vec<Pokemon> {
    let mut pokemon = Vec::new();

    for name in names {
        match Pokemon::fetch(name, generation, session).await {
            Ok(Some(assembled)) => pokemon.push(assembled),
            Ok(None) => {}
            Err(error) => {
                log::warn!("Skipping {name}: {error}");
            }
        }
    }

    pokemon
}

fn types(details: &resource::Pokemon) -> Vec<Type> {
    let mut slots: Vec<_> = details.types.iter().collect();
    slots.sort_by_key(|slot| slot.slot);

    let mut seen = BTreeSet::new();

    slots
        .into_iter()
        .filter_map(|slot| match slot.kind.name.parse::<Type>() {
            Ok(ty) => seen.insert(ty).then_some(ty),
            Err(error) => {
                log::warn!("{} has {error}", details.name);
                None
            }
        })
        .collect()
}

fn display_name(name: &str) -> String {
    let mut chars = name.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

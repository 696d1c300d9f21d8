//! Narrowing down candidate Pokémon by facets.
//!
//! The candidate set is seeded by either a literal name or a primary type.
//! Every other selected facet is looked up independently and intersected in.
use crate::pokemon::Generation;
use crate::resource;
use crate::{Result, Session};

use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub name: Option<String>,
    pub primary_type: Option<String>,
    pub secondary_type: Option<String>,
    pub region: Option<String>,
    pub ability: Option<String>,
    pub egg_group: Option<String>,
    pub generation: Option<Generation>,
}

impl Filters {
    /// Whether the filters can seed a search at all.
    pub fn is_searchable(&self) -> bool {
        selected(&self.name).is_some() || selected(&self.primary_type).is_some()
    }

    fn facets(&self) -> impl Iterator<Item = (Facet, &str)> {
        [
            (Facet::Type, &self.secondary_type),
            (Facet::Region, &self.region),
            (Facet::Ability, &self.ability),
            (Facet::EggGroup, &self.egg_group),
        ]
        .into_iter()
        .filter_map(|(facet, value)| Some((facet, selected(value)?)))
    }
}

/// An independent filter dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet {
    Type,
    Region,
    Ability,
    EggGroup,
}

impl Facet {
    /// Fetches the names of every Pokémon matching the facet value.
    pub async fn members(self, value: &str, session: &Session) -> Result<BTreeSet<String>> {
        let members = match self {
            Self::Type => {
                let ty: resource::Type = session.fetch(&format!("type/{value}")).await?;

                ty.pokemon
                    .into_iter()
                    .map(|slot| slot.pokemon.name)
                    .collect()
            }
            Self::Region => {
                let pokedex: resource::Pokedex =
                    session.fetch(&format!("pokedex/{value}")).await?;

                pokedex
                    .pokemon_entries
                    .into_iter()
                    .map(|entry| entry.pokemon_species.name)
                    .collect()
            }
            Self::Ability => {
                let ability: resource::Ability =
                    session.fetch(&format!("ability/{value}")).await?;

                ability
                    .pokemon
                    .into_iter()
                    .map(|slot| slot.pokemon.name)
                    .collect()
            }
            Self::EggGroup => {
                let egg_group: resource::EggGroup =
                    session.fetch(&format!("egg-group/{value}")).await?;

                egg_group
                    .pokemon_species
                    .into_iter()
                    .map(|species| species.name)
                    .collect()
            }
        };

        Ok(members)
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Type => "type",
            Self::Region => "region",
            Self::Ability => "ability",
            Self::EggGroup => "egg group",
        })
    }
}

/// Resolves the filters into a set of candidate names.
///
/// A failed seed lookup yields no candidates. A failed facet lookup is
/// skipped and does not restrict the candidates.
pub async fn resolve(filters: &Filters, session: &Session) -> BTreeSet<String> {
    let mut facets: Vec<(Facet, &str)> = Vec::new();

    let seed = if let Some(name) = selected(&filters.name) {
        if let Some(ty) = selected(&filters.primary_type) {
            facets.push((Facet::Type, ty));
        }

        lookup(name, session).await
    } else if let Some(ty) = selected(&filters.primary_type) {
        Facet::Type.members(ty, session).await
    } else {
        return BTreeSet::new();
    };

    let mut candidates = match seed {
        Ok(candidates) => candidates,
        Err(error) => {
            log::warn!("No candidates: {error}");
            return BTreeSet::new();
        }
    };

    facets.extend(filters.facets());

    for (facet, value) in facets {
        match facet.members(value, session).await {
            Ok(members) => {
                candidates = intersect(candidates, &members);
            }
            Err(error) => {
                log::warn!("Ignoring {facet} \"{value}\": {error}");
            }
        }
    }

    candidates
}

/// Looks a single Pokémon up by name, case-insensitively.
async fn lookup(name: &str, session: &Session) -> Result<BTreeSet<String>> {
    let pokemon: resource::Pokemon = session
        .fetch(&format!("pokemon/{}", name.to_lowercase()))
        .await?;

    Ok(BTreeSet::from([pokemon.name]))
}

fn intersect(candidates: BTreeSet<String>, members: &BTreeSet<String>) -> BTreeSet<String> {
    candidates
        .into_iter()
        .filter(|candidate| members.contains(candidate))
        .collect()
}

fn selected(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

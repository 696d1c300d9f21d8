//! Response shapes of the PokéAPI endpoints we consume.
//!
//! Only the fields we read are modeled; everything else is ignored.
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Named {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// A paginated resource listing (e.g. `/ability?limit=1000`).
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub results: Vec<Named>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Type {
    pub name: String,
    #[serde(default)]
    pub damage_relations: Relations,
    #[serde(default)]
    pub pokemon: Vec<Slot>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Relations {
    #[serde(default)]
    pub no_damage_from: Vec<Named>,
    #[serde(default)]
    pub half_damage_from: Vec<Named>,
    #[serde(default)]
    pub double_damage_from: Vec<Named>,
    #[serde(default)]
    pub double_damage_to: Vec<Named>,
}

/// A Pokémon listed as a member of a type or an ability.
#[derive(Debug, Clone, Deserialize)]
pub struct Slot {
    pub pokemon: Named,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pokedex {
    #[serde(default)]
    pub pokemon_entries: Vec<PokedexEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PokedexEntry {
    pub pokemon_species: Named,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ability {
    #[serde(default)]
    pub pokemon: Vec<Slot>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EggGroup {
    #[serde(default)]
    pub pokemon_species: Vec<Named>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub species: Option<Named>,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub stats: Vec<Stat>,
    #[serde(default)]
    pub abilities: Vec<PokemonAbility>,
    #[serde(default)]
    pub types: Vec<PokemonType>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Sprites {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub front_shiny: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Stat {
    pub base_stat: u32,
    pub stat: Named,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PokemonAbility {
    #[serde(default)]
    pub is_hidden: bool,
    pub ability: Named,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PokemonType {
    #[serde(default)]
    pub slot: u8,
    #[serde(rename = "type")]
    pub kind: Named,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Species {
    #[serde(default)]
    pub egg_groups: Vec<Named>,
}

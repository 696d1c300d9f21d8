//! Defensive type matchups.
//!
//! An [`Effectiveness`] holds the damage multiplier every attacking type
//! deals to a Pokémon. It starts neutral and is narrowed down by the damage
//! relations of each of the Pokémon's own types, so dual types compose
//! naturally: two weaknesses stack to 4x, two resistances to 0.25x, and an
//! immunity on either side wins over everything.
use crate::resource;
use crate::{Result, Session, Type};

use std::collections::BTreeSet;

const IMMUNE: f32 = 0.0;
const RESISTANT: f32 = 0.5;
const WEAK: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Effectiveness {
    multipliers: [f32; Type::ALL.len()],
}

impl Effectiveness {
    pub fn neutral() -> Self {
        Self {
            multipliers: [1.0; Type::ALL.len()],
        }
    }

    /// Fetches the damage relations of every given type and folds them in.
    pub async fn fetch(types: &[Type], session: &Session) -> Result<Self> {
        let mut effectiveness = Self::neutral();

        for ty in types {
            let resource: resource::Type = session.fetch(&format!("type/{ty}")).await?;

            effectiveness.defend(&resource.damage_relations);
        }

        Ok(effectiveness)
    }

    /// Applies the relations of one defending type.
    pub fn defend(&mut self, relations: &resource::Relations) {
        for (attackers, factor) in [
            (&relations.no_damage_from, IMMUNE),
            (&relations.half_damage_from, RESISTANT),
            (&relations.double_damage_from, WEAK),
        ] {
            for attacker in attackers {
                // Types outside the chart (e.g. "shadow") have no multiplier
                let Ok(attacker) = attacker.name.parse::<Type>() else {
                    continue;
                };

                self.multipliers[attacker.index()] *= factor;
            }
        }
    }

    pub fn multiplier(&self, attacker: Type) -> f32 {
        self.multipliers[attacker.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Type, f32)> + '_ {
        Type::ALL.into_iter().map(|ty| (ty, self.multiplier(ty)))
    }

    pub fn matchups(&self) -> Matchups {
        let mut matchups = Matchups::default();

        for (ty, multiplier) in self.iter() {
            if multiplier == 0.0 {
                let _ = matchups.immunities.insert(ty);
            } else if multiplier < 1.0 {
                let _ = matchups.resistances.insert(ty);
            } else if multiplier > 1.0 {
                let _ = matchups.weaknesses.insert(ty);
            }
        }

        matchups
    }
}

impl Default for Effectiveness {
    fn default() -> Self {
        Self::neutral()
    }
}

/// The classification of an [`Effectiveness`].
///
/// Neutral types (exactly 1x) belong to none of the sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matchups {
    pub weaknesses: BTreeSet<Type>,
    pub resistances: BTreeSet<Type>,
    pub immunities: BTreeSet<Type>,
}

impl Matchups {
    pub async fn fetch(types: &[Type], session: &Session) -> Result<Self> {
        Ok(Effectiveness::fetch(types, session).await?.matchups())
    }
}

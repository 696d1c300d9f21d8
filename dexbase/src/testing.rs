//! In-memory API fixtures.
use crate::session::Transport;
use crate::{Error, Result, Session};

use bytes::Bytes;
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const BASE_URL: &str = "https://dex.test/api/v2";

pub fn session(stub: &Stub) -> Session {
    Session::with_transport(stub.clone())
        .base_url(BASE_URL)
        .retry_delay(Duration::ZERO)
}

/// A scripted [`Transport`].
///
/// Unknown URLs answer `404`. Statuses queued with [`Stub::fail`] are
/// returned first, one per call.
#[derive(Debug, Clone, Default)]
pub struct Stub {
    bodies: Arc<HashMap<String, Bytes>>,
    failures: Arc<Mutex<HashMap<String, VecDeque<u16>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl Stub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn json(mut self, path: &str, body: Value) -> Self {
        let _ = Arc::make_mut(&mut self.bodies).insert(url(path), Bytes::from(body.to_string()));
        self
    }

    pub fn fail(self, path: &str, statuses: impl IntoIterator<Item = u16>) -> Self {
        self.failures
            .lock()
            .unwrap()
            .entry(url(path))
            .or_default()
            .extend(statuses);
        self
    }

    pub fn calls(&self, path: &str) -> usize {
        let url = url(path);

        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| **call == url)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Transport for Stub {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<Bytes>> {
        self.calls.lock().unwrap().push(url.to_owned());

        let failure = self
            .failures
            .lock()
            .unwrap()
            .get_mut(url)
            .and_then(VecDeque::pop_front);

        let result = match (failure, self.bodies.get(url)) {
            (Some(404), _) | (None, None) => Err(Error::NotFound(url.to_owned())),
            (Some(status), _) => Err(Error::Status {
                url: url.to_owned(),
                status,
            }),
            (None, Some(body)) => Ok(body.clone()),
        };

        async move { result }.boxed()
    }
}

fn url(path: &str) -> String {
    if path.starts_with("https://") {
        path.to_owned()
    } else {
        format!("{BASE_URL}/{path}")
    }
}

fn named(names: &[&str]) -> Vec<Value> {
    names.iter().map(|name| json!({ "name": name })).collect()
}

/// A `/type/{name}` response.
pub fn ty(
    name: &str,
    no_damage_from: &[&str],
    half_damage_from: &[&str],
    double_damage_from: &[&str],
    double_damage_to: &[&str],
) -> Value {
    json!({
        "name": name,
        "damage_relations": {
            "no_damage_from": named(no_damage_from),
            "half_damage_from": named(half_damage_from),
            "double_damage_from": named(double_damage_from),
            "double_damage_to": named(double_damage_to),
        },
        "pokemon": [],
    })
}

/// A `/type/{name}` response listing its members only.
pub fn type_members(name: &str, members: &[&str]) -> Value {
    json!({
        "name": name,
        "pokemon": members
            .iter()
            .map(|member| json!({ "slot": 1, "pokemon": { "name": member } }))
            .collect::<Vec<_>>(),
    })
}

/// A `/pokemon/{name}` response.
pub fn pokemon(id: u32, name: &str, types: &[&str], abilities: &[(&str, bool)]) -> Value {
    json!({
        "id": id,
        "name": name,
        "species": { "name": name },
        "sprites": {
            "front_default": format!("https://sprites.test/{id}.png"),
            "front_shiny": format!("https://sprites.test/shiny/{id}.png"),
        },
        "stats": [
            { "base_stat": 78, "stat": { "name": "hp" } },
            { "base_stat": 84, "stat": { "name": "attack" } },
            { "base_stat": 78, "stat": { "name": "defense" } },
            { "base_stat": 109, "stat": { "name": "special-attack" } },
            { "base_stat": 85, "stat": { "name": "special-defense" } },
            { "base_stat": 100, "stat": { "name": "speed" } },
        ],
        "abilities": abilities
            .iter()
            .map(|(ability, is_hidden)| json!({
                "is_hidden": is_hidden,
                "ability": { "name": ability },
            }))
            .collect::<Vec<_>>(),
        "types": types
            .iter()
            .enumerate()
            .map(|(i, ty)| json!({ "slot": i + 1, "type": { "name": ty } }))
            .collect::<Vec<_>>(),
    })
}

/// A `/pokemon-species/{name}` response.
pub fn species(egg_groups: &[&str]) -> Value {
    json!({ "egg_groups": named(egg_groups) })
}

// A subset of the real type chart, enough for the scenarios under test.
pub fn normal() -> Value {
    ty("normal", &["ghost"], &[], &["fighting"], &[])
}

pub fn ghost() -> Value {
    ty(
        "ghost",
        &["normal", "fighting"],
        &["poison", "bug"],
        &["ghost", "dark"],
        &["psychic", "ghost"],
    )
}

pub fn fire() -> Value {
    ty(
        "fire",
        &[],
        &["fire", "grass", "ice", "bug", "steel", "fairy"],
        &["water", "ground", "rock"],
        &["grass", "ice", "bug", "steel"],
    )
}

pub fn flying() -> Value {
    ty(
        "flying",
        &["ground"],
        &["grass", "fighting", "bug"],
        &["electric", "ice", "rock"],
        &["grass", "fighting", "bug"],
    )
}

pub fn water() -> Value {
    ty(
        "water",
        &[],
        &["fire", "water", "ice", "steel"],
        &["electric", "grass"],
        &["fire", "ground", "rock"],
    )
}

/// A stub serving the type chart subset above.
pub fn type_chart() -> Stub {
    Stub::new()
        .json("type/normal", normal())
        .json("type/ghost", ghost())
        .json("type/fire", fire())
        .json("type/flying", flying())
        .json("type/water", water())
}

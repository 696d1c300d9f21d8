//! Selector options offered by the remote API.
use crate::resource;
use crate::{Result, Session};

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub pokemon: Vec<String>,
    pub types: Vec<String>,
    pub regions: Vec<String>,
    pub abilities: Vec<String>,
    pub egg_groups: Vec<String>,
}

impl Catalog {
    /// Fetches every listing. A listing that cannot be fetched is left empty.
    pub async fn fetch(session: &Session) -> Self {
        fn or_empty(listing: &str, result: Result<Vec<String>>) -> Vec<String> {
            result.unwrap_or_else(|error| {
                log::warn!("Could not list {listing}: {error}");
                Vec::new()
            })
        }

        Self {
            pokemon: or_empty("pokemon", pokemon(session).await),
            types: or_empty("types", types(session).await),
            regions: or_empty("regions", regions(session).await),
            abilities: or_empty("abilities", abilities(session).await),
            egg_groups: or_empty("egg groups", egg_groups(session).await),
        }
    }
}

pub async fn pokemon(session: &Session) -> Result<Vec<String>> {
    names("pokemon?limit=1000", session).await
}

pub async fn types(session: &Session) -> Result<Vec<String>> {
    names("type", session).await
}

pub async fn regions(session: &Session) -> Result<Vec<String>> {
    names("pokedex", session).await
}

pub async fn abilities(session: &Session) -> Result<Vec<String>> {
    names("ability?limit=1000", session).await
}

pub async fn egg_groups(session: &Session) -> Result<Vec<String>> {
    names("egg-group", session).await
}

/// Collects the names of a listing, following `next` until exhausted.
async fn names(path: &str, session: &Session) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let mut page: resource::Page = session.fetch(path).await?;

    loop {
        names.extend(page.results.into_iter().map(|result| result.name));

        match page.next {
            Some(next) => {
                page = session.fetch(&next).await?;
            }
            None => break,
        }
    }

    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, BASE_URL, Stub};

    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn follows_pagination() {
        let stub = Stub::new()
            .json(
                "ability?limit=1000",
                json!({
                    "results": [{ "name": "stench" }, { "name": "drizzle" }],
                    "next": format!("{BASE_URL}/ability?offset=2&limit=1000"),
                }),
            )
            .json(
                "ability?offset=2&limit=1000",
                json!({
                    "results": [{ "name": "speed-boost" }],
                    "next": null,
                }),
            );
        let session = testing::session(&stub);

        assert_eq!(
            abilities(&session).await.unwrap(),
            vec!["stench", "drizzle", "speed-boost"]
        );
    }

    #[tokio::test]
    async fn failed_pages_fail_the_listing() {
        let stub = Stub::new().json(
            "ability?limit=1000",
            json!({
                "results": [{ "name": "stench" }],
                "next": format!("{BASE_URL}/ability?offset=1&limit=1000"),
            }),
        );
        let session = testing::session(&stub);

        assert!(abilities(&session).await.is_err());
    }

    #[tokio::test]
    async fn missing_listings_are_empty() {
        let stub = Stub::new()
            .json(
                "type",
                json!({ "results": [{ "name": "normal" }, { "name": "fighting" }] }),
            )
            .json("egg-group", json!({ "results": [{ "name": "monster" }] }));
        let session = testing::session(&stub);

        let catalog = Catalog::fetch(&session).await;

        assert_eq!(catalog.types, vec!["normal", "fighting"]);
        assert_eq!(catalog.egg_groups, vec!["monster"]);
        assert!(catalog.pokemon.is_empty());
        assert!(catalog.regions.is_empty());
        assert!(catalog.abilities.is_empty());
    }
}

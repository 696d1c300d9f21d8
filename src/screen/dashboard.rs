use crate::dexbase::pokemon::{self, Generation, Id, Stats};
use crate::dexbase::{Catalog, Distribution, Filters, Pokemon, Session, Summary, Team};
use crate::sprite;
use crate::widget::{list, logo, table};

use function::Binary;
use iced::task;
use iced::widget::{
    button, center, column, combo_box, container, image, pick_list, row,
    scrollable, space, text, toggler,
};
use iced::{Center, Element, Fill, Task};

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// The state of a single user session.
pub struct Dashboard {
    catalog: Catalog,
    names: combo_box::State<String>,
    filters: Filters,
    search: Search,
    selected: Option<Id>,
    team: Team,
    summary: TeamSummary,
    shiny: bool,
    sprites: HashMap<String, Sprite>,
    notice: Option<Notice>,
}

enum Search {
    Idle,
    Running {
        _task: task::Handle,
    },
    Finished {
        results: Arc<[Pokemon]>,
        distribution: Distribution,
    },
}

enum TeamSummary {
    Empty,
    Computing { _task: task::Handle },
    Ready(Summary),
}

enum Sprite {
    Loading,
    Loaded(image::Handle),
    Errored,
}

#[derive(Debug, Clone, PartialEq)]
enum Notice {
    Added(String),
    TeamFull,
}

#[derive(Debug, Clone)]
pub enum Message {
    NameSelected(Option<String>),
    PrimaryTypeSelected(Option<String>),
    SecondaryTypeSelected(Option<String>),
    RegionSelected(Option<String>),
    AbilitySelected(Option<String>),
    EggGroupSelected(Option<String>),
    GenerationSelected(Option<Generation>),
    ClearFilters,
    SearchFinished(Arc<[Pokemon]>),
    PokemonSelected(Id),
    AddToTeam,
    ClearTeam,
    ShinyToggled(bool),
    SpriteFetched(String, Result<sprite::Image, anywho::Error>),
    SummaryComputed(Summary),
}

impl Dashboard {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            names: combo_box::State::new(catalog.pokemon.clone()),
            catalog,
            filters: Filters::default(),
            search: Search::Idle,
            selected: None,
            team: Team::new(),
            summary: TeamSummary::Empty,
            shiny: false,
            sprites: HashMap::new(),
            notice: None,
        }
    }

    pub fn update(&mut self, message: Message, session: &Session) -> Task<Message> {
        match message {
            Message::NameSelected(name) => {
                self.filters.name = name;
                self.refresh(session)
            }
            Message::PrimaryTypeSelected(ty) => {
                self.filters.primary_type = ty;
                self.refresh(session)
            }
            Message::SecondaryTypeSelected(ty) => {
                self.filters.secondary_type = ty;
                self.refresh(session)
            }
            Message::RegionSelected(region) => {
                self.filters.region = region;
                self.refresh(session)
            }
            Message::AbilitySelected(ability) => {
                self.filters.ability = ability;
                self.refresh(session)
            }
            Message::EggGroupSelected(egg_group) => {
                self.filters.egg_group = egg_group;
                self.refresh(session)
            }
            Message::GenerationSelected(generation) => {
                self.filters.generation = generation;
                self.refresh(session)
            }
            Message::ClearFilters => {
                self.filters = Filters::default();
                self.search = Search::Idle;
                self.selected = None;

                Task::none()
            }
            Message::SearchFinished(results) => {
                log::info!("Found {} Pokémon", results.len());

                self.selected = results.first().map(|pokemon| pokemon.id);
                self.search = Search::Finished {
                    distribution: Distribution::new(results.iter()),
                    results,
                };

                self.fetch_selected_sprites(session)
            }
            Message::PokemonSelected(id) => {
                self.selected = Some(id);
                self.notice = None;

                self.fetch_selected_sprites(session)
            }
            Message::AddToTeam => {
                let Some(pokemon) = self.selected_pokemon().cloned() else {
                    return Task::none();
                };

                let name = pokemon.name.clone();

                match self.team.add(pokemon) {
                    Ok(()) => {
                        self.notice = Some(Notice::Added(name));

                        Task::batch([self.summarize(session), self.fetch_team_sprites(session)])
                    }
                    Err(error) => {
                        log::warn!("Cannot add {name}: {error}");
                        self.notice = Some(Notice::TeamFull);

                        Task::none()
                    }
                }
            }
            Message::ClearTeam => {
                self.team.clear();
                self.summary = TeamSummary::Empty;
                self.notice = None;

                Task::none()
            }
            Message::ShinyToggled(shiny) => {
                self.shiny = shiny;

                self.fetch_team_sprites(session)
            }
            Message::SpriteFetched(url, Ok(image)) => {
                let _ = self.sprites.insert(
                    url,
                    Sprite::Loaded(image::Handle::from_rgba(
                        image.width,
                        image.height,
                        image.rgba,
                    )),
                );

                Task::none()
            }
            Message::SpriteFetched(url, Err(error)) => {
                log::error!("{url}: {error}");

                let _ = self.sprites.insert(url, Sprite::Errored);

                Task::none()
            }
            Message::SummaryComputed(summary) => {
                self.summary = TeamSummary::Ready(summary);

                Task::none()
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let content: Element<_> = match &self.search {
            Search::Idle => notice("Select a Pokémon or a primary type to start."),
            Search::Running { .. } => notice("Searching..."),
            Search::Finished { results, .. } if results.is_empty() => {
                notice("No Pokémon found for the specified filters.")
            }
            Search::Finished {
                results,
                distribution,
            } => {
                let details = match self.selected_pokemon() {
                    Some(pokemon) => self.details(pokemon, distribution),
                    None => notice("Select a Pokémon to see its details."),
                };

                row![self.results(results), details].spacing(10).into()
            }
        };

        row![
            self.sidebar(),
            column![container(content).height(Fill), self.team()]
                .spacing(10)
                .padding(10)
                .width(Fill)
        ]
        .height(Fill)
        .into()
    }

    fn sidebar(&self) -> Element<'_, Message> {
        let name = field(
            "Pokémon",
            combo_box(
                &self.names,
                "Select the Pokémon...",
                self.filters.name.as_ref(),
                |name| Message::NameSelected(Some(name)),
            )
            .width(Fill),
            self.filters
                .name
                .as_ref()
                .map(|_| Message::NameSelected(None)),
        );

        let generation = field(
            "Generation",
            pick_list(Generation::ALL, self.filters.generation, |generation| {
                Message::GenerationSelected(Some(generation))
            })
            .placeholder("Any")
            .width(Fill),
            self.filters
                .generation
                .map(|_| Message::GenerationSelected(None)),
        );

        let clear = button(text("Clear Filters").size(14))
            .on_press(Message::ClearFilters)
            .padding([8, 15]);

        container(
            column![
                logo(24),
                name,
                selector(
                    "Primary type",
                    &self.catalog.types,
                    self.filters.primary_type.as_ref(),
                    Message::PrimaryTypeSelected,
                ),
                selector(
                    "Secondary type",
                    &self.catalog.types,
                    self.filters.secondary_type.as_ref(),
                    Message::SecondaryTypeSelected,
                ),
                selector(
                    "Region",
                    &self.catalog.regions,
                    self.filters.region.as_ref(),
                    Message::RegionSelected,
                ),
                selector(
                    "Ability",
                    &self.catalog.abilities,
                    self.filters.ability.as_ref(),
                    Message::AbilitySelected,
                ),
                selector(
                    "Egg group",
                    &self.catalog.egg_groups,
                    self.filters.egg_group.as_ref(),
                    Message::EggGroupSelected,
                ),
                generation,
                clear,
            ]
            .spacing(15),
        )
        .width(280)
        .height(Fill)
        .padding(15)
        .style(container::dark)
        .into()
    }

    fn results<'a>(&'a self, results: &'a [Pokemon]) -> Element<'a, Message> {
        let items = column(results.iter().map(|pokemon| {
            let is_selected = self.selected == Some(pokemon.id);

            button(text!("#{} {}", pokemon.id, pokemon.name).size(14))
                .width(Fill)
                .style(move |theme, status| {
                    if is_selected {
                        button::primary(theme, status)
                    } else {
                        button::text(theme, status)
                    }
                })
                .on_press(Message::PokemonSelected(pokemon.id))
                .into()
        }))
        .spacing(2);

        container(scrollable(items).height(Fill))
            .width(260)
            .padding(10)
            .style(container::bordered_box)
            .into()
    }

    fn details<'a>(
        &'a self,
        pokemon: &'a Pokemon,
        distribution: &'a Distribution,
    ) -> Element<'a, Message> {
        let header = text!("Nat Dex No. {} {}", pokemon.id, pokemon.name).size(20);

        let sprites = row![
            self.sprite(pokemon.sprite(false)),
            self.sprite(pokemon.sprite(true))
        ]
        .spacing(10);

        let info = table(
            "Details",
            [
                ("Gen", pokemon.generation.to_string()),
                ("Types", list(&pokemon.types)),
                ("Abilities", list(&pokemon.abilities)),
                ("Hidden Ability", list(&pokemon.hidden_ability)),
                ("Egg Groups", list(&pokemon.egg_groups)),
            ],
        );

        let stats = table(
            "Base Stats",
            Stats::LABELS
                .into_iter()
                .zip(pokemon.stats.values())
                .map(|(label, value)| (label, value.to_string()))
                .chain([("Total", pokemon.stats.total().to_string())]),
        );

        let matchups = table(
            "Type Matchups",
            [
                ("Weaknesses", list(&pokemon.matchups.weaknesses)),
                ("Resistances", list(&pokemon.matchups.resistances)),
                ("Immunities", list(&pokemon.matchups.immunities)),
            ],
        );

        let distribution = table(
            "Distribution",
            [
                ("Types", counts(&distribution.types)),
                ("Abilities", counts(&distribution.abilities)),
                ("Egg Groups", counts(&distribution.egg_groups)),
            ],
        );

        let add = button(text("Add to Team").size(14))
            .on_press(Message::AddToTeam)
            .padding([8, 15]);

        let notice = self.notice.as_ref().map(|notice| match notice {
            Notice::Added(name) => text!("{name} added to the team!").size(14),
            Notice::TeamFull => {
                text!("The team already has {} members!", Team::CAPACITY).size(14)
            }
        });

        scrollable(
            column![
                header,
                sprites,
                row![add].push(notice).spacing(10).align_y(Center),
                info,
                stats,
                matchups,
                distribution,
            ]
            .spacing(10)
            .padding(10),
        )
        .width(Fill)
        .height(Fill)
        .into()
    }

    fn team(&self) -> Element<'_, Message> {
        let header = row![
            text("Team").size(20),
            text!("{} / {}", self.team.len(), Team::CAPACITY).size(14),
            space::horizontal(),
            toggler(self.shiny)
                .label("Shiny Team")
                .on_toggle(Message::ShinyToggled),
            button(text("Clear Team").size(14))
                .on_press(Message::ClearTeam)
                .padding([8, 15]),
        ]
        .spacing(20)
        .align_y(Center);

        if self.team.is_empty() {
            return column![header, text("No Team :(")].spacing(10).into();
        }

        let members = row(self.team.members().iter().map(|member| {
            container(
                column![
                    text(&member.name).size(16),
                    self.sprite(member.sprite(self.shiny)),
                    text(list(&member.types)).size(12),
                    text(list(member.all_abilities())).size(12),
                ]
                .spacing(5)
                .align_x(Center),
            )
            .width(Fill)
            .padding(10)
            .style(container::bordered_box)
            .into()
        }))
        .spacing(10);

        let summary: Element<_> = match &self.summary {
            TeamSummary::Ready(summary) => table(
                "Team Matchups",
                [
                    ("Weaknesses", counts(&summary.weaknesses)),
                    ("Resistances", counts(&summary.resistances)),
                    ("Coverage", counts(&summary.coverage)),
                ],
            ),
            TeamSummary::Computing { .. } => text("Computing team matchups...").size(12).into(),
            TeamSummary::Empty => space::horizontal().into(),
        };

        column![header, members, summary].spacing(10).into()
    }

    fn sprite<'a>(&'a self, url: Option<&str>) -> Element<'a, Message> {
        const SIZE: u32 = 96;

        match url.and_then(|url| self.sprites.get(url)) {
            Some(Sprite::Loaded(handle)) => image(handle).width(SIZE).height(SIZE).into(),
            Some(Sprite::Loading) => center(text("...")).width(SIZE).height(SIZE).into(),
            Some(Sprite::Errored) | None => center(text("Image not found :(").size(10))
                .width(SIZE)
                .height(SIZE)
                .into(),
        }
    }

    fn selected_pokemon(&self) -> Option<&Pokemon> {
        let Search::Finished { results, .. } = &self.search else {
            return None;
        };

        let selected = self.selected?;

        results.iter().find(|pokemon| pokemon.id == selected)
    }

    fn refresh(&mut self, session: &Session) -> Task<Message> {
        self.selected = None;
        self.notice = None;

        if !self.filters.is_searchable() {
            self.search = Search::Idle;

            return Task::none();
        }

        let filters = self.filters.clone();
        let session = session.clone();

        let (search, handle) = Task::perform(
            async move { Arc::from(pokemon::search(&filters, &session).await) },
            Message::SearchFinished,
        )
        .abortable();

        self.search = Search::Running {
            _task: handle.abort_on_drop(),
        };

        search
    }

    fn summarize(&mut self, session: &Session) -> Task<Message> {
        let members: Arc<[Pokemon]> = Arc::from(self.team.members());
        let session = session.clone();

        let (summarize, handle) = Task::perform(
            async move { Summary::fetch(members, &session).await },
            Message::SummaryComputed,
        )
        .abortable();

        self.summary = TeamSummary::Computing {
            _task: handle.abort_on_drop(),
        };

        summarize
    }

    fn fetch_selected_sprites(&mut self, session: &Session) -> Task<Message> {
        let urls = self
            .selected_pokemon()
            .map(|pokemon| {
                [pokemon.sprite(false), pokemon.sprite(true)]
                    .into_iter()
                    .flatten()
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        self.fetch_sprites(urls, session)
    }

    fn fetch_team_sprites(&mut self, session: &Session) -> Task<Message> {
        let urls = self
            .team
            .members()
            .iter()
            .filter_map(|member| member.sprite(self.shiny))
            .map(str::to_owned)
            .collect();

        self.fetch_sprites(urls, session)
    }

    fn fetch_sprites(&mut self, urls: Vec<String>, session: &Session) -> Task<Message> {
        let mut tasks = Vec::new();

        for url in urls {
            if self.sprites.contains_key(&url) {
                continue;
            }

            let _ = self.sprites.insert(url.clone(), Sprite::Loading);

            tasks.push(Task::perform(
                sprite::Image::fetch(url.clone(), session.clone()),
                Message::SpriteFetched.with(url),
            ));
        }

        Task::batch(tasks)
    }
}

fn selector<'a>(
    label: &'a str,
    options: &'a [String],
    selected: Option<&'a String>,
    on_select: fn(Option<String>) -> Message,
) -> Element<'a, Message> {
    field(
        label,
        pick_list(options, selected, move |value| on_select(Some(value)))
            .placeholder("Any")
            .width(Fill),
        selected.map(|_| on_select(None)),
    )
}

/// A labeled control with an "Any" button that unsets it.
fn field<'a>(
    label: &'a str,
    control: impl Into<Element<'a, Message>>,
    on_clear: Option<Message>,
) -> Element<'a, Message> {
    let clear = button(text("Any").size(12))
        .padding(0)
        .style(button::text)
        .on_press_maybe(on_clear);

    column![
        row![text(label).size(12), space::horizontal(), clear].align_y(Center),
        control.into(),
    ]
    .spacing(5)
    .into()
}

fn notice<'a>(content: &'a str) -> Element<'a, Message> {
    center(
        container(text(content))
            .padding(10)
            .style(container::bordered_box),
    )
    .into()
}

/// Formats counts as `key: Nx`, or "None" when empty.
fn counts<K: fmt::Display>(counts: &BTreeMap<K, usize>) -> String {
    list(counts.iter().map(|(key, count)| format!("{key}: {count}x")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dexbase::Matchups;

    fn pokemon(id: u32, name: &str) -> Pokemon {
        Pokemon {
            id: Id::new(id),
            name: name.to_owned(),
            generation: Generation::from_id(Id::new(id)),
            types: Vec::new(),
            abilities: Vec::new(),
            hidden_ability: None,
            egg_groups: Vec::new(),
            stats: Stats::default(),
            sprite: None,
            shiny_sprite: None,
            matchups: Matchups::default(),
        }
    }

    fn dashboard() -> (Dashboard, Session) {
        let session = Session::new();
        let mut dashboard = Dashboard::new(Catalog::default());

        let _ = dashboard.update(
            Message::SearchFinished(Arc::from([pokemon(25, "Pikachu"), pokemon(26, "Raichu")])),
            &session,
        );

        (dashboard, session)
    }

    #[test]
    fn first_result_is_selected() {
        let (dashboard, _session) = dashboard();

        assert_eq!(
            dashboard.selected_pokemon().map(|pokemon| pokemon.name.as_str()),
            Some("Pikachu")
        );
    }

    #[test]
    fn seventh_member_is_rejected_with_a_notice() {
        let (mut dashboard, session) = dashboard();

        for _ in 0..Team::CAPACITY {
            let _ = dashboard.update(Message::AddToTeam, &session);
        }

        assert_eq!(dashboard.notice, Some(Notice::Added("Pikachu".to_owned())));

        let _ = dashboard.update(Message::PokemonSelected(Id::new(26)), &session);
        let _ = dashboard.update(Message::AddToTeam, &session);

        assert_eq!(dashboard.notice, Some(Notice::TeamFull));
        assert_eq!(dashboard.team.len(), Team::CAPACITY);
        assert!(
            dashboard
                .team
                .members()
                .iter()
                .all(|member| member.name == "Pikachu")
        );
    }

    #[test]
    fn clearing_the_team_resets_the_summary() {
        let (mut dashboard, session) = dashboard();

        let _ = dashboard.update(Message::AddToTeam, &session);
        let _ = dashboard.update(Message::ClearTeam, &session);

        assert!(dashboard.team.is_empty());
        assert!(matches!(dashboard.summary, TeamSummary::Empty));
        assert_eq!(dashboard.notice, None);
    }

    #[test]
    fn unsearchable_filters_go_idle() {
        let (mut dashboard, session) = dashboard();

        let _ = dashboard.update(Message::RegionSelected(Some("kanto".to_owned())), &session);

        assert!(matches!(dashboard.search, Search::Idle));
        assert_eq!(dashboard.selected_pokemon(), None);
    }

    #[test]
    fn a_single_filter_can_be_unset() {
        let (mut dashboard, session) = dashboard();

        let _ = dashboard.update(Message::NameSelected(Some("pikachu".to_owned())), &session);
        let _ = dashboard.update(Message::RegionSelected(Some("kanto".to_owned())), &session);
        let _ = dashboard.update(
            Message::SearchFinished(Arc::from([pokemon(25, "Pikachu")])),
            &session,
        );

        let _ = dashboard.update(Message::RegionSelected(None), &session);

        assert_eq!(dashboard.filters.region, None);
        assert_eq!(dashboard.filters.name.as_deref(), Some("pikachu"));
        assert!(matches!(dashboard.search, Search::Running { .. }));
    }

    #[test]
    fn unsetting_the_seed_goes_idle() {
        let (mut dashboard, session) = dashboard();

        let _ = dashboard.update(Message::NameSelected(Some("pikachu".to_owned())), &session);
        let _ = dashboard.update(Message::NameSelected(None), &session);

        assert_eq!(dashboard.filters.name, None);
        assert!(matches!(dashboard.search, Search::Idle));
    }

    #[test]
    fn counts_are_formatted_as_multipliers() {
        let counts = BTreeMap::from([("fire", 2), ("rock", 1)]);

        assert_eq!(super::counts(&counts), "fire: 2x, rock: 1x");
        assert_eq!(super::counts(&BTreeMap::<String, usize>::new()), "None");
    }
}

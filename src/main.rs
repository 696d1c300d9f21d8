use dexbase;

mod config;
mod screen;
mod sprite;
mod widget;

use crate::config::Config;
use crate::dexbase::{Catalog, Session};
use crate::screen::Dashboard;
use crate::screen::dashboard;
use crate::widget::logo;

use iced::widget::{center, column, text};
use iced::{Center, Element, Font, Task, Theme};

pub fn main() -> iced::Result {
    tracing_subscriber::fmt::init();

    iced::application(Teamdeck::new, Teamdeck::update, Teamdeck::view)
        .theme(Teamdeck::theme)
        .default_font(Font::MONOSPACE)
        .window_size((1500.0, 950.0))
        .run()
}

struct Teamdeck {
    state: State,
}

enum State {
    Loading,
    Ready {
        session: Session,
        dashboard: Dashboard,
    },
    Failed(anywho::Error),
}

#[derive(Debug, Clone)]
enum Message {
    Loaded(Result<(Session, Catalog), anywho::Error>),
    Dashboard(dashboard::Message),
}

impl Teamdeck {
    fn new() -> (Self, Task<Message>) {
        (
            Self {
                state: State::Loading,
            },
            Task::perform(load(), Message::Loaded),
        )
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Loaded(Ok((session, catalog))) => {
                log::info!(
                    "Catalog loaded: {} Pokémon, {} types, {} regions",
                    catalog.pokemon.len(),
                    catalog.types.len(),
                    catalog.regions.len(),
                );

                self.state = State::Ready {
                    session,
                    dashboard: Dashboard::new(catalog),
                };

                Task::none()
            }
            Message::Loaded(Err(error)) => {
                log::error!("{error}");

                self.state = State::Failed(error);

                Task::none()
            }
            Message::Dashboard(message) => {
                let State::Ready { session, dashboard } = &mut self.state else {
                    return Task::none();
                };

                dashboard.update(message, session).map(Message::Dashboard)
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        match &self.state {
            State::Loading => center(
                column![logo(32), text("Loading...")]
                    .spacing(10)
                    .align_x(Center),
            )
            .into(),
            State::Ready { dashboard, .. } => dashboard.view().map(Message::Dashboard),
            State::Failed(error) => center(text!("Startup failed: {error}")).into(),
        }
    }

    fn theme(&self) -> Theme {
        Theme::CatppuccinMocha
    }
}

async fn load() -> Result<(Session, Catalog), anywho::Error> {
    let config = Config::load().await?;
    let session = config.session();
    let catalog = Catalog::fetch(&session).await;

    Ok((session, catalog))
}

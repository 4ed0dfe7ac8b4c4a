use std::io::{self, Write};
use std::time::{Duration, Instant};

use sonora_locale::{Catalog, Localizer};
use sonora_types::{
    AppEvent, FormView, Genre, Locale, PlayerStatus, PlayerView, Tab, UiEvent,
};

use crate::commands::{Command, parse_command};
use crate::render;

/// Line-oriented output; the player progress line is rewritten in place on
/// a terminal
pub struct Screen<W: Write> {
    out: W,
    ansi: bool,
    progress_open: bool,
}

impl<W: Write> Screen<W> {
    pub fn new(out: W, ansi: bool) -> Self {
        Self {
            out,
            ansi,
            progress_open: false,
        }
    }

    pub fn line(&mut self, text: &str) -> io::Result<()> {
        if self.progress_open {
            writeln!(self.out)?;
            self.progress_open = false;
        }
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }

    pub fn lines(&mut self, lines: &[String]) -> io::Result<()> {
        lines.iter().try_for_each(|line| self.line(line))
    }

    pub fn progress(&mut self, text: &str) -> io::Result<()> {
        if !self.ansi {
            return self.line(text);
        }
        write!(self.out, "\r\x1b[2K{text}")?;
        self.progress_open = true;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// What the loop should do after a line of input
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Send(AppEvent),
    Quit,
    Handled,
}

/// Terminal view state: the locale and form as last reported by the app,
/// plus the player line throttle
pub struct Ui<'c, W: Write> {
    catalog: &'c Catalog,
    screen: Screen<W>,
    locale: Locale,
    tab: Tab,
    form: Option<FormView>,
    player: PlayerView,
    redraw_every: Duration,
    last_progress: Option<Instant>,
}

impl<'c, W: Write> Ui<'c, W> {
    pub fn new(catalog: &'c Catalog, screen: Screen<W>, locale: Locale, redraw_every: Duration) -> Self {
        Self {
            catalog,
            screen,
            locale,
            tab: Tab::default(),
            form: None,
            player: PlayerView::default(),
            redraw_every,
            last_progress: None,
        }
    }

    fn localizer(&self) -> Localizer<'c> {
        self.catalog.localizer(self.locale)
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn into_screen(self) -> Screen<W> {
        self.screen
    }

    /// Render one app event. Returns false once the UI should close.
    pub fn handle_event(&mut self, event: AppEvent) -> io::Result<bool> {
        let l = self.localizer();

        match event {
            AppEvent::BackendReady(form) => {
                self.locale = form.locale;
                self.form = Some(form);
                self.redraw()?;
                let l = self.localizer();
                self.screen.line(&render::player(&l, &self.player))?;
            }
            AppEvent::LocaleChanged(locale) => {
                self.locale = locale;
                if let Some(form) = self.form.as_mut() {
                    form.locale = locale;
                }
                self.redraw()?;
            }
            AppEvent::TabChanged(tab) => {
                self.tab = tab;
                self.screen.line(&render::tabs(&l, tab))?;
                if tab == Tab::Generate {
                    self.draw_form()?;
                }
            }
            AppEvent::FormUpdated(form) => {
                self.form = Some(form);
                self.draw_form()?;
            }
            AppEvent::GenerationStarted => self.screen.line(&l.t("actions.generating"))?,
            AppEvent::GenerationFinished(details) => {
                self.screen.lines(&render::track(&l, &details))?
            }
            AppEvent::GenerationFailed(error) => {
                self.screen.line(&render::generation_failure(&l, &error))?
            }
            AppEvent::TranslationStarted => self.screen.line(&l.t("translationTester.loading"))?,
            AppEvent::ShowTranslation(result) => {
                self.screen.lines(&render::translation(&l, &result))?
            }
            AppEvent::TranslationFailed(failure) => {
                self.screen
                    .line(&render::translation_failure(&l, &failure))?
            }
            AppEvent::LibraryLoading => self.screen.line(&l.t("library.loading"))?,
            AppEvent::ShowLibrary(items) => self.screen.lines(&render::library(&l, &items))?,
            AppEvent::LibraryFailed(error) => {
                self.screen.line(&render::library_failure(&l, &error))?
            }
            AppEvent::NowPlaying { title } => {
                let line = match title {
                    Some(title) => render::now_playing(&l, &title),
                    None => l.t("player.title"),
                };
                self.screen.line(&line)?;
            }
            AppEvent::PlayerUpdate(view) => self.update_player(view)?,
            AppEvent::PlayerFailed(error) => {
                self.screen.line(&render::player_failure(&l, &error))?
            }
            AppEvent::UiEvent(UiEvent::Help) => self.screen.lines(&render::help(&l))?,
            AppEvent::UiEvent(UiEvent::Close) => return Ok(false),
            other => tracing::debug!("UI ignoring {:?}", std::mem::discriminant(&other)),
        }

        Ok(true)
    }

    /// Interpret one line typed by the user
    pub fn handle_line(&mut self, line: &str) -> io::Result<Input> {
        let l = self.localizer();

        match parse_command(line) {
            Command::Send(event) => return Ok(Input::Send(event)),
            Command::Quit => return Ok(Input::Quit),
            Command::Empty => {}
            Command::Help => self.screen.lines(&render::help(&l))?,
            Command::Suggest(None) => {
                self.screen
                    .lines(&render::suggestions(&l, self.current_genre()))?
            }
            Command::Suggest(Some(n)) => {
                let suggestions = l.t_list(&self.current_genre().suggestions_key());
                match suggestions.into_iter().nth(n - 1) {
                    Some(text) => return Ok(Input::Send(AppEvent::SetPrompt(text))),
                    None => self.screen.line(&render::unknown_command(&l, line.trim()))?,
                }
            }
            Command::Invalid(command) => {
                self.screen.line(&render::unknown_command(&l, &command))?
            }
        }

        Ok(Input::Handled)
    }

    fn current_genre(&self) -> Genre {
        self.form.as_ref().map(|f| f.genre).unwrap_or_default()
    }

    fn redraw(&mut self) -> io::Result<()> {
        let l = self.localizer();
        self.screen.lines(&render::header(&l))?;
        self.screen.line(&render::languages(self.locale))?;
        self.screen.line(&render::tabs(&l, self.tab))?;
        if self.tab == Tab::Generate {
            self.draw_form()?;
        }
        Ok(())
    }

    fn draw_form(&mut self) -> io::Result<()> {
        let l = self.localizer();
        if let Some(form) = &self.form {
            self.screen.lines(&render::form(&l, form))?;
        }
        Ok(())
    }

    /// Status changes always draw; progress while playing is throttled
    fn update_player(&mut self, view: PlayerView) -> io::Result<()> {
        let status_changed = view.status != self.player.status;
        let now = Instant::now();
        let due = self
            .last_progress
            .is_none_or(|last| now.duration_since(last) >= self.redraw_every);

        self.player = view;
        if !status_changed && self.player.status == PlayerStatus::Playing && !due {
            return Ok(());
        }

        self.last_progress = Some(now);
        let l = self.localizer();
        self.screen.progress(&render::player(&l, &self.player))
    }
}

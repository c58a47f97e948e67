//! Session controller: screens, mode, participant names and the one live game.
//!
//! Every stimulus arrives as a [`Command`] through [`Session::handle`] and
//! comes back out as the [`Signal`]s the presentation layer should render.
//! Commands that make no sense on the current screen are dropped without a
//! signal, the same way the engine drops illegal moves.

use rand::{rngs::SmallRng, SeedableRng};
use tracing::{debug, info, instrument, trace};

use crate::board::{Player, TileId};
use crate::game::{Conclusion, Game, TurnResult, FIRST_TURN};
use crate::message::{AiTicket, Command, Mode, Screen, Signal};
use crate::settings::Settings;

/// The mark the AI plays in single-AI mode. The human always opens as X.
pub const AI_PLAYER: Player = Player::O;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participants {
    x: String,
    o: String,
}

impl Participants {
    pub fn name(&self, player: Player) -> &str {
        match player {
            Player::X => &self.x,
            Player::O => &self.o,
        }
    }
}

#[derive(Debug)]
pub struct Session {
    settings: Settings,
    screen: Screen,
    mode: Mode,
    names: Participants,
    game: Game,
    generation: u64,
    rng: SmallRng,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        let rng = match settings.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self::with_rng(settings, rng)
    }

    pub fn with_rng(settings: Settings, rng: SmallRng) -> Self {
        let settings = settings.with_builtin_labels();
        let names = Participants {
            x: settings.player_one_default.clone(),
            o: settings.ai_name.clone(),
        };
        Self {
            settings,
            screen: Screen::Welcome,
            mode: Mode::default(),
            names,
            game: Game::new(),
            generation: 0,
            rng,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn participants(&self) -> &Participants {
        &self.names
    }

    /// Bumped whenever the live game is replaced; stale AI tickets carry an
    /// older value.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[instrument(skip(self), fields(screen = ?self.screen))]
    pub fn handle(&mut self, command: Command) -> Vec<Signal> {
        let signals = match (self.screen, command) {
            (Screen::Welcome, Command::SelectMode(mode)) => self.select_mode(mode),
            (Screen::Setup, Command::Back) => self.back(),
            (Screen::Setup, Command::SubmitSetup { name1, name2 }) => {
                self.submit_setup(&name1, name2.as_deref())
            }
            (Screen::Game, Command::CellActivated(index)) => self.cell_activated(index),
            (Screen::Game, Command::Restart) => self.restart(),
            (Screen::Game, Command::GoHome) => self.go_home(),
            (Screen::Game, Command::AiMove(ticket)) => self.ai_move(ticket),
            (screen, command) => {
                trace!(?screen, ?command, "command ignored");
                Vec::new()
            }
        };
        debug!(count = signals.len(), "signals emitted");
        signals
    }

    fn select_mode(&mut self, mode: Mode) -> Vec<Signal> {
        info!(?mode, "mode selected");
        self.mode = mode;
        let (title, show_second_name) = match mode {
            Mode::SingleAi => ("Enter Your Name", false),
            Mode::TwoHuman => ("Enter Player Names", true),
        };
        vec![
            Signal::SetupForm {
                title: title.to_string(),
                show_second_name,
            },
            self.show(Screen::Setup),
        ]
    }

    fn back(&mut self) -> Vec<Signal> {
        vec![self.show(Screen::Welcome)]
    }

    fn submit_setup(&mut self, name1: &str, name2: Option<&str>) -> Vec<Signal> {
        let x = or_default(name1, &self.settings.player_one_default);
        let o = match self.mode {
            // Whatever was typed for the second player, the AI keeps its name.
            Mode::SingleAi => self.settings.ai_name.clone(),
            Mode::TwoHuman => {
                or_default(name2.unwrap_or_default(), &self.settings.player_two_default)
            }
        };
        info!(%x, %o, mode = ?self.mode, "players set up");
        self.names = Participants { x, o };

        let mut signals = vec![self.show(Screen::Game)];
        signals.extend(self.restart());
        signals
    }

    fn restart(&mut self) -> Vec<Signal> {
        self.game = Game::new();
        self.generation += 1;
        debug!(generation = self.generation, "new game");
        vec![
            Signal::BoardCleared,
            Signal::TurnChanged {
                player: FIRST_TURN,
                name: self.names.name(FIRST_TURN).to_string(),
            },
        ]
    }

    fn go_home(&mut self) -> Vec<Signal> {
        let mut signals = self.restart();
        signals.push(self.show(Screen::Welcome));
        signals
    }

    fn cell_activated(&mut self, index: usize) -> Vec<Signal> {
        let player = self.game.whos_turn();
        if self.mode == Mode::SingleAi && player == AI_PLAYER {
            trace!(index, "waiting on the AI");
            return Vec::new();
        }

        let result = self.game.apply_move(index, player);
        let Some(tile) = TileId::new(index).filter(|_| result != TurnResult::Rejected) else {
            return Vec::new();
        };

        let mut signals = self.turn_signals(tile, player, result);
        if self.mode == Mode::SingleAi && result == TurnResult::NextTurn(AI_PLAYER) {
            let ticket = AiTicket {
                generation: self.generation,
            };
            debug!(?ticket, delay_ms = self.settings.ai_delay_ms, "AI move scheduled");
            signals.push(Signal::AiMoveScheduled {
                ticket,
                delay_ms: self.settings.ai_delay_ms,
            });
        }
        signals
    }

    fn ai_move(&mut self, ticket: AiTicket) -> Vec<Signal> {
        if self.mode != Mode::SingleAi || ticket.generation != self.generation {
            debug!(?ticket, generation = self.generation, "stale AI move dropped");
            return Vec::new();
        }

        match self.game.play_ai_move(AI_PLAYER, &mut self.rng) {
            Some((tile, result)) => {
                debug!(%tile, "AI moved");
                self.turn_signals(tile, AI_PLAYER, result)
            }
            None => Vec::new(),
        }
    }

    fn turn_signals(&self, tile: TileId, player: Player, result: TurnResult) -> Vec<Signal> {
        let mut signals = vec![Signal::BoardUpdated { tile, player }];
        match result {
            TurnResult::Rejected => {}
            TurnResult::NextTurn(player) => signals.push(Signal::TurnChanged {
                player,
                name: self.names.name(player).to_string(),
            }),
            TurnResult::Concluded(Conclusion::Win { player, line }) => {
                let winner = self.names.name(player).to_string();
                info!(%winner, ?line, "game won");
                signals.push(Signal::GameWon {
                    winner,
                    player,
                    line,
                });
                signals.push(Signal::CelebrationRequested);
            }
            TurnResult::Concluded(Conclusion::Draw) => {
                info!("game drawn");
                signals.push(Signal::GameDrawn);
            }
        }
        signals
    }

    fn show(&mut self, screen: Screen) -> Signal {
        debug!(from = ?self.screen, to = ?screen, "screen change");
        self.screen = screen;
        screen.into()
    }
}

fn or_default(name: &str, default: &str) -> String {
    match name.trim() {
        "" => default.to_string(),
        name => name.to_string(),
    }
}

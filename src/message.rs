use crate::board::{Player, TileId};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    SingleAi,
    TwoHuman,
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum Screen {
    #[default]
    Welcome,
    Setup,
    Game,
}

/// Ties a delayed AI move to the game it was scheduled for.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct AiTicket {
    pub generation: u64,
}

/// Inbound stimuli from the presentation layer.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum Command {
    SelectMode(Mode),
    SubmitSetup { name1: String, name2: Option<String> },
    CellActivated(usize),
    Restart,
    GoHome,
    Back,
    /// The AI's response delay expired.
    AiMove(AiTicket),
}

/// Outbound signals for the presentation layer to render.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum Signal {
    ScreenChanged(Screen),
    SetupForm {
        title: String,
        show_second_name: bool,
    },
    BoardUpdated {
        tile: TileId,
        player: Player,
    },
    BoardCleared,
    TurnChanged {
        player: Player,
        name: String,
    },
    GameWon {
        winner: String,
        player: Player,
        line: [TileId; 3],
    },
    GameDrawn,
    CelebrationRequested,
    AiMoveScheduled {
        ticket: AiTicket,
        delay_ms: u64,
    },
}

impl Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Signal::ScreenChanged(screen) => write!(f, "screen: {screen:?}"),
            Signal::SetupForm { title, .. } => write!(f, "{title}"),
            Signal::BoardUpdated { tile, player } => write!(f, "{player} marks {tile}"),
            Signal::BoardCleared => write!(f, "board cleared"),
            Signal::TurnChanged { player, name } => write!(f, "{name}'s turn ({player})"),
            Signal::GameWon { winner, .. } => write!(f, "{winner} won the game!"),
            Signal::GameDrawn => write!(f, "It's a Draw!"),
            Signal::CelebrationRequested => write!(f, "celebrate"),
            Signal::AiMoveScheduled { delay_ms, .. } => write!(f, "AI is thinking ({delay_ms}ms)"),
        }
    }
}

impl From<Mode> for Command {
    fn from(value: Mode) -> Self {
        Command::SelectMode(value)
    }
}

impl From<AiTicket> for Command {
    fn from(value: AiTicket) -> Self {
        Command::AiMove(value)
    }
}

impl From<Screen> for Signal {
    fn from(value: Screen) -> Self {
        Signal::ScreenChanged(value)
    }
}

//! Tic-tac-toe for one device: a single-AI or two-player session around a
//! 3x3 game engine, driven by commands and answering with signals.

pub mod board;
pub mod error;
pub mod game;
pub mod message;
pub mod runtime;
pub mod session;
pub mod settings;
pub mod term;

pub use board::{Board, Player, TileId};
pub use error::{Error, Result};
pub use game::{Conclusion, Game, Status, TurnResult};
pub use message::{AiTicket, Command, Mode, Screen, Signal};
pub use runtime::Runtime;
pub use session::Session;
pub use settings::Settings;

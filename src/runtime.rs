//! Drives a [`Session`] from a command channel and plays delayed AI moves.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::message::{Command, Screen, Signal};
use crate::session::Session;

#[derive(Debug)]
struct Envelope {
    command: Command,
    /// Answered with the screen shown once the command has been handled.
    ack: Option<oneshot::Sender<Screen>>,
}

/// Sends stimuli into a running [`Runtime`].
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: mpsc::UnboundedSender<Envelope>,
}

impl CommandSender {
    pub fn send(&self, command: Command) -> Result<()> {
        self.tx
            .send(Envelope { command, ack: None })
            .map_err(|_| Error::SessionClosed)
    }

    /// Sends `command` and waits until the session has handled it.
    pub async fn send_acked(&self, command: Command) -> Result<Screen> {
        let (ack, screen) = oneshot::channel();
        self.tx
            .send(Envelope {
                command,
                ack: Some(ack),
            })
            .map_err(|_| Error::SessionClosed)?;
        screen.await.map_err(|_| Error::SessionClosed)
    }
}

pub struct Runtime {
    session: Session,
    commands_tx: mpsc::UnboundedSender<Envelope>,
    commands_rx: mpsc::UnboundedReceiver<Envelope>,
    signals_tx: mpsc::UnboundedSender<Signal>,
}

impl Runtime {
    /// Returns the runtime, a handle for commands and the signal stream.
    pub fn new(session: Session) -> (Self, CommandSender, mpsc::UnboundedReceiver<Signal>) {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (signals_tx, signals_rx) = mpsc::unbounded_channel();
        let sender = CommandSender {
            tx: commands_tx.clone(),
        };
        let runtime = Self {
            session,
            commands_tx,
            commands_rx,
            signals_tx,
        };
        (runtime, sender, signals_rx)
    }

    /// Processes commands until every outside sender is gone, then hands the
    /// session back.
    pub async fn run(mut self) -> Session {
        info!("session running");
        // Timers hold weak senders so they never keep the loop alive.
        let timers = self.commands_tx.downgrade();
        drop(self.commands_tx);

        while let Some(Envelope { command, ack }) = self.commands_rx.recv().await {
            for signal in self.session.handle(command) {
                if let (Signal::AiMoveScheduled { ticket, delay_ms }, Some(tx)) =
                    (&signal, timers.upgrade())
                {
                    let (ticket, delay_ms) = (*ticket, *delay_ms);
                    tokio::spawn(async move {
                        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                        let timer = Envelope {
                            command: ticket.into(),
                            ack: None,
                        };
                        if tx.send(timer).is_err() {
                            debug!(?ticket, "session closed before AI move");
                        }
                    });
                }
                if self.signals_tx.send(signal).is_err() {
                    warn!("signal receiver dropped");
                }
            }
            if let Some(ack) = ack {
                let _ = ack.send(self.session.screen());
            }
        }

        info!("session closed");
        self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Player, TileId};
    use crate::message::Mode;
    use crate::settings::Settings;
    use rand::{rngs::SmallRng, SeedableRng};

    fn runtime(delay_ms: u64) -> (Runtime, CommandSender, mpsc::UnboundedReceiver<Signal>) {
        let settings = Settings {
            ai_delay_ms: delay_ms,
            ..Settings::default()
        };
        Runtime::new(Session::with_rng(settings, SmallRng::seed_from_u64(5)))
    }

    async fn next_board_update(signals: &mut mpsc::UnboundedReceiver<Signal>) -> (TileId, Player) {
        loop {
            match signals.recv().await {
                Some(Signal::BoardUpdated { tile, player }) => return (tile, player),
                Some(_) => continue,
                None => panic!("signal stream ended"),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn ai_answers_after_the_delay() {
        let (runtime, tx, mut signals) = runtime(500);
        let handle = tokio::spawn(runtime.run());

        tx.send(Command::SelectMode(Mode::SingleAi)).unwrap();
        tx.send(Command::SubmitSetup {
            name1: "Ada".to_string(),
            name2: None,
        })
        .unwrap();
        tx.send(Command::CellActivated(4)).unwrap();

        assert_eq!(next_board_update(&mut signals).await, (TileId::B2, Player::X));
        let started = tokio::time::Instant::now();
        let (tile, player) = next_board_update(&mut signals).await;
        assert_eq!(player, Player::O);
        assert_ne!(tile, TileId::B2);
        assert!(started.elapsed() >= Duration::from_millis(500));

        drop(tx);
        let session = handle.await.unwrap();
        assert_eq!(session.game().board().mark_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn restart_before_the_delay_drops_the_ai_move() {
        let (runtime, tx, mut signals) = runtime(500);
        let handle = tokio::spawn(runtime.run());

        tx.send(Command::SelectMode(Mode::SingleAi)).unwrap();
        tx.send(Command::SubmitSetup {
            name1: "Ada".to_string(),
            name2: None,
        })
        .unwrap();
        tx.send(Command::CellActivated(0)).unwrap();
        tx.send(Command::Restart).unwrap();

        tokio::time::sleep(Duration::from_millis(1_000)).await;
        drop(tx);
        let session = handle.await.unwrap();
        assert_eq!(session.game().board().mark_count(), 0);
        assert_eq!(session.screen(), Screen::Game);

        let mut updates = 0;
        while let Ok(signal) = signals.try_recv() {
            if matches!(signal, Signal::BoardUpdated { .. }) {
                updates += 1;
            }
        }
        assert_eq!(updates, 1);
    }

    #[tokio::test]
    async fn acked_command_reports_the_new_screen() {
        let (runtime, tx, _signals) = runtime(0);
        let handle = tokio::spawn(runtime.run());

        assert_eq!(
            tx.send_acked(Command::SelectMode(Mode::TwoHuman)).await.unwrap(),
            Screen::Setup
        );
        assert_eq!(
            tx.send_acked(Command::CellActivated(0)).await.unwrap(),
            Screen::Setup
        );
        assert_eq!(
            tx.send_acked(Command::SubmitSetup {
                name1: "Ada".to_string(),
                name2: None,
            })
            .await
            .unwrap(),
            Screen::Game
        );

        drop(tx);
        let session = handle.await.unwrap();
        assert_eq!(session.participants().name(Player::O), "Player 2");
    }

    #[tokio::test]
    async fn closed_session_refuses_commands() {
        let (runtime, tx, _signals) = runtime(0);
        drop(runtime);
        assert!(matches!(tx.send(Command::Back), Err(Error::SessionClosed)));
        assert!(matches!(
            tx.send_acked(Command::Back).await,
            Err(Error::SessionClosed)
        ));
    }

    #[tokio::test]
    async fn zero_delay_is_still_a_full_game() {
        let (runtime, tx, mut signals) = runtime(0);
        let handle = tokio::spawn(runtime.run());

        tx.send(Command::SelectMode(Mode::SingleAi)).unwrap();
        tx.send(Command::SubmitSetup {
            name1: String::new(),
            name2: None,
        })
        .unwrap();

        let mut next = 0;
        let mut finished = false;
        tx.send(Command::CellActivated(next)).unwrap();
        let mut taken = [false; 9];
        while !finished {
            match signals.recv().await.unwrap() {
                Signal::BoardUpdated { tile, .. } => taken[tile.index()] = true,
                Signal::TurnChanged { player: Player::X, .. } if taken.iter().any(|t| *t) => {
                    while taken[next] {
                        next += 1;
                    }
                    tx.send(Command::CellActivated(next)).unwrap();
                }
                Signal::GameWon { .. } | Signal::GameDrawn => finished = true,
                _ => {}
            }
        }

        drop(tx);
        let session = handle.await.unwrap();
        assert!(!session.game().is_in_progress());
    }
}

//! Line-oriented terminal front-end.

use std::str::FromStr;

use tokio::{
    io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader},
    sync::mpsc,
};
use tracing::debug;

use crate::board::{Board, TileId};
use crate::error::Result;
use crate::message::{Command, Mode, Screen, Signal};
use crate::runtime::{CommandSender, Runtime};
use crate::session::Session;

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Command(Command),
    Quit,
    Help,
}

fn parse_input(screen: Screen, line: &str) -> Input {
    let line = line.trim();
    if matches!(line, "quit" | "q") {
        return Input::Quit;
    }

    let command = match (screen, line.to_ascii_lowercase().as_str()) {
        (Screen::Welcome, "ai" | "1") => Mode::SingleAi.into(),
        (Screen::Welcome, "pvp" | "2") => Mode::TwoHuman.into(),
        (Screen::Setup, "back" | "b") => Command::Back,
        (Screen::Setup, _) => {
            let mut names = line.splitn(2, ',');
            Command::SubmitSetup {
                name1: names.next().unwrap_or_default().to_string(),
                name2: names.next().map(str::to_string),
            }
        }
        (Screen::Game, "restart" | "r") => Command::Restart,
        (Screen::Game, "home" | "h") => Command::GoHome,
        (Screen::Game, tile) => match TileId::from_str(tile) {
            Ok(tile) => Command::CellActivated(tile.index()),
            Err(()) => return Input::Help,
        },
        _ => return Input::Help,
    };
    Input::Command(command)
}

fn help(screen: Screen) -> &'static str {
    match screen {
        Screen::Welcome => "Play against the [ai] or another player [pvp]?",
        Screen::Setup => "Type a name (or two, separated by a comma), or [back].",
        Screen::Game => "Pick a tile (a1..c3 or 0..8), [restart] or [home].",
    }
}

/// Renders signals on stdout and keeps a copy of the board to show.
async fn render(mut signals: mpsc::UnboundedReceiver<Signal>) {
    let mut board = Board::default();
    while let Some(signal) = signals.recv().await {
        match &signal {
            Signal::ScreenChanged(screen) => println!("\n{}", help(*screen)),
            Signal::SetupForm { title, .. } => println!("{title}"),
            Signal::BoardCleared => {
                board = Board::default();
                println!("\n{board}\n");
            }
            Signal::BoardUpdated { tile, player } => {
                board.mark(*tile, *player);
                println!("\n{board}\n");
            }
            Signal::CelebrationRequested => println!("*** \\o/ *** \\o/ *** \\o/ ***"),
            Signal::GameWon { .. } | Signal::GameDrawn => {
                println!("{signal}");
                println!("{}", help(Screen::Game));
            }
            Signal::TurnChanged { .. } | Signal::AiMoveScheduled { .. } => println!("{signal}"),
        }
    }
}

/// Plays sessions on the terminal until stdin closes or the user quits.
pub async fn play(session: Session) -> Result<()> {
    let (runtime, commands, signals) = Runtime::new(session);

    let runtime = tokio::spawn(runtime.run());
    let renderer = tokio::spawn(render(signals));

    println!("{}", help(Screen::Welcome));
    read_input(BufReader::new(io::stdin()), commands).await?;

    let session = runtime.await?;
    debug!(generation = session.generation(), "terminal session finished");
    renderer.await?;
    Ok(())
}

/// Feeds lines to the session one at a time, each parsed against the screen
/// the previous command left behind.
async fn read_input<R>(input: R, commands: CommandSender) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut stdout = io::stdout();
    let mut screen = Screen::Welcome;

    while let Some(line) = lines.next_line().await? {
        match parse_input(screen, &line) {
            Input::Quit => break,
            Input::Help => {
                stdout.write_all(help(screen).as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
            Input::Command(command) => screen = commands.send_acked(command).await?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Player;
    use crate::game::{Conclusion, Status};

    #[test]
    fn welcome_inputs() {
        assert_eq!(
            parse_input(Screen::Welcome, "AI"),
            Input::Command(Command::SelectMode(Mode::SingleAi))
        );
        assert_eq!(
            parse_input(Screen::Welcome, "2"),
            Input::Command(Command::SelectMode(Mode::TwoHuman))
        );
        assert_eq!(parse_input(Screen::Welcome, "b2"), Input::Help);
        assert_eq!(parse_input(Screen::Welcome, " quit "), Input::Quit);
    }

    #[test]
    fn setup_takes_names() {
        assert_eq!(
            parse_input(Screen::Setup, "Ada, Grace"),
            Input::Command(Command::SubmitSetup {
                name1: "Ada".to_string(),
                name2: Some(" Grace".to_string()),
            })
        );
        assert_eq!(
            parse_input(Screen::Setup, ""),
            Input::Command(Command::SubmitSetup {
                name1: String::new(),
                name2: None,
            })
        );
        assert_eq!(parse_input(Screen::Setup, "back"), Input::Command(Command::Back));
    }

    #[test]
    fn game_takes_tiles() {
        assert_eq!(
            parse_input(Screen::Game, "c3"),
            Input::Command(Command::CellActivated(8))
        );
        assert_eq!(
            parse_input(Screen::Game, "4"),
            Input::Command(Command::CellActivated(4))
        );
        assert_eq!(parse_input(Screen::Game, "r"), Input::Command(Command::Restart));
        assert_eq!(parse_input(Screen::Game, "home"), Input::Command(Command::GoHome));
        assert_eq!(parse_input(Screen::Game, "z9"), Input::Help);
    }

    async fn play_lines(session: Session, lines: &'static str) -> Session {
        let (runtime, commands, _signals) = Runtime::new(session);
        let runtime = tokio::spawn(runtime.run());
        read_input(lines.as_bytes(), commands).await.unwrap();
        runtime.await.unwrap()
    }

    fn quick_settings() -> crate::settings::Settings {
        crate::settings::Settings {
            ai_delay_ms: 0,
            seed: Some(1),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn piped_lines_follow_the_screens() {
        for _ in 0..20 {
            let session = play_lines(
                Session::new(quick_settings()),
                "pvp\nAda, Grace\n0\n4\n1\n5\n2\n",
            )
            .await;

            assert_eq!(session.screen(), Screen::Game);
            assert_eq!(session.participants().name(Player::X), "Ada");
            assert_eq!(session.participants().name(Player::O), "Grace");
            assert_eq!(
                session.game().status(),
                Status::Concluded(Conclusion::Win {
                    player: Player::X,
                    line: [TileId::A1, TileId::B1, TileId::C1],
                })
            );
        }
    }

    #[tokio::test]
    async fn help_lines_do_not_shift_later_input() {
        let session = play_lines(
            Session::new(quick_settings()),
            "nonsense\n2\nback\nai\nAda\nz9\nb2\nhome\n",
        )
        .await;

        assert_eq!(session.screen(), Screen::Welcome);
        assert_eq!(session.mode(), Mode::SingleAi);
        assert_eq!(session.participants().name(Player::X), "Ada");
        assert_eq!(session.participants().name(Player::O), "AI");
        assert_eq!(session.game().board().mark_count(), 0);
    }

    #[tokio::test]
    async fn quit_stops_reading() {
        let session = play_lines(Session::new(quick_settings()), "pvp\nquit\nAda\n").await;
        assert_eq!(session.screen(), Screen::Setup);
    }
}

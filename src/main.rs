use anyhow::Result;

use std::io::{stdin, stdout, Write};
use std::time::Duration;

use connect4_engine::agent::{Agent, SearchAgent};
use connect4_engine::arrayboard::{ArrayBoard, GameState};
use connect4_engine::tournament::{print_standings, run_round_robin, AgentSpec, Entrant};
use connect4_engine::WIDTH;

const MOVE_BUDGET: Duration = Duration::from_secs(2);

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        Some("tournament") => {
            let games_per_match = args
                .next()
                .map(|arg| arg.parse::<usize>())
                .transpose()?
                .unwrap_or(10);
            tournament(games_per_match)
        }
        _ => interactive(),
    }
}

fn tournament(games_per_match: usize) -> Result<()> {
    let entrants = [
        Entrant::new(
            "search",
            AgentSpec::Search {
                budget: Duration::from_millis(200),
            },
        ),
        Entrant::new("heuristic", AgentSpec::Heuristic),
        Entrant::new("random", AgentSpec::Random),
    ];

    let standings = run_round_robin(&entrants, games_per_match)?;
    print_standings(&standings);
    Ok(())
}

fn ask_yes_no(prompt: &str) -> Result<bool> {
    let stdin = stdin();
    loop {
        print!("{} y/n: ", prompt);
        stdout().flush().expect("failed to flush to stdout!");

        let mut buffer = String::new();
        stdin.read_line(&mut buffer)?;
        match buffer.to_lowercase().chars().next() {
            Some('y') => return Ok(true),
            Some('n') => return Ok(false),
            _ => println!("Unknown answer given"),
        }
    }
}

fn interactive() -> Result<()> {
    let mut board = ArrayBoard::new();
    let stdin = stdin();

    println!("Welcome to Connect 4\n");

    let ai_players = (
        ask_yes_no("Is player 1 AI controlled?")?,
        ask_yes_no("Is player 2 AI controlled?")?,
    );

    let mut engine = SearchAgent::new("engine", MOVE_BUDGET);

    // game loop
    loop {
        board.display().expect("Failed to draw board!");

        match board.state {
            GameState::Playing => {
                let ai_turn =
                    (board.player_one && ai_players.0) || (!board.player_one && ai_players.1);
                let next_move = if ai_turn {
                    println!("AI is thinking...");
                    stdout().flush().expect("Failed to flush to stdout!");

                    // slow down play if both players are AI
                    if ai_players == (true, true) {
                        std::thread::sleep(Duration::from_secs(1));
                    }

                    let chosen = engine.choose_action(&board.observation(), &board.action_mask())?;
                    match chosen {
                        Some(column) => {
                            println!("Best move: {}", column + 1);
                            column
                        }
                        None => {
                            // full board without a registered draw should not happen
                            println!("No move available");
                            break;
                        }
                    }
                } else {
                    print!("Move input > ");
                    stdout().flush().expect("Failed to flush to stdout!");
                    let mut input_str = String::new();
                    stdin.read_line(&mut input_str)?;

                    match input_str.trim().parse::<usize>() {
                        Ok(column) if (1..=WIDTH).contains(&column) => column - 1,
                        _ => {
                            println!("Columns must be between 1 and {}", WIDTH);
                            continue;
                        }
                    }
                };

                if let Err(err) = board.play_checked(next_move) {
                    println!("{}", err);
                    // try the move again
                    continue;
                }
            }

            // end states
            GameState::PlayerOneWin => {
                println!("Player 1 wins!");
                break;
            }
            GameState::PlayerTwoWin => {
                println!("Player 2 wins!");
                break;
            }
            GameState::Draw => {
                println!("Draw!");
                break;
            }
        }
    }
    Ok(())
}

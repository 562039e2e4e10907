//! Round-robin tournament runner for the playing agents
//!
//! Every ordered pair of entrants plays a fixed number of games (so each
//! pairing is played with both move orders), the games run in parallel,
//! and the results are folded into a standings table.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rayon::prelude::*;

use std::time::Duration;

use crate::agent::{Agent, HeuristicAgent, RandomAgent, SearchAgent};
use crate::arrayboard::{ArrayBoard, GameState};

/// How to build an entrant's agent. Agents carry per-game state, so each
/// worker constructs its own from this description.
#[derive(Clone)]
pub enum AgentSpec {
    Search { budget: Duration },
    Heuristic,
    Random,
}

#[derive(Clone)]
pub struct Entrant {
    pub name: String,
    pub spec: AgentSpec,
}

impl Entrant {
    pub fn new<S: Into<String>>(name: S, spec: AgentSpec) -> Self {
        Self {
            name: name.into(),
            spec,
        }
    }

    fn build(&self) -> Box<dyn Agent> {
        match &self.spec {
            AgentSpec::Search { budget } => Box::new(SearchAgent::new(self.name.clone(), *budget)),
            AgentSpec::Heuristic => Box::new(HeuristicAgent::new(self.name.clone())),
            AgentSpec::Random => Box::new(RandomAgent::new(self.name.clone())),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum GameOutcome {
    FirstWin,
    SecondWin,
    Draw,
}

#[derive(Clone, Debug, Default)]
pub struct Standing {
    pub name: String,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
}

/// Plays a single game to completion, `first` moving first.
///
/// Both agents share one lifetime so the per-turn reborrow can pick
/// either of them.
fn play_game<'a>(
    first: &'a mut (dyn Agent + 'a),
    second: &'a mut (dyn Agent + 'a),
) -> Result<GameOutcome> {
    let mut board = ArrayBoard::new();
    loop {
        match board.state {
            GameState::PlayerOneWin => return Ok(GameOutcome::FirstWin),
            GameState::PlayerTwoWin => return Ok(GameOutcome::SecondWin),
            GameState::Draw => return Ok(GameOutcome::Draw),
            GameState::Playing => {}
        }

        let agent = if board.player_one {
            &mut *first
        } else {
            &mut *second
        };
        match agent.choose_action(&board.observation(), &board.action_mask())? {
            Some(column) => {
                board.play_checked(column)?;
            }
            // no legal column left: full board
            None => return Ok(GameOutcome::Draw),
        }
    }
}

/// Runs the full round robin and returns standings sorted by wins.
pub fn run_round_robin(entrants: &[Entrant], games_per_match: usize) -> Result<Vec<Standing>> {
    let mut schedule = Vec::new();
    for first in 0..entrants.len() {
        for second in 0..entrants.len() {
            if first != second {
                for _ in 0..games_per_match {
                    schedule.push((first, second));
                }
            }
        }
    }

    info!(
        "round robin: {} entrants, {} games",
        entrants.len(),
        schedule.len()
    );

    let progress = ProgressBar::new(schedule.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("Playing games: {bar:40.cyan/blue} {pos}/{len} ~{eta} remaining")
            .progress_chars("█▓▒░  "),
    );

    let outcomes: Result<Vec<(usize, usize, GameOutcome)>> = schedule
        .par_iter()
        .map(|&(first, second)| {
            let mut first_agent = entrants[first].build();
            let mut second_agent = entrants[second].build();
            let outcome = play_game(first_agent.as_mut(), second_agent.as_mut())?;
            progress.inc(1);
            Ok((first, second, outcome))
        })
        .collect();
    let outcomes = outcomes?;
    progress.finish();

    let mut standings: Vec<Standing> = entrants
        .iter()
        .map(|entrant| Standing {
            name: entrant.name.clone(),
            ..Standing::default()
        })
        .collect();

    for (first, second, outcome) in outcomes {
        match outcome {
            GameOutcome::FirstWin => {
                standings[first].wins += 1;
                standings[second].losses += 1;
            }
            GameOutcome::SecondWin => {
                standings[second].wins += 1;
                standings[first].losses += 1;
            }
            GameOutcome::Draw => {
                standings[first].draws += 1;
                standings[second].draws += 1;
            }
        }
    }

    standings.sort_by(|a, b| b.wins.cmp(&a.wins));
    Ok(standings)
}

pub fn print_standings(standings: &[Standing]) {
    println!("{:<16} {:>5} {:>5} {:>6}", "agent", "wins", "draws", "losses");
    for standing in standings {
        println!(
            "{:<16} {:>5} {:>5} {:>6}",
            standing.name, standing.wins, standing.draws, standing.losses
        );
    }
}

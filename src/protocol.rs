//! Line-based text protocol for driving a [`GameSession`].
//!
//! Modelled on GTP: each line is an optional numeric id, a command and its
//! arguments. Responses start with `=` on success or `?` on failure, followed
//! by the id (if any), a space, the message, and a blank line.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`
//! - `quit`
//! - `newgame` - Scramble a fresh board (bumps the round id)
//! - `play <tile>` - Activate a tile for the human
//! - `genmove` - Let the computer move; answers with the tile
//! - `hint` - Suggest a tile for the human
//! - `evaluate <human|computer>` - Differential score
//! - `showboard` - Render the board
//! - `locks` - Locked tiles with their countdowns, oldest first
//! - `status` - Turn, round, counts, and the result once finished

use std::io::{self, BufRead, Write};

use clap::ValueEnum;

use crate::board::Side;
use crate::session::{Completion, GameSession, GameStatus};

const KNOWN_COMMANDS: &[&str] = &[
    "evaluate",
    "genmove",
    "hint",
    "known_command",
    "list_commands",
    "locks",
    "name",
    "newgame",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "status",
    "version",
];

pub struct ProtocolEngine {
    session: GameSession,
}

impl ProtocolEngine {
    pub fn new(session: GameSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Serve stdin/stdout until `quit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.serve(stdin.lock(), stdout.lock())
    }

    /// Serve commands from `input`, writing responses to `output`.
    pub fn serve<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;

            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            writeln!(output, "{prefix}{id_str} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Split an optional numeric command id off the front of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    /// Execute one command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "1".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => match args.first() {
                Some(cmd) => {
                    let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                    (true, known.to_string())
                }
                None => (false, "missing argument".to_string()),
            },

            "quit" => (true, String::new()),

            "newgame" => match self.session.start_new_game() {
                Ok(()) => (true, format!("round {}", self.session.round_id())),
                Err(e) => (false, e.to_string()),
            },

            "play" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let Ok(tile) = arg.parse::<usize>() else {
                    return (false, format!("invalid tile: {arg}"));
                };
                match self.session.play_human(tile) {
                    Ok(status) => (true, describe_status(status)),
                    Err(e) => (false, e.to_string()),
                }
            }

            "genmove" => match self.session.play_computer() {
                Ok(Completion::Applied { tile, .. }) => (true, tile.to_string()),
                Ok(Completion::Stale) => (false, "stale decision".to_string()),
                Err(e) => (false, e.to_string()),
            },

            "hint" => match self.session.hint() {
                Ok(Some(tile)) => (true, tile.to_string()),
                Ok(None) => (true, "none".to_string()),
                Err(e) => (false, e.to_string()),
            },

            "evaluate" => {
                let side = match args.first() {
                    Some(arg) => match Side::from_str(arg, true) {
                        Ok(side) => side,
                        Err(_) => return (false, format!("unknown side: {arg}")),
                    },
                    None => Side::Human,
                };
                match self.session.evaluate(side) {
                    Ok(score) => (true, format!("{score:.1}")),
                    Err(e) => (false, e.to_string()),
                }
            }

            "showboard" => (true, format!("\n{}", self.session.board())),

            "locks" => {
                let locks = self.session.locks();
                let listing: Vec<String> = locks
                    .iter()
                    .map(|tile| format!("{tile}:{}", locks.countdown(tile)))
                    .collect();
                (true, listing.join(" "))
            }

            "status" => {
                let (human, computer) = self.session.counts();
                (
                    true,
                    format!(
                        "{} round={} turns={} human={human} computer={computer}",
                        describe_status(self.session.status()),
                        self.session.round_id(),
                        self.session.board().turns_played,
                    ),
                )
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }
}

fn describe_status(status: GameStatus) -> String {
    match status {
        GameStatus::InProgress => "in_progress".to_string(),
        GameStatus::Finished(outcome) => match outcome.winner {
            Some(side) => format!("finished winner={side}"),
            None => "finished draw".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjacency::Pattern;
    use crate::config::{Difficulty, SessionConfig};

    fn engine() -> ProtocolEngine {
        let config = SessionConfig::new(4, Pattern::Orthogonal, Difficulty::Hard).with_seed(21);
        ProtocolEngine::new(GameSession::new(config).unwrap())
    }

    #[test]
    fn test_parse_id_with_id() {
        let (id, cmd) = ProtocolEngine::parse_id("123 hint");
        assert_eq!(id, Some(123));
        assert_eq!(cmd, "hint");
    }

    #[test]
    fn test_parse_id_without_id() {
        let (id, cmd) = ProtocolEngine::parse_id("hint");
        assert_eq!(id, None);
        assert_eq!(cmd, "hint");
    }

    #[test]
    fn test_name_command() {
        let mut engine = engine();
        let (success, response) = engine.execute("name", &[]);
        assert!(success);
        assert_eq!(response, "flipwars");
    }

    #[test]
    fn test_known_command() {
        let mut engine = engine();
        assert_eq!(engine.execute("known_command", &["genmove"]), (true, "true".into()));
        assert_eq!(engine.execute("known_command", &["komi"]), (true, "false".into()));
    }

    #[test]
    fn test_play_and_genmove() {
        let mut engine = engine();
        let (success, _) = engine.execute("play", &["5"]);
        assert!(success);
        let (success, tile) = engine.execute("genmove", &[]);
        assert!(success);
        assert!(tile.parse::<usize>().unwrap() < 16);
        let (success, locks) = engine.execute("locks", &[]);
        assert!(success);
        assert!(locks.starts_with("5:1"));
    }

    #[test]
    fn test_bad_arguments() {
        let mut engine = engine();
        assert!(!engine.execute("play", &[]).0);
        assert!(!engine.execute("play", &["x"]).0);
        assert!(!engine.execute("play", &["99"]).0);
        assert!(!engine.execute("genmove", &[]).0, "computer cannot move first");
        assert!(!engine.execute("evaluate", &["nobody"]).0);
        assert!(!engine.execute("frobnicate", &[]).0);
    }

    #[test]
    fn test_serve_formats_responses() {
        let mut engine = engine();
        let input = b"1 name\n# comment\n\nquit\nname\n";
        let mut output = Vec::new();
        engine.serve(&input[..], &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert_eq!(text, "=1 flipwars\n\n= \n\n");
    }

    #[test]
    fn test_evaluate_is_zero_sum() {
        let mut engine = engine();
        let (ok_h, human) = engine.execute("evaluate", &["human"]);
        let (ok_c, computer) = engine.execute("evaluate", &["Computer"]);
        assert!(ok_h && ok_c);
        let human: f64 = human.parse().unwrap();
        let computer: f64 = computer.parse().unwrap();
        assert_eq!(human, -computer);
    }

    #[test]
    fn test_newgame_bumps_round() {
        let mut engine = engine();
        assert_eq!(engine.execute("newgame", &[]), (true, "round 2".into()));
    }
}

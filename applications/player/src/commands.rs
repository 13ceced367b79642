//! Text commands understood by the player prompt

use crate::error::{PlayerError, Result};
use cadence_playback::KeyCode;
use std::time::Duration;

/// One line of user input
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Show the catalog, optionally filtered like the search box
    List { filter: String },
    /// Play entry `index` of the last listing, queueing the whole listing
    Play { index: usize },
    /// Replay entry `index` of the queue
    Jump { index: usize },
    TogglePlayPause,
    Next,
    Prev,
    Shuffle,
    Repeat,
    /// `None` cycles through the presets
    Sleep { minutes: Option<SleepArg> },
    Seek { position: Duration },
    /// Percent, 0-100
    Volume { percent: u8 },
    Mute,
    /// Simulated key press
    Key {
        code: KeyCode,
        ctrl: bool,
        meta: bool,
    },
    Queue,
    Recent,
    ClearRecent,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepArg {
    Off,
    Minutes(u32),
}

pub const HELP: &str = "\
commands:
  list [filter]        show songs (filtered by title, artist, album, movie)
  play <n>             play song n of the last list, queueing the list
  jump <n>             play entry n of the queue
  toggle | space       play/pause
  next | prev          skip forward/back
  shuffle | repeat     toggle shuffle, cycle repeat mode
  sleep [min|off]      set sleep timer (no argument cycles 15/30/60/off)
  seek <m:ss|secs>     jump within the current song
  volume <0-100>       set volume
  mute                 mute/unmute
  key <code> [ctrl] [meta]
                       simulate a key press (Space, ArrowLeft, ArrowRight)
  queue | recent       show the queue or recently played
  clear-recent         forget recently played
  status | help | quit";

impl Command {
    /// Parse one input line; `Ok(None)` for a blank line
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let command = match verb.to_ascii_lowercase().as_str() {
            "list" | "ls" | "search" => Command::List {
                filter: args.join(" "),
            },
            "play" | "p" => Command::Play {
                index: index_arg(verb, &args)?,
            },
            "jump" | "j" => Command::Jump {
                index: index_arg(verb, &args)?,
            },
            "toggle" | "space" | "pause" => Command::TogglePlayPause,
            "next" | "n" => Command::Next,
            "prev" | "previous" | "b" => Command::Prev,
            "shuffle" => Command::Shuffle,
            "repeat" => Command::Repeat,
            "sleep" => Command::Sleep {
                minutes: match args.first() {
                    None => None,
                    Some(&"off") => Some(SleepArg::Off),
                    Some(arg) => Some(SleepArg::Minutes(number(verb, arg)?)),
                },
            },
            "seek" => Command::Seek {
                position: parse_position(single_arg(verb, &args)?)?,
            },
            "volume" | "vol" => {
                let percent: u8 = number(verb, single_arg(verb, &args)?)?;
                if percent > 100 {
                    return Err(PlayerError::InvalidCommand(format!(
                        "volume must be 0-100, got {}",
                        percent
                    )));
                }
                Command::Volume { percent }
            }
            "mute" => Command::Mute,
            "key" => {
                let code = KeyCode::from_code(single_or_first(verb, &args)?);
                let modifiers = &args[1..];
                Command::Key {
                    code,
                    ctrl: modifiers.iter().any(|m| m.eq_ignore_ascii_case("ctrl")),
                    meta: modifiers.iter().any(|m| m.eq_ignore_ascii_case("meta")),
                }
            }
            "queue" | "q" => Command::Queue,
            "recent" => Command::Recent,
            "clear-recent" => Command::ClearRecent,
            "status" | "s" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => {
                return Err(PlayerError::InvalidCommand(format!(
                    "unknown command {:?} (try help)",
                    other
                )))
            }
        };

        Ok(Some(command))
    }
}

/// Parse `m:ss` or plain seconds
pub fn parse_position(text: &str) -> Result<Duration> {
    let invalid = || PlayerError::InvalidCommand(format!("bad position {:?}", text));

    let secs = match text.split_once(':') {
        Some((minutes, seconds)) => {
            let minutes: u64 = minutes.parse().map_err(|_| invalid())?;
            let seconds: u64 = seconds.parse().map_err(|_| invalid())?;
            if seconds >= 60 {
                return Err(invalid());
            }
            minutes
                .checked_mul(60)
                .and_then(|m| m.checked_add(seconds))
                .ok_or_else(invalid)?
        }
        None => text.parse().map_err(|_| invalid())?,
    };

    Ok(Duration::from_secs(secs))
}

fn single_arg<'a>(verb: &str, args: &[&'a str]) -> Result<&'a str> {
    match args {
        [arg] => Ok(arg),
        _ => Err(PlayerError::InvalidCommand(format!(
            "{} takes exactly one argument",
            verb
        ))),
    }
}

fn single_or_first<'a>(verb: &str, args: &[&'a str]) -> Result<&'a str> {
    args.first()
        .copied()
        .ok_or_else(|| PlayerError::InvalidCommand(format!("{} needs an argument", verb)))
}

fn number<T: std::str::FromStr>(verb: &str, arg: &str) -> Result<T> {
    arg.parse()
        .map_err(|_| PlayerError::InvalidCommand(format!("{}: {:?} is not a number", verb, arg)))
}

/// 1-based index from the prompt, 0-based for the engine
fn index_arg(verb: &str, args: &[&str]) -> Result<usize> {
    let index: usize = number(verb, single_arg(verb, args)?)?;
    index
        .checked_sub(1)
        .ok_or_else(|| PlayerError::InvalidCommand(format!("{}: numbering starts at 1", verb)))
}

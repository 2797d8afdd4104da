//! Line commands read from stdin.

use std::fmt;

use raffle_abi::DisplayMode;
use raffle_lib::parse_bool;

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Start a spin, or request deceleration while spinning.
    Trigger,
    Import(String),
    Export(String),
    ResetEligibility,
    ClearWinners,
    ResetAll,
    Mode(DisplayMode),
    Reselect(bool),
    Sound(bool),
    Background(Option<u32>),
    Stats,
    Help,
    Quit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandError {
    Unknown(String),
    MissingArgument(&'static str),
    BadArgument(&'static str),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Unknown(name) => write!(f, "unknown command '{name}' (try 'help')"),
            CommandError::MissingArgument(cmd) => write!(f, "'{cmd}' needs an argument"),
            CommandError::BadArgument(cmd) => write!(f, "bad argument for '{cmd}'"),
        }
    }
}

pub struct BuiltinEntry {
    pub name: &'static str,
    pub usage: &'static str,
    pub desc: &'static str,
}

pub static BUILTINS: &[BuiltinEntry] = &[
    BuiltinEntry {
        name: "spin",
        usage: "spin  (or an empty line)",
        desc: "Start a draw; again to slow down and land",
    },
    BuiltinEntry {
        name: "import",
        usage: "import <file>",
        desc: "Replace the roster from a CSV/TSV file",
    },
    BuiltinEntry {
        name: "export",
        usage: "export <file>",
        desc: "Write winner history as CSV",
    },
    BuiltinEntry {
        name: "reset",
        usage: "reset",
        desc: "Restore everyone's eligibility",
    },
    BuiltinEntry {
        name: "clear",
        usage: "clear",
        desc: "Forget winners and restore eligibility",
    },
    BuiltinEntry {
        name: "wipe",
        usage: "wipe",
        desc: "Remove participants, winners and the draw counter",
    },
    BuiltinEntry {
        name: "mode",
        usage: "mode name|phone",
        desc: "Choose what the reel shows",
    },
    BuiltinEntry {
        name: "reselect",
        usage: "reselect on|off",
        desc: "Let unlimited-ticket winners be drawn again",
    },
    BuiltinEntry {
        name: "sound",
        usage: "sound on|off",
        desc: "Tick on every item crossing",
    },
    BuiltinEntry {
        name: "background",
        usage: "background default|#RRGGBB",
        desc: "Reel background color",
    },
    BuiltinEntry {
        name: "stats",
        usage: "stats",
        desc: "Participant, eligibility and draw counts",
    },
    BuiltinEntry {
        name: "help",
        usage: "help",
        desc: "List commands",
    },
    BuiltinEntry {
        name: "quit",
        usage: "quit",
        desc: "Exit",
    },
];

fn parse_color(value: &str) -> Option<u32> {
    let hex = value.strip_prefix('#').unwrap_or(value);
    if hex.len() != 6 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().map(|rgb| (rgb << 8) | 0xFF)
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };
    let arg = |cmd: &'static str| {
        if rest.is_empty() {
            Err(CommandError::MissingArgument(cmd))
        } else {
            Ok(rest)
        }
    };
    let toggle = |cmd: &'static str| arg(cmd).and_then(|v| parse_bool(v).ok_or(CommandError::BadArgument(cmd)));

    match name {
        "" | "spin" | "s" => Ok(Command::Trigger),
        "import" => arg("import").map(|p| Command::Import(p.to_string())),
        "export" => arg("export").map(|p| Command::Export(p.to_string())),
        "reset" => Ok(Command::ResetEligibility),
        "clear" => Ok(Command::ClearWinners),
        "wipe" => Ok(Command::ResetAll),
        "mode" => match arg("mode")? {
            "name" => Ok(Command::Mode(DisplayMode::Name)),
            "phone" => Ok(Command::Mode(DisplayMode::Phone)),
            _ => Err(CommandError::BadArgument("mode")),
        },
        "reselect" => toggle("reselect").map(Command::Reselect),
        "sound" => toggle("sound").map(Command::Sound),
        "background" => match arg("background")? {
            "default" => Ok(Command::Background(None)),
            value => parse_color(value)
                .map(|c| Command::Background(Some(c)))
                .ok_or(CommandError::BadArgument("background")),
        },
        "stats" => Ok(Command::Stats),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

pub fn help_text() -> String {
    let mut out = String::from("commands:\n");
    for entry in BUILTINS {
        out.push_str(&format!("  {:<28} {}\n", entry.usage, entry.desc));
    }
    out
}

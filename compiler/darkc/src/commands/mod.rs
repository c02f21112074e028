//! Subcommands and their hand-parsed options.

mod eval;
mod hash;

use std::path::PathBuf;
use std::str::FromStr;

use dark_value::Dval;

use crate::CliError;

pub use eval::{evaluate, run_eval};
pub use hash::{hash_values, run_hash};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Eval(EvalOptions),
    Hash(HashOptions),
    Help,
}

/// How `eval` prints its result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    EndUser,
    Developer,
    Json,
    Roundtrip,
}

impl OutputFormat {
    pub fn render(self, dv: &Dval) -> String {
        match self {
            OutputFormat::EndUser => dark_repr::to_enduser_readable_text(dv),
            OutputFormat::Developer => dark_repr::to_developer_repr(dv),
            OutputFormat::Json => dark_repr::to_pretty_machine_json_v1(dv),
            OutputFormat::Roundtrip => dark_repr::roundtrip::to_json(dv),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enduser" => Ok(OutputFormat::EndUser),
            "developer" => Ok(OutputFormat::Developer),
            "json" => Ok(OutputFormat::Json),
            "roundtrip" => Ok(OutputFormat::Roundtrip),
            other => Err(CliError::usage(format!(
                "unknown format `{other}` (expected enduser, developer, json or roundtrip)"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalOptions {
    pub path: PathBuf,
    pub preview: bool,
    pub format: OutputFormat,
    pub hash_version: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashOptions {
    pub path: PathBuf,
    pub version: u32,
}

pub fn print_usage() {
    eprintln!("Usage: darkc <command> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  eval <program.json>   Evaluate a serialized program");
    eprintln!("  hash <values.json>    Hash a JSON array of values");
    eprintln!("  help                  Show this message");
    eprintln!();
    eprintln!("Eval options:");
    eprintln!("  --preview             Evaluate in preview mode (no impure calls)");
    eprintln!("  --format=<format>     enduser (default), developer, json, roundtrip");
    eprintln!("  --hash-version=<n>    Argument hash version for recorded results");
    eprintln!();
    eprintln!("Hash options:");
    eprintln!("  --version=<n>         Hash version (default: current)");
    eprintln!();
    eprintln!("Logging: RUST_LOG=dark_eval=debug, DARK_LOG_TREE=1 for tree output");
}

/// Parse `argv` (including the program name).
pub fn parse_args(args: &[String]) -> Result<Command, CliError> {
    let Some(command) = args.get(1) else {
        return Err(CliError::usage("missing command"));
    };
    let rest = &args[2..];
    match command.as_str() {
        "eval" => parse_eval(rest).map(Command::Eval),
        "hash" => parse_hash(rest).map(Command::Hash),
        "help" | "--help" | "-h" => Ok(Command::Help),
        other => Err(CliError::usage(format!("unknown command `{other}`"))),
    }
}

fn parse_eval(args: &[String]) -> Result<EvalOptions, CliError> {
    let mut path = None;
    let mut options = EvalOptions {
        path: PathBuf::new(),
        preview: false,
        format: OutputFormat::default(),
        hash_version: dark_repr::CURRENT_HASH_VERSION,
    };
    for arg in args {
        if arg == "--preview" {
            options.preview = true;
        } else if let Some(format) = arg.strip_prefix("--format=") {
            options.format = format.parse()?;
        } else if let Some(version) = arg.strip_prefix("--hash-version=") {
            options.hash_version = parse_version(version)?;
        } else if arg.starts_with('-') {
            return Err(CliError::usage(format!("unknown option `{arg}`")));
        } else if path.is_none() {
            path = Some(PathBuf::from(arg));
        } else {
            return Err(CliError::usage(format!("unexpected argument `{arg}`")));
        }
    }
    options.path = path.ok_or_else(|| CliError::usage("missing program path"))?;
    Ok(options)
}

fn parse_hash(args: &[String]) -> Result<HashOptions, CliError> {
    let mut path = None;
    let mut version = dark_repr::CURRENT_HASH_VERSION;
    for arg in args {
        if let Some(v) = arg.strip_prefix("--version=") {
            version = parse_version(v)?;
        } else if arg.starts_with('-') {
            return Err(CliError::usage(format!("unknown option `{arg}`")));
        } else if path.is_none() {
            path = Some(PathBuf::from(arg));
        } else {
            return Err(CliError::usage(format!("unexpected argument `{arg}`")));
        }
    }
    let path = path.ok_or_else(|| CliError::usage("missing values path"))?;
    Ok(HashOptions { path, version })
}

fn parse_version(s: &str) -> Result<u32, CliError> {
    let version: u32 = s
        .parse()
        .map_err(|_| CliError::usage(format!("invalid hash version `{s}`")))?;
    if dark_repr::SUPPORTED_HASH_VERSIONS.contains(&version) {
        Ok(version)
    } else {
        Err(CliError::usage(format!("unsupported hash version {version}")))
    }
}

pub fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Eval(options) => println!("{}", run_eval(&options)?),
        Command::Hash(options) => println!("{}", run_hash(&options)?),
        Command::Help => print_usage(),
    }
    Ok(())
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("darkc")
            .chain(args.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn eval_with_options() {
        let command =
            parse_args(&argv(&["eval", "p.json", "--preview", "--format=developer", "--hash-version=0"]))
                .unwrap();
        assert_eq!(
            command,
            Command::Eval(EvalOptions {
                path: PathBuf::from("p.json"),
                preview: true,
                format: OutputFormat::Developer,
                hash_version: 0,
            })
        );
    }

    #[test]
    fn eval_defaults() {
        let Command::Eval(options) = parse_args(&argv(&["eval", "p.json"])).unwrap() else {
            panic!("expected eval");
        };
        assert!(!options.preview);
        assert_eq!(options.format, OutputFormat::EndUser);
        assert_eq!(options.hash_version, dark_repr::CURRENT_HASH_VERSION);
    }

    #[test]
    fn hash_with_version() {
        assert_eq!(
            parse_args(&argv(&["hash", "v.json", "--version=0"])).unwrap(),
            Command::Hash(HashOptions {
                path: PathBuf::from("v.json"),
                version: 0,
            })
        );
    }

    #[test]
    fn usage_errors() {
        for args in [
            vec![],
            vec!["frobnicate"],
            vec!["eval"],
            vec!["eval", "a.json", "b.json"],
            vec!["eval", "a.json", "--format=xml"],
            vec!["eval", "a.json", "--hash-version=9"],
            vec!["hash", "--verbose"],
        ] {
            assert!(
                matches!(parse_args(&argv(&args)), Err(CliError::Usage(_))),
                "{args:?}"
            );
        }
    }
}

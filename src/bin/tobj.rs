//! tobj - Torrent Object CLI tool
//!
//! Inspects and merges object trees stored as JSON or YAML files.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use torrent_object::object::{self, Flags, Object, ObjectError};
use torrent_object::{MergeOptions, UNBOUNDED_DEPTH};

#[derive(Parser)]
#[command(name = "tobj", version, about = "Inspect and merge torrent object trees")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print an outline of keys, types and flags
    Show { file: PathBuf },

    /// Merge the rhs tree into the lhs tree
    Merge(MergeArgs),
}

#[derive(Args)]
struct MergeArgs {
    #[arg(long)]
    lhs: PathBuf,
    #[arg(long)]
    rhs: PathBuf,
    /// Move entries instead of copying them; flags are not checked
    #[arg(long = "move")]
    move_entries: bool,
    #[arg(long, default_value_t = UNBOUNDED_DEPTH)]
    max_depth: u32,
    /// Mark a top-level lhs key as static data so it is preserved
    #[arg(long = "static", value_name = "KEY")]
    static_keys: Vec<String>,
    /// Do not skip entries flagged as static data
    #[arg(long)]
    no_skip: bool,
    /// Write YAML instead of JSON
    #[arg(long)]
    yaml: bool,
    /// Output location, '-' for stdout
    #[arg(short, long, default_value = "-")]
    output: String,
}

impl MergeArgs {
    fn options(&self) -> MergeOptions {
        let options = MergeOptions::new().max_depth(self.max_depth);
        if self.no_skip {
            options.no_skip()
        } else {
            options
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error("{path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("{path}: {message}")]
    Parse { path: String, message: String },

    #[error(transparent)]
    Object(#[from] ObjectError),

    #[error("serialize: {0}")]
    Serialize(String),

    #[error(transparent)]
    Write(#[from] io::Error),
}

fn load(path: &Path) -> Result<Object<'static>, CliError> {
    let display = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: display.clone(),
        source,
    })?;

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let parsed = if is_yaml {
        object::from_yaml(&content).map_err(|e| e.to_string())
    } else {
        object::from_json(&content).map_err(|e| e.to_string())
    };

    parsed.map_err(|message| CliError::Parse {
        path: display,
        message,
    })
}

fn describe(object: &Object<'_>) -> String {
    if object.flags().is_empty() {
        object.object_type().to_string()
    } else {
        format!("{} [{}]", object.object_type(), object.flags())
    }
}

fn outline(out: &mut impl Write, object: &Object<'_>, indent: usize) -> io::Result<()> {
    let pad = "  ".repeat(indent);

    if let Ok(map) = object.as_map() {
        for (key, entry) in map {
            writeln!(out, "{}{}: {}", pad, String::from_utf8_lossy(key), describe(entry))?;
            outline(out, entry, indent + 1)?;
        }
    } else if let Ok(list) = object.as_list() {
        for (i, entry) in list.iter().enumerate() {
            writeln!(out, "{}[{}]: {}", pad, i, describe(entry))?;
            outline(out, entry, indent + 1)?;
        }
    }
    Ok(())
}

fn show(file: &Path) -> Result<(), CliError> {
    let root = load(file)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", describe(&root))?;
    outline(&mut out, &root, 1)?;
    Ok(())
}

fn merge(args: &MergeArgs) -> Result<(), CliError> {
    let mut dest = load(&args.lhs)?;
    let mut source = load(&args.rhs)?;

    for key in &args.static_keys {
        dest.get_key_mut(key)?.set_flags(Flags::STATIC_DATA);
    }

    if args.move_entries {
        dest.merge_move(&mut source, args.max_depth)?;
    } else {
        dest.merge_copy_with(&source, &args.options())?;
    }

    let rendered = if args.yaml {
        object::to_yaml(&dest).map_err(|e| CliError::Serialize(e.to_string()))?
    } else {
        object::to_json_pretty(&dest).map_err(|e| CliError::Serialize(e.to_string()))? + "\n"
    };

    if args.output == "-" {
        io::stdout().write_all(rendered.as_bytes())?;
    } else {
        fs::write(&args.output, rendered)?;
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Show { file } => show(&file),
        Command::Merge(args) => merge(&args),
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> MergeArgs {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Merge(args) => args,
            Command::Show { .. } => panic!("expected merge"),
        }
    }

    #[test]
    fn test_merge_args_defaults() {
        let args = parse(&["tobj", "merge", "--lhs", "a.json", "--rhs", "b.json"]);
        assert!(!args.move_entries);
        assert_eq!(args.output, "-");
        let options = args.options();
        assert_eq!(options.get_skip_mask(), Flags::STATIC_DATA);
        assert_eq!(options.get_max_depth(), UNBOUNDED_DEPTH);
    }

    #[test]
    fn test_merge_args_options() {
        let args = parse(&[
            "tobj", "merge", "--lhs", "a.yaml", "--rhs", "b.yaml", "--max-depth", "2",
            "--no-skip", "--static", "info", "--static", "peers", "-o", "out.json",
        ]);
        assert_eq!(args.static_keys, vec!["info", "peers"]);
        assert_eq!(args.output, "out.json");
        let options = args.options();
        assert!(options.get_skip_mask().is_empty());
        assert_eq!(options.get_max_depth(), 2);
    }
}

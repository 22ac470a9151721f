use std::path::PathBuf;

pub const DEFAULT_CONFIG: &str = "conquery.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Gen,
    Init,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Gen(GenArgs),
    Init(InitArgs),
}

#[derive(Debug, Clone)]
pub struct GenArgs {
    pub config: PathBuf,
    pub dry_run: bool,
    pub check: bool,
}

#[derive(Debug, Clone)]
pub struct InitArgs {
    pub config: PathBuf,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    match first.as_str() {
        "-h" | "--help" => Ok(Command::Help(HelpTopic::Root)),
        "gen" => parse_gen(it.map(|s| s.as_str())),
        "init" => parse_init(it.map(|s| s.as_str())),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

fn parse_config<'a>(
    token: &'a str,
    it: &mut impl Iterator<Item = &'a str>,
) -> anyhow::Result<Option<PathBuf>> {
    if token == "--config" {
        let Some(v) = it.next() else {
            anyhow::bail!("--config requires a value");
        };
        return Ok(Some(PathBuf::from(v)));
    }
    Ok(token
        .strip_prefix("--config=")
        .map(PathBuf::from))
}

fn parse_gen<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config = PathBuf::from(DEFAULT_CONFIG);
    let mut dry_run = false;
    let mut check = false;

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Gen)),
            "--dry-run" => dry_run = true,
            "--check" => check = true,
            _ => match parse_config(token, &mut it)? {
                Some(path) => config = path,
                None => anyhow::bail!("unknown argument: {token}"),
            },
        }
    }

    if dry_run && check {
        anyhow::bail!("--dry-run and --check cannot be combined");
    }

    Ok(Command::Gen(GenArgs {
        config,
        dry_run,
        check,
    }))
}

fn parse_init<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config = PathBuf::from(DEFAULT_CONFIG);

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Init)),
            _ => match parse_config(token, &mut it)? {
                Some(path) => config = path,
                None => anyhow::bail!("unknown argument: {token}"),
            },
        }
    }

    Ok(Command::Init(InitArgs { config }))
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
conquery - static condition generator for conquery query objects

USAGE:
  conquery <COMMAND> [OPTIONS]

COMMANDS:
  gen           Generate `static_conditions` for #[orm(external)] query types
  init          Write a template conquery.toml

ENVIRONMENT:
  CONQUERY_LOG  tracing filter directive (default: warn)

Run `conquery <command> --help` for more."
            );
        }
        HelpTopic::Gen => {
            println!(
                "\
USAGE:
  conquery gen [OPTIONS]

OPTIONS:
  --config <FILE>       Config file path (default: conquery.toml)
  --dry-run             Print files that would change
  --check               Exit non-zero if output would change
  -h, --help            Print help"
            );
        }
        HelpTopic::Init => {
            println!(
                "\
USAGE:
  conquery init [OPTIONS]

OPTIONS:
  --config <FILE>       Config file path (default: conquery.toml)
  -h, --help            Print help"
            );
        }
    }
}

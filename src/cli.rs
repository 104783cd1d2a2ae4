// SPDX-License-Identifier: MPL-2.0
//! Command-line surface.

use crate::error::{Error, Result};
use crate::language::Language;
use std::ffi::OsString;
use std::path::PathBuf;

pub const USAGE: &str = "\
vegas_lang_changer - switch the display language of installed VEGAS releases

USAGE:
    vegas_lang_changer [OPTIONS] <COMMAND>

COMMANDS:
    list                                  Show installed releases
    languages (--select <NAME>... | --all)
                                          Languages shared by the selection
    apply (--select <NAME>... | --all) --lang <KEY|ID> [--yes]
                                          Back up, then change the language

OPTIONS:
    --ui-lang <LOCALE>       Program language (de, en-US, es, fr, ja, ko, pl, pt, ru, zh)
    --save-ui-lang           Remember --ui-lang in settings.toml
    --config-dir <DIR>       Folder holding settings.toml
    --backup-dir <DIR>       Folder for the registry backup (required with --simulate)
    --cache-dir <DIR>        Local app data folder holding the plugin caches
    --simulate <FILE>        Use a TOML registry fixture instead of the system registry;
                             only --backup-dir and --cache-dir are written to
    --log-level <LEVEL>      error, warn, info, debug or trace (default: warn)
    -h, --help               Show this help
";

/// Which discovered releases a command acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    Names(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Languages {
        selection: Selection,
    },
    Apply {
        selection: Selection,
        language: Language,
        /// Accept every confirmation without asking.
        yes: bool,
    },
    Help,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalArgs {
    pub ui_lang: Option<String>,
    pub save_ui_lang: bool,
    pub config_dir: Option<PathBuf>,
    pub backup_dir: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
    pub simulate: Option<PathBuf>,
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cli {
    pub global: GlobalArgs,
    pub command: Command,
}

pub fn parse_env() -> Result<Cli> {
    parse(std::env::args_os().skip(1).collect())
}

/// Parses arguments, program name excluded.
///
/// # Errors
///
/// [`Error::Usage`] for unknown commands, stray arguments, flags that do
/// not belong to the command, or malformed values.
pub fn parse(args: Vec<OsString>) -> Result<Cli> {
    let mut args = pico_args::Arguments::from_vec(args);

    let help = args.contains(["-h", "--help"]);
    let global = GlobalArgs {
        ui_lang: args.opt_value_from_str("--ui-lang")?,
        save_ui_lang: args.contains("--save-ui-lang"),
        config_dir: args.opt_value_from_str("--config-dir")?,
        backup_dir: args.opt_value_from_str("--backup-dir")?,
        cache_dir: args.opt_value_from_str("--cache-dir")?,
        simulate: args.opt_value_from_str("--simulate")?,
        log_level: args.opt_value_from_str("--log-level")?,
    };
    let names: Vec<String> = args.values_from_str("--select")?;
    let all = args.contains("--all");
    let lang: Option<String> = args.opt_value_from_str("--lang")?;
    let yes = args.contains(["-y", "--yes"]);

    let mut free = args.finish().into_iter();
    let command_name = free
        .next()
        .map(|arg| arg.into_string().map_err(|arg| unexpected(&arg)))
        .transpose()?;
    if let Some(extra) = free.next() {
        return Err(unexpected(&extra));
    }

    if help {
        return Ok(Cli {
            global,
            command: Command::Help,
        });
    }

    let selection = || match (all, names.is_empty()) {
        (true, true) => Ok(Selection::All),
        (false, false) => Ok(Selection::Names(names.clone())),
        (true, false) => Err(Error::Usage("use either --select or --all, not both".into())),
        (false, true) => Err(Error::Usage("select releases with --select <NAME> or --all".into())),
    };

    let command = match command_name.as_deref() {
        None => Command::Help,
        Some("list") => {
            reject_flag(all || !names.is_empty(), "--select/--all", "list")?;
            reject_flag(lang.is_some(), "--lang", "list")?;
            reject_flag(yes, "--yes", "list")?;
            Command::List
        }
        Some("languages") => {
            reject_flag(lang.is_some(), "--lang", "languages")?;
            reject_flag(yes, "--yes", "languages")?;
            Command::Languages {
                selection: selection()?,
            }
        }
        Some("apply") => {
            let raw = lang.ok_or_else(|| Error::Usage("apply needs --lang <KEY|ID>".into()))?;
            let language = raw.parse::<Language>().map_err(Error::Usage)?;
            Command::Apply {
                selection: selection()?,
                language,
                yes,
            }
        }
        Some(other) => return Err(Error::Usage(format!("unknown command '{other}'"))),
    };

    Ok(Cli { global, command })
}

fn reject_flag(present: bool, flag: &str, command: &str) -> Result<()> {
    if present {
        return Err(Error::Usage(format!("{flag} is not accepted by '{command}'")));
    }
    Ok(())
}

fn unexpected(arg: &OsString) -> Error {
    Error::Usage(format!("unexpected argument '{}'", arg.to_string_lossy()))
}

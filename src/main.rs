// SPDX-License-Identifier: MPL-2.0
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use vegas_lang_changer::assets::EmbeddedLangCfg;
use vegas_lang_changer::catalog::Catalog;
use vegas_lang_changer::cli::{self, Cli, Command, Selection};
use vegas_lang_changer::compat::LanguageOptions;
use vegas_lang_changer::config::{self, Config, DEFAULT_LOG_LEVEL};
use vegas_lang_changer::error::{Error, Result};
use vegas_lang_changer::i18n::I18n;
use vegas_lang_changer::paths;
use vegas_lang_changer::pipeline::{self, FolderOverrides, PipelineSettings};
use vegas_lang_changer::registry::memory::MemoryRegistry;
use vegas_lang_changer::registry::{self, ConfigStore};
use vegas_lang_changer::session::Session;

fn main() -> ExitCode {
    let cli = match cli::parse_env() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("{err}\n\n{}", cli::USAGE);
            return ExitCode::from(2);
        }
    };
    init_tracing(cli.global.log_level.as_deref());

    paths::init_cli_overrides(cli.global.config_dir.clone());
    let (mut config, warning) = config::load();
    if let Some(warning) = warning {
        tracing::warn!(%warning, "settings.toml ignored");
    }

    let i18n = I18n::new(cli.global.ui_lang.as_deref(), config.general.language.as_deref());
    if cli.global.save_ui_lang && cli.global.ui_lang.is_some() {
        config.general.language = Some(i18n.current_locale().to_string());
        if let Err(err) = config::save(&config) {
            tracing::warn!(%err, "program language not saved");
        }
    }

    match run(&cli, &config, &i18n) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::Usage(message)) => {
            eprintln!("{message}\n\n{}", cli::USAGE);
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!("{}", describe_failure(&err, &i18n));
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` when set, else `--log-level`, else warnings only. Logs go to
/// stderr.
fn init_tracing(log_level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(log_level.unwrap_or(DEFAULT_LOG_LEVEL))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .init();
}

fn describe_failure(err: &Error, i18n: &I18n) -> String {
    match err {
        Error::NotReady(reason) => i18n.tr(reason.message_id()),
        Error::Cancelled => i18n.tr("operation-cancelled"),
        Error::Backup(backup) => format!("{}\n{backup}", i18n.tr("backup-fail-message")),
        other => other.to_string(),
    }
}

fn run(cli: &Cli, config: &Config, i18n: &I18n) -> Result<()> {
    if cli.command == Command::Help {
        print!("{}", cli::USAGE);
        return Ok(());
    }

    let store = open_store(cli)?;
    let catalog = Catalog::builtin();
    let mut session = Session::discover(store.as_ref(), &catalog);

    match &cli.command {
        Command::Help => Ok(()),
        Command::List => {
            list(&session, i18n);
            Ok(())
        }
        Command::Languages { selection } => {
            apply_selection(&mut session, selection)?;
            match session.language_options(i18n) {
                LanguageOptions::Choices { options, .. } => {
                    for (language, name) in options {
                        println!("{:<20} {:>5}  {name}", language.key(), language.id().value());
                    }
                }
                placeholder => println!("{}", placeholder.labels(i18n).join("\n")),
            }
            Ok(())
        }
        Command::Apply {
            selection,
            language,
            yes,
        } => {
            apply_selection(&mut session, selection)?;
            let targets = session.target_set();
            let plan = pipeline::prepare(&targets, Some(*language))?;

            let overrides = FolderOverrides {
                backup_dir: cli.global.backup_dir.clone(),
                cache_dir: cli.global.cache_dir.clone(),
            };
            let settings = PipelineSettings::resolve(
                cli.global.simulate.is_some(),
                overrides,
                config,
                chrono::Local::now(),
            )?;

            for advisory in &plan.advisories {
                confirm(i18n, &i18n.tr(advisory.message_id()), *yes)?;
            }
            confirm(i18n, &plan.summary(i18n), *yes)?;

            let report = pipeline::apply(store.as_ref(), &EmbeddedLangCfg, &targets, plan.language, &settings)?;
            println!("{}", report.render(i18n));
            Ok(())
        }
    }
}

fn open_store(cli: &Cli) -> Result<Box<dyn ConfigStore>> {
    if let Some(fixture) = &cli.global.simulate {
        tracing::info!(path = %fixture.display(), "using simulated registry");
        return Ok(Box::new(MemoryRegistry::load_fixture(fixture)?));
    }
    system_store()
}

#[cfg(windows)]
fn system_store() -> Result<Box<dyn ConfigStore>> {
    Ok(Box::new(registry::windows::WindowsRegistry::new()))
}

#[cfg(not(windows))]
fn system_store() -> Result<Box<dyn ConfigStore>> {
    Err(Error::Usage(
        "the system registry is only available on Windows; use --simulate <FILE>".into(),
    ))
}

fn list(session: &Session, i18n: &I18n) {
    if session.is_empty() {
        println!("{}", i18n.tr("no-versions-found"));
        return;
    }
    println!("{}", i18n.tr("available-versions"));
    for instance in session.instances() {
        let install = instance
            .install_directory
            .as_ref()
            .map(|dir| dir.display().to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{}\n    [{}] {}\n    {install}",
            instance.name(),
            instance.view,
            registry::qualified_path(&instance.record_path),
        );
    }
}

fn apply_selection(session: &mut Session, selection: &Selection) -> Result<()> {
    match selection {
        Selection::All => session.select_all(),
        Selection::Names(names) => {
            for name in names {
                if !session.select(name) {
                    return Err(Error::Usage(format!("'{name}' is not installed")));
                }
            }
        }
    }
    Ok(())
}

/// Shows `message` and waits for a yes. `assume_yes` answers for the
/// operator.
fn confirm(i18n: &I18n, message: &str, assume_yes: bool) -> Result<()> {
    println!("{message}");
    if assume_yes {
        return Ok(());
    }
    print!("{} ", i18n.tr("confirm-prompt"));
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    let accepted = i18n
        .tr("yes-answers")
        .split(',')
        .map(str::trim)
        .chain(["y", "yes"])
        .any(|yes| !yes.is_empty() && yes == answer);
    if accepted {
        Ok(())
    } else {
        Err(Error::Cancelled)
    }
}

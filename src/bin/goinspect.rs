extern crate atty;
extern crate clap;
extern crate colored;
#[macro_use]
extern crate log;
extern crate log_panics;
extern crate serde_json;
extern crate simple_logging;

mod reporting;
pub use self::reporting::*;

use goinspect::*;
use log::LevelFilter;
use std::path::PathBuf;
use std::process::exit;

fn log_to_file(path: &PathBuf) -> GoInspectResult<()> {
    log_panics::init();
    let log_file = std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)?;
    simple_logging::log_to(log_file, LevelFilter::Info);
    Ok(())
}

fn log_to_stderr() {
    log_panics::init();
    #[cfg(debug_assertions)]
    simple_logging::log_to_stderr(LevelFilter::Debug);
    #[cfg(not(debug_assertions))]
    simple_logging::log_to_stderr(LevelFilter::Error);
}

fn main() -> Result<(), GoInspectError> {
    let config = Config::load()?;

    match config.log_file {
        Some(ref path) => log_to_file(path)?,
        None => log_to_stderr(),
    }

    if !atty::is(atty::Stream::Stdout) {
        colored::control::set_override(false);
    }

    let files = clap::Arg::with_name("files")
        .takes_value(true)
        .multiple(true)
        .value_name("FILES")
        .help("Globs of the Go files to inspect, or - for stdin");

    let mut app = clap::App::new("goinspect")
        .about("Finds runtime.GOMAXPROCS calls above the supported maximum and clamps them.")
        .subcommands(vec![
            clap::SubCommand::with_name("check").arg(files.clone()).arg(
                clap::Arg::with_name("format")
                    .long("format")
                    .takes_value(true)
                    .possible_values(&["pretty", "json"])
                    .default_value("pretty"),
            ),
            clap::SubCommand::with_name("fix").arg(files).arg(
                clap::Arg::with_name("dry-run")
                    .long("dry-run")
                    .help("Prints the fixed sources instead of rewriting the files"),
            ),
        ]);
    let cli = app.clone().get_matches();

    if let None = cli.subcommand_name() {
        if let Err(err) = app.print_help() {
            err.exit();
        }
        println!();
        return Ok(());
    }

    match cli.subcommand() {
        ("check", Some(matches)) => {
            let sources = load_sources(matches.values_of("files"), &config)?;
            let failed = check(sources, &config, matches.value_of("format"));
            if failed {
                exit(1);
            }
        }

        ("fix", Some(matches)) => {
            let sources = load_sources(matches.values_of("files"), &config)?;
            fix(sources, &config, matches.is_present("dry-run"))?;
        }

        _ => eprintln!("{}", cli.usage()),
    }

    Ok(())
}

fn load_sources(files: Option<clap::Values>, config: &Config) -> GoInspectResult<Vec<Arc<Source>>> {
    let globs: Vec<String> = match files {
        Some(files) => files.map(String::from).collect(),
        None => config.include.clone(),
    };

    let mut sources = vec![];
    for glob in globs {
        if glob == "-" {
            sources.push(Source::stdin()?);
        } else {
            sources.extend(Source::files(glob)?);
        }
    }
    debug!("Loaded {} sources.", sources.len());
    Ok(sources)
}

fn sorted(mut diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
    diagnostics.sort_by(|a, b| {
        let (a, b) = (&a.span().start, &b.span().start);
        (a.uri.to_string(), a.offset).cmp(&(b.uri.to_string(), b.offset))
    });
    diagnostics
}

/// Reports all diagnostics. Returns whether any of them is an error.
fn check(sources: Vec<Arc<Source>>, config: &Config, format: Option<&str>) -> bool {
    let mut workspace = Workspace::new();
    let mut diagnostics = vec![];
    for source in sources {
        diagnostics.extend(workspace.add(source));
    }

    let analysis = workspace.analysis();
    diagnostics.extend(analysis.check(config).into_iter().map(Diagnostic::from));

    let diagnostics = sorted(diagnostics);
    let failed = Diagnostic::failed(&diagnostics);

    match format {
        Some("json") => <JsonReporter as Reporter>::report(diagnostics, &analysis.navigator),
        _ => <PrettyReporter as Reporter>::report(diagnostics, &analysis.navigator),
    }

    failed
}

fn fix(sources: Vec<Arc<Source>>, config: &Config, dry_run: bool) -> GoInspectResult<()> {
    let mut workspace = Workspace::new();
    let mut original_code = HashMap::new();

    for source in sources {
        original_code.insert(source.uri.clone(), source.code.clone());
        let diagnostics = workspace.add(source);
        if Diagnostic::failed(&diagnostics) {
            warn!("Fixing a file with syntax errors: {:?}", diagnostics);
        }
    }

    let problems = workspace.analysis().check(config);
    let applied = workspace.fix_all(&problems);
    info!("Applied {} of {} fixes.", applied, problems.len());

    for source in workspace.sources() {
        let changed = original_code.get(&source.uri) != Some(&source.code);

        match source.uri.path() {
            Some(path) if !dry_run => {
                if changed {
                    std::fs::write(path, source.code.as_str())?;
                    eprintln!("Fixed {}", source.uri);
                }
            }
            _ => print!("{}", source.code),
        }
    }

    Ok(())
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use nu_aggregate::config::FormDefaults;
use nu_aggregate::form::FormDraft;
use nu_aggregate::scoring::{
    EducationTrack, EntryTestKind, InvalidInput, MarkPart, ScoreField, DEFAULT_TEST_TOTAL,
};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INVALID_INPUT: i32 = 1;
const EXIT_CONFIG: i32 = 4;
const EXIT_TERMINAL: i32 = 5;

/// A mark given on the command line: `OBTAINED/TOTAL` or a bare `OBTAINED`.
#[derive(Debug, Clone, PartialEq)]
struct MarkArg {
    obtained: String,
    total: Option<String>,
}

fn parse_mark_arg(s: &str) -> Result<MarkArg, String> {
    match s.split_once('/') {
        Some((obtained, total)) => {
            if obtained.trim().is_empty() || total.trim().is_empty() {
                return Err(format!("expected OBTAINED/TOTAL, got '{}'", s));
            }
            Ok(MarkArg {
                obtained: obtained.trim().to_string(),
                total: Some(total.trim().to_string()),
            })
        }
        None => Ok(MarkArg {
            obtained: s.trim().to_string(),
            total: None,
        }),
    }
}

fn parse_track(s: &str) -> Result<EducationTrack, String> {
    EducationTrack::parse(s).ok_or_else(|| format!("unknown education system '{}' (fsc, a-level)", s))
}

fn parse_test_kind(s: &str) -> Result<EntryTestKind, String> {
    EntryTestKind::parse(s).ok_or_else(|| format!("unknown entry test '{}' (nu, nat, sat)", s))
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the interactive calculator (default if no subcommand)
    Form,
    /// Compute an aggregate once and print it
    Calc {
        /// Matric / O-Level marks, e.g. 900/1100
        #[arg(long, value_parser = parse_mark_arg, value_name = "OBTAINED[/TOTAL]")]
        matric: MarkArg,

        /// FSc / A-Level marks, e.g. 900/1100
        #[arg(long, value_parser = parse_mark_arg, value_name = "OBTAINED[/TOTAL]")]
        inter: MarkArg,

        /// Entry test marks, e.g. 80/100
        #[arg(long, value_parser = parse_mark_arg, value_name = "OBTAINED[/TOTAL]")]
        test: MarkArg,

        /// Entry test taken: nu, nat or sat. sat fixes the total at 1600;
        /// nu and nat use the configured test total
        #[arg(long, value_parser = parse_test_kind)]
        test_kind: Option<EntryTestKind>,

        /// Education system: fsc or a-level
        #[arg(long, value_parser = parse_track)]
        track: Option<EducationTrack>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Skip input checks and let degenerate values through
        #[arg(long)]
        unchecked: bool,
    },
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "nu-aggregate")]
#[command(about = "FAST-NU admission aggregate calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/nu-aggregate/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Read one mark. Unchecked reads still need a number, but accept `inf`/`NaN`.
fn read_mark(
    field: ScoreField,
    part: MarkPart,
    raw: &str,
    unchecked: bool,
) -> Result<f64, InvalidInput> {
    if unchecked {
        raw.trim().parse().map_err(|_| InvalidInput::NotANumber {
            field,
            part,
            raw: raw.to_string(),
        })
    } else {
        nu_aggregate::scoring::parse_mark(field, part, raw)
    }
}

/// Fill the draft from command-line marks, collecting every bad value.
fn apply_marks(
    draft: &mut FormDraft,
    marks: [(ScoreField, &MarkArg); 3],
    unchecked: bool,
) -> Result<(), Vec<InvalidInput>> {
    let mut errors = Vec::new();
    for (field, mark) in marks {
        match read_mark(field, MarkPart::Obtained, &mark.obtained, unchecked) {
            Ok(v) => draft.set_obtained(field, v),
            Err(e) => errors.push(e),
        }
        if let Some(ref total) = mark.total {
            match read_mark(field, MarkPart::Total, total, unchecked) {
                Ok(v) => draft.set_total(field, v),
                Err(e) => errors.push(e),
            }
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Starting draft for a one-shot run.
///
/// An explicit non-SAT `--test-kind` starts from the configured test total,
/// so a `test_kind: sat` default does not leave its 1600 behind. The kind is
/// selected before marks are applied, so an explicit `--test x/y` still wins.
fn calc_draft(
    defaults: &FormDefaults,
    track: Option<EducationTrack>,
    test_kind: Option<EntryTestKind>,
) -> FormDraft {
    let mut draft = FormDraft::from_defaults(defaults);
    if let Some(track) = track {
        draft.select_track(track);
    }
    if let Some(kind) = test_kind {
        if kind.fixed_total().is_none() {
            draft.set_total(
                ScoreField::Test,
                defaults.test_total.unwrap_or(DEFAULT_TEST_TOTAL),
            );
        }
        draft.select_test_kind(kind);
    }
    draft
}

fn report_invalid(errors: &[InvalidInput]) -> ! {
    eprintln!("Invalid input:");
    for error in errors {
        eprintln!("  - {}", error);
    }
    std::process::exit(EXIT_INVALID_INPUT);
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Form);
    let config_path = cli.config.map(PathBuf::from);

    if let Err(e) = nu_aggregate::logging::init(cli.verbose) {
        eprintln!("Warning: {}", e);
    }

    // The wizard runs before loading so a broken config can be replaced
    if let Commands::Init = command {
        if let Err(e) = nu_aggregate::config::init::run_init_wizard(config_path) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_TERMINAL);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    let config = match nu_aggregate::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = nu_aggregate::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let display = config.display_config();

    match command {
        // Handled before config loading
        Commands::Init => {}
        Commands::Form => {
            let theme = nu_aggregate::tui::resolve_theme(display.theme.unwrap_or_default());
            let app = nu_aggregate::tui::App::new(&config, theme);
            if let Err(e) = nu_aggregate::tui::run_tui(app) {
                eprintln!("Terminal error: {:#}", e);
                std::process::exit(EXIT_TERMINAL);
            }
        }
        Commands::Calc {
            matric,
            inter,
            test,
            test_kind,
            track,
            json,
            unchecked,
        } => {
            let mut draft = calc_draft(&config.form_defaults(), track, test_kind);

            let marks = [
                (ScoreField::Secondary, &matric),
                (ScoreField::Higher, &inter),
                (ScoreField::Test, &test),
            ];
            if let Err(errors) = apply_marks(&mut draft, marks, unchecked) {
                report_invalid(&errors);
            }

            let input = draft.snapshot();
            if unchecked {
                tracing::debug!("input checks skipped");
            } else if let Err(errors) = nu_aggregate::scoring::validate_input(&input) {
                report_invalid(&errors);
            }

            let result = nu_aggregate::scoring::compute(&input);

            if json {
                match nu_aggregate::output::format_json(&input, &result) {
                    Ok(doc) => println!("{}", doc),
                    Err(e) => {
                        eprintln!("Output error: {:#}", e);
                        std::process::exit(EXIT_TERMINAL);
                    }
                }
            } else {
                let use_colors =
                    nu_aggregate::output::should_use_colors(display.color.unwrap_or_default());
                println!(
                    "{}",
                    nu_aggregate::output::format_result(&input, &result, &display, use_colors)
                );
            }
        }
    }

    std::process::exit(EXIT_SUCCESS);
}

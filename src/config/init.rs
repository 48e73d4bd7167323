use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::{
    get_config_path, ColorMode, Config, DisplayConfig, FormDefaults, ThemeMode, MAX_PRECISION,
};
use crate::scoring::{EducationTrack, EntryTestKind, DEFAULT_BOARD_TOTAL, DEFAULT_TEST_TOTAL};

/// Line-oriented prompt session over any reader/writer pair.
struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Prompt user with a message and return their trimmed input.
    fn prompt(&mut self, message: &str) -> Result<String> {
        write!(self.output, "{}", message).context("Failed to write prompt")?;
        self.output.flush().context("Failed to flush stdout")?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            anyhow::bail!("Input closed before the wizard finished");
        }
        Ok(line.trim().to_string())
    }

    /// Prompt with a default value. Returns default if input is empty.
    fn prompt_with_default(&mut self, message: &str, default: &str) -> Result<String> {
        let input = self.prompt(&format!("{} [{}]: ", message, default))?;
        if input.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(input)
        }
    }

    /// Prompt with a yes/no question. Returns bool based on input and default.
    fn prompt_yes_no(&mut self, message: &str, default_yes: bool) -> Result<bool> {
        let hint = if default_yes { "Y/n" } else { "y/N" };
        let input = self.prompt(&format!("{} [{}]: ", message, hint))?;
        let input = input.to_lowercase();
        if input.is_empty() {
            Ok(default_yes)
        } else {
            Ok(input == "y" || input == "yes")
        }
    }

    /// Re-prompt until `parse` accepts the answer.
    fn prompt_until<T>(
        &mut self,
        message: &str,
        default: &str,
        parse: impl Fn(&str) -> Result<T, String>,
    ) -> Result<T> {
        loop {
            let answer = self.prompt_with_default(message, default)?;
            match parse(&answer) {
                Ok(value) => return Ok(value),
                Err(e) => writeln!(self.output, "  Invalid: {}. Try again.", e)
                    .context("Failed to write prompt")?,
            }
        }
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text).context("Failed to write prompt")
    }
}

fn parse_total(s: &str) -> Result<f64, String> {
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        Ok(_) => Err("must be a positive number".to_string()),
        Err(_) => Err(format!("'{}' is not a number", s)),
    }
}

fn parse_precision(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(v) if v <= MAX_PRECISION => Ok(v),
        _ => Err(format!("must be a whole number from 0 to {}", MAX_PRECISION)),
    }
}

fn parse_color(s: &str) -> Result<ColorMode, String> {
    match s.to_ascii_lowercase().as_str() {
        "auto" => Ok(ColorMode::Auto),
        "always" => Ok(ColorMode::Always),
        "never" => Ok(ColorMode::Never),
        _ => Err("expected auto, always or never".to_string()),
    }
}

fn parse_theme(s: &str) -> Result<ThemeMode, String> {
    match s.to_ascii_lowercase().as_str() {
        "auto" => Ok(ThemeMode::Auto),
        "dark" => Ok(ThemeMode::Dark),
        "light" => Ok(ThemeMode::Light),
        _ => Err("expected auto, dark or light".to_string()),
    }
}

/// Write a config file atomically, creating parent directories.
pub fn write_config(path: &Path, config: &Config) -> Result<()> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    Ok(())
}

/// Run the interactive init wizard on stdin/stdout.
///
/// If `default_path` is Some, it is offered as the save location.
/// Otherwise the default config path is offered.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let saved = run_wizard(stdin.lock(), stdout.lock(), default_path)?;
    if let Some(path) = saved {
        tracing::info!(path = %path.display(), "config written");
    }
    Ok(())
}

/// Wizard body. Returns the written path, or None if the user aborted.
fn run_wizard<R: BufRead, W: Write>(
    input: R,
    output: W,
    default_path: Option<PathBuf>,
) -> Result<Option<PathBuf>> {
    let mut p = Prompter { input, output };

    p.say("")?;
    p.say("Aggregate Calculator Configuration")?;
    p.say("==================================")?;
    p.say("")?;

    // 1. Form defaults
    p.say("These values pre-fill the form. You can still change them each time.")?;
    let track = p.prompt_until("Education system (fsc / a-level)", "fsc", |s| {
        EducationTrack::parse(s).ok_or_else(|| "expected fsc or a-level".to_string())
    })?;
    let test_kind = p.prompt_until("Entry test (nu / nat / sat)", "nu", |s| {
        EntryTestKind::parse(s).ok_or_else(|| "expected nu, nat or sat".to_string())
    })?;
    let board_default = DEFAULT_BOARD_TOTAL.to_string();
    let matric_total = p.prompt_until(
        &format!("{} total marks", track.secondary_label()),
        &board_default,
        parse_total,
    )?;
    let inter_total =
        p.prompt_until(&format!("{} total marks", track.label()), &board_default, parse_total)?;
    let test_total = if let Some(fixed) = test_kind.fixed_total() {
        p.say(&format!(
            "{} is always scored out of {}.",
            test_kind.label(),
            fixed
        ))?;
        DEFAULT_TEST_TOTAL
    } else {
        p.prompt_until(
            "Entry test total marks",
            &DEFAULT_TEST_TOTAL.to_string(),
            parse_total,
        )?
    };

    // 2. Display
    p.say("")?;
    let precision = p.prompt_until("Decimals shown for percentages", "2", parse_precision)?;
    let color = p.prompt_until("Colored output (auto / always / never)", "auto", parse_color)?;
    let theme = p.prompt_until("Form theme (auto / dark / light)", "auto", parse_theme)?;

    // 3. Config path
    let default_config_path = match default_path {
        Some(path) => path,
        None => get_config_path()?,
    };
    p.say("")?;
    let path_str = p.prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = p.prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            p.say("Aborted.")?;
            return Ok(None);
        }
    }

    // 4. Write config
    let config = Config {
        defaults: Some(FormDefaults {
            track: Some(track),
            test_kind: Some(test_kind),
            matric_total: Some(matric_total),
            inter_total: Some(inter_total),
            test_total: Some(test_total),
        }),
        display: Some(DisplayConfig {
            precision: Some(precision),
            color: Some(color),
            theme: Some(theme),
        }),
    };
    write_config(&config_path, &config)?;

    p.say("")?;
    p.say(&format!("Config written to {}", config_path.display()))?;
    p.say("Run `nu-aggregate` to open the calculator.")?;

    Ok(Some(config_path))
}

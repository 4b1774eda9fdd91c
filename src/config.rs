use serde::{Deserialize, Serialize};
use clap::{ArgAction, Parser, ValueHint};
use chrono::Local;
use dirs_next::home_dir;
use log::LevelFilter;
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

use crate::dimensions::{CanvasProfile, CanvasSize};
use crate::export::{default_output_name, ensure_png_extension};
use crate::search::DEFAULT_HEADER_LABEL;

/// Largest canvas edge we agree to allocate.
pub const MAX_CANVAS_EDGE: u32 = 16_384;

/// Icons live here unless configured otherwise.
pub const DEFAULT_ICON_DIR: &str = "img";

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level app configuration. Every field is optional so layers can merge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General options
    pub log_level: Option<String>,     // e.g., "info" | "debug"
    pub canvas: Option<CanvasConfig>,
    pub assets: Option<AssetsConfig>,
    /// first line of the page header
    pub header_label: Option<String>,
    /// destination PNG; a timestamped name when unset
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CanvasConfig {
    pub profile: Option<CanvasProfile>,
    /// explicit sizes win over the profile
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AssetsConfig {
    pub icon_dir: Option<PathBuf>,
    pub logo: Option<PathBuf>,
    /// extra TTF/OTF fonts, preferred over the system ones
    pub font_dir: Option<PathBuf>,
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "flexcard", about = "Hardware spec cards rendered to PNG", version)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// hardware snapshot (YAML or JSON) to turn into cards
    #[arg(long, value_hint = ValueHint::FilePath, conflicts_with = "sections")]
    pub specs: Option<PathBuf>,
    /// ready-made sections file (YAML or JSON), exactly seven cards
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub sections: Option<PathBuf>,
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
    /// also write the plain-text report here (needs --specs)
    #[arg(long, value_hint = ValueHint::FilePath, requires = "specs")]
    pub text: Option<PathBuf>,
    #[arg(long, value_enum)]
    pub profile: Option<CanvasProfile>,
    #[arg(long)]
    pub canvas_width: Option<u32>,
    #[arg(long)]
    pub canvas_height: Option<u32>,
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub icon_dir: Option<PathBuf>,
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub logo: Option<PathBuf>,
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub font_dir: Option<PathBuf>,
    #[arg(long)]
    pub header_label: Option<String>,
    #[arg(long)]
    pub log_level: Option<String>,
    /// shorthand for --log-level debug
    #[arg(long, action = ArgAction::SetTrue)]
    pub debug: bool,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

impl Config {
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("info")
    }

    /// Profile size, with any explicit edge replacing the profile's.
    pub fn canvas_size(&self) -> CanvasSize {
        let canvas = self.canvas.clone().unwrap_or_default();
        let base = canvas.profile.unwrap_or_default().size();
        CanvasSize::new(canvas.width.unwrap_or(base.width), canvas.height.unwrap_or(base.height))
    }

    pub fn icon_dir(&self) -> PathBuf {
        self.assets
            .as_ref()
            .and_then(|a| a.icon_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ICON_DIR))
    }

    pub fn logo(&self) -> Option<&Path> {
        self.assets.as_ref().and_then(|a| a.logo.as_deref())
    }

    pub fn font_dir(&self) -> Option<&Path> {
        self.assets.as_ref().and_then(|a| a.font_dir.as_deref())
    }

    pub fn header_label(&self) -> &str {
        self.header_label.as_deref().unwrap_or(DEFAULT_HEADER_LABEL)
    }

    /// Where the PNG goes; always ends in `.png`.
    pub fn output_path(&self) -> PathBuf {
        match self.output.as_deref() {
            Some(p) => ensure_png_extension(p),
            None => PathBuf::from(default_output_name(Local::now())),
        }
    }

    /// Pretty YAML of the effective config.
    pub fn dump(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<(Cli, Config), ConfigError> {
    let cli = Cli::parse();
    let cfg = load_from(&cli)?;
    Ok((cli, cfg))
}

/// Layer defaults, YAML and `cli`, then validate.
pub fn load_from(cli: &Cli) -> Result<Config, ConfigError> {
    // clap drops `requires = "specs"` once --sections (its conflict) is present
    if cli.text.is_some() && cli.specs.is_none() {
        return Err(ConfigError::Validation(
            "--text needs --specs; a sections file has no hardware data to report".into(),
        ));
    }

    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;
    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/flexcard/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/flexcard/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/flexcard.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["flexcard.yaml", "config.yaml", "config/flexcard.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    // top-level
    if src.log_level.is_some()    { dst.log_level = src.log_level; }
    if src.header_label.is_some() { dst.header_label = src.header_label; }
    if src.output.is_some()       { dst.output = src.output; }
    // canvas
    match (&mut dst.canvas, src.canvas) {
        (None, Some(c)) => dst.canvas = Some(c),
        (Some(d), Some(s)) => merge_canvas(d, s),
        _ => {}
    }
    // assets
    match (&mut dst.assets, src.assets) {
        (None, Some(a)) => dst.assets = Some(a),
        (Some(d), Some(s)) => merge_assets(d, s),
        _ => {}
    }
}

fn merge_canvas(dst: &mut CanvasConfig, src: CanvasConfig) {
    if src.profile.is_some() { dst.profile = src.profile; }
    if src.width.is_some()   { dst.width = src.width; }
    if src.height.is_some()  { dst.height = src.height; }
}

fn merge_assets(dst: &mut AssetsConfig, src: AssetsConfig) {
    if src.icon_dir.is_some() { dst.icon_dir = src.icon_dir; }
    if src.logo.is_some()     { dst.logo = src.logo; }
    if src.font_dir.is_some() { dst.font_dir = src.font_dir; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some()    { cfg.log_level = cli.log_level.clone(); }
    if cli.debug                  { cfg.log_level = Some("debug".into()); }
    if cli.header_label.is_some() { cfg.header_label = cli.header_label.clone(); }
    if cli.output.is_some()       { cfg.output = cli.output.clone(); }

    merge(cfg, Config {
        canvas: Some(CanvasConfig {
            profile: cli.profile,
            width: cli.canvas_width,
            height: cli.canvas_height,
        }),
        assets: Some(AssetsConfig {
            icon_dir: cli.icon_dir.clone(),
            logo: cli.logo.clone(),
            font_dir: cli.font_dir.clone(),
        }),
        ..Config::default()
    });
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    let size = cfg.canvas_size();
    for (name, v) in [("width", size.width), ("height", size.height)] {
        if v == 0 || v > MAX_CANVAS_EDGE {
            return Err(ConfigError::Validation(format!(
                "canvas {name} must be 1..={MAX_CANVAS_EDGE}, got {v}"
            )));
        }
    }
    if cfg.log_level().parse::<LevelFilter>().is_err() {
        return Err(ConfigError::Validation(format!(
            "unknown log_level '{}'", cfg.log_level()
        )));
    }
    if cfg.header_label().trim().is_empty() {
        return Err(ConfigError::Validation("header_label must not be empty".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_with_config(path: &Path) -> Cli {
        Cli { config: Some(path.to_path_buf()), ..Cli::default() }
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.canvas_size(), CanvasSize::new(1080, 1350));
        assert_eq!(cfg.header_label(), "Flex Card");
        assert_eq!(cfg.log_level(), "info");
        assert_eq!(cfg.icon_dir(), PathBuf::from("img"));
        assert!(cfg.logo().is_none());
        let out = cfg.output_path();
        let name = out.to_string_lossy();
        assert!(name.starts_with("system_specs_") && name.ends_with(".png"), "{name}");
    }

    #[test]
    fn test_yaml_then_cli() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flexcard.yaml");
        fs::write(
            &path,
            "log_level: warn\nheader_label: Rig\ncanvas:\n  profile: large\n  height: 2400\nassets:\n  icon_dir: /opt/icons\n",
        )
        .unwrap();

        let cfg = load_from(&cli_with_config(&path)).unwrap();
        assert_eq!(cfg.canvas_size(), CanvasSize::new(1600, 2400));
        assert_eq!(cfg.header_label(), "Rig");
        assert_eq!(cfg.icon_dir(), PathBuf::from("/opt/icons"));

        let cli = Cli {
            canvas_width: Some(1200),
            logo: Some("brand.png".into()),
            output: Some("specs".into()),
            debug: true,
            ..cli_with_config(&path)
        };
        let cfg = load_from(&cli).unwrap();
        assert_eq!(cfg.canvas_size(), CanvasSize::new(1200, 2400));
        assert_eq!(cfg.icon_dir(), PathBuf::from("/opt/icons"));
        assert_eq!(cfg.logo(), Some(Path::new("brand.png")));
        assert_eq!(cfg.log_level(), "debug");
        assert_eq!(cfg.output_path(), PathBuf::from("specs.png"));
    }

    #[test]
    fn test_missing_config_file() {
        let err = load_from(&cli_with_config(Path::new("/nope/flexcard.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_bad_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "canvas: [1, 2").unwrap();
        assert!(matches!(load_from(&cli_with_config(&path)), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.yaml");
        fs::write(&path, "{}").unwrap();

        let zero = Cli { canvas_width: Some(0), ..cli_with_config(&path) };
        assert!(matches!(load_from(&zero), Err(ConfigError::Validation(_))));

        let huge = Cli { canvas_height: Some(MAX_CANVAS_EDGE + 1), ..cli_with_config(&path) };
        assert!(matches!(load_from(&huge), Err(ConfigError::Validation(_))));

        let level = Cli { log_level: Some("chatty".into()), ..cli_with_config(&path) };
        assert!(matches!(load_from(&level), Err(ConfigError::Validation(_))));

        let label = Cli { header_label: Some("  ".into()), ..cli_with_config(&path) };
        assert!(matches!(load_from(&label), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_dump_round_trips() {
        let cfg = Config {
            header_label: Some("Rig".into()),
            canvas: Some(CanvasConfig { profile: Some(CanvasProfile::Large), ..Default::default() }),
            ..Config::default()
        };
        let yaml = cfg.dump().unwrap();
        assert!(yaml.contains("profile: large"));
        let back: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "flexcard", "--specs", "s.yaml", "--profile", "large", "--text", "r.txt", "--debug",
        ])
        .unwrap();
        assert_eq!(cli.profile, Some(CanvasProfile::Large));
        assert!(cli.debug);

        assert!(Cli::try_parse_from(["flexcard", "--specs", "a", "--sections", "b"]).is_err());
        assert!(Cli::try_parse_from(["flexcard", "--text", "t"]).is_err());
    }

    #[test]
    fn test_text_report_needs_specs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.yaml");
        fs::write(&path, "{}").unwrap();

        // parses, because clap waives the requirement next to --sections
        let cli = Cli::try_parse_from([
            "flexcard", "--config", path.to_str().unwrap(), "--sections", "b", "--text", "t",
        ])
        .unwrap();
        let err = load_from(&cli).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("--text")), "{err}");

        let ok = Cli { specs: Some("s.yaml".into()), text: Some("t".into()), ..cli_with_config(&path) };
        assert!(load_from(&ok).is_ok());
    }

    #[test]
    fn test_font_dir_layers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fonts.yaml");
        fs::write(&path, "assets:\n  font_dir: /opt/fonts\n").unwrap();

        let cfg = load_from(&cli_with_config(&path)).unwrap();
        assert_eq!(cfg.font_dir(), Some(Path::new("/opt/fonts")));

        let cli = Cli { font_dir: Some("mine".into()), ..cli_with_config(&path) };
        assert_eq!(load_from(&cli).unwrap().font_dir(), Some(Path::new("mine")));
        assert_eq!(Config::default().font_dir(), None);
    }
}

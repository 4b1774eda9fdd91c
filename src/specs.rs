/*
 *  specs.rs
 *
 *  FlexCard - spec cards that fit
 *  (c) 2020-26 Stuart Hunter
 *
 *  Hardware snapshot model, card content and the plain-text report
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assets::{resolve_icon, resolve_logo};
use crate::section::{Icon, Platform, SECTION_COUNT, Section, SectionKind, Snapshot};

pub const NOT_AVAILABLE: &str = "N/A";

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

#[derive(Debug, Error)]
pub enum SpecsError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CpuInfo {
    pub name: Option<String>,
    pub physical_cores: Option<u32>,
    pub logical_threads: Option<u32>,
    /// MHz
    pub current_frequency: Option<f64>,
    /// MHz
    pub max_frequency: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GpuInfo {
    pub name: Option<String>,
    pub memory_bytes: Option<u64>,
    pub driver: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RamInfo {
    pub usable_bytes: Option<u64>,
    pub used_bytes: Option<u64>,
    /// capacity of each populated module
    pub module_bytes: Vec<u64>,
    pub speeds_mhz: Vec<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageInfo {
    pub drive: Option<String>,
    pub mount: Option<String>,
    pub file_system: Option<String>,
    /// raw physical capacity
    pub installed_bytes: Option<u64>,
    /// formatted capacity of all volumes
    pub usable_bytes: Option<u64>,
    pub used_bytes: Option<u64>,
    pub free_bytes: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardInfo {
    pub manufacturer: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiosInfo {
    pub version: Option<String>,
    pub release_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OsInfo {
    pub name: Option<String>,
    pub version: Option<String>,
    pub build: Option<String>,
    pub architecture: Option<String>,
}

/// What the hardware collector hands over. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemSpecs {
    pub scanned_at: Option<String>,
    pub cpu: CpuInfo,
    pub gpus: Vec<GpuInfo>,
    pub ram: RamInfo,
    pub storage: Vec<StorageInfo>,
    pub motherboard: BoardInfo,
    pub bios: BiosInfo,
    pub os: OsInfo,
}

/// Trimmed text, or `N/A` when absent or blank.
pub fn safe_text(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Binary units with two decimals, e.g. `15.50 GB`.
pub fn format_bytes(value: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];
    let mut size = value as f64;
    for (i, unit) in UNITS.iter().enumerate() {
        if size < 1024.0 || i == UNITS.len() - 1 {
            return format!("{size:.2} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.2} PB")
}

/// Capacity the way drives are sold: decimal units, whole TB when close.
pub fn format_marketed_storage(value: u64) -> String {
    if value == 0 {
        return NOT_AVAILABLE.to_string();
    }
    let tb = value as f64 / 1e12;
    if tb >= 1.0 {
        let rounded = tb.round();
        if (tb - rounded).abs() <= 0.15 {
            return format!("{} TB", rounded as u64);
        }
        return format!("{tb:.1} TB");
    }
    format!("{} GB", (value as f64 / 1e9).round() as u64)
}

fn bytes_or_na(value: Option<u64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), format_bytes)
}

fn mhz_or_na(value: Option<f64>) -> String {
    match value {
        Some(v) if v > 0.0 => format!("{v:.2} MHz"),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn count_or_na(value: Option<u32>) -> String {
    match value {
        Some(v) if v > 0 => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

const INTEGRATED_MARKERS: [&str; 7] =
    ["intel", "uhd", "iris", "hd graphics", "integrated", "apu", "radeon graphics"];

const DISCRETE_MARKERS: [&str; 11] = [
    "nvidia", "geforce", "rtx", "gtx", "quadro", "tesla", "titan",
    "radeon rx", "radeon pro", "intel arc", " arc ",
];

/// Best guess at how a GPU is attached, from its marketing name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum GpuKind {
    Integrated,
    Unknown,
    Discrete,
}

impl GpuKind {
    /// Discrete markers win over integrated ones ("Intel Arc" is discrete).
    pub fn from_name(name: &str) -> Self {
        let name = name.to_lowercase();
        if DISCRETE_MARKERS.iter().any(|m| name.contains(m)) {
            GpuKind::Discrete
        } else if INTEGRATED_MARKERS.iter().any(|m| name.contains(m)) {
            GpuKind::Integrated
        } else {
            GpuKind::Unknown
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GpuKind::Discrete => "External (Discrete)",
            GpuKind::Integrated => "Integrated",
            GpuKind::Unknown => "Unknown",
        }
    }
}

impl GpuInfo {
    pub fn kind(&self) -> GpuKind {
        GpuKind::from_name(self.name.as_deref().unwrap_or_default())
    }

    fn priority(&self) -> (GpuKind, u64) {
        (self.kind(), self.memory_bytes.unwrap_or(0))
    }

    /// Formatted memory; zero counts as unknown
    pub fn memory_text(&self) -> String {
        match self.memory_bytes {
            Some(b) if b > 0 => format_bytes(b),
            _ => NOT_AVAILABLE.to_string(),
        }
    }
}

/// The GPU most worth showing: discrete first, then by memory.
/// The earliest entry wins a tie.
pub fn pick_preferred_gpu(gpus: &[GpuInfo]) -> Option<&GpuInfo> {
    gpus.iter()
        .reduce(|best, gpu| if gpu.priority() > best.priority() { gpu } else { best })
}

impl RamInfo {
    fn installed_gib(&self) -> Option<u64> {
        let total: u64 = self.module_bytes.iter().sum();
        (total > 0).then(|| ((total as f64 / GIB).round() as u64).max(1))
    }

    /// `16 GB`, from the module capacities, else usable memory.
    pub fn installed_text(&self) -> String {
        match self.installed_gib() {
            Some(gib) => format!("{gib} GB"),
            None => bytes_or_na(self.usable_bytes),
        }
    }

    /// `2 x 8 GB + 1 x 16 GB`, smallest modules first.
    pub fn module_layout(&self) -> String {
        let mut counts: BTreeMap<u64, usize> = BTreeMap::new();
        for &bytes in self.module_bytes.iter().filter(|&&b| b > 0) {
            let gib = ((bytes as f64 / GIB).round() as u64).max(1);
            *counts.entry(gib).or_default() += 1;
        }
        if counts.is_empty() {
            return NOT_AVAILABLE.to_string();
        }
        counts
            .iter()
            .map(|(gib, n)| format!("{n} x {gib} GB"))
            .collect::<Vec<_>>()
            .join(" + ")
    }

    pub fn speed_text(&self) -> String {
        let mut speeds: Vec<u32> = self.speeds_mhz.iter().copied().filter(|&s| s > 0).collect();
        speeds.sort_unstable();
        speeds.dedup();
        if speeds.is_empty() {
            return NOT_AVAILABLE.to_string();
        }
        speeds.iter().map(|s| format!("{s} MHz")).collect::<Vec<_>>().join(", ")
    }
}

impl StorageInfo {
    /// Physical capacity when known, else the formatted volumes.
    pub fn installed_text(&self) -> String {
        let bytes = self.installed_bytes.filter(|&b| b > 0).or(self.usable_bytes);
        bytes.map_or_else(|| NOT_AVAILABLE.to_string(), format_marketed_storage)
    }
}

impl SystemSpecs {
    pub fn platform(&self) -> Platform {
        Platform::from_os_name(self.os.name.as_deref().unwrap_or_default())
    }

    pub fn scanned_at_text(&self) -> String {
        safe_text(self.scanned_at.as_deref())
    }
}

fn kv(label: &str, value: impl AsRef<str>) -> String {
    format!("{label}: {}", value.as_ref())
}

/// The seven cards, in export order, without icons.
pub fn build_sections(specs: &SystemSpecs) -> [Section; SECTION_COUNT] {
    let cpu = &specs.cpu;
    let cpu_section = Section::new(
        SectionKind::Cpu.title(),
        format!(
            "{}\n{}-core processor",
            safe_text(cpu.name.as_deref()),
            count_or_na(cpu.physical_cores)
        ),
        vec![
            kv("Logical threads", count_or_na(cpu.logical_threads)),
            kv("Max Frequency", mhz_or_na(cpu.max_frequency)),
        ],
    );

    let gpu_section = match pick_preferred_gpu(&specs.gpus) {
        Some(gpu) => Section::new(
            SectionKind::Gpu.title(),
            safe_text(gpu.name.as_deref()),
            vec![
                kv("Memory", gpu.memory_text()),
                kv("Type", gpu.kind().label()),
                kv("Driver", safe_text(gpu.driver.as_deref())),
            ],
        ),
        None => Section::new(
            SectionKind::Gpu.title(),
            NOT_AVAILABLE,
            vec![
                kv("Memory", NOT_AVAILABLE),
                kv("Type", GpuKind::Unknown.label()),
                kv("Driver", NOT_AVAILABLE),
            ],
        ),
    };

    let ram = &specs.ram;
    let ram_section = Section::new(
        SectionKind::Ram.title(),
        kv("Installed", ram.installed_text()),
        vec![
            kv("Usable", bytes_or_na(ram.usable_bytes)),
            kv("Modules", ram.module_layout()),
            kv("Speed", ram.speed_text()),
        ],
    );

    let default_drive = StorageInfo::default();
    let drive = specs.storage.first().unwrap_or(&default_drive);
    let storage_section = Section::new(
        SectionKind::Storage.title(),
        kv("Installed", drive.installed_text()),
        vec![
            kv("Usable", bytes_or_na(drive.usable_bytes)),
            kv("Used", bytes_or_na(drive.used_bytes)),
            kv("File System", safe_text(drive.file_system.as_deref())),
        ],
    );

    let board = &specs.motherboard;
    let board_section = Section::new(
        SectionKind::Motherboard.title(),
        safe_text(board.model.as_deref()),
        vec![kv("Manufacturer", safe_text(board.manufacturer.as_deref()))],
    );

    let bios = &specs.bios;
    let bios_section = Section::new(
        SectionKind::Bios.title(),
        safe_text(bios.version.as_deref()),
        vec![kv("Release Date", safe_text(bios.release_date.as_deref()))],
    );

    let os = &specs.os;
    let os_section = Section::new(
        SectionKind::Os(specs.platform()).title(),
        safe_text(os.name.as_deref()),
        vec![
            kv("Version", safe_text(os.version.as_deref())),
            kv("Build", safe_text(os.build.as_deref())),
            kv("Architecture", safe_text(os.architecture.as_deref())),
        ],
    );

    [cpu_section, gpu_section, ram_section, storage_section, board_section, bios_section, os_section]
}

/// Cards plus icons from `icon_dir` and the logo, ready to export.
pub fn build_snapshot(specs: &SystemSpecs, icon_dir: &Path, logo: Option<&Path>) -> Snapshot {
    let kinds = SectionKind::export_order(specs.platform());
    let sections = build_sections(specs);
    let sections = std::array::from_fn(|i| {
        sections[i].clone().with_icon(resolve_icon(icon_dir, kinds[i]))
    });
    Snapshot::new(sections, specs.scanned_at_text()).with_logo(resolve_logo(icon_dir, logo))
}

/// Human-readable report of everything in the snapshot.
pub fn specs_to_text(specs: &SystemSpecs) -> String {
    let mut lines = vec![
        "System Hardware Information".to_string(),
        "=".repeat(40),
        kv("Scanned At", specs.scanned_at_text()),
        String::new(),
    ];

    let cpu = &specs.cpu;
    lines.push("[CPU]".into());
    lines.push(kv("Name", safe_text(cpu.name.as_deref())));
    lines.push(kv("Physical Cores", count_or_na(cpu.physical_cores)));
    lines.push(kv("Logical Threads", count_or_na(cpu.logical_threads)));
    lines.push(kv("Current Frequency", mhz_or_na(cpu.current_frequency)));
    lines.push(kv("Max Frequency", mhz_or_na(cpu.max_frequency)));
    lines.push(String::new());

    lines.push("[GPU]".into());
    if specs.gpus.is_empty() {
        lines.push("GPU 1:".into());
        lines.push(kv("  Name", NOT_AVAILABLE));
        lines.push(kv("  Memory", NOT_AVAILABLE));
    }
    for (i, gpu) in specs.gpus.iter().enumerate() {
        lines.push(format!("GPU {}:", i + 1));
        lines.push(kv("  Name", safe_text(gpu.name.as_deref())));
        lines.push(kv("  Memory", gpu.memory_text()));
    }
    lines.push(String::new());

    let ram = &specs.ram;
    lines.push("[RAM]".into());
    lines.push(kv("Installed", ram.installed_text()));
    lines.push(kv("Usable", bytes_or_na(ram.usable_bytes)));
    lines.push(kv("Used", bytes_or_na(ram.used_bytes)));
    lines.push(kv("Modules", ram.module_layout()));
    lines.push(kv("Speed", ram.speed_text()));
    lines.push(String::new());

    lines.push("[Storage]".into());
    for drive in &specs.storage {
        lines.push(kv("Drive", safe_text(drive.drive.as_deref())));
        lines.push(kv("  Mount", safe_text(drive.mount.as_deref())));
        lines.push(kv("  File System", safe_text(drive.file_system.as_deref())));
        lines.push(kv("  Total", bytes_or_na(drive.usable_bytes)));
        lines.push(kv("  Free", bytes_or_na(drive.free_bytes)));
    }
    lines.push(String::new());

    lines.push("[Motherboard]".into());
    lines.push(kv("Manufacturer", safe_text(specs.motherboard.manufacturer.as_deref())));
    lines.push(kv("Model", safe_text(specs.motherboard.model.as_deref())));
    lines.push(String::new());

    lines.push("[BIOS]".into());
    lines.push(kv("BIOS Version", safe_text(specs.bios.version.as_deref())));
    lines.push(kv("Release Date", safe_text(specs.bios.release_date.as_deref())));
    lines.push(String::new());

    let os = &specs.os;
    lines.push("[OS]".into());
    lines.push(kv("Name", safe_text(os.name.as_deref())));
    lines.push(kv("Version", safe_text(os.version.as_deref())));
    lines.push(kv("Build", safe_text(os.build.as_deref())));
    lines.push(kv("Architecture", safe_text(os.architecture.as_deref())));

    lines.join("\n")
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

fn read_document<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, SpecsError> {
    let s = fs::read_to_string(path)?;
    debug!("reading {} ({} bytes)", path.display(), s.len());
    if is_json(path) {
        Ok(serde_json::from_str(&s)?)
    } else {
        Ok(serde_yaml::from_str(&s)?)
    }
}

/// Load a hardware snapshot; `.json` is JSON, anything else YAML.
pub fn load_specs(path: &Path) -> Result<SystemSpecs, SpecsError> {
    let specs: SystemSpecs = read_document(path)?;
    info!("loaded hardware snapshot from {}", path.display());
    Ok(specs)
}

/// One card in a sections file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionRecord {
    pub title: String,
    pub subtitle: String,
    pub bullets: Vec<String>,
    /// explicit icon file, relative paths resolve against the icon dir
    pub icon: Option<PathBuf>,
    /// icon by card kind when no explicit file is given; `cpu` or `{os: linux}`
    #[serde(with = "serde_yaml::with::singleton_map_recursive")]
    pub kind: Option<SectionKind>,
}

impl SectionRecord {
    pub fn into_section(self, icon_dir: &Path) -> Section {
        let icon = match (&self.icon, self.kind) {
            (Some(p), _) if p.is_absolute() => Icon::from_path(p),
            (Some(p), _) => Icon::from_path(&icon_dir.join(p)),
            (None, Some(kind)) => resolve_icon(icon_dir, kind),
            (None, None) => Icon::None,
        };
        Section::new(self.title, self.subtitle, self.bullets).with_icon(icon)
    }
}

/// Pre-built cards, for callers that already hold the content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionsFile {
    pub scanned_at: String,
    pub sections: Vec<SectionRecord>,
}

pub fn load_sections(path: &Path) -> Result<SectionsFile, SpecsError> {
    let file: SectionsFile = read_document(path)?;
    info!("loaded {} sections from {}", file.sections.len(), path.display());
    Ok(file)
}

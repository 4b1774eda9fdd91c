/*
 *  tests/export_integration.rs
 *
 *  End-to-end export through the public API
 *
 *  FlexCard - spec cards that fit
 *  (c) 2020-26 Stuart Hunter
 */

use std::fs;
use std::path::Path;

use flexcard::dimensions::CanvasSize;
use flexcard::export::{export_png, snapshot_from_sections};
use flexcard::search::{DEFAULT_HEADER_LABEL, MIN_SCALE_PERCENT, find_scale};
use flexcard::section::{Icon, Section, Snapshot};
use flexcard::specs::{GpuInfo, OsInfo, SystemSpecs, build_snapshot, load_sections};
use flexcard::typography::TextFonts;
use flexcard::ExportError;
use tiny_skia::Pixmap;

const STANDARD: CanvasSize = CanvasSize { width: 1080, height: 1350 };

fn short_sections() -> Vec<Section> {
    ["CPU", "GPU", "RAM", "Storage", "Motherboard", "BIOS", "Operating System"]
        .iter()
        .map(|t| Section::new(*t, "Model 1", vec!["Speed: 3200 MHz".into(), "Type: DDR4".into()]))
        .collect()
}

fn short_snapshot() -> Snapshot {
    snapshot_from_sections(short_sections(), "2026-10-18 09:00:00", Icon::None).unwrap()
}

fn decode(path: &Path) -> Pixmap {
    Pixmap::decode_png(&fs::read(path).unwrap()).unwrap()
}

fn bright(p: &Pixmap, x: u32, y: u32) -> bool {
    p.pixel(x, y)
        .map(|c| c.demultiply())
        .is_some_and(|c| c.red() >= 250 && c.green() >= 250 && c.blue() >= 250)
}

#[test]
fn test_short_content_full_scale() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("specs.png");

    let report = export_png(&short_snapshot(), DEFAULT_HEADER_LABEL, STANDARD, &out).unwrap();
    assert_eq!(report.scale_percent, 100);
    assert!(report.fits);

    let png = decode(&out);
    assert_eq!((png.width(), png.height()), (1080, 1350));
    // opaque black background
    let corner = png.pixel(0, 0).unwrap();
    assert_eq!((corner.red(), corner.green(), corner.blue(), corner.alpha()), (0, 0, 0, 255));
}

#[test]
fn test_overflow_still_renders() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("long.png");

    let mut sections = short_sections();
    let long = "a fairly long bullet line that keeps going ".repeat(8);
    sections[2].bullets = (0..50).map(|i| format!("{i}: {long}")).collect();
    let snapshot = snapshot_from_sections(sections, "now", Icon::None).unwrap();

    let report = export_png(&snapshot, DEFAULT_HEADER_LABEL, STANDARD, &out).unwrap();
    assert_eq!(report.scale_percent, MIN_SCALE_PERCENT);
    assert!(!report.fits);

    let png = decode(&out);
    assert_eq!((png.width(), png.height()), (1080, 1350));
}

#[test]
fn test_unwritable_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("no").join("such").join("dir.png");

    let err = export_png(&short_snapshot(), DEFAULT_HEADER_LABEL, STANDARD, &out).unwrap_err();
    assert!(matches!(err, ExportError::Io { .. }));
    assert!(!out.exists());
}

#[test]
fn test_icons_and_logo_drawn() {
    let dir = tempfile::tempdir().unwrap();
    let icons = dir.path().join("img");
    fs::create_dir(&icons).unwrap();
    fs::write(
        icons.join("processor.svg"),
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24"><rect width="24" height="24" fill="#ffffff"/></svg>"##,
    )
    .unwrap();
    let mut logo = Pixmap::new(32, 32).unwrap();
    logo.fill(tiny_skia::Color::WHITE);
    logo.save_png(icons.join("Logo.png")).unwrap();
    // a broken asset is skipped, not fatal
    fs::write(icons.join("graphics-card.png"), b"not a png").unwrap();

    let specs = SystemSpecs {
        scanned_at: Some("2026-10-18 09:00:00".into()),
        gpus: vec![GpuInfo { name: Some("GeForce RTX 4070".into()), memory_bytes: Some(12 << 30), driver: None }],
        os: OsInfo { name: Some("Windows 11 Pro".into()), ..OsInfo::default() },
        ..SystemSpecs::default()
    };
    let snapshot = build_snapshot(&specs, &icons, None);
    assert!(snapshot.logo.is_some());

    let out = dir.path().join("icons.png");
    let report = export_png(&snapshot, "My Rig", STANDARD, &out).unwrap();
    let png = decode(&out);

    let plan = find_scale(&snapshot, "My Rig", STANDARD, &TextFonts::system()).unwrap();
    assert_eq!(plan.scale_percent, report.scale_percent);
    let d = plan.dims;

    let logo_centre = d.outer_padding + d.logo_size / 2;
    assert!(bright(&png, logo_centre, logo_centre));

    let cpu = plan.placements()[0].rect;
    let icon_centre_x = cpu.top_left.x as u32 + d.card_padding + d.icon_size / 2;
    let icon_centre_y = cpu.top_left.y as u32 + d.card_padding + d.icon_size / 2;
    assert!(bright(&png, icon_centre_x, icon_centre_y));
}

#[test]
fn test_sections_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cards.yaml");
    let mut yaml = String::from("scanned_at: 2026-10-18 09:00:00\nsections:\n");
    for title in ["CPU", "GPU", "RAM", "Storage", "Motherboard", "BIOS", "Operating System"] {
        yaml.push_str(&format!("  - title: {title}\n    subtitle: Something\n    bullets: [\"One: 1\"]\n"));
    }
    fs::write(&path, &yaml).unwrap();

    let snapshot = load_sections(&path).unwrap().into_snapshot(dir.path(), Icon::None).unwrap();
    assert_eq!(snapshot.full_width().title, "Operating System");

    let out = dir.path().join("cards.png");
    let report = export_png(&snapshot, DEFAULT_HEADER_LABEL, CanvasSize::new(1600, 2000), &out).unwrap();
    assert_eq!(report.scale_percent, 100);
    let png = decode(&out);
    assert_eq!((png.width(), png.height()), (1600, 2000));
}

#[test]
fn test_localised_text_exports() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("zh.png");
    let mut sections = short_sections();
    sections[6].subtitle = "Microsoft Windows 11 \u{5bb6}\u{5ead}\u{4e2d}\u{6587}\u{7248}".into();
    sections[0].subtitle = "Intel(R) Core\u{2122} i9".into();
    let snapshot = snapshot_from_sections(sections, "now", Icon::None).unwrap();

    let report = export_png(&snapshot, DEFAULT_HEADER_LABEL, STANDARD, &out).unwrap();
    assert!(report.fits);
    assert_eq!(decode(&out).width(), 1080);
}

#[test]
fn test_sections_file_wrong_count() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("short.json");
    fs::write(&path, r#"{"scanned_at": "now", "sections": [{"title": "CPU"}]}"#).unwrap();

    let err = load_sections(&path).unwrap().into_snapshot(dir.path(), Icon::None).unwrap_err();
    assert!(matches!(err, ExportError::InvalidInput(_)));
}

/*
 *  main.rs
 *
 *  FlexCard - spec cards that fit
 *  (c) 2020-26 Stuart Hunter
 *
 *  Command line front end
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

use std::fs;

use anyhow::{Context, Result, bail};
use env_logger::Env;
use log::{info, warn};

use flexcard::config;
use flexcard::export::export_png_with;
use flexcard::specs::{build_snapshot, load_sections, load_specs, specs_to_text};
use flexcard::assets::resolve_logo;
use flexcard::typography::TextFonts;

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

fn main() -> Result<()> {
    let (cli, cfg) = config::load().context("loading configuration")?;

    if cli.dump_config {
        println!("{}", cfg.dump()?);
        return Ok(());
    }

    env_logger::Builder::from_env(Env::default().default_filter_or(cfg.log_level()))
        .format_timestamp_secs()
        .init();

    info!("This {} fits the card", env!("CARGO_PKG_NAME"));
    info!("v.{} built {}", env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let icon_dir = cfg.icon_dir();
    let snapshot = if let Some(path) = cli.specs.as_deref() {
        let specs = load_specs(path).with_context(|| format!("reading {}", path.display()))?;
        if let Some(text_path) = cli.text.as_deref() {
            fs::write(text_path, specs_to_text(&specs))
                .with_context(|| format!("writing {}", text_path.display()))?;
            info!("text report written to {}", text_path.display());
        }
        build_snapshot(&specs, &icon_dir, cfg.logo())
    } else if let Some(path) = cli.sections.as_deref() {
        let file = load_sections(path).with_context(|| format!("reading {}", path.display()))?;
        file.into_snapshot(&icon_dir, resolve_logo(&icon_dir, cfg.logo()))?
    } else {
        bail!("nothing to render: pass --specs or --sections");
    };

    let output = cfg.output_path();
    let fonts = TextFonts::with_font_dir(cfg.font_dir());
    let report = export_png_with(&fonts, &snapshot, cfg.header_label(), cfg.canvas_size(), &output)?;
    if !report.fits {
        warn!("content overflows the canvas at {}%", report.scale_percent);
    }
    println!("{}", report.path.display());
    Ok(())
}

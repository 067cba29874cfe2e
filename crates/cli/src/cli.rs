//! CLI definitions and scenario dispatch.

use std::{
    io::{Write, stdout},
    path::PathBuf,
    process::ExitCode,
    sync::Arc,
    time::Duration,
};

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser, ValueEnum};
use fontsets_core::{DEFAULT_FETCH_TIMEOUT, DEFAULT_LOCALE, FontSetManager};
use log::info;

use crate::{
    BinaryResources, Document,
    io::font_files_in,
    report::{report_font_data_details, report_font_properties},
};

#[derive(Parser)]
#[command(name = "fontsets")]
#[command(about = "Build a custom font set and report on the fonts in it")]
pub struct Cli {
    /// Which kind of custom font set to build.
    #[arg(long, value_enum)]
    pub scenario: Option<Scenario>,
    /// Extra font file to load into memory with the bundled resources.
    #[arg(long = "font", value_name = "PATH")]
    pub fonts: Vec<PathBuf>,
    /// Directory whose font files are loaded into memory as well.
    #[arg(long, value_name = "DIR")]
    pub font_dir: Option<PathBuf>,
    /// Preferred language for font names.
    #[arg(long, default_value = DEFAULT_LOCALE)]
    pub locale: String,
    /// Seconds to wait for remote font data.
    #[arg(long, default_value_t = DEFAULT_FETCH_TIMEOUT.as_secs())]
    pub timeout: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Fonts installed on the system.
    System,
    /// Font files shipped with the application.
    AppFonts,
    /// Application fonts with properties declared up front.
    KnownAppFonts,
    /// Fonts from WOFF/WOFF2 packed containers.
    Packed,
    /// Fonts served from the network.
    Remote,
    /// Font data held in memory by the application and a document.
    InMemory,
}

impl Cli {
    pub fn run(self) -> Result<ExitCode> {
        let Some(scenario) = self.scenario else {
            Cli::command().print_help()?;
            return Ok(ExitCode::FAILURE);
        };

        match scenario {
            Scenario::InMemory => self.run_in_memory(),
            _ => {
                println!("\nThe selected scenario is not implemented.");
                Ok(ExitCode::FAILURE)
            }
        }
    }

    fn font_paths(&self) -> Result<Vec<PathBuf>> {
        let mut paths = self.fonts.clone();
        if let Some(dir) = &self.font_dir {
            if !dir.is_dir() {
                bail!("Font directory not found: {}", dir.display());
            }
            paths.extend(font_files_in(dir)?);
        }
        Ok(paths)
    }

    fn run_in_memory(&self) -> Result<ExitCode> {
        println!("Scenario: custom font set using in-memory font data.");

        let mut manager: FontSetManager = FontSetManager::default().with_locale(&self.locale);
        if !manager.supports_in_memory_fonts() {
            println!("This scenario requires a font backend that can load in-memory font data.");
            return Ok(ExitCode::FAILURE);
        }

        let resources = Arc::new(BinaryResources::with_files(self.font_paths()?)?);
        let document = Arc::new(Document::sample()?);
        let mut sources = resources.font_sources()?;
        sources.extend(document.font_sources()?);
        info!(
            "{} resource fonts, {} document fonts",
            resources.font_count(),
            document.embedded_font_count()
        );

        manager
            .build_from_memory_sources(sources)
            .context("Failed to build font set from in-memory font data")?;

        let mut out = stdout().lock();
        report_font_properties(&mut out, &manager)?;
        report_font_data_details(&mut out, &manager, Duration::from_secs(self.timeout))?;
        out.flush()?;

        Ok(ExitCode::SUCCESS)
    }
}

//! Text reports about a built font set.

use std::{
    io::{self, BufRead, Write},
    thread,
    time::Duration,
};

use fontsets_core::{CancellationToken, FontBackend, FontSetManager};
use log::debug;

/// Report the properties kept in the font set itself.
///
/// None of this needs the font data.
pub fn report_font_properties<B: FontBackend>(
    out: &mut impl Write,
    manager: &FontSetManager<B>,
) -> io::Result<()> {
    writeln!(out, "Number of fonts in the font set: {}", manager.font_count())?;
    if manager.font_count() == 0 {
        return Ok(());
    }

    writeln!(out, "\nFull face name property for fonts in the custom font set:")?;
    for name in manager.full_names() {
        writeln!(out, "{name}")?;
    }
    writeln!(out)
}

/// Report details read from the font data.
///
/// Remote fonts have to be fetched first; any line on stdin stops waiting
/// for them.
pub fn report_font_data_details<B: FontBackend>(
    out: &mut impl Write,
    manager: &FontSetManager<B>,
    timeout: Duration,
) -> io::Result<()> {
    let cancel = CancellationToken::new();
    if manager.has_remote_fonts() {
        cancel_on_input(cancel.clone());
    }
    write_font_data_details(out, manager, &cancel, timeout)
}

/// Like [`report_font_data_details`], with the caller's cancellation token.
pub fn write_font_data_details<B: FontBackend>(
    out: &mut impl Write,
    manager: &FontSetManager<B>,
    cancel: &CancellationToken,
    timeout: Duration,
) -> io::Result<()> {
    if manager.font_count() == 0 {
        return Ok(());
    }

    writeln!(out, "\nReporting some details requiring actual font data:")?;
    if manager.has_remote_fonts() {
        writeln!(out, "The custom font set has remote fonts that will need to be downloaded.")?;
        writeln!(out, "Fetching remote fonts, which may take some time. To quit, press Enter...")?;
        out.flush()?;
    }

    let details = manager.font_data_details_with_timeout(cancel, timeout);
    if details.is_empty() {
        writeln!(out, "Font data details are unavailable.")?;
    }
    for line in details {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Fire `cancel` when a line (or end of input) arrives on stdin.
///
/// The reader thread is detached; it ends with the process.
fn cancel_on_input(cancel: CancellationToken) {
    thread::spawn(move || {
        let mut line = String::new();
        let _ = io::stdin().lock().read_line(&mut line);
        debug!("Input received, cancelling font data fetch");
        cancel.cancel();
    });
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use font_synth::SyntheticFont;
    use fontsets_core::FontByteSource;

    use super::*;

    fn manager(fonts: &[(&str, &str, i16)]) -> FontSetManager {
        let sources = fonts.iter().map(|(family, style, x_height)| {
            let data = SyntheticFont::new(*family, *style).x_height(*x_height).build().unwrap();
            FontByteSource::new(format!("{family} {style}"), Arc::new(data))
        });
        let mut manager: FontSetManager = FontSetManager::default();
        manager.build_from_memory_sources(sources).unwrap();
        manager
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_properties_report() {
        let manager = manager(&[("Alpha", "Regular", 500), ("Beta", "Bold", 520)]);
        let text = render(|out| report_font_properties(out, &manager));
        assert_eq!(
            text,
            "Number of fonts in the font set: 2\n\n\
             Full face name property for fonts in the custom font set:\n\
             Alpha Regular\nBeta Bold\n\n"
        );
    }

    #[test]
    fn test_empty_set_reports_count_only() {
        let manager = manager(&[]);
        assert_eq!(
            render(|out| report_font_properties(out, &manager)),
            "Number of fonts in the font set: 0\n"
        );
        assert!(
            render(|out| report_font_data_details(out, &manager, Duration::from_secs(1)))
                .is_empty()
        );
    }

    #[test]
    fn test_details_report() {
        let manager = manager(&[("Alpha", "Regular", 500)]);
        let text = render(|out| report_font_data_details(out, &manager, Duration::from_secs(1)));
        assert_eq!(
            text,
            "\nReporting some details requiring actual font data:\nAlpha Regular: x-height = 500\n"
        );
    }

    #[test]
    fn test_cancelled_details_report() {
        let manager = manager(&[("Alpha", "Regular", 500)]);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let text = render(|out| {
            write_font_data_details(out, &manager, &cancel, Duration::from_secs(1))
        });
        assert!(text.ends_with("Font data details are unavailable.\n"));
    }
}

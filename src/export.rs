use std::fmt;
use std::str::FromStr;

use crate::color::Color;
use crate::error::PaletteError;

/// Text formats a palette can be copied out as.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Json,
    Css,
    Scss,
    /// One `R G B` line per color, as swatch importers take it.
    Adobe,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Json,
        ExportFormat::Css,
        ExportFormat::Scss,
        ExportFormat::Adobe,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Css => "css",
            ExportFormat::Scss => "scss",
            ExportFormat::Adobe => "adobe",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "css" => Ok(ExportFormat::Css),
            "scss" => Ok(ExportFormat::Scss),
            "adobe" => Ok(ExportFormat::Adobe),
            _ => Err(PaletteError::unknown("export format", s)),
        }
    }
}

pub fn export_palette(colors: &[impl AsRef<str>], format: ExportFormat) -> String {
    let lines = |f: &dyn Fn(usize, &str) -> String| {
        colors
            .iter()
            .enumerate()
            .map(|(i, c)| f(i + 1, c.as_ref()))
            .collect::<Vec<_>>()
            .join("\n")
    };
    match format {
        ExportFormat::Css => lines(&|n, c| format!("--color-{n}: {c};")),
        ExportFormat::Scss => lines(&|n, c| format!("$color-{n}: {c};")),
        ExportFormat::Adobe => lines(&|_, c| match Color::from_hex(c) {
            Some(rgb) => format!("{} {} {}", rgb.r, rgb.g, rgb.b),
            None => c.to_string(),
        }),
        ExportFormat::Json => {
            let list: Vec<&str> = colors.iter().map(|c| c.as_ref()).collect();
            serde_json::to_string_pretty(&list).unwrap_or_default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PALETTE: [&str; 2] = ["#FF0000", "#00FF00"];

    #[test]
    fn css_and_scss_variables() {
        assert_eq!(
            export_palette(&PALETTE, ExportFormat::Css),
            "--color-1: #FF0000;\n--color-2: #00FF00;"
        );
        assert_eq!(
            export_palette(&PALETTE, ExportFormat::Scss),
            "$color-1: #FF0000;\n$color-2: #00FF00;"
        );
    }

    #[test]
    fn adobe_lines_keep_unparseable_entries() {
        assert_eq!(
            export_palette(&["#FF0000", "teal"], ExportFormat::Adobe),
            "255 0 0\nteal"
        );
    }

    #[test]
    fn json_is_a_pretty_array() {
        assert_eq!(
            export_palette(&PALETTE, ExportFormat::Json),
            "[\n  \"#FF0000\",\n  \"#00FF00\"\n]"
        );
    }

    #[test]
    fn parses_names() {
        assert_eq!("SCSS".parse::<ExportFormat>().ok(), Some(ExportFormat::Scss));
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn display_names_parse_back() {
        for format in ExportFormat::ALL {
            assert_eq!(format.to_string().parse::<ExportFormat>().ok(), Some(format));
        }
        assert_eq!(ExportFormat::Adobe.to_string(), "adobe");
    }
}

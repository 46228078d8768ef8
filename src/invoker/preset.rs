use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Quality/size tradeoff passed to Ghostscript as `-dPDFSETTINGS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Lowest resolution (72 dpi), smallest files
    Screen,
    /// Medium resolution (150 dpi), good for reading on screen
    #[default]
    Ebook,
    /// High resolution (300 dpi) for printing
    Printer,
    /// Print-shop quality, preserves colour information
    Prepress,
    /// Ghostscript's general-purpose defaults
    Default,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Screen,
        Preset::Ebook,
        Preset::Printer,
        Preset::Prepress,
        Preset::Default,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Screen => "screen",
            Preset::Ebook => "ebook",
            Preset::Printer => "printer",
            Preset::Prepress => "prepress",
            Preset::Default => "default",
        }
    }

    pub fn pdf_settings_flag(&self) -> String {
        format!("-dPDFSETTINGS=/{}", self.name())
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().trim_start_matches('/').to_lowercase();
        Preset::ALL
            .iter()
            .copied()
            .find(|preset| preset.name() == wanted)
            .ok_or_else(|| {
                format!(
                    "Unknown preset '{}'. Expected one of: screen, ebook, printer, prepress, default",
                    s
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_preset_is_ebook() {
        assert_eq!(Preset::default(), Preset::Ebook);
    }

    #[test]
    fn test_pdf_settings_flag() {
        assert_eq!(Preset::Screen.pdf_settings_flag(), "-dPDFSETTINGS=/screen");
        assert_eq!(Preset::Default.pdf_settings_flag(), "-dPDFSETTINGS=/default");
    }

    #[test]
    fn test_parse_presets() {
        assert_eq!("printer".parse::<Preset>().unwrap(), Preset::Printer);
        assert_eq!("/Prepress".parse::<Preset>().unwrap(), Preset::Prepress);
        assert!("tiny".parse::<Preset>().is_err());
    }

    #[test]
    fn test_display_matches_name() {
        for preset in Preset::ALL {
            assert_eq!(preset.to_string(), preset.name());
            assert_eq!(preset.name().parse::<Preset>().unwrap(), preset);
        }
    }
}

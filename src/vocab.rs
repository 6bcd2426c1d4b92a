//! Fixed style vocabularies: aspect ratio, lighting style and camera perspective.
//!
//! Each enum is the single source of truth for its values. The string returned
//! by `as_str` is interpolated verbatim into prompts and is also the wire value
//! used in structured model replies. UI labels live in [`crate::options`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident, $what:literal {
            $($(#[$vmeta:meta])* $variant:ident => $value:literal, $slug:literal;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            /// Every value, in presentation order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The value as it appears in prompts and structured replies.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $value,)+
                }
            }

            /// Kebab-case identifier accepted on the command line.
            #[must_use]
            pub const fn slug(self) -> &'static str {
                match self {
                    $(Self::$variant => $slug,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| {
                        v.as_str().eq_ignore_ascii_case(wanted)
                            || v.slug().eq_ignore_ascii_case(wanted)
                    })
                    .ok_or_else(|| {
                        let valid: Vec<&str> = Self::ALL.iter().map(|v| v.slug()).collect();
                        format!("Unsupported {} '{s}'. Valid: {}", $what, valid.join(", "))
                    })
            }
        }
    };
}

vocabulary! {
    /// Target width:height ratio of the normalized canvas and the generated shot.
    AspectRatio, "aspect ratio" {
        Square => "1:1", "1:1";
        Portrait => "3:4", "3:4";
        Landscape => "16:9", "16:9";
        Classic => "4:3", "4:3";
        Story => "9:16", "9:16";
    }
}

vocabulary! {
    /// Lighting set-up requested from the model.
    LightingStyle, "lighting style" {
        StudioSoftbox => "Studio Softbox", "studio-softbox";
        GoldenHour => "Golden Hour Sunlight", "golden-hour";
        DramaticRim => "Dramatic Rim Lighting", "dramatic-rim";
        NeonPunk => "Neon Punk", "neon-punk";
        VibrantCommercial => "Vibrant Commercial", "vibrant-commercial";
    }
}

vocabulary! {
    /// Camera angle requested from the model.
    CameraPerspective, "camera perspective" {
        EyeLevel => "Eye-Level Shot", "eye-level";
        HighAngle => "High-Angle Shot", "high-angle";
        LowAngle => "Low-Angle Shot", "low-angle";
        DutchAngle => "Dutch Angle", "dutch-angle";
        MacroCloseUp => "Macro Close-Up", "macro-close-up";
    }
}

impl AspectRatio {
    /// Numeric width and height units of the ratio.
    #[must_use]
    pub fn dimensions(self) -> (u32, u32) {
        let (w, h) = self.as_str().split_once(':').unwrap_or(("1", "1"));
        (w.parse().unwrap_or(1), h.parse().unwrap_or(1))
    }

    /// Width divided by height.
    #[must_use]
    pub fn value(self) -> f64 {
        let (w, h) = self.dimensions();
        f64::from(w) / f64::from(h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ratio_dimensions() {
        assert_eq!(AspectRatio::Square.dimensions(), (1, 1));
        assert_eq!(AspectRatio::Portrait.dimensions(), (3, 4));
        assert_eq!(AspectRatio::Landscape.dimensions(), (16, 9));
        assert!((AspectRatio::Landscape.value() - 16.0 / 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn every_ratio_parses_into_positive_units() {
        for ratio in AspectRatio::ALL {
            let (w, h) = ratio.dimensions();
            assert!(w > 0 && h > 0, "{ratio} has zero units");
            assert_eq!(ratio.as_str(), format!("{w}:{h}"));
        }
    }

    #[test]
    fn parse_by_value_or_slug() {
        assert_eq!("16:9".parse::<AspectRatio>().unwrap(), AspectRatio::Landscape);
        assert_eq!("Golden Hour Sunlight".parse::<LightingStyle>().unwrap(), LightingStyle::GoldenHour);
        assert_eq!("golden-hour".parse::<LightingStyle>().unwrap(), LightingStyle::GoldenHour);
        assert_eq!("NEON-PUNK".parse::<LightingStyle>().unwrap(), LightingStyle::NeonPunk);
        assert_eq!(
            "macro close-up".parse::<CameraPerspective>().unwrap(),
            CameraPerspective::MacroCloseUp
        );
    }

    #[test]
    fn parse_unknown_lists_valid_values() {
        let err = "7:3".parse::<AspectRatio>().unwrap_err();
        assert!(err.contains("Unsupported aspect ratio"));
        assert!(err.contains("16:9"));
        assert!("Fisheye".parse::<CameraPerspective>().is_err());
    }

    #[test]
    fn serde_uses_prompt_values() {
        let json = serde_json::to_string(&LightingStyle::DramaticRim).unwrap();
        assert_eq!(json, "\"Dramatic Rim Lighting\"");
        let parsed: CameraPerspective = serde_json::from_str("\"Dutch Angle\"").unwrap();
        assert_eq!(parsed, CameraPerspective::DutchAngle);
        assert!(serde_json::from_str::<CameraPerspective>("\"dutch-angle\"").is_err());
    }
}

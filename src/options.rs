//! UI label tables for the style vocabularies.

use crate::vocab::{AspectRatio, CameraPerspective, LightingStyle};

/// Labels shown for each aspect ratio.
pub const ASPECT_RATIO_OPTIONS: &[(AspectRatio, &str)] = &[
    (AspectRatio::Square, "Square (1:1)"),
    (AspectRatio::Portrait, "Portrait (3:4)"),
    (AspectRatio::Landscape, "Landscape (16:9)"),
    (AspectRatio::Classic, "Classic (4:3)"),
    (AspectRatio::Story, "Story (9:16)"),
];

/// Labels shown for each lighting style.
pub const LIGHTING_STYLE_OPTIONS: &[(LightingStyle, &str)] = &[
    (LightingStyle::StudioSoftbox, "Studio Softbox"),
    (LightingStyle::GoldenHour, "Golden Hour"),
    (LightingStyle::DramaticRim, "Dramatic Rim"),
    (LightingStyle::NeonPunk, "Neon Punk"),
    (LightingStyle::VibrantCommercial, "Vibrant Commercial"),
];

/// Labels shown for each camera perspective.
pub const CAMERA_PERSPECTIVE_OPTIONS: &[(CameraPerspective, &str)] = &[
    (CameraPerspective::EyeLevel, "Eye-Level"),
    (CameraPerspective::HighAngle, "High-Angle"),
    (CameraPerspective::LowAngle, "Low-Angle"),
    (CameraPerspective::DutchAngle, "Dutch Angle"),
    (CameraPerspective::MacroCloseUp, "Macro Close-Up"),
];

/// Render the option tables as `slug  label  (prompt value)` lines.
#[must_use]
pub fn render_options() -> String {
    let mut out = String::new();
    section(&mut out, "Aspect ratios", ASPECT_RATIO_OPTIONS.iter().map(|(v, l)| (v.slug(), *l, v.as_str())));
    section(&mut out, "Lighting styles", LIGHTING_STYLE_OPTIONS.iter().map(|(v, l)| (v.slug(), *l, v.as_str())));
    section(
        &mut out,
        "Camera perspectives",
        CAMERA_PERSPECTIVE_OPTIONS.iter().map(|(v, l)| (v.slug(), *l, v.as_str())),
    );
    out
}

fn section<'a>(
    out: &mut String,
    title: &str,
    rows: impl Iterator<Item = (&'a str, &'a str, &'a str)>,
) {
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(title);
    out.push_str(":\n");
    for (slug, label, value) in rows {
        out.push_str(&format!("  {slug:<20} {label:<20} ({value})\n"));
    }
}

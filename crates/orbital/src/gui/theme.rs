use palette::{Srgb, Srgba};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Optional `#rrggbb` overrides for the scene colours.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub active_border: Option<String>,
    pub idle_border: Option<String>,
    pub ring: Option<String>,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeColors {
    pub active_border: Srgba<f64>,
    pub idle_border: Srgba<f64>,
    pub ring: Srgba<f64>,
    pub hint: Srgba<f64>,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}

impl ThemeColors {
    pub fn from_config(config: &ThemeConfig) -> Self {
        Self {
            active_border: Self::lookup_color(
                config.active_border.as_deref(),
                Srgba::new(0.96, 0.62, 0.04, 1.0),
                None,
            ),
            idle_border: Self::lookup_color(
                config.idle_border.as_deref(),
                Srgba::new(1.0, 1.0, 1.0, 0.1),
                Some(0.1),
            ),
            ring: Self::lookup_color(
                config.ring.as_deref(),
                Srgba::new(0.96, 0.62, 0.04, 0.1),
                Some(0.1),
            ),
            hint: Self::lookup_color(
                config.hint.as_deref(),
                Srgba::new(0.96, 0.62, 0.04, 0.8),
                Some(0.8),
            ),
        }
    }

    fn lookup_color(
        value: Option<&str>,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        value
            .and_then(|hex| match Srgb::<u8>::from_str(hex.trim()) {
                Ok(rgb) => Some(rgb),
                Err(e) => {
                    log::warn!("Ignoring theme colour '{}': {}", hex, e);
                    None
                }
            })
            .map(|rgb| {
                let rgb: Srgb<f64> = rgb.into_format();
                Srgba::new(rgb.red, rgb.green, rgb.blue, alpha_override.unwrap_or(1.0))
            })
            .unwrap_or(fallback)
    }
}

/// Flattens a colour for the serialized scene.
pub fn rgba(color: Srgba<f64>) -> [f64; 4] {
    let (r, g, b, a) = color.into_components();
    [r, g, b, a]
}

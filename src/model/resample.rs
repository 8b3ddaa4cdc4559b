/*!
 * Script resolution resampling for ASS subtitles.
 *
 * Horizontal values scale with `PlayResX`, vertical values and sizes with
 * `PlayResY`. Scaled are the event margins, the style table (font size,
 * outline, shadow, margins) and the position-like override tags kept in
 * `raw_text`: `\pos`, `\org`, `\move` (not its times), `\fs`, `\bord`,
 * `\shad` and `\blur`.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::segment::OVERRIDE_BLOCK_REGEX;
use super::Subtitle;
use crate::errors::EditError;

// @const: coordinate tags with an argument list, or a size tag with one value
static SCALABLE_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\(pos|org|move)\(([^)]*)\)|\\(fs|bord|shad|blur)(-?\d+(?:\.\d+)?)")
        .expect("Invalid scalable tag regex")
});

#[derive(Debug, Clone, Copy)]
struct Scale {
    x: f64,
    y: f64,
}

impl Subtitle {
    /// Rescale the script from its `PlayResX`x`PlayResY` to a new resolution
    pub fn resample_resolution(&mut self, target_x: u32, target_y: u32) -> Result<(), EditError> {
        if target_x == 0 || target_y == 0 {
            return Err(EditError::InvalidResolution {
                x: target_x,
                y: target_y,
            });
        }
        let current_x = self.play_res("PlayResX")?;
        let current_y = self.play_res("PlayResY")?;
        let scale = Scale {
            x: f64::from(target_x) / f64::from(current_x),
            y: f64::from(target_y) / f64::from(current_y),
        };

        self.meta.set_info("PlayResX", target_x.to_string());
        self.meta.set_info("PlayResY", target_y.to_string());

        for style in &mut self.meta.styles {
            style.fontsize = round3(style.fontsize * scale.y);
            style.outline = round3(style.outline * scale.y);
            style.shadow = round3(style.shadow * scale.y);
            style.margin_l = scale_margin(style.margin_l, scale.x);
            style.margin_r = scale_margin(style.margin_r, scale.x);
            style.margin_v = scale_margin(style.margin_v, scale.y);
        }

        for segment in &mut self.segments {
            if let Some(event) = segment.event.as_mut() {
                event.margin_l = scale_margin(event.margin_l, scale.x);
                event.margin_r = scale_margin(event.margin_r, scale.x);
                event.margin_v = scale_margin(event.margin_v, scale.y);
            }
            if let Some(raw) = segment.raw_text.as_mut() {
                *raw = scale_override_tags(raw, scale);
            }
        }

        debug!(
            "Resampled {} segments from {}x{} to {}x{}",
            self.segments.len(),
            current_x,
            current_y,
            target_x,
            target_y
        );
        Ok(())
    }

    fn play_res(&self, key: &str) -> Result<u32, EditError> {
        let value = self
            .meta
            .info(key)
            .ok_or_else(|| EditError::MissingResolution(format!("{} is not set", key)))?;
        match value.trim().parse::<u32>() {
            Ok(v) if v > 0 => Ok(v),
            _ => Err(EditError::MissingResolution(format!("{} is '{}'", key, value))),
        }
    }
}

// Margins are whole pixels; the fraction is dropped
fn scale_margin(value: i32, factor: f64) -> i32 {
    (f64::from(value) * factor) as i32
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn number(value: f64) -> String {
    let value = round3(value);
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn scale_override_tags(text: &str, scale: Scale) -> String {
    OVERRIDE_BLOCK_REGEX
        .replace_all(text, |block: &Captures| {
            SCALABLE_TAG_REGEX
                .replace_all(&block[0], |tag: &Captures| scale_tag(tag, scale))
                .into_owned()
        })
        .into_owned()
}

fn scale_tag(tag: &Captures, scale: Scale) -> String {
    if let (Some(name), Some(args)) = (tag.get(1), tag.get(2)) {
        let values: Option<Vec<f64>> = args
            .as_str()
            .split(',')
            .map(|a| a.trim().parse::<f64>().ok())
            .collect();
        let Some(values) = values else {
            return tag[0].to_string();
        };
        let scaled: Vec<String> = values
            .iter()
            .enumerate()
            .map(|(i, &v)| match i {
                // \move keeps its t1,t2 arguments
                0 | 2 => number(v * scale.x),
                1 | 3 => number(v * scale.y),
                _ => number(v),
            })
            .collect();
        return format!("\\{}({})", name.as_str(), scaled.join(","));
    }
    match (tag.get(3), tag.get(4).and_then(|v| v.as_str().parse::<f64>().ok())) {
        (Some(name), Some(value)) => format!("\\{}{}", name.as_str(), number(value * scale.y)),
        _ => tag[0].to_string(),
    }
}

use serde::{Deserialize, Serialize};

/// Column names of a `[V4+ Styles]` Format line, in canonical order
pub const STYLE_FORMAT_FIELDS: [&str; 23] = [
    "Name",
    "Fontname",
    "Fontsize",
    "PrimaryColour",
    "SecondaryColour",
    "OutlineColour",
    "BackColour",
    "Bold",
    "Italic",
    "Underline",
    "StrikeOut",
    "ScaleX",
    "ScaleY",
    "Spacing",
    "Angle",
    "BorderStyle",
    "Outline",
    "Shadow",
    "Alignment",
    "MarginL",
    "MarginR",
    "MarginV",
    "Encoding",
];

/// One ASS style definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssStyle {
    pub name: String,
    pub fontname: String,
    pub fontsize: f64,
    pub primary_colour: String,
    pub secondary_colour: String,
    pub outline_colour: String,
    pub back_colour: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strike_out: bool,
    pub scale_x: f64,
    pub scale_y: f64,
    pub spacing: f64,
    pub angle: f64,
    pub border_style: i32,
    pub outline: f64,
    pub shadow: f64,
    /// Numpad alignment, 2 is bottom centre
    pub alignment: i32,
    pub margin_l: i32,
    pub margin_r: i32,
    pub margin_v: i32,
    pub encoding: i32,
}

impl Default for AssStyle {
    fn default() -> Self {
        AssStyle {
            name: "Default".to_string(),
            fontname: "Arial".to_string(),
            fontsize: 48.0,
            primary_colour: "&H00FFFFFF".to_string(),
            secondary_colour: "&H000000FF".to_string(),
            outline_colour: "&H00000000".to_string(),
            back_colour: "&H00000000".to_string(),
            bold: false,
            italic: false,
            underline: false,
            strike_out: false,
            scale_x: 100.0,
            scale_y: 100.0,
            spacing: 0.0,
            angle: 0.0,
            border_style: 1,
            outline: 2.0,
            shadow: 1.0,
            alignment: 2,
            margin_l: 10,
            margin_r: 10,
            margin_v: 20,
            encoding: 1,
        }
    }
}

impl AssStyle {
    /// Default style under another name
    pub fn named(name: impl Into<String>) -> Self {
        AssStyle {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Value of a Format column, rendered the way ASS files spell it
    pub fn field(&self, column: &str) -> Option<String> {
        let value = match column {
            "Name" => self.name.clone(),
            "Fontname" => self.fontname.clone(),
            "Fontsize" => format_number(self.fontsize),
            "PrimaryColour" => self.primary_colour.clone(),
            "SecondaryColour" => self.secondary_colour.clone(),
            "OutlineColour" => self.outline_colour.clone(),
            "BackColour" => self.back_colour.clone(),
            "Bold" => format_flag(self.bold),
            "Italic" => format_flag(self.italic),
            "Underline" => format_flag(self.underline),
            "StrikeOut" => format_flag(self.strike_out),
            "ScaleX" => format_number(self.scale_x),
            "ScaleY" => format_number(self.scale_y),
            "Spacing" => format_number(self.spacing),
            "Angle" => format_number(self.angle),
            "BorderStyle" => self.border_style.to_string(),
            "Outline" => format_number(self.outline),
            "Shadow" => format_number(self.shadow),
            "Alignment" => self.alignment.to_string(),
            "MarginL" => self.margin_l.to_string(),
            "MarginR" => self.margin_r.to_string(),
            "MarginV" => self.margin_v.to_string(),
            "Encoding" => self.encoding.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Set a Format column from its textual value
    ///
    /// Returns `Ok(false)` for columns this model does not know and
    /// `Err(())` when a numeric column holds something unparseable.
    pub fn set_field(&mut self, column: &str, value: &str) -> Result<bool, ()> {
        let value = value.trim();
        let num = || value.parse::<f64>().map_err(|_| ());
        let int = || value.parse::<i32>().map_err(|_| ());
        let flag = || value.parse::<i32>().map(|v| v != 0).map_err(|_| ());

        match column {
            "Name" => self.name = value.to_string(),
            "Fontname" => self.fontname = value.to_string(),
            "Fontsize" => self.fontsize = num()?,
            "PrimaryColour" => self.primary_colour = value.to_string(),
            "SecondaryColour" => self.secondary_colour = value.to_string(),
            "OutlineColour" => self.outline_colour = value.to_string(),
            "BackColour" => self.back_colour = value.to_string(),
            "Bold" => self.bold = flag()?,
            "Italic" => self.italic = flag()?,
            "Underline" => self.underline = flag()?,
            "StrikeOut" => self.strike_out = flag()?,
            "ScaleX" => self.scale_x = num()?,
            "ScaleY" => self.scale_y = num()?,
            "Spacing" => self.spacing = num()?,
            "Angle" => self.angle = num()?,
            "BorderStyle" => self.border_style = int()?,
            "Outline" => self.outline = num()?,
            "Shadow" => self.shadow = num()?,
            "Alignment" => self.alignment = int()?,
            "MarginL" => self.margin_l = int()?,
            "MarginR" => self.margin_r = int()?,
            "MarginV" => self.margin_v = int()?,
            "Encoding" => self.encoding = int()?,
            _ => return Ok(false),
        }
        Ok(true)
    }
}

/// Whole numbers without a trailing `.0`
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

// ASS spells true as -1
fn format_flag(value: bool) -> String {
    if value { "-1".to_string() } else { "0".to_string() }
}

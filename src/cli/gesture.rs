//! Gesture scripts for the `simulate` subcommand.

use std::fmt;

/// One user gesture replayed against a simulated session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Focus { x: f32, y: f32 },
    Zoom(f32),
    Exposure(f32),
    Flash(bool),
    CycleAspect,
    SwitchCamera,
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gesture::Focus { x, y } => write!(f, "focus:{},{}", x, y),
            Gesture::Zoom(s) => write!(f, "zoom:{}", s),
            Gesture::Exposure(s) => write!(f, "exposure:{}", s),
            Gesture::Flash(true) => write!(f, "flash:on"),
            Gesture::Flash(false) => write!(f, "flash:off"),
            Gesture::CycleAspect => write!(f, "aspect"),
            Gesture::SwitchCamera => write!(f, "switch"),
        }
    }
}

fn parse_number(s: &str, what: &str) -> Result<f32, String> {
    s.trim()
        .parse()
        .map_err(|_| format!("'{}' is not a valid {}", s, what))
}

/// Parse `focus:X,Y`, `zoom:S`, `exposure:S`, `flash:on|off`, `aspect` or `switch`.
pub fn parse_gesture(s: &str) -> Result<Gesture, String> {
    let (name, value) = match s.split_once(':') {
        Some((name, value)) => (name, Some(value)),
        None => (s, None),
    };
    match (name, value) {
        ("focus", Some(value)) => {
            let (x, y) = value
                .split_once(',')
                .ok_or_else(|| format!("Invalid focus point '{}'. Use focus:X,Y", value))?;
            Ok(Gesture::Focus {
                x: parse_number(x, "coordinate")?,
                y: parse_number(y, "coordinate")?,
            })
        }
        ("zoom", Some(value)) => Ok(Gesture::Zoom(parse_number(value, "scale")?)),
        ("exposure", Some(value)) => Ok(Gesture::Exposure(parse_number(value, "scale")?)),
        ("flash", Some("on")) => Ok(Gesture::Flash(true)),
        ("flash", Some("off")) => Ok(Gesture::Flash(false)),
        ("flash", Some(other)) => Err(format!("Invalid flash value '{}'. Use on or off", other)),
        ("aspect", None) => Ok(Gesture::CycleAspect),
        ("switch", None) => Ok(Gesture::SwitchCamera),
        _ => Err(format!(
            "Unknown gesture '{}'. Available: focus:X,Y zoom:S exposure:S flash:on|off aspect switch",
            s
        )),
    }
}

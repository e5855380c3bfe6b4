//! Scripted view operations, e.g. from the command line.

use std::fmt;
use std::str::FromStr;

/// One view change applied to every layer of a [`Viewer`](super::Viewer).
///
/// Textual forms:
/// - `zoom:STEP_X,STEP_Y,CENTER_X,CENTER_Y`
/// - `pan:TX,TY`
/// - `reset`
/// - `show` / `hide` (annotation layer visibility)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewOp {
    Zoom {
        step_x: f64,
        step_y: f64,
        center_x: f64,
        center_y: f64,
    },
    Pan {
        tx: f64,
        ty: f64,
    },
    Reset,
    ShowAnnotation,
    HideAnnotation,
}

impl FromStr for ViewOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, args) = match s.split_once(':') {
            Some((name, args)) => (name.trim(), Some(args)),
            None => (s, None),
        };

        match (name.to_ascii_lowercase().as_str(), args) {
            ("zoom", Some(args)) => match parse_numbers(args)?.as_slice() {
                [step_x, step_y, center_x, center_y] => Ok(ViewOp::Zoom {
                    step_x: *step_x,
                    step_y: *step_y,
                    center_x: *center_x,
                    center_y: *center_y,
                }),
                other => Err(format!(
                    "zoom expects 4 values (step_x,step_y,center_x,center_y), got {}",
                    other.len()
                )),
            },
            ("pan", Some(args)) => match parse_numbers(args)?.as_slice() {
                [tx, ty] => Ok(ViewOp::Pan { tx: *tx, ty: *ty }),
                other => Err(format!("pan expects 2 values (tx,ty), got {}", other.len())),
            },
            ("reset", None) => Ok(ViewOp::Reset),
            ("show", None) => Ok(ViewOp::ShowAnnotation),
            ("hide", None) => Ok(ViewOp::HideAnnotation),
            ("zoom" | "pan", None) => Err(format!("'{name}' needs arguments after ':'")),
            ("reset" | "show" | "hide", Some(_)) => {
                Err(format!("'{name}' does not take arguments"))
            }
            _ => Err(format!(
                "unknown operation '{name}' (expected zoom, pan, reset, show or hide)"
            )),
        }
    }
}

impl fmt::Display for ViewOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewOp::Zoom {
                step_x,
                step_y,
                center_x,
                center_y,
            } => write!(f, "zoom:{step_x},{step_y},{center_x},{center_y}"),
            ViewOp::Pan { tx, ty } => write!(f, "pan:{tx},{ty}"),
            ViewOp::Reset => f.write_str("reset"),
            ViewOp::ShowAnnotation => f.write_str("show"),
            ViewOp::HideAnnotation => f.write_str("hide"),
        }
    }
}

fn parse_numbers(args: &str) -> Result<Vec<f64>, String> {
    args.split(',')
        .map(|part| {
            let part = part.trim();
            part.parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| format!("'{part}' is not a finite number"))
        })
        .collect()
}

use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::PathBuf,
};

use anyhow::Context;
use serde_json::{Number, Value};

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    /// Writes `value` as pretty JSON with every float rounded to `decimals`.
    pub fn write_json<T>(&mut self, value: &T, decimals: u8) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let json = rounded_json(value, decimals).context("Failed to serialize result")?;
        serde_json::to_writer_pretty(&mut *self, &json)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

/// Rounds half away from zero to `decimals` places.
///
/// Values too large to scale are returned unchanged.
pub fn round_to(value: f64, decimals: u8) -> f64 {
    let factor = 10_f64.powi(i32::from(decimals));
    let scaled = value * factor;
    if scaled.is_finite() {
        scaled.round() / factor
    } else {
        value
    }
}

/// Formats `value` as `exact (rounded: r)`, or just `exact` when rounding
/// does not change it.
pub fn format_value(value: f64, decimals: u8) -> String {
    let rounded = round_to(value, decimals);
    if rounded.to_string() == value.to_string() {
        value.to_string()
    } else {
        format!("{value} (rounded: {rounded:.prec$})", prec = usize::from(decimals))
    }
}

/// Formats numbers rounded to `decimals` places as `[a, b, c]`.
pub fn format_rounded_list(values: &[f64], decimals: u8) -> String {
    let items = values
        .iter()
        .map(|&v| round_to(v, decimals).to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{items}]")
}

fn rounded_json<T>(value: &T, decimals: u8) -> serde_json::Result<Value>
where
    T: serde::Serialize,
{
    let mut json = serde_json::to_value(value)?;
    round_json_numbers(&mut json, decimals);
    Ok(json)
}

/// Rounds every floating-point number in `value`; integers and text are kept.
fn round_json_numbers(value: &mut Value, decimals: u8) {
    match value {
        Value::Number(n) if n.is_f64() => {
            if let Some(rounded) = n
                .as_f64()
                .and_then(|f| Number::from_f64(round_to(f, decimals)))
            {
                *n = rounded;
            }
        }
        Value::Array(items) => {
            for item in items {
                round_json_numbers(item, decimals);
            }
        }
        Value::Object(map) => {
            for item in map.values_mut() {
                round_json_numbers(item, decimals);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.045_500_263_9, 4), 0.0455);
        assert_eq!(round_to(-2.5, 0), -3.0);
        assert_eq!(round_to(1.0e308, 10), 1.0e308);
    }

    #[test]
    fn test_format_value_shows_rounding_only_when_needed() {
        assert_eq!(format_value(5.5, 4), "5.5");
        assert_eq!(format_value(9.166_666_666_666_666, 4), "9.166666666666666 (rounded: 9.1667)");
        assert_eq!(format_value(2.0, 2), "2");
    }

    #[test]
    fn test_json_rounding_keeps_integers_and_text() {
        let value = json!({
            "p_value": 0.045_500_263_896_358_4,
            "critical_values": [-1.959_963_984_540_054, 1.959_963_984_540_054],
            "sample_size": 36,
            "steps": ["p-value = 0.04550026389635842"],
        });
        let rounded = rounded_json(&value, 3).unwrap();
        assert_eq!(
            rounded,
            json!({
                "p_value": 0.046,
                "critical_values": [-1.96, 1.96],
                "sample_size": 36,
                "steps": ["p-value = 0.04550026389635842"],
            })
        );
    }

    #[test]
    fn test_format_rounded_list() {
        assert_eq!(format_rounded_list(&[-1.959_96, 1.959_96], 2), "[-1.96, 1.96]");
    }
}

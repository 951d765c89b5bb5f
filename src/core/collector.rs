//! Terminal survey form.
//!
//! The form starts from schema defaults. Values change only through
//! range-checked `set` commands or `name=value` overrides, and a feature
//! vector is handed out only on an explicit `predict`.

use std::io::{BufRead, Write};

use crate::domain::model::FeatureVector;
use crate::domain::schema::{feature_spec, section_features, Section};
use crate::utils::error::{Result, WellnessError};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Show,
    Set { field: String, value: f64 },
    Reset,
    Predict,
    Help,
    Quit,
}

const HELP: &str = "\
Commands:
  show                  display the form
  set <field> <value>   change one answer
  reset                 restore defaults
  predict               predict wellness for the current answers
  help                  show this message
  quit                  leave";

fn parse_value(field: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| WellnessError::InvalidInputError {
            field: field.to_string(),
            reason: format!("'{}' is not a number", raw.trim()),
        })
}

pub fn parse_command(line: &str) -> Result<Command> {
    let mut parts = line.split_whitespace();
    let keyword = parts.next().unwrap_or("").to_ascii_lowercase();
    let command = match keyword.as_str() {
        "show" | "" => Command::Show,
        "reset" => Command::Reset,
        "predict" => Command::Predict,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "set" => {
            let (field, raw) = match (parts.next(), parts.next()) {
                (Some(field), Some(raw)) => (field, raw),
                _ => {
                    return Err(WellnessError::InvalidInputError {
                        field: "set".to_string(),
                        reason: "usage: set <field> <value>".to_string(),
                    })
                }
            };
            Command::Set {
                field: field.to_string(),
                value: parse_value(field, raw)?,
            }
        }
        other => {
            return Err(WellnessError::InvalidInputError {
                field: "command".to_string(),
                reason: format!("unknown command '{}'; type 'help'", other),
            })
        }
    };
    Ok(command)
}

#[derive(Debug, Clone, Default)]
pub struct FeatureCollector {
    values: FeatureVector,
}

impl FeatureCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `name=value` overrides on top of the defaults.
    pub fn with_overrides<S: AsRef<str>>(overrides: &[S]) -> Result<Self> {
        let mut collector = Self::new();
        for item in overrides {
            collector.apply_override(item.as_ref())?;
        }
        Ok(collector)
    }

    pub fn apply_override(&mut self, item: &str) -> Result<()> {
        let (field, raw) = item
            .split_once('=')
            .ok_or_else(|| WellnessError::InvalidInputError {
                field: item.to_string(),
                reason: "expected name=value".to_string(),
            })?;
        let field = field.trim();
        let value = parse_value(field, raw)?;
        self.set(field, value)
    }

    pub fn set(&mut self, field: &str, value: f64) -> Result<()> {
        self.values.set(field, value)?;
        tracing::debug!("Set {} = {}", field, value);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.values = FeatureVector::default();
    }

    pub fn current(&self) -> &FeatureVector {
        &self.values
    }

    pub fn render_form<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        for section in Section::ALL {
            writeln!(out, "[{}]", section.title())?;
            for spec in section_features(section) {
                let value = self.values.get(spec.name).unwrap_or(spec.default);
                writeln!(
                    out,
                    "  {:<27} {:>7}   {} ({}..={}, step {})",
                    spec.name, value, spec.label, spec.min, spec.max, spec.step
                )?;
            }
        }
        Ok(())
    }

    /// Reads commands until `quit` or end of input. `on_predict` runs once
    /// per `predict` command; its errors end the session, while bad input
    /// only produces a message. Returns the number of predictions made.
    pub fn run_session<R, W, F>(&mut self, input: R, out: &mut W, mut on_predict: F) -> Result<usize>
    where
        R: BufRead,
        W: Write,
        F: FnMut(&FeatureVector, &mut W) -> Result<()>,
    {
        let mut predictions = 0usize;
        writeln!(out, "{}", HELP)?;
        writeln!(out)?;
        self.render_form(out)?;

        for line in input.lines() {
            let line = line?;
            match parse_command(&line) {
                Ok(Command::Show) => self.render_form(out)?,
                Ok(Command::Help) => writeln!(out, "{}", HELP)?,
                Ok(Command::Reset) => {
                    self.reset();
                    writeln!(out, "Answers reset to defaults.")?;
                }
                Ok(Command::Set { field, value }) => match self.set(&field, value) {
                    Ok(()) => writeln!(out, "{} = {}", field, value)?,
                    Err(e) => {
                        let hint = feature_spec(&field)
                            .map(|s| format!(" ({}..={})", s.min, s.max))
                            .unwrap_or_default();
                        writeln!(out, "Rejected: {}{}", e, hint)?;
                    }
                },
                Ok(Command::Predict) => {
                    on_predict(&self.values, out)?;
                    predictions += 1;
                }
                Ok(Command::Quit) => break,
                Err(e) => writeln!(out, "{}", e)?,
            }
        }
        Ok(predictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("predict").unwrap(), Command::Predict);
        assert_eq!(parse_command("  SHOW ").unwrap(), Command::Show);
        assert_eq!(parse_command("exit").unwrap(), Command::Quit);
        assert_eq!(
            parse_command("set sleep_hours 8.5").unwrap(),
            Command::Set {
                field: "sleep_hours".to_string(),
                value: 8.5
            }
        );
        assert!(parse_command("set sleep_hours").is_err());
        assert!(parse_command("set sleep_hours lots").is_err());
        assert!(parse_command("dance").is_err());
    }

    #[test]
    fn test_overrides() {
        let collector =
            FeatureCollector::with_overrides(&["age=45", "stress_level_0_10 = 9"]).unwrap();
        assert_eq!(collector.current().age, 45.0);
        assert_eq!(collector.current().stress_level_0_10, 9.0);
        assert_eq!(collector.current().sleep_hours, 7.0);

        assert!(FeatureCollector::with_overrides(&["age"]).is_err());
        assert!(FeatureCollector::with_overrides(&["age=500"]).is_err());
        assert!(FeatureCollector::with_overrides(&["height=180"]).is_err());
    }

    #[test]
    fn test_form_lists_sections_in_order() {
        let mut out = Vec::new();
        FeatureCollector::new().render_form(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lifestyle = text.find("[Lifestyle]").unwrap();
        let work = text.find("[Work & Screen Time]").unwrap();
        let sleep = text.find("[Sleep]").unwrap();
        let social = text.find("[Social & Stress]").unwrap();
        assert!(lifestyle < work && work < sleep && sleep < social);
        assert!(text.contains("exercise_minutes_per_week"));
    }

    #[test]
    fn test_session_predicts_only_on_trigger() {
        let input = Cursor::new("set age 50\nset sleep_hours 99\nshow\npredict\nreset\npredict\nquit\npredict\n");
        let mut out = Vec::new();
        let mut seen = Vec::new();
        let mut collector = FeatureCollector::new();

        let count = collector
            .run_session(input, &mut out, |features, w| {
                seen.push(*features);
                writeln!(w, "PREDICTED")?;
                Ok(())
            })
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].age, 50.0);
        assert_eq!(seen[0].sleep_hours, 7.0);
        assert_eq!(seen[1], FeatureVector::default());

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Rejected"));
        assert_eq!(text.matches("PREDICTED").count(), 2);
    }

    #[test]
    fn test_session_stops_on_prediction_error() {
        let input = Cursor::new("predict\npredict\n");
        let mut out = Vec::new();
        let mut collector = FeatureCollector::new();
        let result = collector.run_session(input, &mut out, |_, _| {
            Err(WellnessError::schema_mismatch(&["a"], &["b"]))
        });
        assert!(matches!(result, Err(WellnessError::SchemaMismatchError { .. })));
    }

    #[test]
    fn test_session_ends_at_end_of_input() {
        let input = Cursor::new("set age 20\n");
        let mut out = Vec::new();
        let mut collector = FeatureCollector::new();
        let count = collector.run_session(input, &mut out, |_, _| Ok(())).unwrap();
        assert_eq!(count, 0);
        assert_eq!(collector.current().age, 20.0);
    }
}

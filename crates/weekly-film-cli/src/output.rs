use clap::ValueEnum;
use owo_colors::OwoColorize;
use serde_json::{json, Value};
use weekly_film_core::sensors::SCROLLING_ENTITY;
use weekly_film_core::SensorState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    #[value(name = "json-pretty")]
    JsonPretty,
}

#[derive(Debug, Clone, Copy)]
pub struct Output {
    format: OutputFormat,
    quiet: bool,
}

impl Output {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    pub fn success(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => println!("{} {}", "✓".green(), msg.as_ref()),
            _ => self.print_json(&message("success", msg.as_ref())),
        }
    }

    pub fn error(&self, msg: impl AsRef<str>) {
        // Errors are shown even in quiet mode
        match self.format {
            OutputFormat::Human => eprintln!("{} {}", "✗".red(), msg.as_ref()),
            _ => self.print_json(&message("error", msg.as_ref())),
        }
    }

    pub fn info(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => println!("{}", msg.as_ref()),
            _ => self.print_json(&message("info", msg.as_ref())),
        }
    }

    pub fn warn(&self, msg: impl AsRef<str>) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => println!("{} {}", "⚠".yellow(), msg.as_ref()),
            _ => self.print_json(&message("warning", msg.as_ref())),
        }
    }

    /// Plain line in human mode; nothing in JSON modes.
    pub fn println(&self, msg: impl AsRef<str>) {
        if self.quiet || !self.is_human() {
            return;
        }
        println!("{}", msg.as_ref());
    }

    pub fn json(&self, data: &Value) {
        if self.quiet && !self.is_human() {
            return;
        }
        self.print_json(data);
    }

    /// Publish a sensor update: one line per update in human mode, a
    /// `{"type": "sensor", ...}` document otherwise.
    pub fn sensor(&self, sensor: &SensorState) {
        if self.quiet {
            return;
        }
        match self.format {
            OutputFormat::Human => println!("{}", sensor_line(sensor)),
            _ => self.print_json(&sensor_document(sensor)),
        }
    }

    fn print_json(&self, data: &Value) {
        match self.format {
            OutputFormat::JsonPretty => {
                println!("{}", serde_json::to_string_pretty(data).unwrap_or_default())
            }
            _ => println!("{}", serde_json::to_string(data).unwrap_or_default()),
        }
    }
}

fn message(kind: &str, msg: &str) -> Value {
    json!({ "type": kind, "message": msg })
}

fn sensor_document(sensor: &SensorState) -> Value {
    json!({
        "type": "sensor",
        "entity": sensor.entity,
        "name": sensor.name,
        "state": sensor.state,
        "available": sensor.available,
        "attributes": sensor.attributes,
    })
}

fn sensor_line(sensor: &SensorState) -> String {
    let marker = if sensor.available {
        "●".green().to_string()
    } else {
        "●".red().to_string()
    };

    let detail = if sensor.entity == SCROLLING_ENTITY {
        let attribute = |key: &str| {
            sensor
                .attributes
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        match sensor.attributes.get("namedate").and_then(Value::as_str) {
            Some(label) => format!(
                "{} | {} | 导演: {}",
                label,
                attribute("type"),
                attribute("director")
            ),
            None => String::new(),
        }
    } else {
        match sensor.attributes.get("film_count") {
            Some(count) => format!("{} films", count),
            None => String::new(),
        }
    };

    if detail.is_empty() {
        format!("{} {}: {}", marker, sensor.name.bold(), sensor.state)
    } else {
        format!("{} {}: {}  {}", marker, sensor.name.bold(), sensor.state, detail.dimmed())
    }
}

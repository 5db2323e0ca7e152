//! JSONL tracing layer.
//!
//! Each event becomes one line:
//! `{ts, level, event, run_id?, stage?, message?, fields?}`. `event` is the
//! tracing target, which `log_event!` sets to an [`event_names`] constant.
//! `run_id` and `stage` come from the event itself or, failing that, from
//! the nearest enclosing span that recorded them.
//!
//! [`event_names`]: super::events::event_names

use std::io::{self, Write};
use std::sync::Mutex;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use super::events::Level;

/// Fields promoted out of `fields` to the top level of a line.
#[derive(Debug, Clone, Default)]
struct Correlation {
    run_id: Option<String>,
    stage: Option<String>,
}

impl Correlation {
    fn fill_from(&mut self, outer: &Correlation) {
        if self.run_id.is_none() {
            self.run_id.clone_from(&outer.run_id);
        }
        if self.stage.is_none() {
            self.stage.clone_from(&outer.stage);
        }
    }
}

/// Collects the fields of a span or an event.
#[derive(Default)]
struct FieldCollector {
    correlation: Correlation,
    message: Option<String>,
    fields: Map<String, Value>,
}

impl FieldCollector {
    fn put(&mut self, field: &Field, value: Value) {
        let text = || match &value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        match field.name() {
            "message" => self.message = Some(text()),
            "run_id" => self.correlation.run_id = Some(text()),
            "stage" => self.correlation.stage = Some(text()),
            name => {
                self.fields.insert(name.to_string(), value);
            }
        }
    }
}

impl Visit for FieldCollector {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.put(field, Value::String(format!("{:?}", value)));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, Value::from(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        // JSON has no infinities; log-masses of -inf are written as text.
        let value = serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(value.to_string()));
        self.put(field, value);
    }
}

#[derive(Serialize)]
struct Record<'a> {
    ts: String,
    level: Level,
    event: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    run_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    fields: Map<String, Value>,
}

/// Writes one JSON object per event to `W` (stderr by default).
pub struct JsonlLayer<W = io::Stderr> {
    writer: Mutex<W>,
}

impl JsonlLayer<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> JsonlLayer<W> {
    pub fn new(writer: W) -> Self {
        JsonlLayer {
            writer: Mutex::new(writer),
        }
    }

    fn write_line(&self, record: &Record<'_>) {
        let Ok(line) = serde_json::to_string(record) else {
            return;
        };
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
        }
    }
}

impl<S, W> Layer<S> for JsonlLayer<W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: Write + 'static,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut collector = FieldCollector::default();
        attrs.record(&mut collector);
        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(collector.correlation);
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut collector = FieldCollector::default();
        event.record(&mut collector);

        let mut correlation = collector.correlation;
        for span in ctx.event_scope(event).into_iter().flatten() {
            if let Some(outer) = span.extensions().get::<Correlation>() {
                correlation.fill_from(outer);
            }
        }

        let metadata = event.metadata();
        self.write_line(&Record {
            ts: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            level: Level::from(*metadata.level()),
            event: metadata.target(),
            run_id: correlation.run_id,
            stage: correlation.stage,
            message: collector.message,
            fields: collector.fields,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tracing_subscriber::layer::SubscriberExt;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn lines(f: impl FnOnce()) -> Vec<Value> {
        let buf = SharedBuf::default();
        let subscriber = tracing_subscriber::registry().with(JsonlLayer::new(buf.clone()));
        tracing::subscriber::with_default(subscriber, f);

        let bytes = buf.0.lock().unwrap();
        String::from_utf8_lossy(&bytes)
            .lines()
            .map(|l| serde_json::from_str(l).expect("valid JSON line"))
            .collect()
    }

    fn single(f: impl FnOnce()) -> Value {
        let mut all = lines(f);
        assert_eq!(all.len(), 1);
        all.remove(0)
    }

    #[test]
    fn core_fields() {
        let line = single(|| {
            tracing::info!(target: "run.started", message = "starting");
        });
        assert_eq!(line["level"], "info");
        assert_eq!(line["event"], "run.started");
        assert_eq!(line["message"], "starting");
        assert!(line["ts"].as_str().unwrap().ends_with('Z'));
        assert!(line.get("fields").is_none());
        assert!(line.get("run_id").is_none());
    }

    #[test]
    fn event_correlation_fields_are_promoted() {
        let line = single(|| {
            tracing::info!(
                target: "infer.finished",
                run_id = %"run-abc",
                stage = %"infer",
                samples = 20_000u64,
                message = "done"
            );
        });
        assert_eq!(line["run_id"], "run-abc");
        assert_eq!(line["stage"], "infer");
        assert_eq!(line["fields"]["samples"], 20_000);
        assert!(line["fields"].get("run_id").is_none());
    }

    #[test]
    fn span_fills_missing_correlation() {
        let line = single(|| {
            let span = tracing::info_span!("run", run_id = "run-span", stage = "load");
            let _guard = span.enter();
            tracing::warn!(target: "config.default_used", stage = "infer", message = "defaults");
        });
        assert_eq!(line["run_id"], "run-span");
        assert_eq!(line["stage"], "infer");
        assert_eq!(line["level"], "warn");
    }

    #[test]
    fn typed_and_non_finite_values() {
        let line = single(|| {
            tracing::debug!(target: "test", log_mass = f64::NEG_INFINITY, ratio = 0.5, ok = true, delta = -3i64);
        });
        assert_eq!(line["fields"]["log_mass"], "-inf");
        assert_eq!(line["fields"]["ratio"], 0.5);
        assert_eq!(line["fields"]["ok"], true);
        assert_eq!(line["fields"]["delta"], -3);
    }

    #[test]
    fn one_line_per_event() {
        let all = lines(|| {
            tracing::info!(target: "a", message = "one");
            tracing::info!(target: "b", message = "two");
        });
        let events: Vec<&str> = all.iter().filter_map(|l| l["event"].as_str()).collect();
        assert_eq!(events, ["a", "b"]);
    }
}

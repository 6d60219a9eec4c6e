#![forbid(unsafe_code)]

//! Tracing capture layer.
//!
//! ```ignore
//! let capture = TraceCapture::new();
//! let _guard = capture.install();
//! list.handle_drop(raw);
//! assert!(capture.saw("sortable.drop"));
//! ```

use std::sync::{Arc, Mutex};

use tracing::Subscriber;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

/// One captured event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedEvent {
    pub level: tracing::Level,
    pub message: String,
    pub span: Option<String>,
}

/// Collects the `message` field of every event plus the names of new spans.
#[derive(Debug, Clone, Default)]
pub struct TraceCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
    spans: Arc<Mutex<Vec<String>>>,
}

impl TraceCapture {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install as the thread-default subscriber until the guard drops.
    #[must_use]
    pub fn install(&self) -> DefaultGuard {
        let subscriber = tracing_subscriber::registry().with(self.clone());
        let guard = tracing::subscriber::set_default(subscriber);
        tracing::callsite::rebuild_interest_cache();
        guard
    }

    #[must_use]
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().expect("trace capture lock").clone()
    }

    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.message).collect()
    }

    #[must_use]
    pub fn spans(&self) -> Vec<String> {
        self.spans.lock().expect("trace capture lock").clone()
    }

    /// Whether an event with this message was captured.
    #[must_use]
    pub fn saw(&self, message: &str) -> bool {
        self.events().iter().any(|e| e.message == message)
    }

    #[must_use]
    pub fn count(&self, message: &str) -> usize {
        self.events().iter().filter(|e| e.message == message).count()
    }
}

impl<S> Layer<S> for TraceCapture
where
    S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::Id,
        _ctx: Context<'_, S>,
    ) {
        self.spans
            .lock()
            .expect("trace capture lock")
            .push(attrs.metadata().name().to_string());
    }

    fn on_event(&self, event: &tracing::Event<'_>, ctx: Context<'_, S>) {
        struct Msg {
            message: Option<String>,
        }
        impl tracing::field::Visit for Msg {
            fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
                if field.name() == "message" {
                    self.message = Some(value.to_string());
                }
            }

            fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                if field.name() == "message" {
                    self.message = Some(format!("{value:?}").trim_matches('"').to_string());
                }
            }
        }

        let mut msg = Msg { message: None };
        event.record(&mut msg);
        let Some(message) = msg.message else {
            return;
        };
        let span = ctx
            .event_span(event)
            .map(|span| span.metadata().name().to_string());
        self.events
            .lock()
            .expect("trace capture lock")
            .push(CapturedEvent {
                level: *event.metadata().level(),
                message,
                span,
            });
    }
}

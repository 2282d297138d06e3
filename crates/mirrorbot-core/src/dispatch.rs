//! Dual-target log dispatcher.
//!
//! Every log call feeds two independent targets: the local console (always
//! available) and an optional remote chat channel. The remote sink is usually
//! installed only once the chat connection is up, at which point subsequent
//! calls get mirrored; earlier local-only logs are not delivered
//! retroactively.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, RwLock,
};

use crate::card::{Card, CardAuthor, ErrorDetails};
use crate::console::{self, ConsoleSink};
use crate::grouping::{group_segments, MAX_CARDS_PER_GROUP};
use crate::level::LogLevel;
use crate::messaging::{LogChannel, OutgoingMessage, RemoteSink};
use crate::segment::{format_value, format_values, LogSegment, LogValue};
use crate::Result;

/// Per-call dispatch options.
#[derive(Clone, Debug)]
pub struct DispatchOptions {
    pub to_local: bool,
    pub to_remote: bool,
    /// Bypass grouping; send each value as its own pre-built payload.
    pub raw: bool,
    /// Database query log: quoted and padded in the local stream only.
    pub query: bool,
    /// Attribution for the calling command, stamped on every card sent
    /// remotely for this call.
    pub caller: Option<CardAuthor>,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            to_local: true,
            to_remote: true,
            raw: false,
            query: false,
            caller: None,
        }
    }
}

impl DispatchOptions {
    pub fn local_only() -> Self {
        Self {
            to_remote: false,
            ..Self::default()
        }
    }

    pub fn remote_only() -> Self {
        Self {
            to_local: false,
            ..Self::default()
        }
    }

    pub fn raw() -> Self {
        Self {
            raw: true,
            ..Self::default()
        }
    }

    pub fn query() -> Self {
        Self {
            to_remote: false,
            query: true,
            ..Self::default()
        }
    }

    /// Attributes the call to a named caller (e.g. the command doing the
    /// logging).
    pub fn with_caller(mut self, name: &str, icon_url: Option<&str>) -> Self {
        self.caller = Some(CardAuthor {
            name: name.to_string(),
            icon_url: icon_url.map(str::to_string),
        });
        self
    }
}

/// The logger capability: formatting plus dual-target dispatch.
///
/// Takes its sinks as injection arguments. The remote sink is process-wide
/// and read-mostly: it is installed once during startup (typically when the
/// channel connection is established) and only read afterwards.
pub struct Logger {
    console: Box<dyn ConsoleSink>,
    remote: RwLock<Option<Arc<dyn RemoteSink>>>,
    active: AtomicBool,
    /// A logger restricted to local output ignores any installed remote sink.
    only_local: bool,
    /// Whether the previous local log was a query, for padding transitions.
    last_was_query: Mutex<bool>,
}

impl Logger {
    pub fn new(console: Box<dyn ConsoleSink>) -> Self {
        Self {
            console,
            remote: RwLock::new(None),
            active: AtomicBool::new(true),
            only_local: false,
            last_was_query: Mutex::new(false),
        }
    }

    /// A logger that never mirrors remotely, even after a sink is installed.
    pub fn local_only(console: Box<dyn ConsoleSink>) -> Self {
        Self {
            only_local: true,
            ..Self::new(console)
        }
    }

    pub fn set_remote_sink(&self, sink: Arc<dyn RemoteSink>) {
        *self.remote.write().expect("remote sink lock poisoned") = Some(sink);
    }

    /// Makes all subsequent calls no-ops until [`Logger::activate`].
    pub fn deactivate(&self) {
        self.active.store(false, Ordering::SeqCst);
    }

    pub fn activate(&self) {
        self.active.store(true, Ordering::SeqCst);
    }

    /// Dispatches one log call to the configured targets.
    ///
    /// Local output is written first so a remote transport failure never
    /// loses the local copy; the failure then propagates to the caller, who
    /// decides whether a missed remote log matters.
    pub async fn dispatch(
        &self,
        level: LogLevel,
        values: &[LogValue],
        opts: DispatchOptions,
    ) -> Result<()> {
        if !self.active.load(Ordering::SeqCst) {
            return Ok(());
        }

        if opts.to_local {
            let rendered = console::render_values(values);
            let text = self.apply_local_style(level, rendered, opts.query);
            self.console.write(level, &text);
        }

        if opts.to_remote && !self.only_local {
            let sink = self.remote.read().expect("remote sink lock poisoned").clone();
            if let Some(sink) = sink {
                let channel = if level.routes_to_error_channel() {
                    LogChannel::Errors
                } else {
                    LogChannel::Log
                };
                let attribute = |message: OutgoingMessage| match &opts.caller {
                    Some(caller) => message.with_default_author(caller),
                    None => message,
                };
                if opts.raw {
                    for value in values {
                        sink.send(channel, attribute(raw_payload(value, level))).await?;
                    }
                } else {
                    let segments = format_values(values, level);
                    // Groups go out one at a time to keep their order in the
                    // channel.
                    for group in group_segments(&segments, level, MAX_CARDS_PER_GROUP) {
                        sink.send(channel, attribute(OutgoingMessage::from(group))).await?;
                    }
                }
            }
        }

        Ok(())
    }

    fn apply_local_style(&self, level: LogLevel, rendered: String, is_query: bool) -> String {
        let mut text = if is_query {
            console::add_quotes(&rendered)
        } else {
            rendered
        };

        let transition = {
            let mut last = self.last_was_query.lock().expect("query state lock poisoned");
            let t = *last != is_query;
            *last = is_query;
            t
        };
        // Pad the edges of a query run so queries stand apart in the stream.
        if transition && is_query {
            text = format!("\n{}\n{text}", console::quoted_blank());
        } else if transition {
            text = format!("{}\n\n{text}", console::quoted_blank());
        }

        console::add_timestamps(&console::colorize(level, &text))
    }

    // Convenience wrappers mirroring the common call shapes.

    pub async fn log(&self, values: &[LogValue]) -> Result<()> {
        self.dispatch(LogLevel::Regular, values, DispatchOptions::default())
            .await
    }

    pub async fn info(&self, values: &[LogValue]) -> Result<()> {
        self.dispatch(LogLevel::Info, values, DispatchOptions::default())
            .await
    }

    pub async fn warn(&self, values: &[LogValue]) -> Result<()> {
        self.dispatch(LogLevel::Warn, values, DispatchOptions::default())
            .await
    }

    pub async fn error(&self, values: &[LogValue]) -> Result<()> {
        self.dispatch(LogLevel::Error, values, DispatchOptions::default())
            .await
    }

    /// Logs only locally.
    pub async fn local(&self, level: LogLevel, values: &[LogValue]) -> Result<()> {
        self.dispatch(level, values, DispatchOptions::local_only())
            .await
    }

    /// Logs only remotely.
    pub async fn remote(&self, level: LogLevel, values: &[LogValue]) -> Result<()> {
        self.dispatch(level, values, DispatchOptions::remote_only())
            .await
    }

    /// Sends pre-built payloads to the channel verbatim.
    pub async fn remote_raw(&self, level: LogLevel, values: &[LogValue]) -> Result<()> {
        let opts = DispatchOptions {
            to_local: false,
            ..DispatchOptions::raw()
        };
        self.dispatch(level, values, opts).await
    }

    /// Logs a database query to the local stream, quoted and padded.
    pub async fn local_query(&self, query: &str) -> Result<()> {
        self.dispatch(
            LogLevel::Regular,
            &[LogValue::Text(query.to_string())],
            DispatchOptions::query(),
        )
        .await
    }

    /// Logs an error as a single raw error card, locally and remotely.
    pub async fn error_object(&self, details: &ErrorDetails) -> Result<()> {
        let card = Card::for_error(details, "An error has occurred")
            .with_color(LogLevel::Error.color());
        self.dispatch(
            LogLevel::Error,
            &[LogValue::Card(card)],
            DispatchOptions::raw(),
        )
        .await
    }
}

/// Raw mode payload: the value as its own message, untouched except for the
/// default accent color on colorless cards.
fn raw_payload(value: &LogValue, level: LogLevel) -> OutgoingMessage {
    let message = match value {
        LogValue::Text(s) => OutgoingMessage::from_text(s.clone()),
        LogValue::Card(card) => OutgoingMessage::from_card(card.clone()),
        other => match format_value(other, LogLevel::Regular) {
            LogSegment::Text(s) => OutgoingMessage::from_text(s),
            LogSegment::Card(card) => OutgoingMessage::from_card(card),
        },
    };
    message.with_default_color(level.color())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::strip_ansi;
    use crate::Error;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Capture {
        lines: Mutex<Vec<(LogLevel, String)>>,
    }

    impl ConsoleSink for Arc<Capture> {
        fn write(&self, level: LogLevel, text: &str) {
            self.lines
                .lock()
                .unwrap()
                .push((level, strip_ansi(text)));
        }
    }

    fn capture_console() -> (Arc<Capture>, Box<dyn ConsoleSink>) {
        let capture = Arc::new(Capture::default());
        (capture.clone(), Box::new(capture))
    }

    #[derive(Default)]
    struct FakeSink {
        sent: Mutex<Vec<(LogChannel, OutgoingMessage)>>,
        fail: bool,
    }

    #[async_trait]
    impl RemoteSink for FakeSink {
        async fn send(
            &self,
            channel: LogChannel,
            message: OutgoingMessage,
        ) -> Result<crate::messaging::RemoteMessageId> {
            if self.fail {
                return Err(Error::Remote("connect ETIMEDOUT".to_string()));
            }
            let mut sent = self.sent.lock().unwrap();
            sent.push((channel, message));
            Ok(crate::messaging::RemoteMessageId::new(format!(
                "m{}",
                sent.len()
            )))
        }

        async fn edit(
            &self,
            _channel: LogChannel,
            _id: &crate::messaging::RemoteMessageId,
            _message: OutgoingMessage,
        ) -> Result<()> {
            Ok(())
        }
    }

    fn logger_with_sink(fail: bool) -> (Logger, Arc<FakeSink>) {
        let (_capture, console) = capture_console();
        let logger = Logger::new(console);
        let sink = Arc::new(FakeSink {
            fail,
            ..FakeSink::default()
        });
        logger.set_remote_sink(sink.clone());
        (logger, sink)
    }

    #[tokio::test]
    async fn deactivated_logger_is_a_noop() {
        let (logger, sink) = logger_with_sink(false);
        logger.deactivate();
        logger.log(&["ignored".into()]).await.unwrap();
        assert!(sink.sent.lock().unwrap().is_empty());

        logger.activate();
        logger.log(&["seen".into()]).await.unwrap();
        assert_eq!(sink.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn grouped_dispatch_sends_groups_in_order() {
        let (logger, sink) = logger_with_sink(false);
        let values: Vec<LogValue> = vec![
            "a".into(),
            Card::new().with_title("1").into(),
            Card::new().with_title("2").into(),
            "b".into(),
        ];
        logger.log(&values).await.unwrap();

        let sent = sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].1.content.as_deref(), Some("a"));
        assert_eq!(sent[0].1.cards.len(), 2);
        assert_eq!(sent[1].1.content.as_deref(), Some("b"));
        assert!(sent[1].1.cards.is_empty());
        assert!(sent.iter().all(|(ch, _)| *ch == LogChannel::Log));
    }

    #[tokio::test]
    async fn error_level_routes_to_error_channel() {
        let (logger, sink) = logger_with_sink(false);
        logger.error(&["boom".into()]).await.unwrap();

        let sent = sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, LogChannel::Errors);
        // Error level forces text into a card.
        assert!(sent[0].1.content.is_none());
        assert_eq!(sent[0].1.cards.len(), 1);
    }

    #[tokio::test]
    async fn raw_mode_sends_each_value_with_default_color() {
        let (logger, sink) = logger_with_sink(false);
        let values: Vec<LogValue> = vec![
            Card::new().with_title("plain").into(),
            "text payload".into(),
        ];
        logger.remote_raw(LogLevel::Info, &values).await.unwrap();

        let sent = sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].1.cards[0].color, Some(LogLevel::Info.color()));
        assert_eq!(sent[1].1.content.as_deref(), Some("text payload"));
    }

    #[tokio::test]
    async fn caller_attribution_lands_on_remote_cards() {
        let (logger, sink) = logger_with_sink(false);
        let opts =
            DispatchOptions::default().with_caller("ping", Some("https://example.com/i.png"));
        let values: Vec<LogValue> = vec![
            "running".into(),
            Card::new().with_title("result").into(),
        ];
        logger.dispatch(LogLevel::Info, &values, opts).await.unwrap();

        let sent = sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1.cards.len(), 2);
        for card in &sent[0].1.cards {
            let author = card.author.as_ref().unwrap();
            assert_eq!(author.name, "ping");
            assert!(author.icon_url.is_some());
        }
    }

    #[tokio::test]
    async fn local_only_logger_never_mirrors() {
        let (_capture, console) = capture_console();
        let logger = Logger::local_only(console);
        let sink = Arc::new(FakeSink::default());
        logger.set_remote_sink(sink.clone());

        logger.log(&["kept local".into()]).await.unwrap();
        assert!(sink.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn sink_installation_is_not_retroactive() {
        let (_capture, console) = capture_console();
        let logger = Logger::new(console);
        logger.log(&["before".into()]).await.unwrap();

        let sink = Arc::new(FakeSink::default());
        logger.set_remote_sink(sink.clone());
        logger.log(&["after".into()]).await.unwrap();

        let sent = sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].1.content.as_deref(), Some("after"));
    }

    #[tokio::test]
    async fn remote_failure_propagates() {
        let (logger, _sink) = logger_with_sink(true);
        let err = logger.log(&["lost".into()]).await.unwrap_err();
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn error_object_sends_one_raw_card() {
        let (logger, sink) = logger_with_sink(false);
        let details = ErrorDetails::from_message("boom");
        logger.error_object(&details).await.unwrap();

        let sent = sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, LogChannel::Errors);
        let card = &sent[0].1.cards[0];
        assert_eq!(card.title.as_deref(), Some("An error has occurred"));
        assert_eq!(card.color, Some(LogLevel::Error.color()));
    }

    #[tokio::test]
    async fn query_logs_stay_local_and_get_quoted() {
        let (capture, console) = capture_console();
        let logger = Logger::new(console);
        let sink = Arc::new(FakeSink::default());
        logger.set_remote_sink(sink.clone());

        logger.local_query("select 1;").await.unwrap();
        logger.log(&["normal".into()]).await.unwrap();

        assert!(sink.sent.lock().unwrap().iter().all(|(_, m)| m
            .content
            .as_deref()
            != Some("select 1;")));

        let lines = capture.lines.lock().unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].1.contains("> select 1;"));
        // The first non-query line after a query run gets padding.
        assert!(lines[1].1.contains('\n'));
        assert!(lines[1].1.contains("normal"));
    }
}

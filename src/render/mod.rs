//! HTML rendering of a conversation, following the embeddable widget's contract.
//!
//! Content is escaped here, at render time; the conversation itself always
//! holds the raw text.

use std::fmt::Write as _;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::conversation::{Message, Role};
use crate::exchange::{ExchangeEvent, ExchangeObserver};

const TYPING_INDICATOR: &str =
    r#"<li class="charla-typing" aria-live="polite">Escribiendo…</li>"#;

/// Escapes text for safe inclusion in HTML element content or attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders one message as a list item tagged with its role.
pub fn render_message(message: &Message) -> String {
    let role = message.role();
    format!(
        r#"<li class="charla-msg charla-{role}" data-role="{role}"><span class="charla-speaker">{}</span> {}</li>"#,
        speaker_label(role),
        escape_html(message.content()).replace('\n', "<br>")
    )
}

const fn speaker_label(role: Role) -> &'static str {
    match role {
        Role::System => "Sistema",
        Role::User => "Tú",
        Role::Assistant => "Asistente",
    }
}

#[derive(Debug, Default)]
struct TranscriptState {
    items: Vec<String>,
    typing: bool,
}

/// Live HTML view of a session, fed by coordinator events.
///
/// Mirrors what the widget shows: every appended message in order, plus a
/// typing indicator while a reply is pending.
#[derive(Debug, Default)]
pub struct HtmlTranscript {
    state: Mutex<TranscriptState>,
}

impl HtmlTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from messages that were in the conversation before subscribing.
    pub fn with_history(messages: &[Message]) -> Self {
        Self {
            state: Mutex::new(TranscriptState {
                items: messages.iter().map(render_message).collect(),
                typing: false,
            }),
        }
    }

    /// Returns `true` while the typing indicator is displayed.
    pub fn is_typing(&self) -> bool {
        self.lock().typing
    }

    /// Number of rendered messages.
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Renders the message list (`<ol>`), including the indicator if shown.
    pub fn render_list(&self) -> String {
        let state = self.lock();
        let mut html = String::from("<ol class=\"charla-messages\">\n");
        for item in &state.items {
            let _ = writeln!(html, "  {item}");
        }
        if state.typing {
            let _ = writeln!(html, "  {TYPING_INDICATOR}");
        }
        html.push_str("</ol>\n");
        html
    }

    /// Renders a standalone HTML document with the given title.
    pub fn render_document(&self, title: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html lang=\"es\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
            escape_html(title),
            self.render_list()
        )
    }

    fn lock(&self) -> MutexGuard<'_, TranscriptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ExchangeObserver for HtmlTranscript {
    fn on_event(&self, event: &ExchangeEvent) {
        let mut state = self.lock();
        match event {
            ExchangeEvent::MessageAppended(message) => {
                state.items.push(render_message(message));
            }
            ExchangeEvent::Pending => state.typing = true,
            ExchangeEvent::Settled => state.typing = false,
        }
    }
}

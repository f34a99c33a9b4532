//! User facing notifications.

use std::io::{self, Write};
use yansi::Paint;

/// Severity of a notification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NotificationLevel {
    #[default]
    Info,
    Error,
}

/// Sink for user facing messages.
///
/// Messages may carry `<br>` line breaks and `<a>` links, sinks that can't render markup should
/// degrade them to plain text.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, level: NotificationLevel);

    fn info(&self, message: &str) {
        self.notify(message, NotificationLevel::Info)
    }

    fn error(&self, message: &str) {
        self.notify(message, NotificationLevel::Error)
    }
}

/// Prints notifications to the terminal, errors to stderr in red.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShellNotifier;

impl Notifier for ShellNotifier {
    fn notify(&self, message: &str, level: NotificationLevel) {
        let text = to_plain_text(message);
        // a closed pipe shouldn't abort the deployment
        let _ = match level {
            NotificationLevel::Info => writeln!(io::stdout().lock(), "{text}"),
            NotificationLevel::Error => writeln!(io::stderr().lock(), "{}", text.red()),
        };
    }
}

/// Routes notifications to the `tracing` subscriber instead of the terminal.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, level: NotificationLevel) {
        let text = to_plain_text(message);
        match level {
            NotificationLevel::Info => info!(target: "reef::notify", "{text}"),
            NotificationLevel::Error => error!(target: "reef::notify", "{text}"),
        }
    }
}

/// Turns notification markup into terminal text.
///
/// `<br>` becomes a line break and `<a href=URL ...>label</a>` becomes `label: URL`.
pub fn to_plain_text(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    let mut rest = message;
    while let Some(start) = rest.find("<a ") {
        out.push_str(&rest[..start]);
        let Some(end) = rest[start..].find("</a>").map(|end| start + end) else {
            rest = &rest[start..];
            break;
        };
        let anchor = &rest[start..end];
        let (attrs, label) = anchor.split_once('>').unwrap_or((anchor, ""));
        match href(attrs) {
            Some(href) if label.is_empty() => out.push_str(href),
            Some(href) => {
                out.push_str(label);
                out.push_str(": ");
                out.push_str(href);
            }
            None => out.push_str(label),
        }
        rest = &rest[end + "</a>".len()..];
    }
    out.push_str(rest);
    out.split("<br>").map(str::trim).collect::<Vec<_>>().join("\n")
}

fn href(attrs: &str) -> Option<&str> {
    let value = attrs.split_once("href=")?.1;
    let value = match value.strip_prefix('"') {
        Some(quoted) => quoted.split('"').next()?,
        None => value.split_whitespace().next()?,
    };
    Some(value)
}

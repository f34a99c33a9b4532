//! Commonly used errors

mod fs;
pub use fs::FsPathError;

use std::{error::Error, iter};

/// Renders `error` and its sources on a single line, separated by `; `.
///
/// This is the text of the failure notification, so `failed to deploy Flipper: reverted` wrapping
/// `reverted` is shown once.
pub fn display_chain(error: &(dyn Error + 'static)) -> String {
    dedup_chain(error).join("; ")
}

/// Returns the messages of `error` and its sources, outermost first.
///
/// A source whose message is already part of the message before it is dropped.
pub fn dedup_chain(error: &(dyn Error + 'static)) -> Vec<String> {
    iter::successors(Some(error), |&err| err.source()).map(|err| err.to_string()).fold(
        Vec::new(),
        |mut messages, message| {
            let message = message.trim();
            if !messages.last().is_some_and(|last: &String| last.contains(message)) {
                messages.push(message.to_string());
            }
            messages
        },
    )
}

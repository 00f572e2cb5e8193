//! Feedback intake: values pushed into the dashboard from outside
//!
//! Producers (a battery poller, a weather fetcher, a notification source)
//! may run on other threads or interrupt contexts. They enqueue [`Feedback`]
//! into a [`FeedbackChannel`] with [`push_feedback`]; the dashboard drains
//! it on the UI loop. A full channel drops the newest event with a warning.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use heapless::String;
use log::warn;

use crate::widgets::bounded;
use crate::widgets::notification::{NOTIFICATION_BODY_LEN, NOTIFICATION_TITLE_LEN};
use crate::widgets::quote::QUOTE_LEN;
use crate::widgets::weather::{WEATHER_CONDITION_LEN, WEATHER_ICON_LEN};

/// Channel capacity for pending feedback events
pub const FEEDBACK_CAPACITY: usize = 8;

/// A value update for one of the feedback widgets
#[derive(Debug, Clone, PartialEq)]
pub enum Feedback {
    /// Battery level in percent (clamped by the widget) and charging state
    Battery { level: i32, charging: bool },
    Weather {
        icon: String<WEATHER_ICON_LEN>,
        temperature: i32,
        condition: String<WEATHER_CONDITION_LEN>,
    },
    Quote(String<QUOTE_LEN>),
    Notification {
        title: String<NOTIFICATION_TITLE_LEN>,
        body: String<NOTIFICATION_BODY_LEN>,
    },
}

impl Feedback {
    pub fn battery(level: i32, charging: bool) -> Self {
        Self::Battery { level, charging }
    }

    /// Texts longer than their widget's capacity are truncated
    pub fn weather(icon: &str, temperature: i32, condition: &str) -> Self {
        Self::Weather {
            icon: bounded(icon),
            temperature,
            condition: bounded(condition),
        }
    }

    pub fn quote(text: &str) -> Self {
        Self::Quote(bounded(text))
    }

    pub fn notification(title: &str, body: &str) -> Self {
        Self::Notification {
            title: bounded(title),
            body: bounded(body),
        }
    }
}

pub type FeedbackChannel = Channel<CriticalSectionRawMutex, Feedback, FEEDBACK_CAPACITY>;

/// Global channel for feedback pushed by background producers
pub static FEEDBACK_CHANNEL: FeedbackChannel = Channel::new();

/// Enqueue `feedback` without blocking. Returns `false` when it was dropped.
pub fn push_feedback(channel: &FeedbackChannel, feedback: Feedback) -> bool {
    match channel.try_send(feedback) {
        Ok(()) => true,
        Err(_) => {
            warn!("Feedback channel full, dropping update");
            false
        }
    }
}

//! Timed text display: cycles static lines and plays streamed responses sentence by sentence.
//!
//! A response is fed as [`StreamEvent`]s. Text is buffered until a sentence is
//! complete; the display only returns to the static lines after an explicit
//! [`StreamEvent::End`] (or `Failed`) and once every queued sentence has faded out.

use crate::constants::*;
use std::collections::VecDeque;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamEvent {
    Chunk(String),
    End,
    /// The request failed; the message replaces whatever is still buffered.
    Failed(String),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickerFrame<'a> {
    pub text: &'a str,
    pub opacity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Gap,
    FadeIn,
    Hold,
    FadeOut,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickerMode {
    Cycle,
    Response,
}

#[derive(Clone, Debug)]
pub struct TickerTimings {
    pub fade_sec: f32,
    pub hold_sec: f32,
    pub gap_sec: f32,
    pub response_hold_min_sec: f32,
    pub response_hold_max_sec: f32,
    pub response_hold_per_char_sec: f32,
}

impl Default for TickerTimings {
    fn default() -> Self {
        Self {
            fade_sec: TICKER_FADE_SEC,
            hold_sec: TICKER_HOLD_SEC,
            gap_sec: TICKER_GAP_SEC,
            response_hold_min_sec: RESPONSE_HOLD_MIN_SEC,
            response_hold_max_sec: RESPONSE_HOLD_MAX_SEC,
            response_hold_per_char_sec: RESPONSE_HOLD_PER_CHAR_SEC,
        }
    }
}

pub struct TextTicker {
    pub timings: TickerTimings,
    lines: Vec<String>,
    next_line: usize,
    mode: TickerMode,
    phase: Phase,
    elapsed: f32,
    current: Option<String>,
    queue: VecDeque<String>,
    pending: String,
    stream_ended: bool,
}

impl TextTicker {
    pub fn new(lines: Vec<String>, timings: TickerTimings) -> Self {
        Self {
            timings,
            lines,
            next_line: 0,
            mode: TickerMode::Cycle,
            phase: Phase::Gap,
            elapsed: 0.0,
            current: None,
            queue: VecDeque::new(),
            pending: String::new(),
            stream_ended: false,
        }
    }

    pub fn mode(&self) -> TickerMode {
        self.mode
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Switch to response mode, fading out whatever is on screen.
    pub fn begin_response(&mut self) {
        self.mode = TickerMode::Response;
        self.queue.clear();
        self.pending.clear();
        self.stream_ended = false;
        if matches!(self.phase, Phase::FadeIn | Phase::Hold) {
            let opacity = self.opacity();
            self.phase = Phase::FadeOut;
            self.elapsed = (1.0 - opacity) * self.timings.fade_sec;
        }
    }

    pub fn apply(&mut self, event: StreamEvent) {
        if self.mode != TickerMode::Response {
            log::warn!("[ticker] stream event outside of a response: {:?}", event);
            return;
        }
        match event {
            StreamEvent::Chunk(text) => {
                self.pending.push_str(&text);
                self.drain_sentences(false);
            }
            StreamEvent::End => {
                self.drain_sentences(true);
                self.stream_ended = true;
            }
            StreamEvent::Failed(message) => {
                self.pending.clear();
                self.queue.push_back(message);
                self.stream_ended = true;
            }
        }
    }

    /// One-sentence response, e.g. a rate-limit or failure notice.
    pub fn show_message(&mut self, message: &str) {
        self.begin_response();
        self.apply(StreamEvent::Chunk(message.to_string()));
        self.apply(StreamEvent::End);
    }

    fn drain_sentences(&mut self, flush: bool) {
        while let Some(end) = sentence_end(&self.pending) {
            let rest = self.pending.split_off(end);
            let sentence = std::mem::replace(&mut self.pending, rest);
            let sentence = sentence.trim();
            if !sentence.is_empty() {
                self.queue.push_back(sentence.to_string());
            }
        }
        if flush {
            let tail = std::mem::take(&mut self.pending);
            let tail = tail.trim();
            if !tail.is_empty() {
                self.queue.push_back(tail.to_string());
            }
        }
    }

    fn hold_for(&self, text: &str) -> f32 {
        match self.mode {
            TickerMode::Cycle => self.timings.hold_sec,
            TickerMode::Response => (text.chars().count() as f32
                * self.timings.response_hold_per_char_sec)
                .clamp(
                    self.timings.response_hold_min_sec,
                    self.timings.response_hold_max_sec,
                ),
        }
    }

    fn next_text(&mut self) -> Option<String> {
        if self.mode == TickerMode::Response {
            if let Some(sentence) = self.queue.pop_front() {
                return Some(sentence);
            }
            if !self.stream_ended {
                return None;
            }
            log::info!("[ticker] response finished");
            self.mode = TickerMode::Cycle;
        }
        if self.lines.is_empty() {
            return None;
        }
        let line = self.lines[self.next_line % self.lines.len()].clone();
        self.next_line = (self.next_line + 1) % self.lines.len();
        Some(line)
    }

    pub fn tick(&mut self, dt_sec: f32) {
        self.elapsed += dt_sec.max(0.0);
        // a long frame may cross several phase boundaries
        for _ in 0..4 {
            let duration = match self.phase {
                Phase::Gap => self.timings.gap_sec,
                Phase::FadeIn | Phase::FadeOut => self.timings.fade_sec,
                Phase::Hold => self
                    .current
                    .as_deref()
                    .map_or(0.0, |t| self.hold_for(t)),
            };
            if self.elapsed < duration {
                return;
            }
            match self.phase {
                Phase::Gap => match self.next_text() {
                    Some(text) => {
                        self.current = Some(text);
                        self.phase = Phase::FadeIn;
                    }
                    None => {
                        self.elapsed = duration;
                        return;
                    }
                },
                Phase::FadeIn => self.phase = Phase::Hold,
                Phase::Hold => self.phase = Phase::FadeOut,
                Phase::FadeOut => {
                    self.current = None;
                    self.phase = Phase::Gap;
                }
            }
            self.elapsed -= duration;
        }
    }

    fn opacity(&self) -> f32 {
        let fade = self.timings.fade_sec.max(1e-3);
        match self.phase {
            Phase::Gap => 0.0,
            Phase::FadeIn => (self.elapsed / fade).clamp(0.0, 1.0),
            Phase::Hold => 1.0,
            Phase::FadeOut => (1.0 - self.elapsed / fade).clamp(0.0, 1.0),
        }
    }

    pub fn frame(&self) -> Option<TickerFrame<'_>> {
        self.current.as_deref().map(|text| TickerFrame {
            text,
            opacity: self.opacity(),
        })
    }
}

fn is_terminator(c: char) -> bool {
    matches!(c, '。' | '！' | '？' | '!' | '?' | '.' | '\n' | '…')
}

fn is_closer(c: char) -> bool {
    matches!(c, '」' | '』' | '”' | '"' | ')' | '）' | '’')
}

/// Byte index just past the first complete sentence, if any.
///
/// A `.` only ends a sentence when followed by whitespace, so decimals and
/// abbreviations at a chunk boundary wait for more text.
fn sentence_end(text: &str) -> Option<usize> {
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !is_terminator(c) {
            continue;
        }
        let mut end = i + c.len_utf8();
        while let Some(&(j, n)) = chars.peek() {
            if is_terminator(n) || is_closer(n) {
                end = j + n.len_utf8();
                chars.next();
            } else {
                break;
            }
        }
        if c == '.' {
            match text[end..].chars().next() {
                Some(n) if n.is_whitespace() => return Some(end),
                _ => continue,
            }
        }
        return Some(end);
    }
    None
}

//! Oracle round-trip support that does not need a browser: wire types, failure
//! classification, streamed UTF-8 reassembly and the client-side daily limiter.

use crate::constants::*;
use crate::error::{Result, SceneError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OracleRequest {
    pub question: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OracleAnswer {
    pub answer: String,
}

impl OracleAnswer {
    /// Batch responses are `{"answer": …}`; anything else is taken as plain text.
    pub fn text_from_body(body: &str) -> String {
        match serde_json::from_str::<OracleAnswer>(body) {
            Ok(parsed) => parsed.answer,
            Err(_) => body.to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OracleErrorBody {
    pub error: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OracleFailure {
    Timeout,
    Auth,
    Connectivity,
    Overloaded,
    Unknown,
}

impl OracleFailure {
    /// Sniff an error description (status line, exception text or error body).
    pub fn classify(text: &str) -> Self {
        let lower = text.to_lowercase();
        let has = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));
        if has(&["504", "timed out", "timeout"]) {
            OracleFailure::Timeout
        } else if has(&["403", "api key"]) {
            OracleFailure::Auth
        } else if has(&["failed to fetch", "networkerror"]) {
            OracleFailure::Connectivity
        } else if has(&["429", "503", "quota", "overloaded"]) {
            OracleFailure::Overloaded
        } else {
            OracleFailure::Unknown
        }
    }

    /// Classify a non-2xx response; the body is read as [`OracleErrorBody`] when it parses.
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<OracleErrorBody>(body)
            .map(|b| b.error)
            .unwrap_or_else(|_| body.to_string());
        Self::classify(&format!("{status} {detail}"))
    }

    /// Message shown in the ticker.
    pub fn message(self) -> &'static str {
        match self {
            OracleFailure::Timeout => "【天机迟滞】推演超时，请稍后再问。",
            OracleFailure::Auth => "【门禁未启】密钥失效，天机暂不可问。",
            OracleFailure::Connectivity => "【系统干扰】信号连接失败，请检查网络。",
            OracleFailure::Overloaded => "【天机拥堵】当前求签人数过多，请稍候再试。",
            OracleFailure::Unknown => "【卦象混沌】天机演算失败，请稍后再试。",
        }
    }
}

impl From<OracleFailure> for SceneError {
    fn from(failure: OracleFailure) -> Self {
        SceneError::Oracle(failure)
    }
}

pub const RATE_LIMIT_MESSAGE: &str = "【今日缘尽】今日问卦次数已满，明日再来。";
pub const EMPTY_QUESTION_MESSAGE: &str = "心中所问，先书于签上。";

/// Reassembles text from byte chunks split at arbitrary positions.
///
/// Incomplete trailing sequences are kept for the next chunk; invalid bytes
/// become U+FFFD.
#[derive(Clone, Debug, Default)]
pub struct Utf8ChunkDecoder {
    pending: Vec<u8>,
}

impl Utf8ChunkDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let mut out = String::new();
        let mut start = 0;
        loop {
            match std::str::from_utf8(&self.pending[start..]) {
                Ok(valid) => {
                    out.push_str(valid);
                    start = self.pending.len();
                    break;
                }
                Err(e) => {
                    let valid_end = start + e.valid_up_to();
                    // valid_up_to guarantees this slice is UTF-8
                    out.push_str(&String::from_utf8_lossy(&self.pending[start..valid_end]));
                    match e.error_len() {
                        Some(bad) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            start = valid_end + bad;
                        }
                        None => {
                            start = valid_end;
                            break;
                        }
                    }
                }
            }
        }
        self.pending.drain(..start);
        out
    }

    /// End of stream; a dangling partial sequence becomes one U+FFFD.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            return String::new();
        }
        self.pending.clear();
        char::REPLACEMENT_CHARACTER.to_string()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyUsage {
    pub date: NaiveDate,
    pub count: u32,
}

#[derive(Clone, Debug)]
pub struct OracleConfig {
    pub endpoint: String,
    pub timeout_ms: u32,
    pub daily_cap: u32,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ORACLE_ENDPOINT.to_string(),
            timeout_ms: ORACLE_TIMEOUT_MS,
            daily_cap: DAILY_REQUEST_CAP,
        }
    }
}

/// Client-side cap of successful requests per calendar day.
#[derive(Clone, Debug)]
pub struct UsageLimiter {
    cap: u32,
    usage: Option<DailyUsage>,
}

impl UsageLimiter {
    pub fn new(cap: u32) -> Self {
        Self { cap, usage: None }
    }

    /// Restore from persisted JSON; unreadable data starts a fresh count.
    pub fn restore(cap: u32, stored: Option<&str>) -> Self {
        let usage = stored.and_then(|json| match serde_json::from_str::<DailyUsage>(json) {
            Ok(usage) => Some(usage),
            Err(e) => {
                log::warn!("[oracle] discarding stored usage: {}", e);
                None
            }
        });
        Self { cap, usage }
    }

    pub fn to_json(&self) -> Result<Option<String>> {
        self.usage
            .as_ref()
            .map(|u| serde_json::to_string(u).map_err(SceneError::from))
            .transpose()
    }

    pub fn used_on(&self, today: NaiveDate) -> u32 {
        match &self.usage {
            Some(u) if u.date == today => u.count,
            _ => 0,
        }
    }

    fn roll_over(&mut self, today: NaiveDate) {
        if self.usage.as_ref().map(|u| u.date) != Some(today) {
            self.usage = Some(DailyUsage {
                date: today,
                count: 0,
            });
        }
    }

    /// `false` when today's cap is already used up; no request should be issued.
    pub fn try_begin(&mut self, today: NaiveDate) -> bool {
        self.roll_over(today);
        self.used_on(today) < self.cap
    }

    pub fn record_success(&mut self, today: NaiveDate) {
        self.roll_over(today);
        if let Some(usage) = &mut self.usage {
            usage.count += 1;
        }
    }
}

/// What a completed circle gesture does with the typed question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitDecision {
    /// A request is still in flight.
    Busy,
    Empty,
    CapReached,
    /// Send this (trimmed) question.
    Ask(String),
}

impl SubmitDecision {
    /// Only a request that actually starts consumes the input box.
    pub fn clears_input(&self) -> bool {
        matches!(self, SubmitDecision::Ask(_))
    }
}

/// Guard order: busy, empty, daily cap. The limiter is only consulted for a
/// real question.
pub fn decide_submit(
    busy: bool,
    typed: Option<&str>,
    limiter: &mut UsageLimiter,
    today: NaiveDate,
) -> SubmitDecision {
    if busy {
        return SubmitDecision::Busy;
    }
    let question = typed.map(str::trim).unwrap_or_default();
    if question.is_empty() {
        return SubmitDecision::Empty;
    }
    if !limiter.try_begin(today) {
        return SubmitDecision::CapReached;
    }
    SubmitDecision::Ask(question.to_string())
}

use bagua_core::oracle::*;
use chrono::NaiveDate;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).expect("valid date")
}

#[test]
fn failures_are_classified_by_substring() {
    let cases = [
        ("FUNCTION_INVOCATION_TIMEOUT 504", OracleFailure::Timeout),
        ("request timed out", OracleFailure::Timeout),
        ("403 Forbidden", OracleFailure::Auth),
        ("API key not valid", OracleFailure::Auth),
        ("TypeError: Failed to fetch", OracleFailure::Connectivity),
        ("NetworkError when attempting to fetch resource.", OracleFailure::Connectivity),
        ("429 Too Many Requests", OracleFailure::Overloaded),
        ("503 Service Unavailable", OracleFailure::Overloaded),
        ("Resource has been exhausted (e.g. check quota).", OracleFailure::Overloaded),
        ("The model is overloaded", OracleFailure::Overloaded),
        ("something odd", OracleFailure::Unknown),
    ];
    for (text, expected) in cases {
        assert_eq!(OracleFailure::classify(text), expected, "{text}");
    }
}

#[test]
fn error_bodies_are_parsed_when_possible() {
    assert_eq!(
        OracleFailure::from_response(500, r#"{"error":"quota exceeded"}"#),
        OracleFailure::Overloaded
    );
    assert_eq!(
        OracleFailure::from_response(504, "<html>gateway</html>"),
        OracleFailure::Timeout
    );
    assert_eq!(OracleFailure::from_response(500, "boom"), OracleFailure::Unknown);
}

#[test]
fn every_failure_has_its_own_message() {
    let all = [
        OracleFailure::Timeout,
        OracleFailure::Auth,
        OracleFailure::Connectivity,
        OracleFailure::Overloaded,
        OracleFailure::Unknown,
    ];
    for (i, a) in all.iter().enumerate() {
        assert!(!a.message().is_empty());
        for b in &all[i + 1..] {
            assert_ne!(a.message(), b.message());
        }
    }
}

#[test]
fn wire_types_match_the_endpoint() {
    let req = OracleRequest {
        question: "问前程".into(),
    };
    assert_eq!(
        serde_json::to_string(&req).expect("serializes"),
        r#"{"question":"问前程"}"#
    );
    assert_eq!(OracleAnswer::text_from_body(r#"{"answer":"吉"}"#), "吉");
    assert_eq!(OracleAnswer::text_from_body("plain text"), "plain text");
}

#[test]
fn decoder_joins_characters_split_across_chunks() {
    let bytes = "天行健".as_bytes();
    let mut dec = Utf8ChunkDecoder::new();
    let mut out = String::new();
    for b in bytes {
        out.push_str(&dec.push(std::slice::from_ref(b)));
    }
    out.push_str(&dec.finish());
    assert_eq!(out, "天行健");

    let mut dec = Utf8ChunkDecoder::new();
    assert_eq!(dec.push(&bytes[..4]), "天");
    assert_eq!(dec.push(&bytes[4..]), "行健");
}

#[test]
fn decoder_replaces_invalid_and_dangling_bytes() {
    let mut dec = Utf8ChunkDecoder::new();
    assert_eq!(dec.push(&[0xFF, b'a']), "\u{FFFD}a");
    assert_eq!(dec.push(&[0xE5, 0xA4]), "");
    assert_eq!(dec.finish(), "\u{FFFD}");
    assert_eq!(dec.finish(), "");
}

#[test]
fn limiter_caps_each_day_and_rolls_over() {
    let mut limiter = UsageLimiter::new(2);
    assert!(limiter.try_begin(day(1)));
    limiter.record_success(day(1));
    assert!(limiter.try_begin(day(1)));
    limiter.record_success(day(1));
    assert!(!limiter.try_begin(day(1)));
    assert_eq!(limiter.used_on(day(1)), 2);

    assert!(limiter.try_begin(day(2)));
    assert_eq!(limiter.used_on(day(2)), 0);
}

#[test]
fn failed_requests_are_not_counted() {
    let mut limiter = UsageLimiter::new(1);
    assert!(limiter.try_begin(day(5)));
    assert!(limiter.try_begin(day(5)));
    limiter.record_success(day(5));
    assert!(!limiter.try_begin(day(5)));
}

#[test]
fn usage_survives_persistence() {
    let mut limiter = UsageLimiter::new(5);
    limiter.record_success(day(9));
    limiter.record_success(day(9));
    let json = limiter.to_json().expect("serializes").expect("has usage");

    let restored = UsageLimiter::restore(5, Some(&json));
    assert_eq!(restored.used_on(day(9)), 2);
    assert_eq!(restored.used_on(day(10)), 0);

    let fresh = UsageLimiter::restore(5, Some("{not json"));
    assert_eq!(fresh.used_on(day(9)), 0);
    assert!(UsageLimiter::new(5).to_json().expect("serializes").is_none());
}

#[test]
fn refused_submits_keep_the_typed_question() {
    let mut limiter = UsageLimiter::new(1);
    let typed = Some("  明日宜出行否？ ");

    let busy = decide_submit(true, typed, &mut limiter, day(9));
    assert_eq!(busy, SubmitDecision::Busy);
    assert!(!busy.clears_input());
    // a busy gesture does not touch the day's count
    assert_eq!(limiter.used_on(day(9)), 0);

    let empty = decide_submit(false, Some("   "), &mut limiter, day(9));
    assert_eq!(empty, SubmitDecision::Empty);
    assert!(!empty.clears_input());
    assert_eq!(decide_submit(false, None, &mut limiter, day(9)), SubmitDecision::Empty);

    let ask = decide_submit(false, typed, &mut limiter, day(9));
    assert_eq!(ask, SubmitDecision::Ask("明日宜出行否？".to_string()));
    assert!(ask.clears_input());
    limiter.record_success(day(9));

    let capped = decide_submit(false, typed, &mut limiter, day(9));
    assert_eq!(capped, SubmitDecision::CapReached);
    assert!(!capped.clears_input());

    assert!(matches!(
        decide_submit(false, typed, &mut limiter, day(10)),
        SubmitDecision::Ask(_)
    ));
}

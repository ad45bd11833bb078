use bagua_core::ticker::*;

const DT: f32 = 1.0 / 60.0;

fn ticker(lines: &[&str]) -> TextTicker {
    TextTicker::new(
        lines.iter().map(|s| s.to_string()).collect(),
        TickerTimings::default(),
    )
}

fn current(t: &TextTicker) -> Option<String> {
    t.frame().map(|f| f.text.to_string())
}

/// Advance `secs` and return each newly shown text in order.
fn run(t: &mut TextTicker, secs: f32) -> Vec<String> {
    let mut seen = Vec::new();
    let mut last = current(t);
    for _ in 0..(secs / DT) as usize {
        t.tick(DT);
        let now = current(t);
        if now.is_some() && now != last {
            seen.extend(now.clone());
        }
        last = now;
    }
    seen
}

#[test]
fn static_lines_cycle_in_order() {
    let mut t = ticker(&["a", "b"]);
    let seen = run(&mut t, 20.0);
    assert_eq!(&seen[..3], &["a", "b", "a"]);
    assert_eq!(t.mode(), TickerMode::Cycle);
}

#[test]
fn opacity_fades_in_and_out() {
    let mut t = ticker(&["a"]);
    let mut peak: f32 = 0.0;
    let mut saw_partial = false;
    for _ in 0..(9.0 / DT) as usize {
        t.tick(DT);
        if let Some(f) = t.frame() {
            assert!((0.0..=1.0).contains(&f.opacity));
            peak = peak.max(f.opacity);
            saw_partial |= f.opacity > 0.2 && f.opacity < 0.8;
        }
    }
    assert_eq!(peak, 1.0);
    assert!(saw_partial);
}

#[test]
fn chunks_are_split_into_sentences() {
    let mut t = ticker(&[]);
    t.begin_response();
    t.apply(StreamEvent::Chunk("天行健。君子".into()));
    assert_eq!(t.queued(), 1);
    t.apply(StreamEvent::Chunk("以自强不息！地势坤".into()));
    assert_eq!(t.queued(), 2);
    t.apply(StreamEvent::End);
    assert_eq!(t.queued(), 3);
    let seen = run(&mut t, 30.0);
    assert_eq!(seen, vec!["天行健。", "君子以自强不息！", "地势坤"]);
}

#[test]
fn response_interrupts_cycle_then_resumes_it() {
    let mut t = ticker(&["a", "b"]);
    run(&mut t, 3.0);
    assert_eq!(current(&t).as_deref(), Some("a"));

    t.begin_response();
    t.apply(StreamEvent::Chunk("First line. Second line?".into()));
    t.apply(StreamEvent::End);
    let seen = run(&mut t, 40.0);
    assert_eq!(&seen[..3], &["First line.", "Second line?", "b"]);
    assert_eq!(t.mode(), TickerMode::Cycle);
}

#[test]
fn ticker_waits_for_end_before_resuming() {
    let mut t = ticker(&["a"]);
    t.begin_response();
    t.apply(StreamEvent::Chunk("One. Two".into()));
    let seen = run(&mut t, 30.0);
    assert_eq!(seen, vec!["One."]);
    assert_eq!(t.mode(), TickerMode::Response);
    assert!(t.frame().is_none());

    t.apply(StreamEvent::End);
    let seen = run(&mut t, 30.0);
    assert_eq!(&seen[..2], &["Two", "a"]);
}

#[test]
fn decimal_points_do_not_split() {
    let mut t = ticker(&[]);
    t.begin_response();
    t.apply(StreamEvent::Chunk("Pi is 3.".into()));
    t.apply(StreamEvent::Chunk("14 today".into()));
    assert_eq!(t.queued(), 0);
    t.apply(StreamEvent::Chunk(" indeed!".into()));
    assert_eq!(t.queued(), 1);
    let seen = run(&mut t, 15.0);
    assert_eq!(seen, vec!["Pi is 3.14 today indeed!"]);
}

#[test]
fn failure_replaces_buffered_text() {
    let mut t = ticker(&[]);
    t.begin_response();
    t.apply(StreamEvent::Chunk("half a thou".into()));
    t.apply(StreamEvent::Failed("signal lost".into()));
    assert_eq!(t.queued(), 1);
    let seen = run(&mut t, 15.0);
    assert_eq!(seen, vec!["signal lost"]);
}

#[test]
fn stream_events_outside_a_response_are_ignored() {
    let mut t = ticker(&["a"]);
    t.apply(StreamEvent::Chunk("stray.".into()));
    assert_eq!(t.queued(), 0);
    assert_eq!(t.mode(), TickerMode::Cycle);
}

#[test]
fn long_sentences_hold_longer() {
    let mut t = ticker(&[]);
    let long = "长".repeat(100);
    t.show_message(&long);
    // gap, fade in and most of the capped hold
    run(&mut t, 0.1 + 1.5 + 7.5);
    assert_eq!(current(&t).as_deref(), Some(long.as_str()));
    run(&mut t, 3.0);
    assert!(t.frame().is_none());

    let mut t = ticker(&[]);
    t.show_message("短。");
    run(&mut t, 0.1 + 1.5 + 2.0);
    assert!(t.frame().map(|f| f.opacity) == Some(1.0));
    run(&mut t, 2.5);
    assert!(t.frame().map_or(true, |f| f.opacity < 1.0));
}

use pretty_assertions::assert_eq;
use bytes::Bytes;
use reviewlens::models::{AnalysisRecord, CumulativeReport};
use reviewlens::session::{merge, AnalysisSession, SessionOutcome, SessionState};
use reviewlens::stream::parse_record;
use reviewlens::transport::{ByteStreamSource, FileChunkSource};
use futures::StreamExt;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

const RECORD_A: &str = r#"{"filename":"a.py","static_issues":[{"line":3,"col":1,"severity":"LOW","text":"unused import"}],"security_issues":[],"ai_feedback":"X","best_practices":["Add docstrings","Use type hints"]}"#;
const RECORD_B: &str = r#"{"filename":"b.py","static_issues":[],"security_issues":[{"line_number":12,"severity":"HIGH","issue_text":"eval used"}],"ai_feedback":"Y","best_practices":["Use type hints"]}"#;
const RECORD_C: &str = r#"{"filename":"c.py","static_issues":[{"line":1,"severity":"medium","text":"line too long"}],"security_issues":[]}"#;

async fn run_chunks(chunks: Vec<String>) -> SessionOutcome {
    let items: Vec<Result<Bytes, String>> = chunks.into_iter().map(|c| Ok(Bytes::from(c))).collect();
    AnalysisSession::new()
        .run(ByteStreamSource::new(futures::stream::iter(items), "scripted"))
        .await
}

fn fold(lines: &[&str]) -> CumulativeReport {
    lines.iter().enumerate().fold(CumulativeReport::new(), |report, (i, line)| {
        let record: AnalysisRecord = parse_record(line, i + 1).unwrap().into_record();
        merge(report, &record)
    })
}

#[tokio::test]
async fn test_record_straddling_chunks_is_merged_once() {
    let stream = format!("{}\n{}\n", RECORD_A, RECORD_B);
    let (head, tail) = stream.split_at(RECORD_A.len() / 2);
    let outcome = run_chunks(vec![head.to_string(), tail.to_string()]).await;

    assert!(outcome.is_complete());
    assert_eq!(outcome.stats.records_merged, 2);
    assert_eq!(outcome.stats.parse_failures, 0);
    assert_eq!(outcome.report, fold(&[RECORD_A, RECORD_B]));
}

#[tokio::test]
async fn test_result_is_independent_of_chunk_boundaries() {
    let stream = format!("{}\n{}\n{}\n", RECORD_A, RECORD_B, RECORD_C);
    let whole = run_chunks(vec![stream.clone()]).await;

    for size in [1, 2, 7, 64] {
        let chunks: Vec<String> = stream
            .as_bytes()
            .chunks(size)
            .map(|c| String::from_utf8_lossy(c).into_owned())
            .collect();
        // Byte-sized chunks can split multibyte text; the records here are ASCII.
        let outcome = run_chunks(chunks).await;
        assert_eq!(outcome.report, whole.report, "chunk size {}", size);
    }
}

#[tokio::test]
async fn test_feedback_blocks_concatenate_in_arrival_order() {
    let stream = "{\"filename\":\"a.py\",\"ai_feedback\":\"X\"}\n{\"filename\":\"b.py\",\"ai_feedback\":\"Y\"}\n";
    let outcome = run_chunks(vec![stream.to_string()]).await;
    assert_eq!(outcome.report.ai_feedback, "\n\n### a.py\nX\n\n### b.py\nY");
}

#[tokio::test]
async fn test_malformed_line_is_skipped() {
    let with_garbage = format!("{}\n{{not json\n{}\n", RECORD_A, RECORD_B);
    let without = format!("{}\n{}\n", RECORD_A, RECORD_B);

    let skipped = run_chunks(vec![with_garbage]).await;
    let clean = run_chunks(vec![without]).await;

    assert!(skipped.is_complete());
    assert_eq!(skipped.stats.parse_failures, 1);
    assert_eq!(skipped.report, clean.report);
}

#[tokio::test]
async fn test_diagnostic_record_adds_one_warning() {
    let stream = format!("{}\n{}\n", RECORD_A, r#"{"filename":"broken.py","error":"Analysis timed out"}"#);
    let outcome = run_chunks(vec![stream]).await;

    assert_eq!(outcome.report.warnings.len(), 1);
    assert_eq!(outcome.report.warnings[0].filename, "broken.py");
    assert_eq!(outcome.report.warnings[0].message, "Analysis timed out");
    assert_eq!(outcome.report.static_issues.len(), 1);
    assert_eq!(outcome.stats.diagnostics, 1);
    assert_eq!(outcome.stats.files_analyzed(), 1);
}

#[tokio::test]
async fn test_best_practices_are_distinct_in_first_seen_order() {
    let outcome = run_chunks(vec![format!("{}\n{}\n", RECORD_A, RECORD_B)]).await;
    assert_eq!(outcome.report.best_practices.as_slice(), ["Add docstrings", "Use type hints"]);
}

#[tokio::test]
async fn test_issue_order_follows_arrival_order() {
    let outcome = run_chunks(vec![format!("{}\n{}\n{}\n", RECORD_A, RECORD_B, RECORD_C)]).await;
    let lines: Vec<u32> = outcome.report.static_issues.iter().map(|i| i.line).collect();
    assert_eq!(lines, vec![3, 1]);
    assert_eq!(outcome.report.security_issues[0].line_number, 12);
}

#[tokio::test]
async fn test_failure_after_records_keeps_partial_report() {
    let items: Vec<Result<Bytes, String>> = vec![
        Ok(Bytes::from(format!("{}\n{}\n", RECORD_A, RECORD_B))),
        Ok(Bytes::from_static(b"{\"filename\":\"c.")),
        Err("connection reset by peer".to_string()),
    ];
    let session = AnalysisSession::new();
    let rx = session.subscribe();
    let outcome = session
        .run(ByteStreamSource::new(futures::stream::iter(items), "scripted"))
        .await;

    assert_eq!(outcome.state, SessionState::Failed { error: "connection reset by peer".into() });
    assert_eq!(outcome.stats.records_merged, 2);
    assert_eq!(outcome.report, fold(&[RECORD_A, RECORD_B]));

    let last = rx.borrow().clone();
    assert!(last.is_final());
    assert_eq!(last.report, outcome.report);
}

#[tokio::test]
async fn test_observer_final_snapshot_matches_outcome() {
    let items: Vec<Result<Bytes, String>> = vec![
        Ok(Bytes::from(format!("{}\n", RECORD_A))),
        Ok(Bytes::from(format!("{}\n", RECORD_B))),
    ];
    let session = AnalysisSession::new();
    let mut rx = session.subscribe();
    let observer = tokio::spawn(async move {
        let mut seen = 0;
        while rx.changed().await.is_ok() {
            seen += 1;
            let _ = rx.borrow_and_update();
        }
        (seen, rx.borrow().clone())
    });

    let outcome = session
        .run(ByteStreamSource::new(futures::stream::iter(items), "scripted"))
        .await;
    let (seen, last) = observer.await.unwrap();

    assert!(seen >= 1);
    assert_eq!(last.state, SessionState::Complete);
    assert_eq!(last.report, outcome.report);
}

#[tokio::test]
async fn test_cancelled_session_does_not_emit_terminal_snapshot() {
    let token = CancellationToken::new();
    let session = AnalysisSession::new().with_cancel_token(token.clone());
    let rx = session.subscribe();
    token.cancel();

    let items: Vec<Result<Bytes, String>> = vec![Ok(Bytes::from(format!("{}\n", RECORD_A)))];
    let outcome = session
        .run(ByteStreamSource::new(futures::stream::iter(items), "scripted"))
        .await;

    assert_eq!(outcome.state, SessionState::Cancelled);
    assert!(!rx.borrow().is_final());
}

/// Flags when the stream holding it is dropped.
struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn test_cancel_while_waiting_for_next_chunk() {
    let released = Arc::new(AtomicBool::new(false));
    let flag = DropFlag(Arc::clone(&released));
    let items: Vec<Result<Bytes, String>> = vec![
        Ok(Bytes::from(format!("{}\n", RECORD_A))),
        Ok(Bytes::from(format!("{}\n", RECORD_B))),
    ];
    let stream = futures::stream::iter(items)
        .chain(futures::stream::pending())
        .map(move |chunk| {
            let _held = &flag;
            chunk
        });

    let token = CancellationToken::new();
    let session = AnalysisSession::new().with_cancel_token(token.clone());
    let mut rx = session.subscribe();
    let run = tokio::spawn(session.run(ByteStreamSource::new(stream, "stalled")));

    rx.wait_for(|s| s.stats.records_merged == 2).await.unwrap();
    token.cancel();
    let outcome = tokio::time::timeout(Duration::from_secs(5), run).await.unwrap().unwrap();

    assert_eq!(outcome.state, SessionState::Cancelled);
    assert_eq!(outcome.stats.records_merged, 2);
    assert_eq!(outcome.report, fold(&[RECORD_A, RECORD_B]));
    assert!(released.load(Ordering::SeqCst));

    let last = rx.borrow().clone();
    assert!(!last.is_final());
    assert_eq!(last.report, outcome.report);
}

#[tokio::test]
async fn test_large_stream_ingests_in_linear_time() {
    let issues: Vec<String> = (1..=50)
        .map(|n| format!(r#"{{"line":{},"severity":"LOW","text":"issue {}"}}"#, n, n))
        .collect();
    let line = |i: usize| {
        format!(
            r#"{{"filename":"f{}.py","static_issues":[{}],"security_issues":[],"ai_feedback":"ok"}}"#,
            i,
            issues.join(",")
        )
    };
    let records = 4000;
    let chunks: Vec<String> = (0..records).map(|i| format!("{}\n", line(i))).collect();

    let session = AnalysisSession::new();
    // An idle observer must not force any copying of the report.
    let _rx = session.subscribe();
    let items: Vec<Result<Bytes, String>> = chunks.into_iter().map(|c| Ok(Bytes::from(c))).collect();

    let started = Instant::now();
    let outcome = session
        .run(ByteStreamSource::new(futures::stream::iter(items), "bulk"))
        .await;
    let elapsed = started.elapsed();

    assert_eq!(outcome.stats.records_merged, records);
    assert_eq!(outcome.report.static_issues.len(), records * 50);
    assert!(elapsed < Duration::from_secs(20), "ingestion took {:?}", elapsed);
}

#[tokio::test]
async fn test_replay_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}\r\n\r\n{}\r\n{}", RECORD_A, RECORD_B, RECORD_C).unwrap();

    let source = FileChunkSource::open(file.path(), 5).await.unwrap();
    let outcome = AnalysisSession::new().run(source).await;

    assert!(outcome.is_complete());
    assert_eq!(outcome.stats.records_merged, 3);
    assert_eq!(outcome.report, fold(&[RECORD_A, RECORD_B, RECORD_C]));
}

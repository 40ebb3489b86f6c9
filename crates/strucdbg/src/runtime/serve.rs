//! Serve: the single event loop between the capture side and the sink.

use std::future::Future;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, BufReader};
use tokio::time::MissedTickBehavior;
use tokio_stream::wrappers::SplitStream;
use tokio_stream::StreamExt;
use tracing::{debug, error, info};

use crate::runtime::stop::shutdown_signal;
use crate::service::LogService;
use crate::state::SharedState;
use crate::wire::{InboundEvent, SinkWriter, WireError};

/// Read events from stdin and write sink messages to stdout until end of
/// input or Ctrl-C.
pub async fn serve(state: SharedState) -> Result<(), Box<dyn std::error::Error>> {
    let mut service = LogService::new(&state.config, std::sync::Arc::clone(&state.metrics));

    info!("strucdbg is ready, reading events from stdin");
    let result = run(
        &mut service,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        state.config.eviction_interval(),
        shutdown_signal(),
    )
    .await;

    let snapshot = state.metrics.snapshot();
    info!(
        events = snapshot.events,
        structured = snapshot.structured,
        raw = snapshot.raw,
        sessions_started = snapshot.sessions_started,
        sessions_evicted = snapshot.sessions_evicted,
        "strucdbg stopped"
    );

    result.map_err(|e| {
        error!("Event loop failed: {}", e);
        e.into()
    })
}

/// Drive `service` from NDJSON `input` to NDJSON `output`.
pub async fn run<R, W, S>(
    service: &mut LogService,
    input: R,
    output: W,
    eviction_interval: Duration,
    shutdown: S,
) -> Result<(), WireError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    S: Future<Output = ()>,
{
    // Raw byte lines: a line that is not UTF-8 must not end the stream
    let mut lines = SplitStream::new(input.split(b'\n'));
    let mut sink = SinkWriter::new(output);

    let mut eviction = tokio::time::interval(eviction_interval);
    eviction.set_missed_tick_behavior(MissedTickBehavior::Delay);

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.next() => {
                let bytes = match line {
                    Some(bytes) => bytes?,
                    None => {
                        info!("Inbound stream closed");
                        break;
                    }
                };

                let messages = match String::from_utf8(bytes) {
                    Ok(line) if line.trim().is_empty() => continue,
                    Ok(line) => match InboundEvent::decode(&line) {
                        Ok(event) => service.handle(event).await,
                        Err(e) => service.report_decode_error(&e),
                    },
                    Err(e) => service.report_decode_error(&WireError::from(e)),
                };
                sink.send_all(&messages).await?;
            }
            _ = eviction.tick() => {
                let evicted = service.evict_expired();
                if !evicted.is_empty() {
                    debug!(evicted = evicted.len(), sessions = service.registry().len(), "eviction pass");
                }
            }
            _ = &mut shutdown => break,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conf::StrucdbgConfig;
    use crate::parser::metrics::IngestMetrics;
    use std::sync::Arc;

    fn service() -> LogService {
        LogService::new(&StrucdbgConfig::default(), Arc::new(IngestMetrics::new()))
    }

    async fn run_lines(service: &mut LogService, input: &str) -> Vec<serde_json::Value> {
        let mut output = Vec::new();
        run(
            service,
            input.as_bytes(),
            &mut output,
            Duration::from_secs(30),
            std::future::pending(),
        )
        .await
        .unwrap();

        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_runs_until_end_of_input() {
        let mut service = service();
        let input = concat!(
            r#"{"type":"session-started","sessionId":"s1","sessionName":"Run","program":"/app/main.go"}"#, "\n",
            "\n",
            r#"{"type":"output","sessionId":"s1","output":"{\"level\":\"error\",\"msg\":\"boom\"}"}"#, "\n",
            r#"{"type":"session-ended","sessionId":"s1"}"#, "\n",
        );
        let out = run_lines(&mut service, input).await;

        assert_eq!(out.len(), 3);
        assert_eq!(out[0]["type"], "new-session");
        assert_eq!(out[1]["type"], "new-log");
        assert_eq!(out[1]["logType"], "structured");
        assert_eq!(out[1]["content"]["severity"], "error");
        assert_eq!(out[2]["type"], "session-ended");
    }

    #[tokio::test]
    async fn test_malformed_line_becomes_error_log() {
        let mut service = service();
        let out = run_lines(&mut service, "this is not an event\n").await;

        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["logType"], "error");
        assert_eq!(out[0]["sessionId"], "default");
        assert_eq!(service.registry().fallback().unwrap().record_count(), 1);
    }

    #[tokio::test]
    async fn test_non_utf8_line_does_not_stop_loop() {
        let mut service = service();
        let mut input = b"\xff\xfe garbage\n".to_vec();
        input.extend_from_slice(br#"{"type":"session-started","sessionId":"s1","sessionName":"Run"}"#);
        input.extend_from_slice(b"\r\n");

        let mut output = Vec::new();
        run(&mut service, input.as_slice(), &mut output, Duration::from_secs(30), std::future::pending())
            .await
            .unwrap();

        let out: Vec<serde_json::Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0]["logType"], "error");
        assert_eq!(out[0]["sessionId"], "default");
        assert_eq!(out[1]["type"], "new-session");
        assert_eq!(out[1]["sessionId"], "s1");
    }

    #[tokio::test]
    async fn test_sink_attached_replays_sessions() {
        let mut service = service();
        let input = concat!(
            r#"{"type":"session-started","sessionId":"s1","sessionName":"Run"}"#, "\n",
            r#"{"type":"sink-attached"}"#, "\n",
        );
        let out = run_lines(&mut service, input).await;

        assert_eq!(out.len(), 2);
        assert_eq!(out[0], out[1]);
    }

    #[tokio::test]
    async fn test_shutdown_stops_loop() {
        let mut service = service();
        let (_tx, rx) = tokio::io::duplex(64);
        let mut output = Vec::new();

        // Input never ends; the already-resolved shutdown future stops the loop
        run(
            &mut service,
            BufReader::new(rx),
            &mut output,
            Duration::from_secs(30),
            std::future::ready(()),
        )
        .await
        .unwrap();
        assert!(output.is_empty());
    }
}

//! Stdin Graphemes: Print each grapheme cluster read from stdin.
//!
//! Usage: `echo 'é 👩‍🚀' | cargo run --example stdin_graphemes [timeout_ms]`
//!
//! With a timeout, reading stops once it elapses even if stdin is still
//! open (try it interactively).

use grapheme_stream::{read_grapheme_clusters, CancellationToken, ReaderSource, StreamError};
use std::thread;
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

fn main() -> Result<(), StreamError> {
    let timeout = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse::<u64>().ok())
        .map(Duration::from_millis);

    let token = CancellationToken::new();
    if let Some(timeout) = timeout {
        let timer = token.clone();
        thread::spawn(move || {
            thread::sleep(timeout);
            timer.cancel_with("timeout");
        });
    }

    let mut source = ReaderSource::spawn(std::io::stdin())?;
    let mut stream = read_grapheme_clusters(&mut source, Some(&token));

    for cluster in stream.by_ref() {
        match cluster {
            Ok(cluster) => {
                let code_points = cluster.chars().count();
                println!(
                    "{:<16} width={} code_points={code_points}",
                    format!("{:?}", cluster),
                    cluster.width()
                );
            }
            Err(err) if err.is_cancelled() => {
                eprintln!("stopped: {err}");
                break;
            }
            Err(err) => return Err(err),
        }
    }

    let stats = stream.stats();
    eprintln!(
        "{} clusters from {} bytes in {} reads",
        stats.clusters_emitted, stats.bytes_read, stats.reads
    );
    Ok(())
}

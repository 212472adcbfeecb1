//! JSON-lines host for a single countdown engine.
//!
//! One command object per stdin line, one output per stdout line. When
//! stdin closes, an active countdown still runs to `"COMPLETE"` before the
//! process exits.

use pomotick_core::{CountdownEngine, EngineCommand, SystemClock};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve())
}

async fn serve() -> Result<(), Box<dyn std::error::Error>> {
    let (engine, mut outputs) = CountdownEngine::spawn(SystemClock)?;
    let mut engine = Some(engine);
    let mut lines = BufReader::new(tokio::io::stdin()).split(b'\n');
    let mut stdout = tokio::io::stdout();

    loop {
        tokio::select! {
            line = lines.next_segment(), if engine.is_some() => {
                match line? {
                    Some(bytes) => match std::str::from_utf8(&bytes) {
                        Ok(line) if line.trim().is_empty() => {}
                        Ok(line) => match EngineCommand::decode(line) {
                            Ok(command) => {
                                if let Some(engine) = &engine {
                                    engine.send(command)?;
                                }
                            }
                            Err(e) => tracing::warn!(error = %e, "skipping malformed command"),
                        },
                        Err(e) => tracing::warn!(error = %e, "skipping command that is not UTF-8"),
                    },
                    None => {
                        tracing::debug!("stdin closed");
                        if let Some(engine) = engine.take() {
                            engine.finish();
                        }
                    }
                }
            }
            output = outputs.recv() => {
                let Some(output) = output else {
                    break;
                };
                stdout.write_all(format!("{}\n", output.encode()).as_bytes()).await?;
                stdout.flush().await?;
            }
        }
    }
    Ok(())
}

//! The simulated event log: a first-class worker fed by every other
//! component over an MPSC channel, writing `[%7.2fs] <message>` lines.
//!
//! This is a domain feature (part of §4's component list), not the
//! ambient `tracing` diagnostics the binary also carries — the two are
//! deliberately separate: this file is the artifact an operator reviews
//! afterward, `tracing` is for live troubleshooting.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::Receiver;

use sor_types::LogMsg;

pub fn spawn(path: impl Into<std::path::PathBuf>, rx: Receiver<LogMsg>) -> JoinHandle<()> {
    let path = path.into();
    thread::Builder::new()
        .name("logger".into())
        .spawn(move || run(&path, rx))
        .expect("failed to spawn logger thread")
}

fn run(path: &std::path::Path, rx: Receiver<LogMsg>) {
    let file = match File::create(path) {
        Ok(f) => f,
        Err(err) => {
            tracing::error!(?err, path = %path.display(), "logger failed to open log file");
            return;
        }
    };
    let start = Instant::now();
    let mut writer = BufWriter::new(file);
    if write_line(&mut writer, LogMsg::new(0.0, "log opened")).is_err() {
        return;
    }
    for msg in rx.iter() {
        if write_line(&mut writer, msg).is_err() {
            break;
        }
    }
    let _ = write_line(&mut writer, LogMsg::new(start.elapsed().as_secs_f64(), "log closed"));
}

/// Writes one rendered line and flushes immediately, so a line already
/// handed to the Logger survives an abrupt teardown instead of sitting in
/// the `BufWriter`'s internal buffer.
fn write_line(writer: &mut BufWriter<File>, msg: LogMsg) -> std::io::Result<()> {
    if let Err(err) = writeln!(writer, "{}", msg.render()) {
        tracing::error!(?err, "logger failed to write line");
        return Err(err);
    }
    if let Err(err) = writer.flush() {
        tracing::error!(?err, "logger failed to flush line");
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn writes_rendered_lines_in_order_until_channel_closes() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("sor-sim-logger-test-{}.log", std::process::id()));
        let (tx, rx) = crossbeam_channel::unbounded();
        let handle = spawn(path.clone(), rx);
        tx.send(LogMsg::new(0.0, "first")).unwrap();
        tx.send(LogMsg::new(1.5, "second")).unwrap();
        drop(tx);
        handle.join().unwrap();

        let mut contents = String::new();
        File::open(&path).unwrap().read_to_string(&mut contents).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert!(lines[0].ends_with("log opened"), "missing start banner: {lines:?}");
        assert_eq!(lines[1], "[   0.00s] first");
        assert_eq!(lines[2], "[   1.50s] second");
        assert!(lines[3].ends_with("log closed"), "missing final banner: {lines:?}");
        let _ = std::fs::remove_file(&path);
    }
}

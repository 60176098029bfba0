#![deny(clippy::all)]
use std::io::{stdout, BufWriter};
use std::process;

use tracing::{error, info};

use hexing::hex_view::{ClipFileSink, HexView};
use hexing::{logging, Config, Document};

const STDOUT_BUF: usize = 8192;

fn main() {
    let filename = match std::env::args_os().nth(1) {
        Some(filename) => filename,
        None => process::exit(1),
    };

    let config = Config::from_env();
    if let Err(e) = logging::init(config.log_path.as_deref()) {
        eprintln!("hexing: cannot open log file: {}", e);
    }

    let document = match Document::open(&filename, config.geometry) {
        Ok(document) => document,
        Err(e) => {
            error!(error = %e, "open failed");
            eprintln!("hexing: {}: {}", filename.to_string_lossy(), e);
            process::exit(1);
        }
    };

    let sink = Box::new(ClipFileSink::new(config.clip_path.clone()));
    let mut view = HexView::new(document, config.theme, sink);

    let stdout = stdout();
    let mut stdout = BufWriter::with_capacity(STDOUT_BUF, stdout.lock());
    let result = view.run_event_loop(&mut stdout);

    let mut document = view.into_document();
    let closed = document.close();
    if let Err(e) = result {
        eprintln!("hexing: terminal error: {}", e);
        process::exit(1);
    }
    if let Err(e) = closed {
        eprintln!("hexing: {}", e);
        process::exit(1);
    }
    info!("bye");
}

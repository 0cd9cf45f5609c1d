use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;

use chatbar::core::config::{self, CliOverrides};
use chatbar::tui;

#[derive(Parser)]
#[command(name = "chatbar", about = "Self-resizing chat input bar demo")]
struct Args {
    /// Config file to read instead of ~/.chatbar/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Lines the text view grows to before it scrolls (0 = unlimited)
    #[arg(short, long)]
    max_lines: Option<usize>,

    /// Keep the send button on screen even when the text is empty
    #[arg(long)]
    always_show_send: bool,

    /// Don't draw a border around the text view
    #[arg(long)]
    no_border: bool,

    /// Where to write the debug log
    #[arg(long, default_value = "chatbar.log")]
    log_file: PathBuf,
}

fn main() -> std::io::Result<()> {
    let args = Args::parse();

    // Initialize file logger; the terminal belongs to the UI
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create(&args.log_file) {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    log::info!("chatbar starting up");

    let file_config = config::load_config(args.config.as_deref()).map_err(|e| {
        log::error!("{}", e);
        std::io::Error::other(e)
    })?;
    let overrides = CliOverrides {
        max_lines: args.max_lines,
        always_show_right_button: args.always_show_send,
        no_border: args.no_border,
    };
    let resolved = config::resolve(&file_config, &overrides);
    log::debug!("Resolved config: {:?}", resolved);

    tui::run(resolved)
}

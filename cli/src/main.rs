use std::io::Write;

use clap::Parser;
use colored::Colorize;
use kjudge_cli::cmd::GlobalArgs;
use kjudge_core::style::ColorTheme;

#[tokio::main]
async fn main() {
    // stdout carries verdicts and the solver channel, so logs go to stderr.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format(|buf, record| {
            let level = record.level();
            writeln!(
                buf,
                "{} {}",
                format!("[{}]", level).color(level.color()).bold(),
                record.args()
            )
        })
        .init();

    let app = GlobalArgs::parse();
    app.exec_subcmd().await.unwrap_or_else(|e| {
        eprintln!("Error: {:?}", e);
        std::process::exit(1);
    });
}

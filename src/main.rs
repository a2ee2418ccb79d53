// src/main.rs

use mesarun::{cli, logging, run};

#[tokio::main]
async fn main() {
    match run_main().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(err) => {
            eprintln!("mesarun error: {err:?}");
            std::process::exit(1);
        }
    }
}

/// `Ok(false)` when every run launched but at least one failed.
async fn run_main() -> anyhow::Result<bool> {
    let args = cli::parse();
    logging::init_logging(args.log_level)?;
    let summary = run(args).await?;
    Ok(summary.all_succeeded())
}

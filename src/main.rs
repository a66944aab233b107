use anyhow::Result;
use clap::Parser;

use sumi::cli::{CliArgs, StartupMode};
use sumi::config::AppConfig;
use sumi::encoding::detect_with;
use sumi::messages::{AppMsg, Msg};
use sumi::runtime::Runtime;

fn main() -> Result<()> {
    let args = CliArgs::parse();
    sumi::logging::init();

    let config = AppConfig::load();

    let mode = args
        .startup_mode()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    match mode {
        StartupMode::Inspect(paths) => inspect(paths, &config),
        StartupMode::Empty => {
            let mut runtime = Runtime::new(config);
            runtime.dispatch(Msg::App(AppMsg::NewDocument));
            run(runtime)
        }
        StartupMode::OpenFiles(paths) => {
            let mut runtime = Runtime::new(config);
            for path in paths {
                runtime.dispatch(Msg::App(AppMsg::OpenFile(path)));
            }
            run(runtime)
        }
    }
}

/// Print a detection report for each path and exit
fn inspect(paths: Vec<std::path::PathBuf>, config: &AppConfig) -> Result<()> {
    let detector = sumi::encoding::DetectorConfig {
        prefer_utf8: config.prefer_utf8,
    };
    for path in paths {
        let bytes = std::fs::read(&path)?;
        let decoded = detect_with(&bytes, &detector);
        println!(
            "{}: {} / {}{}",
            path.display(),
            decoded.encoding.display_name(),
            decoded.eol.display_name(),
            decoded
                .warning
                .map(|w| format!("  [{}]", w))
                .unwrap_or_default()
        );
    }
    Ok(())
}

fn run(mut runtime: Runtime) -> Result<()> {
    runtime.run_until_idle();

    for &id in runtime.session().tab_order() {
        if let Some(doc) = runtime.session().get(id) {
            tracing::info!(
                name = %doc.display_name(),
                encoding = %doc.encoding,
                lines = doc.line_count(),
                "open document"
            );
        }
    }

    if let Err(e) = runtime.recent_files().save() {
        tracing::warn!("Failed to persist recent files: {}", e);
    }

    Ok(())
}

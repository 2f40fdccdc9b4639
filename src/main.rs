use clap::Parser;
use learner_dashboard::config::PAGE_FILE_NAME;
use learner_dashboard::core::engine::DashboardEvent;
use learner_dashboard::core::input::{ScriptedSubmits, StdinSubmits};
use learner_dashboard::domain::ports::ConfigProvider;
use learner_dashboard::utils::error::ErrorSeverity;
use learner_dashboard::utils::logger;
use learner_dashboard::utils::validation::is_remote_location;
use learner_dashboard::{
    Artifact, CliConfig, Dashboard, DashboardEngine, HttpSource, LocalStorage, Result,
    SearchOutcome,
};
use std::path::PathBuf;

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting learner-dashboard");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = run(&config).await {
        tracing::error!(
            "❌ Dashboard failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(config: &CliConfig) -> Result<()> {
    let settings = config.resolve()?;

    let mut dashboard = if is_remote_location(settings.source()) {
        let source = HttpSource::new(settings.source(), settings.request_timeout())?;
        DashboardEngine::from_config(source, &settings).start()
    } else {
        DashboardEngine::from_config(LocalStorage::new(settings.source()), &settings).start()
    };
    let output = LocalStorage::new(settings.output_path());

    if let Some(term) = &config.search {
        dashboard.wait_for(Artifact::Similarity).await;
        let mut submits = ScriptedSubmits::new([term.as_str()]);
        dashboard.drive(&mut submits, print_outcome).await?;
    }

    let written = write_page(&output, &dashboard).await?;
    println!("✅ Dashboard written to: {}", written.display());

    if config.interactive {
        println!("Enter an email and press Enter to find similar learners (Ctrl-D to quit)");
        let mut input = StdinSubmits::new();
        let mut searches = 0;
        while let Some(event) = dashboard.next_event(&mut input).await? {
            match event {
                DashboardEvent::Settled(..) => {
                    write_page(&output, &dashboard).await?;
                }
                DashboardEvent::Searched(outcome, lines) => {
                    searches += 1;
                    print_outcome(&outcome, &lines);
                }
            }
        }
        tracing::info!("Interactive session ended after {} searches", searches);
    }

    // 等待其餘資料載入, 每完成一個就更新頁面
    while dashboard.next_settled().await.is_some() {
        write_page(&output, &dashboard).await?;
    }

    Ok(())
}

async fn write_page(output: &LocalStorage, dashboard: &Dashboard) -> Result<PathBuf> {
    let written = output
        .write_file(PAGE_FILE_NAME, dashboard.render_html().as_bytes())
        .await?;
    tracing::info!(
        "📁 Output saved to: {} ({} fetches pending)",
        written.display(),
        dashboard.pending()
    );
    Ok(written)
}

fn print_outcome(outcome: &SearchOutcome, lines: &[String]) {
    if *outcome == SearchOutcome::Disabled {
        println!("Search is unavailable: similarity data failed to load");
        return;
    }
    for line in lines {
        println!("  {}", line);
    }
}

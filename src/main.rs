use anyhow::Context;
use clap::Parser;
use mirage::utils::error::ErrorSeverity;
use mirage::utils::{logger, validation::Validate};
use mirage::{CliConfig, GoToolchain, LocalStorage, MirageEngine, Settings, TomlConfig};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting mirage");
    tracing::debug!("CLI config: {:?}", cli);

    // 載入設定檔（可選）
    let file = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            let file = TomlConfig::from_file(path)
                .with_context(|| format!("failed to load config file '{}'", path.display()))?;
            Some(file)
        }
        None => None,
    };

    let settings = Settings::from_cli(&cli, file.as_ref());

    // 驗證配置
    let validation = match &file {
        Some(file) => file.validate().and_then(|_| settings.validate()),
        None => settings.validate(),
    };
    if let Err(e) = validation {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let toolchain = GoToolchain::new(&settings.go_binary, &settings.goimports_binary);
    let engine = MirageEngine::new(
        settings.clone(),
        toolchain.clone(),
        LocalStorage::new(),
        toolchain,
    );

    match engine.run() {
        Ok(report) => {
            if report.executed.is_none() {
                if cli.plan_json {
                    println!("{}", serde_json::to_string_pretty(&report.plan)?);
                } else {
                    print!("{}", report.plan);
                }
                return Ok(());
            }

            tracing::info!("✅ Done.");
            println!("✅ Copied {} into {}", report.plan.src_import_path, settings.dst_dir.display());
            println!(
                "📦 {} dependency package(s) placed under internal/",
                report.plan.dependency_count()
            );
        }
        Err(e) => {
            tracing::error!(
                "❌ mirage failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

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

    Ok(())
}

// ==========================================
// GSE 数据集生成器 - 命令行入口
// ==========================================
// 用法: gse-datagen [--config <json>] [--out-dir <dir>] [--seed <u64>] <run | stage <name>>
// ==========================================

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gse_datagen::{logging, GeneratorConfig, PipelineOrchestrator, Stage, StageReport};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "gse-datagen", version, about = "机场地面保障设备 (GSE) 运营数据集生成器")]
struct Cli {
    /// JSON 配置文件 (缺省使用内置默认值)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// 数据集输出目录 (覆盖配置文件)
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// 随机种子 (覆盖配置文件)
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 按依赖顺序执行全部阶段
    Run,
    /// 对已有数据集目录单独执行一个阶段
    Stage {
        #[arg(value_enum)]
        name: Stage,
    },
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("加载配置失败: {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    if let Some(out_dir) = cli.out_dir {
        config.output_dir = out_dir;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }

    tracing::info!("==================================================");
    tracing::info!("{} v{}", gse_datagen::APP_NAME, gse_datagen::VERSION);
    tracing::info!(
        "输出目录: {}, 种子: {}",
        config.output_dir.display(),
        config.seed
    );
    tracing::info!("==================================================");

    let orchestrator = PipelineOrchestrator::new(config).context("配置校验失败")?;

    let reports = match cli.command {
        Command::Run => orchestrator.run_all().context("数据集生成失败")?,
        Command::Stage { name } => vec![orchestrator
            .run_stage(name)
            .with_context(|| format!("阶段 {} 执行失败", name))?],
    };

    print_summary(&reports);
    Ok(())
}

fn print_summary(reports: &[StageReport]) {
    for report in reports {
        println!(
            "{:<14} {:>9} rows  {:>6} ms",
            report.stage.as_str(),
            report.rows,
            report.elapsed_ms
        );
    }
}

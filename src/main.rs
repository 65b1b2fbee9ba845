//! Tao CLI
//!
//! 入口：加载配置、初始化日志、注册内置工具，按模式（plain / memory / parallel）运行一次推理并输出答案。

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};

use tao::config::{load_config, AppConfig};
use tao::llm::create_reasoner;
use tao::react::{MemoryAgent, Orchestrator, ParallelExplorer};
use tao::tools::{DatabaseTool, EchoTool, SearchTool, SqliteBackend};

/// 演示用数据表
const DEMO_SCHEMA: &str = "CREATE TABLE items (id INTEGER PRIMARY KEY, name TEXT NOT NULL, value INTEGER NOT NULL);
INSERT INTO items (name, value) VALUES ('Item 1', 100), ('Item 2', 200);";

#[derive(Parser)]
#[command(name = "tao", about = "Thought → Action → Observation reasoning loop", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 配置文件路径（叠加在 config/default.toml 之上）
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// 输出 debug 日志
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// 回答一个问题
    Ask {
        question: String,
        #[arg(short, long, value_enum, default_value_t = Mode::Plain)]
        mode: Mode,
        /// 覆盖 [agent].max_iterations
        #[arg(long)]
        max_iterations: Option<usize>,
        /// 覆盖 [parallel].branches
        #[arg(long)]
        branches: Option<usize>,
        /// 以 JSON 输出完整结果
        #[arg(long)]
        json: bool,
    },
    /// 列出内置工具
    Tools,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    Plain,
    Memory,
    Parallel,
}

fn build_orchestrator(cfg: &AppConfig) -> anyhow::Result<Orchestrator> {
    let db = SqliteBackend::open_in_memory().map_err(anyhow::Error::msg)?;
    db.execute_batch(DEMO_SCHEMA)
        .map_err(anyhow::Error::msg)
        .context("Failed to seed demo database")?;

    let mut orchestrator = Orchestrator::from_config(&cfg.agent);
    orchestrator.register_tool(SearchTool::default());
    orchestrator.register_tool(DatabaseTool::new(Arc::new(db)));
    orchestrator.register_tool(EchoTool);
    Ok(orchestrator)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tao::observability::init(if cli.verbose { "debug" } else { "info" });

    let mut cfg = load_config(cli.config.clone()).context("Failed to load config")?;

    match cli.command {
        Commands::Tools => {
            let orchestrator = build_orchestrator(&cfg)?;
            for (name, description) in orchestrator.registry().tool_descriptions() {
                println!("{:<10} {}", name, description);
            }
        }
        Commands::Ask {
            question,
            mode,
            max_iterations,
            branches,
            json,
        } => {
            if let Some(n) = max_iterations {
                cfg.agent.max_iterations = n;
            }
            if let Some(n) = branches {
                cfg.parallel.branches = n;
            }
            let reasoner = create_reasoner(&cfg.llm);
            let orchestrator = build_orchestrator(&cfg)?;
            tracing::info!(?mode, provider = %cfg.llm.provider, "running");

            let (answer, rendered) = match mode {
                Mode::Plain => {
                    let r = orchestrator
                        .execute(&question, reasoner.as_ref())
                        .await
                        .context("Run failed")?;
                    (r.answer.clone(), serde_json::to_string_pretty(&r)?)
                }
                Mode::Memory => {
                    let mut agent = MemoryAgent::from_config(orchestrator, &cfg.memory);
                    let r = agent
                        .execute(&question, reasoner.as_ref())
                        .await
                        .context("Run failed")?;
                    (r.answer.clone(), serde_json::to_string_pretty(&r)?)
                }
                Mode::Parallel => {
                    let explorer = ParallelExplorer::from_config(orchestrator, &cfg.parallel);
                    let r = explorer
                        .execute(&question, reasoner.as_ref())
                        .await
                        .context("Run failed")?;
                    (r.best.answer.clone(), serde_json::to_string_pretty(&r)?)
                }
            };

            if json {
                println!("{}", rendered);
            } else {
                println!("{}", answer);
            }
        }
    }

    Ok(())
}

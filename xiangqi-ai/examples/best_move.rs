//! 对给定 FEN 搜索最佳走法并以 JSON 输出结果
//!
//! 用法：cargo run --example best_move [FEN]
//! 不带参数时搜索初始局面。

use anyhow::Result;
use xiangqi_ai::{AiConfig, AiEngine, Difficulty, SearchReport};
use xiangqi_core::{Notation, INITIAL_FEN};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let fen = std::env::args()
        .nth(1)
        .unwrap_or_else(|| INITIAL_FEN.to_string());

    let mut engine = AiEngine::new(AiConfig::from_difficulty(Difficulty::Medium));
    engine.load_fen(&fen)?;

    match engine.search() {
        Some(report) => print_report(&engine, &report)?,
        None => {
            let side = engine.position().side_to_move();
            if engine.position().in_check(side) {
                println!("checkmate: {:?} loses", side);
            } else {
                println!("stalemate: {:?} loses", side);
            }
        }
    }

    Ok(())
}

fn print_report(engine: &AiEngine, report: &SearchReport) -> Result<()> {
    match Notation::to_chinese_with_disambiguation(engine.position(), report.best_move) {
        Some(chinese) => println!("{} ({})", report.best_move, chinese),
        None => println!("{}", report.best_move),
    }
    println!("{}", serde_json::to_string_pretty(report)?);

    let stats = engine.tt_stats();
    tracing::info!(
        hit_rate = stats.hit_rate(),
        usage = stats.usage(),
        "transposition table"
    );

    Ok(())
}

use std::env;

use nyay_cli::{init_tracing, load_settings, preview};
use nyay_rag::{RagContext, DISCLAIMER};

fn main_usage(prog: &str) -> ! {
    eprintln!("Usage: {} <query> [--limit N]", prog);
    eprintln!("Example: {} 'punishment for theft' --limit 5", prog);
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args: Vec<String> = env::args().collect();
    let prog = args.first().cloned().unwrap_or_else(|| "nyay-search".to_string());
    let mut query = None;
    let mut limit = None;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--limit" | "-n" => {
                match args.get(i + 1).and_then(|v| v.parse::<usize>().ok()) {
                    Some(n) => { limit = Some(n); i += 1; }
                    None => { eprintln!("Error: --limit requires a number"); std::process::exit(1); }
                }
            }
            a if !a.starts_with('-') => query = Some(a.to_string()),
            _ => {}
        }
        i += 1;
    }
    let Some(query) = query else { main_usage(&prog) };

    let settings = load_settings()?;
    let limit = limit.unwrap_or(settings.retrieval.top_k);
    let ctx = RagContext::from_settings(&settings).await?;
    let hits = ctx.search(&query, limit)?;

    println!("🔍 Found {} sections for: \"{}\"", hits.len(), query);
    for (rank, hit) in hits.iter().enumerate() {
        println!("\n[{}] {} | Section {}", rank + 1, hit.chunk.act_name, hit.chunk.section_number);
        println!("    Category: {}  Score: {:.3}", hit.chunk.category, hit.score);
        println!("{}", preview(&hit.chunk.text, 800));
    }
    println!("\n{}", DISCLAIMER);
    Ok(())
}

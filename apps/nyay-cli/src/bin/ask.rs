use std::env;
use std::io::{self, BufRead, Write};

use nyay_cli::{init_tracing, load_settings, preview};
use nyay_core::types::Answer;
use nyay_core::Error;
use nyay_rag::RagContext;
use tracing::info;

fn print_answer(answer: &Answer, json: bool) -> anyhow::Result<()> {
    info!(mode = ?answer.mode, sources = answer.sources.len(), "answered");
    if json {
        println!("{}", serde_json::to_string_pretty(&answer.to_view())?);
        return Ok(());
    }
    let view = answer.to_view();
    println!("\nMode: {}  Confidence: {}\n", view.mode, view.confidence);
    println!("{}", view.answer);
    if !view.sources.is_empty() {
        println!("\nSources:");
        for s in &view.sources {
            println!("  - {}, Section {} (score {:.2}): {}", s.act, s.section, s.score, preview(&s.text, 160));
        }
    }
    Ok(())
}

async fn interactive(ctx: &RagContext, json: bool) -> anyhow::Result<()> {
    println!("Nyay Sathi ({} sections loaded). Type 'exit' to quit.", ctx.status().chunks);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("\nAsk a legal question: ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let question = line?;
        let question = question.trim();
        if question.is_empty() { continue; }
        if matches!(question.to_ascii_lowercase().as_str(), "exit" | "quit") { break; }
        match ctx.answer(question).await {
            Ok(answer) => print_answer(&answer, json)?,
            Err(e) => eprintln!("Error: {}", e),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args: Vec<String> = env::args().skip(1).collect();
    let json = args.iter().any(|a| a == "--json");
    let question = args.iter().find(|a| !a.starts_with("--")).cloned();

    let settings = load_settings()?;
    let ctx = RagContext::from_settings(&settings).await?;

    match question {
        None => interactive(&ctx, json).await,
        Some(q) => match ctx.answer(&q).await {
            Ok(answer) => print_answer(&answer, json),
            Err(Error::EmptyQuery) => {
                eprintln!("Error: {}", Error::EmptyQuery);
                std::process::exit(1);
            }
            Err(e) => Err(e.into()),
        },
    }
}

use anyhow::Result;
use futures::{stream, StreamExt};
use mcpdeck_stream::{decode_chunk_stream, render_turn, RenderEvent};
use std::convert::Infallible;

// Replays a captured chat stream (one record per line) through the interpreter.
//
//   cargo run -p mcpdeck-stream --example replay_stream -- capture.txt
#[tokio::main]
async fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: replay_stream <capture-file>"))?;

    let raw = tokio::fs::read(&path).await?;
    println!("=== Replaying {} ({} bytes) ===\n", path, raw.len());

    let source = stream::iter(vec![Ok::<_, Infallible>(raw)]);
    let mut events = render_turn(decode_chunk_stream(source));

    while let Some(event) = events.next().await {
        match event {
            RenderEvent::Text { text } => print!("{}", text),
            RenderEvent::Reasoning { reasoning } => println!("\n[reasoning] {}", reasoning),
            RenderEvent::ToolCall { tool_call, web_search } => {
                if web_search {
                    println!("\n[Searching the web...]");
                } else {
                    println!("\n[tool call] {} {}", tool_call.name, tool_call.args);
                }
            }
            RenderEvent::ToolResult { tool_result } => {
                println!("\n[tool result] {} ({:?})", tool_result.name, tool_result.kind);
            }
            RenderEvent::Error { error } => println!("\n[error] {}", error),
            RenderEvent::Finish { finish_reason } => {
                println!("\n[finish] {}", finish_reason.unwrap_or_default());
            }
        }
    }

    println!("\n\n=== Done ===");
    Ok(())
}

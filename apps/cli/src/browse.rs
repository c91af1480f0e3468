//! Interactive session. User input and completions are handled on the same
//! task, so results render as they arrive while the prompt stays usable.

use anyhow::{Result, bail};
use console::style;
use jumptube_core::{AppOrchestrator, events::SlotKind};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::render::{print_overlay, print_search_state};

#[derive(Debug, PartialEq, Eq)]
enum BrowseCommand<'a> {
    Search(&'a str),
    Summary(usize),
    Find(usize),
    Ask(&'a str),
    Close,
    Help,
    Quit,
    Empty,
}

/// Keywords only count as commands when their argument fits; anything else
/// is a search query.
fn parse(line: &str) -> BrowseCommand<'_> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match (head, rest) {
        ("", _) => BrowseCommand::Empty,
        ("quit" | "exit", "") => BrowseCommand::Quit,
        ("help" | "?", "") => BrowseCommand::Help,
        ("close", "") => BrowseCommand::Close,
        ("ask", prompt) => BrowseCommand::Ask(prompt),
        ("summary", n) => match n.parse() {
            Ok(n) => BrowseCommand::Summary(n),
            Err(_) => BrowseCommand::Search(line),
        },
        ("find", n) => match n.parse() {
            Ok(n) => BrowseCommand::Find(n),
            Err(_) => BrowseCommand::Search(line),
        },
        _ => BrowseCommand::Search(line),
    }
}

fn print_help() {
    println!("{}", style("Commands:").bold());
    println!("  {}      search videos", style("<query>").cyan());
    println!("  {}    summarize result N", style("summary N").cyan());
    println!("  {}       search inside result N", style("find N").cyan());
    println!("  {} search inside the open video", style("ask <prompt>").cyan());
    println!("  {}        close the open overlay", style("close").cyan());
    println!("  {}         leave", style("quit").cyan());
}

/// Locator of result `n` (1-based) of the current search.
fn result_url(app: &AppOrchestrator, n: usize) -> Result<String> {
    let Some(result) = app.search_state().value() else {
        bail!("no search results yet");
    };
    match n.checked_sub(1).and_then(|i| result.items.get(i)) {
        Some(item) => Ok(item.canonical_url.clone()),
        None => bail!("no result #{n} (1-{})", result.items.len()),
    }
}

fn dispatch(app: &mut AppOrchestrator, command: BrowseCommand<'_>, limit: u32) -> Result<()> {
    match command {
        BrowseCommand::Search(query) => {
            app.run_search(query, limit)?;
            print_search_state(app.search_state());
        }
        BrowseCommand::Summary(n) => {
            let video = result_url(app, n)?;
            app.open_summary(&video)?;
            print_overlay(&app.overlay_state());
        }
        BrowseCommand::Find(n) => {
            let video = result_url(app, n)?;
            app.open_in_video_search(&video)?;
            print_overlay(&app.overlay_state());
        }
        BrowseCommand::Ask(prompt) => {
            app.submit_in_video_query(prompt, None)?;
            print_overlay(&app.overlay_state());
        }
        BrowseCommand::Close => {
            app.close_overlay();
            println!("{}", style("Closed.").dim());
        }
        BrowseCommand::Help => print_help(),
        BrowseCommand::Quit | BrowseCommand::Empty => {}
    }
    Ok(())
}

pub async fn run(mut app: AppOrchestrator, limit: u32) -> Result<()> {
    print_help();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let command = parse(&line);
                if command == BrowseCommand::Quit {
                    break;
                }
                if let Err(e) = dispatch(&mut app, command, limit) {
                    eprintln!("{} {}", style("Error:").red().bold(), e);
                }
            }
            Some(delivery) = app.next_completion() => {
                if delivery.applied {
                    match delivery.slot {
                        SlotKind::Search => print_search_state(app.search_state()),
                        SlotKind::InVideoSearch | SlotKind::Summary => {
                            print_overlay(&app.overlay_state())
                        }
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    let metrics = app.metrics();
    info!(
        session_id = %app.session_id(),
        published = metrics.published,
        stale = metrics.stale,
        "browse session closed"
    );
    Ok(())
}

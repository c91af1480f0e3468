use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use jumptube_core::{ErrorInfo, MomentMatches, OperationState, OverlayView, SearchResult, SummaryText};

const DESCRIPTION_WIDTH: usize = 120;

pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let spinner_style = ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(spinner_style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}

pub fn print_header() {
    println!(
        "\n{}  {}\n",
        style("jumptube").cyan().bold(),
        style("Video Search").dim()
    );
}

pub fn print_rule() {
    println!("{}", style("─".repeat(60)).dim());
}

pub fn format_search_result(result: &SearchResult) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} {}\n\n",
        style(format!("Results for \"{}\"", result.query)).bold(),
        style(format!("({} shown)", result.items.len())).dim()
    ));

    if result.items.is_empty() {
        output.push_str(&format!("{}\n", style("No videos found.").yellow()));
        return output;
    }

    for (i, item) in result.items.iter().enumerate() {
        output.push_str(&format!(
            "{:>3}. {}\n",
            style(i + 1).cyan(),
            style(&item.title).bold()
        ));
        output.push_str(&format!("     {}\n", style(&item.canonical_url).underlined()));
        let description = item.description.trim();
        if !description.is_empty() {
            output.push_str(&format!("     {}\n", style(truncate(description)).dim()));
        }
    }

    output
}

pub fn format_moments(moments: &MomentMatches) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} {}\n\n",
        style(format!("Moments for \"{}\"", moments.prompt)).bold(),
        style(&moments.video_ref).dim()
    ));

    if moments.matches.is_empty() {
        output.push_str(&format!("{}\n", style("No matching moments.").yellow()));
        return output;
    }

    for m in &moments.matches {
        output.push_str(&format!(
            "  [{}] {}\n",
            style(&m.offset_label).yellow(),
            m.snippet.trim()
        ));
        output.push_str(&format!("         {}\n", style(&m.jump_url).underlined()));
    }

    output
}

pub fn format_summary(summary: &SummaryText) -> String {
    format!(
        "{} {}\n\n{}\n",
        style("Summary").bold(),
        style(&summary.video_ref).dim(),
        summary.body.trim()
    )
}

pub fn format_failure(error: &ErrorInfo) -> String {
    format!(
        "{} {}",
        style(format!("Error ({}):", error.cause)).red().bold(),
        error.message
    )
}

/// `Idle` prints nothing.
pub fn print_search_state(state: &OperationState<SearchResult>) {
    match state {
        OperationState::Idle => {}
        OperationState::Loading => println!("{}", style("Searching...").dim()),
        OperationState::Success(result) => print!("{}", format_search_result(result)),
        OperationState::Failed(error) => eprintln!("{}", format_failure(error)),
    }
}

pub fn print_overlay(view: &OverlayView<'_>) {
    match view {
        OverlayView::Closed => {}
        OverlayView::InVideoSearch { video_ref, state } => match state {
            OperationState::Idle => println!(
                "{} {}",
                style("In-video search open for").dim(),
                style(video_ref).cyan()
            ),
            OperationState::Loading => println!("{}", style("Searching inside video...").dim()),
            OperationState::Success(moments) => print!("{}", format_moments(moments)),
            OperationState::Failed(error) => eprintln!("{}", format_failure(error)),
        },
        OverlayView::Summary { state, .. } => match state {
            OperationState::Idle => {}
            OperationState::Loading => println!("{}", style("Summarizing...").dim()),
            OperationState::Success(summary) => print!("{}", format_summary(summary)),
            OperationState::Failed(error) => eprintln!("{}", format_failure(error)),
        },
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= DESCRIPTION_WIDTH {
        return text.to_string();
    }
    let cut: String = text.chars().take(DESCRIPTION_WIDTH - 1).collect();
    format!("{}…", cut.trim_end())
}

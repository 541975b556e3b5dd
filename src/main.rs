#[cfg(feature = "line")]
mod line_mode;
#[cfg(feature = "tui")]
mod render_help;
#[cfg(feature = "tui")]
mod tui_mode;

use anyhow::Result;
use clap::Parser as ClapParser;
use scicalc::format::{format_number, format_with_spaces};
use scicalc::{evaluate_with_trace, EvaluationTrace};

#[derive(ClapParser, Debug)]
#[command(version, about = "Scientific calculator with degree-mode trigonometry", long_about = None)]
struct Args {
    /// Evaluate one expression, print the result and exit
    #[arg(short, long, value_name = "EXPR")]
    eval: Option<String>,

    /// Use the line editor instead of the keypad screen
    #[arg(short, long, conflicts_with = "eval")]
    line: bool,

    /// Show step-by-step evaluation
    #[arg(short, long)]
    details: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    log::debug!("{:?}", args);

    if let Some(expression) = args.eval {
        let ok = run_once(&expression, args.details);
        std::process::exit(if ok { 0 } else { 1 });
    }

    if args.line {
        run_line(args.details)
    } else {
        run_tui(args.details)
    }
}

fn run_once(expression: &str, details: bool) -> bool {
    let mut trace = EvaluationTrace::new(details);
    match evaluate_with_trace(expression, &mut trace) {
        Ok(value) => {
            for (i, step) in trace.steps.iter().enumerate() {
                println!("  Step {}: {} = {}", i + 1, format_with_spaces(&step.operation), format_number(step.result));
            }
            println!("{}", format_number(value));
            true
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            false
        }
    }
}

#[cfg(feature = "line")]
fn run_line(details: bool) -> Result<()> {
    line_mode::run_line(details)
}

#[cfg(not(feature = "line"))]
fn run_line(_details: bool) -> Result<()> {
    anyhow::bail!("line mode is not compiled in; rebuild with `--features line`")
}

#[cfg(feature = "tui")]
fn run_tui(details: bool) -> Result<()> {
    tui_mode::run_tui(details)
}

#[cfg(not(feature = "tui"))]
fn run_tui(_details: bool) -> Result<()> {
    anyhow::bail!("keypad screen is not compiled in; rebuild with `--features tui` or use --eval")
}

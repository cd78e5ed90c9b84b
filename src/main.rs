#![allow(non_snake_case)]
use RustedPolyScope::Utils::logger::{init_logger, level_from_str};
use RustedPolyScope::Utils::task_parser::AnalysisTask;
use RustedPolyScope::numerical::analyzer::{FunctionAnalyzer, PlotFunction};
use RustedPolyScope::numerical::bracket_refine::Refinement;
use log::error;
use std::process;
use std::str::FromStr;

const USAGE: &str = "usage: RustedPolyScope [EXPRESSION] [--task FILE] [--derive N] \
[--refine none|bisection|newton] [--collapse] [--log LEVEL] [--logfile]";

fn fail(msg: &str) -> ! {
    eprintln!("{}\n{}", msg, USAGE);
    process::exit(2);
}

fn next_arg(args: &mut impl Iterator<Item = String>, flag: &str) -> String {
    args.next()
        .unwrap_or_else(|| fail(&format!("missing value after {}", flag)))
}

/// command line on top of the task document: flags given here override the file
fn read_task() -> AnalysisTask {
    let mut args = std::env::args().skip(1);
    let mut task = AnalysisTask::default();
    let mut expression: Option<String> = None;
    let mut derive: Option<usize> = None;
    let mut refinement: Option<Refinement> = None;
    let mut level = None;
    let mut log_to_file = false;
    let mut collapse = false;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--task" => {
                let path = next_arg(&mut args, "--task");
                task = AnalysisTask::from_file(&path)
                    .unwrap_or_else(|e| fail(&format!("{}: {}", path, e)));
            }
            "--derive" => {
                let n = next_arg(&mut args, "--derive");
                derive = Some(
                    n.parse()
                        .unwrap_or_else(|_| fail(&format!("--derive expects a count, got '{}'", n))),
                );
            }
            "--refine" => {
                let method = next_arg(&mut args, "--refine");
                refinement = Some(
                    Refinement::from_str(&method.to_lowercase())
                        .unwrap_or_else(|_| fail(&format!("unknown refinement '{}'", method))),
                );
            }
            "--log" => {
                let name = next_arg(&mut args, "--log");
                level = Some(
                    level_from_str(&name)
                        .unwrap_or_else(|| fail(&format!("unknown log level '{}'", name))),
                );
            }
            "--logfile" => log_to_file = true,
            "--collapse" => collapse = true,
            "-h" | "--help" => {
                println!("{}", USAGE);
                process::exit(0);
            }
            _ if expression.is_none() => expression = Some(arg),
            _ => fail(&format!("unexpected argument '{}'", arg)),
        }
    }
    if let Some(expression) = expression {
        task.expression = expression;
    }
    if let Some(n) = derive {
        task.derive = n;
    }
    if let Some(method) = refinement {
        task.refinement = method;
    }
    if let Some(level) = level {
        task.log_level = level;
    }
    task.log_to_file |= log_to_file;
    task.collapse |= collapse;
    task
}

fn main() {
    let task = read_task();
    init_logger(task.log_level, task.log_to_file);

    let mut analyzer = match FunctionAnalyzer::from_task(&task) {
        Ok(analyzer) => analyzer,
        Err(e) => {
            error!("cannot analyse '{}': {}", task.expression, e);
            eprintln!("cannot analyse '{}': {}", task.expression, e);
            process::exit(1);
        }
    };
    for _ in 0..task.derive {
        analyzer.derive();
    }
    let report = analyzer.report();
    println!("{}", report);
    for line in report.overlay_lines() {
        println!("{}", line);
    }
}

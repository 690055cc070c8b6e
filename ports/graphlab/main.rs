/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::io::BufRead;
use std::process::ExitCode;
use std::time::Duration;

use graphlab::app::{AppError, GraphLabApp};
use graphlab::cli::{Cli, Command, LayoutChoice, RunOptions, cli};
use graphlab::config::{KeyBindings, Settings};
use graphlab::input::{CommandResult, apply_command, parse_command};
use graphlab::layout::LayoutKind;
use graphlab::render::TextRenderer;
use graphlab::run::RunRequest;
use graphlab::timer::ThreadTimers;
use log::debug;

type App = GraphLabApp<ThreadTimers>;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = cli().run();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("graphlab: {e}");
            ExitCode::FAILURE
        },
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let keys = settings.keys.clone();
    let renderer = Box::new(TextRenderer::new(std::io::stdout()));
    let mut app = GraphLabApp::new(ThreadTimers::new(), renderer, settings);

    if let Command::ImportMatrix {
        labels,
        directed,
        matrix,
    } = &cli.command
    {
        let text = std::fs::read_to_string(matrix)?;
        app.import_matrix(&text, labels.as_deref(), *directed)?;
        app.save(&cli.graph)?;
        println!(
            "Imported {} vertices and {} edges into {}",
            app.graph().vertex_count(),
            app.graph().edge_count(),
            cli.graph.display()
        );
        return Ok(());
    }

    app.load(&cli.graph)?;

    match cli.command {
        Command::Bfs { run, source } => {
            let request = RunRequest::bfs(app.resolve(&source)?);
            traverse(&mut app, request, &run, &keys)
        },
        Command::Dfs { run, source } => {
            let request = RunRequest::dfs(app.resolve(&source)?);
            traverse(&mut app, request, &run, &keys)
        },
        Command::Dijkstra {
            run,
            source,
            target,
        } => {
            let request = RunRequest::dijkstra(app.resolve(&source)?, app.resolve(&target)?);
            traverse(&mut app, request, &run, &keys)
        },
        Command::Components { colour } => {
            for (i, component) in app.components()?.iter().enumerate() {
                println!("{}: {}", i + 1, labels(&app, component));
            }
            if colour {
                app.colour_components()?;
                app.save(&cli.graph)?;
            }
            Ok(())
        },
        Command::CutVertices => {
            let cut = app.cut_vertices()?;
            if cut.is_empty() {
                println!("No cut vertices");
            } else {
                println!("{}", labels(&app, &cut));
            }
            Ok(())
        },
        Command::Bridges => {
            let bridges = app.bridges()?;
            if bridges.is_empty() {
                println!("No bridges");
            }
            for bridge in bridges {
                println!(
                    "#{}: {} - {}",
                    bridge.edge,
                    label(&app, &bridge.from),
                    label(&app, &bridge.to)
                );
            }
            Ok(())
        },
        Command::Layout { root, kind } => {
            let kind = match kind {
                LayoutChoice::Force => LayoutKind::Force,
                LayoutChoice::Circular => LayoutKind::Circular,
                LayoutChoice::Grid => LayoutKind::Grid,
                LayoutChoice::Tree => {
                    let root = match root {
                        Some(root) => app.resolve(&root)?,
                        None => app.graph().vertex_ids().next().cloned().unwrap_or_default(),
                    };
                    LayoutKind::Tree { root }
                },
            };
            app.apply_layout(&kind)?;
            app.save(&cli.graph)?;
            Ok(())
        },
        Command::ExportMatrix { output } => {
            let text = app.export_matrix()?;
            match output {
                Some(path) => std::fs::write(path, text)?,
                None => print!("{text}"),
            }
            Ok(())
        },
        Command::ImportMatrix { .. } => Ok(()),
    }
}

/// Run a traversal to completion, on timer ticks or on terminal commands
fn traverse(app: &mut App, request: RunRequest, options: &RunOptions, keys: &KeyBindings) -> Result<(), AppError> {
    let request = if options.auto {
        request.auto(Duration::from_millis(options.delay.unwrap_or(0)))
    } else {
        request
    };
    app.start_traversal(&request)?;

    if options.auto {
        let ticks = app.timers().ticks().clone();
        while app.is_running() {
            let Ok(tick) = ticks.recv() else {
                break;
            };
            app.on_timer(tick.id);
        }
        return Ok(());
    }

    eprintln!("{}", keys.describe());
    for line in std::io::stdin().lock().lines() {
        match apply_command(app, &parse_command(&line?, keys)) {
            CommandResult::Continue(_) => {},
            CommandResult::Done(status) => {
                debug!("Run ended: {status:?}");
                break;
            },
            CommandResult::ShowHelp => eprintln!("{}", keys.describe()),
            CommandResult::Unrecognised(word) => {
                eprintln!("Unknown command `{word}`. {}", keys.describe())
            },
        }
    }

    // Input closed before the run ended
    app.cancel_run();
    Ok(())
}

fn label(app: &App, id: &str) -> String {
    app.graph()
        .vertex(id)
        .map_or_else(|| id.to_string(), |v| v.label.clone())
}

fn labels(app: &App, ids: &[String]) -> String {
    ids.iter()
        .map(|id| label(app, id))
        .collect::<Vec<_>>()
        .join(", ")
}

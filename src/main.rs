// Console dashboard.
//
// Stands in for the map/chart front end: it lists the portfolio, accepts
// selections from a "menu" and a "map" channel, runs what-if previews and
// exports the tables. All state lives in one `Session`; every action ends by
// re-rendering the current selection.
use portfolio_dashboard::loader::load_portfolio;
use portfolio_dashboard::store::sample_portfolio;
use portfolio_dashboard::util::{format_int, format_percent};
use portfolio_dashboard::{
    output, reports, MetricsConfig, MetricsEngine, ProjectStore, SelectionEvent, Session,
};
use std::error::Error;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

struct Args {
    data: Option<PathBuf>,
    config: Option<PathBuf>,
}

fn parse_args() -> Args {
    let mut args = Args {
        data: None,
        config: None,
    };
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--data" => args.data = it.next().map(PathBuf::from),
            "--config" => args.config = it.next().map(PathBuf::from),
            _ => eprintln!("Ignoring unknown argument: {}", arg),
        }
    }
    args
}

/// Print `prompt` and read one trimmed line. `None` on end of input.
fn read_input(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

fn load_store(data: Option<&Path>) -> Result<ProjectStore, Box<dyn Error>> {
    match data {
        Some(path) => {
            let (store, report) = load_portfolio(path)?;
            println!(
                "Loaded {} projects from {} ({} placed on the map, {} with a reported EAC).\n",
                format_int(report.total_rows),
                path.display(),
                format_int(report.with_coordinates),
                format_int(report.with_reported_eac)
            );
            Ok(store)
        }
        None => {
            println!("No --data given; using the built-in sample portfolio.\n");
            Ok(sample_portfolio()?)
        }
    }
}

fn show_overview(session: &Session) {
    let rows = reports::portfolio_rows(session.store(), session.engine());
    output::preview_table(
        "Portfolio Inventory",
        Some("EAC = Budget / POC"),
        &rows,
        rows.len(),
    );
}

fn show_selection(session: &Session) {
    match session.render() {
        Ok(Some(view)) => {
            let title = format!("{} - {}", view.record.name, view.record.country);
            let note = session
                .what_if()
                .map(|p| format!("what-if at {} complete", format_percent(p)));
            let card = reports::project_card(&view);
            output::preview_table(&title, note.as_deref(), &card, card.len());
        }
        Ok(None) => println!("No project selected.\n"),
        Err(e) => println!("Metrics unavailable: {}\n", e),
    }
}

fn choose_from_menu(session: &mut Session) {
    let names: Vec<String> = session.store().names().map(str::to_owned).collect();
    for (i, name) in names.iter().enumerate() {
        println!("[{}] {}", i + 1, name);
    }
    let Some(input) = read_input("Select a project for deep-dive analysis: ") else {
        return;
    };
    let name = match input.parse::<usize>() {
        Ok(n) if (1..=names.len()).contains(&n) => names[n - 1].clone(),
        _ => input,
    };
    if let Err(e) = session.apply_selection(&SelectionEvent::menu(name)) {
        println!("{}\n", e);
    }
}

/// A map click arrives either as a project name or as a `lat,lon` pair that
/// is snapped to the nearest marker.
fn map_click(session: &mut Session) {
    let Some(input) = read_input("Map click (project name or lat,lon): ") else {
        return;
    };
    let coords = input
        .split_once(',')
        .and_then(|(a, b)| Some((a.trim().parse::<f64>().ok()?, b.trim().parse::<f64>().ok()?)));
    let name = match coords {
        Some((lat, lon)) => match session.store().nearest(lat, lon) {
            Some(r) => r.name.clone(),
            None => {
                println!("No projects on the map.\n");
                return;
            }
        },
        None => input,
    };
    if let Err(e) = session.apply_selection(&SelectionEvent::map(name)) {
        println!("{}\n", e);
    }
}

fn what_if(session: &mut Session) {
    if !session.selection().is_selected() {
        println!("Select a project first.\n");
        return;
    }
    let Some(input) = read_input("Simulated percent complete (0-100, blank to reset): ") else {
        return;
    };
    if input.is_empty() {
        session.set_what_if(None);
        return;
    }
    match input.trim_end_matches('%').parse::<f64>() {
        Ok(pct) => session.set_what_if(Some(pct / 100.0)),
        Err(_) => println!("Invalid percentage.\n"),
    }
}

fn export(session: &Session) {
    let store = session.store();
    let engine = session.engine();

    let file1 = Path::new("portfolio_inventory.csv");
    if let Err(e) = output::write_csv(file1, &reports::portfolio_rows(store, engine)) {
        eprintln!("Write error: {}", e);
    }
    let file2 = Path::new("map_markers.json");
    if let Err(e) = output::write_json(file2, &reports::map_markers(store)) {
        eprintln!("Write error: {}", e);
    }
    let summary = reports::generate_summary(store, engine);
    let file3 = Path::new("portfolio_summary.json");
    if let Err(e) = output::write_json(file3, &summary) {
        eprintln!("Write error: {}", e);
    }
    println!(
        "Exported {}, {} and {} ({} projects, {} forecast overruns).\n",
        file1.display(),
        file2.display(),
        file3.display(),
        summary.total_projects,
        summary.forecast_overruns
    );
}

fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = parse_args();
    let config = match &args.config {
        Some(path) => MetricsConfig::load(path)?,
        None => MetricsConfig::default(),
    };
    info!(poc_floor = config.poc_floor, "starting dashboard");

    let store = Arc::new(load_store(args.data.as_deref())?);
    let mut session = Session::new(store, MetricsEngine::new(config));

    loop {
        println!("Project Control Dashboard");
        println!("[1] Portfolio overview");
        println!("[2] Choose project");
        println!("[3] Map click");
        println!("[4] What-if percent complete");
        println!("[5] Clear selection");
        println!("[6] Export reports");
        println!("[0] Exit\n");
        let Some(choice) = read_input("Enter choice: ") else {
            break;
        };
        println!();
        match choice.as_str() {
            "1" => show_overview(&session),
            "2" => choose_from_menu(&mut session),
            "3" => map_click(&mut session),
            "4" => what_if(&mut session),
            "5" => session.clear_selection(),
            "6" => export(&session),
            "0" => {
                println!("Exiting the program.");
                break;
            }
            _ => {
                println!("Invalid choice. Please enter 0-6.\n");
                continue;
            }
        }
        show_selection(&session);
    }
    Ok(())
}

// Entry point and high-level CLI flow.
//
// - Option [1] fetches every configured sheet and builds a fresh snapshot.
// - Option [2] prints the overview, staff leaderboard, month comparison and
//   per-site timelines, and exports the leaderboard and summary.
// - Option [3] picks the report month (defaults to last calendar month).
use once_cell::sync::Lazy;
use seo_rank_report::config::DashboardConfig;
use seo_rank_report::keywords::insights;
use seo_rank_report::month::format_month_display;
use seo_rank_report::reports::{comparison_rows, leaderboard_rows, timeline_rows};
use seo_rank_report::types::KeywordRecord;
use seo_rank_report::util::{format_int, format_percent, format_signed_percent};
use seo_rank_report::{fetch, logging, output, Dashboard, MonthKey};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tracing::error;

// The current snapshot is swapped wholesale on every successful load.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| {
    Mutex::new(AppState {
        data: None,
        month: None,
    })
});

struct AppState {
    data: Option<Arc<Dashboard>>,
    month: Option<MonthKey>,
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

fn prompt_back_to_menu() -> bool {
    loop {
        match read_line("Back to Report Selection (Y/N): ").to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn current_snapshot() -> (Option<Arc<Dashboard>>, Option<MonthKey>) {
    let state = APP_STATE.lock().unwrap_or_else(|e| e.into_inner());
    (state.data.clone(), state.month)
}

/// Handle option [1]: fetch all sheets and replace the snapshot.
fn handle_load(config: &DashboardConfig) {
    println!("Loading {} sheets...", config.sites.len());
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {}\n", e);
            return;
        }
    };
    let fetched = match runtime.block_on(fetch::fetch_all(config)) {
        Ok(f) => f,
        Err(e) => {
            error!(error = %e, "fetch failed");
            eprintln!("{}\n", e);
            return;
        }
    };
    let failed = fetched.iter().filter(|f| f.body.is_err()).count();

    let (previous, _) = current_snapshot();
    match Dashboard::assemble(config, fetched, previous.as_deref()) {
        Ok(dash) => {
            let keywords: usize = dash
                .sites()
                .iter()
                .flat_map(|s| s.months.values())
                .map(|b| b.records.len())
                .sum();
            println!(
                "Loaded {} sites, {} months, {} keyword rows.",
                dash.sites().len(),
                dash.month_axis().len(),
                format_int(keywords)
            );
            if failed > 0 {
                println!("Note: {} sheets could not be refreshed this time.", failed);
            }
            println!();
            let mut state = APP_STATE.lock().unwrap_or_else(|e| e.into_inner());
            state.data = Some(Arc::new(dash));
        }
        Err(e) => {
            error!(error = %e, "no sheets loaded");
            eprintln!("{}\n", e);
        }
    }
}

fn join_names(list: &[&KeywordRecord]) -> String {
    if list.is_empty() {
        return "-".to_string();
    }
    list.iter().map(|r| r.identity()).collect::<Vec<_>>().join(", ")
}

/// Handle option [2]: print every report and export the leaderboard.
fn handle_generate_reports(config: &DashboardConfig) {
    let (data, chosen) = current_snapshot();
    let Some(dash) = data else {
        println!("Error: No data loaded. Please load the sheets first (option 1).\n");
        return;
    };
    let month = chosen.or_else(|| dash.default_report_month(config.today()));
    println!("Report month: {}\n", format_month_display(month));

    let overview = dash.overview(month);
    println!(
        "Keywords: {} | Achieved: {} ({}) | Not achieved: {} | Up: {} / Down: {} | vs previous month: {}\n",
        format_int(overview.total),
        format_int(overview.achieved),
        format_percent(overview.percent),
        format_int(overview.not_achieved),
        overview.increased,
        overview.decreased,
        format_signed_percent(overview.percent_change)
    );

    if let Some(key) = month {
        let rows = leaderboard_rows(
            &dash.staff_ranking(key),
            dash.kpi_threshold(),
            dash.warning_threshold(),
        );
        output::preview_table(
            "Staff Leaderboard",
            Some(
                format!(
                    "KPI threshold {}, warning below {}",
                    format_percent(dash.kpi_threshold()),
                    format_percent(dash.warning_threshold())
                )
                .as_str(),
            ),
            &rows,
            rows.len(),
        );
        let file = "leaderboard.csv";
        match output::write_csv(file, &rows) {
            Ok(()) => println!("(Leaderboard exported to {})\n", file),
            Err(e) => eprintln!("Write error: {}", e),
        }
    }

    if let Some((first, second)) = dash.default_comparison_months() {
        let rows = comparison_rows(&dash.comparison(first, second));
        output::preview_table(
            "Month Comparison",
            Some(format!("{} → {}", first, second).as_str()),
            &rows,
            rows.len(),
        );
    }

    for site in dash.sites() {
        let Ok(timeline) = dash.timeline(&site.site_name) else {
            continue;
        };
        let staff = if site.staff_name.is_empty() { "N/A" } else { site.staff_name.as_str() };
        output::preview_table(
            &format!("{} ({})", site.site_name, staff),
            Some(site.site_url.as_str()),
            &timeline_rows(&timeline),
            6,
        );
        let months: Vec<String> = site
            .months_descending()
            .iter()
            .map(|k| k.to_string())
            .collect();
        println!("  Months: {}", months.join(", "));
        let latest = dash.latest_month_with_data(&site.site_name).ok().and_then(|l| l.month);
        if let Some(bucket) = latest.and_then(|k| site.bucket(k)) {
            let ins = insights(&bucket.records);
            println!("  Top performers:  {}", join_names(&ins.top_performers));
            println!("  Most improved:   {}", join_names(&ins.most_improved));
            println!("  Needs attention: {}\n", join_names(&ins.needs_attention));
        }
    }

    match output::write_json("summary.json", &overview) {
        Ok(()) => println!("Summary saved to summary.json\n"),
        Err(e) => eprintln!("Write error: {}", e),
    }
}

/// Handle option [3]: choose the month reports are generated for.
fn handle_select_month() {
    let (data, _) = current_snapshot();
    if let Some(dash) = &data {
        let axis: Vec<String> = dash.month_axis().iter().rev().map(|k| k.to_string()).collect();
        println!("Available months: {}", axis.join(", "));
    }
    let raw = read_line("Month (e.g. T1/2026, empty for default): ");
    let mut state = APP_STATE.lock().unwrap_or_else(|e| e.into_inner());
    if raw.is_empty() {
        state.month = None;
        println!("Using the default report month.\n");
        return;
    }
    match raw.parse::<MonthKey>() {
        Ok(key) => {
            state.month = Some(key);
            println!("Report month set to {}.\n", format_month_display(Some(key)));
        }
        Err(e) => println!("{}\n", e),
    }
}

fn main() {
    let config = match DashboardConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };
    logging::init_logging(&config.log_level);

    loop {
        println!("SEO Keyword Report:");
        println!("[1] Load the sheets");
        println!("[2] Generate Reports");
        println!("[3] Select report month\n");
        match read_line("Enter choice: ").as_str() {
            "1" => handle_load(&config),
            "2" => {
                println!();
                handle_generate_reports(&config);
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "3" => handle_select_month(),
            _ => println!("Invalid choice. Please enter 1, 2 or 3.\n"),
        }
    }
}

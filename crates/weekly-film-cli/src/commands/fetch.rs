use crate::commands::load_settings;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;
use weekly_film_config::PathManager;
use weekly_film_core::{display_film, FilmBoard};
use weekly_film_models::FilmRecord;
use weekly_film_sources::create_feed;

fn spinner(output: &Output) -> Option<ProgressBar> {
    if !output.is_human() || output.is_quiet() || !std::io::stderr().is_terminal() {
        return None;
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message("Fetching upcoming films...");
    Some(spinner)
}

fn film_table(films: &[FilmRecord]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("#").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Title").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Release").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Category").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Director").add_attribute(comfy_table::Attribute::Bold),
    ]);
    for (index, film) in films.iter().enumerate() {
        let display = display_film(film);
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(display.title),
            Cell::new(display.full_date),
            Cell::new(display.category),
            Cell::new(display.director),
        ]);
    }
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

/// One refresh cycle; prints the film list and exits non-zero on failure.
pub async fn run_fetch(api_key_override: Option<String>, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let (config, credentials) = load_settings(&path_manager)?;

    let feed = create_feed(&config, &credentials, api_key_override)
        .map_err(|e| eyre!("Failed to create film feed: {}", e))?;
    let board = FilmBoard::new(Arc::from(feed));

    let progress = spinner(output);
    let result = board.refresh().await;
    if let Some(progress) = &progress {
        progress.finish_and_clear();
    }

    let outcome = result.map_err(|e| eyre!("Failed to fetch upcoming films: {}", e))?;

    if output.is_human() {
        if output.is_quiet() {
            return Ok(());
        }
        println!("{}", film_table(&outcome.film_list));
        output.success(format!(
            "{} films (updated {})",
            outcome.film_list.len(),
            outcome.update_time
        ));
    } else {
        output.sensor(&board.film_data_sensor().await);
    }

    Ok(())
}

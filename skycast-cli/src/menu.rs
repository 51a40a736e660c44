use anyhow::Result;
use skycast_core::{City, FavoritesError, FavoritesStore, MAX_FAVORITES, WeatherGateway};
use tracing::debug;

use crate::view::{self, Selection};

const CITY_SEARCH_ERROR: &str =
    "Error retrieving cities from OpenWeather. Please check your connection and/or try again later.";
const WEATHER_ERROR: &str =
    "Error retrieving weather from OpenWeather. Please check your connection and/or try again later.";
const CAPACITY_MESSAGE: &str =
    "You have reached the maximum amount of favorites! Please remove one before adding another.";

/// The main menu loop. Each workflow runs to completion and falls back here;
/// only option 5 (or a prompt interrupt) leaves the loop.
pub async fn run(gateway: &dyn WeatherGateway, favorites: &FavoritesStore) -> Result<()> {
    loop {
        println!();
        println!("1: Look up the weather in a city by name.");
        println!("2: Add a city to favorites.");
        println!("3: Remove a city from favorites.");
        println!("4: Display the weather in your favorited cities.");
        println!("5: Close the program.");

        let action = view::ask("Please select an action by its number:")?;
        match action.trim() {
            "1" => lookup_weather(gateway).await?,
            "2" => add_favorite(gateway, favorites).await?,
            "3" => remove_favorite(favorites)?,
            "4" => list_favorite_weathers(gateway, favorites).await?,
            "5" => return Ok(()),
            other => println!("\nInvalid selection '{other}'. Please try again."),
        }
    }
}

/// Option 1: resolve a city, fetch its weather, show it.
async fn lookup_weather(gateway: &dyn WeatherGateway) -> Result<()> {
    let Some(city) = resolve_city(gateway).await? else {
        return Ok(());
    };

    match gateway.current_weather(city.lat, city.lon).await {
        Ok(snapshot) => println!("\n{}", view::render_weather(&city, &snapshot)),
        Err(err) => {
            debug!(error = %err, "current-weather request failed");
            println!("\n{WEATHER_ERROR}");
        }
    }

    view::pause()
}

/// Option 2: resolve a city and persist it. A full list skips the whole
/// resolution flow.
async fn add_favorite(gateway: &dyn WeatherGateway, favorites: &FavoritesStore) -> Result<()> {
    if favorites.load_all()?.len() >= MAX_FAVORITES {
        println!("\n{CAPACITY_MESSAGE}");
        return Ok(());
    }

    let Some(city) = resolve_city(gateway).await? else {
        return Ok(());
    };

    match favorites.add(city) {
        Ok(()) => println!("\nAdded to your favorites."),
        Err(FavoritesError::Full { .. }) => println!("\n{CAPACITY_MESSAGE}"),
        Err(err) => return Err(err.into()),
    }

    Ok(())
}

/// Option 3: pick a stored favorite by number and remove it.
fn remove_favorite(favorites: &FavoritesStore) -> Result<()> {
    let stored = favorites.load_all()?;
    if stored.is_empty() {
        println!("\nYou have no favorites to remove!");
        return Ok(());
    }

    view::print_numbered(&stored);
    let input = view::ask(
        "Please enter the number matching the city you would like to remove (blank line to cancel):",
    )?;

    match view::parse_selection(&input, stored.len()) {
        Selection::Chosen(index) => match favorites.remove_at(index) {
            Ok(removed) => println!("\nYou have removed: {}", removed.label()),
            Err(FavoritesError::OutOfRange { index, .. }) => {
                println!("\nError: '{}' is not a valid option. Please try again.", index + 1);
            }
            Err(err) => return Err(err.into()),
        },
        Selection::Cancelled => {}
        Selection::Invalid(input) => {
            println!("\nError: '{input}' is not a valid option. Please try again.");
        }
    }

    Ok(())
}

/// Option 4: fetch and show current weather for every stored favorite, in
/// stored order, skipping individual failures.
async fn list_favorite_weathers(
    gateway: &dyn WeatherGateway,
    favorites: &FavoritesStore,
) -> Result<()> {
    let stored = favorites.load_all()?;
    if stored.is_empty() {
        println!("\nYou have no favorites to show the weather of. Try adding some!");
        return Ok(());
    }

    for report in favorite_reports(gateway, &stored).await {
        match report {
            Ok(block) => println!("\n{block}"),
            Err(_) => println!("\n{WEATHER_ERROR}"),
        }
    }

    view::pause()
}

/// One entry per favorite, in stored order: the rendered weather block, or
/// the fetch error so the caller can report it in place and move on.
async fn favorite_reports(
    gateway: &dyn WeatherGateway,
    favorites: &[City],
) -> Vec<Result<String>> {
    let mut reports = Vec::with_capacity(favorites.len());

    for city in favorites {
        match gateway.current_weather(city.lat, city.lon).await {
            Ok(snapshot) => reports.push(Ok(view::render_weather(city, &snapshot))),
            Err(err) => {
                debug!(error = %err, city = %city.label(), "favorite weather fetch failed");
                reports.push(Err(err));
            }
        }
    }

    reports
}

/// The shared resolution flow: prompt for a query, search, let the user pick
/// one candidate.
///
/// `Ok(None)` means the workflow was aborted — search failure, no matches,
/// or a cancelled/invalid selection — and the reason has already been
/// reported, exactly once.
async fn resolve_city(gateway: &dyn WeatherGateway) -> Result<Option<City>> {
    let name = view::ask("Please enter the name of the city (without state or country):")?;
    let state =
        view::ask_optional("State, if desired:", "ex: PA, NY. Submit a blank line to skip.")?;
    let country =
        view::ask_optional("Country, if desired:", "ex: US, GB. Submit a blank line to skip.")?;
    let limit_input = view::ask_optional(
        "How many potential matches would you like to choose from?",
        "blank uses the default of 5",
    )?;

    let query = build_query(&name, &state, &country);
    let limit = view::parse_limit(&limit_input);

    let candidates = match gateway.search_cities(&query, limit).await {
        Ok(candidates) => candidates,
        Err(err) => {
            debug!(error = %err, "city search failed");
            println!("\n{CITY_SEARCH_ERROR}");
            return Ok(None);
        }
    };

    if candidates.is_empty() {
        println!("\nNo matching cities found! Please try again.");
        return Ok(None);
    }

    view::print_numbered(&candidates);
    let input =
        view::ask("Please enter the number matching your desired city (blank line to cancel):")?;

    match view::parse_selection(&input, candidates.len()) {
        Selection::Chosen(index) => {
            let city = candidates[index].clone();
            println!("\nYou have selected: {}", city.label());
            Ok(Some(city))
        }
        Selection::Cancelled => Ok(None),
        Selection::Invalid(input) => {
            println!(
                "\nError: '{input}' is not a valid option. If you did not see your desired city, \
                 consider increasing the number of potential matches."
            );
            Ok(None)
        }
    }
}

/// Compose the geocoding query the way the API expects it:
/// `"name[, state][, country]"`.
fn build_query(name: &str, state: &str, country: &str) -> String {
    let mut query = name.to_string();
    if !state.is_empty() {
        query.push_str(", ");
        query.push_str(state);
    }
    if !country.is_empty() {
        query.push_str(", ");
        query.push_str(country);
    }
    query
}

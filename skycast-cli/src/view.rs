use anyhow::Result;
use inquire::{InquireError, Text};
use skycast_core::{City, DEFAULT_RESULT_LIMIT, WeatherSnapshot};

/// Outcome of parsing a 1-based numbered-list choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Blank line: the user declined to pick anything.
    Cancelled,
    /// Non-integer or out-of-range input, kept verbatim for the error message.
    Invalid(String),
    /// 0-based index into the presented list.
    Chosen(usize),
}

/// Read one line of input. Esc submits a blank line; Ctrl-C aborts the
/// program through the error path.
pub fn ask(message: &str) -> Result<String> {
    prompt_line(Text::new(message))
}

/// Same as [`ask`] but with a help line for optional fields.
pub fn ask_optional(message: &str, help: &str) -> Result<String> {
    prompt_line(Text::new(message).with_help_message(help))
}

fn prompt_line(text: Text<'_>) -> Result<String> {
    match text.prompt() {
        Ok(line) => Ok(line),
        Err(InquireError::OperationCanceled) => Ok(String::new()),
        Err(err) => Err(err.into()),
    }
}

/// Block until the user presses Enter.
pub fn pause() -> Result<()> {
    let _ = ask("Press Enter to return to the main menu")?;
    Ok(())
}

/// Single attempt, no re-prompt: blank cancels, anything that is not a
/// number in `1..=len` is invalid.
pub fn parse_selection(input: &str, len: usize) -> Selection {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Selection::Cancelled;
    }

    match trimmed.parse::<usize>() {
        Ok(n) if (1..=len).contains(&n) => Selection::Chosen(n - 1),
        _ => Selection::Invalid(trimmed.to_string()),
    }
}

/// Non-integer input (including blank) silently falls back to the default
/// result limit.
pub fn parse_limit(input: &str) -> u32 {
    input.trim().parse().unwrap_or(DEFAULT_RESULT_LIMIT)
}

pub fn print_numbered(cities: &[City]) {
    println!();
    for (i, city) in cities.iter().enumerate() {
        println!("{}: {}", i + 1, city.label());
    }
}

/// The weather block shown for a resolved city.
pub fn render_weather(city: &City, weather: &WeatherSnapshot) -> String {
    format!(
        "The current weather in {} is: {}\n\
         Temperature: {}°F\n\
         Temperature (feels like): {}°F\n\
         Windspeed: {} mph\n\
         Humidity: {}%\n\
         Pressure: {} hPa",
        city.label(),
        weather.description,
        weather.temp_f,
        weather.feels_like_f,
        weather.wind_mph,
        weather.humidity_pct,
        weather.pressure_hpa,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_selection_cancels() {
        assert_eq!(parse_selection("", 3), Selection::Cancelled);
        assert_eq!(parse_selection("   ", 3), Selection::Cancelled);
    }

    #[test]
    fn in_range_selection_is_zero_based() {
        assert_eq!(parse_selection("1", 3), Selection::Chosen(0));
        assert_eq!(parse_selection("3", 3), Selection::Chosen(2));
    }

    #[test]
    fn out_of_range_and_non_integer_are_invalid() {
        assert_eq!(parse_selection("0", 3), Selection::Invalid("0".into()));
        assert_eq!(parse_selection("4", 3), Selection::Invalid("4".into()));
        assert_eq!(parse_selection("-1", 3), Selection::Invalid("-1".into()));
        assert_eq!(parse_selection("two", 3), Selection::Invalid("two".into()));
    }

    #[test]
    fn limit_falls_back_to_default_on_bad_input() {
        assert_eq!(parse_limit(""), DEFAULT_RESULT_LIMIT);
        assert_eq!(parse_limit("lots"), DEFAULT_RESULT_LIMIT);
        assert_eq!(parse_limit("3.5"), DEFAULT_RESULT_LIMIT);
        assert_eq!(parse_limit("8"), 8);
        assert_eq!(parse_limit(" 2 "), 2);
    }

    #[test]
    fn weather_block_carries_units() {
        let city = City {
            name: "Erie".into(),
            state: "PA".into(),
            country: "US".into(),
            lat: 42.1,
            lon: -80.08,
        };
        let snapshot = WeatherSnapshot {
            description: "light rain".into(),
            temp_f: 71.2,
            feels_like_f: 70.9,
            wind_mph: 8.1,
            humidity_pct: 77,
            pressure_hpa: 1014.0,
        };

        let block = render_weather(&city, &snapshot);

        assert!(block.starts_with("The current weather in Erie (PA, US) is: light rain"));
        assert!(block.contains("Temperature: 71.2°F"));
        assert!(block.contains("Temperature (feels like): 70.9°F"));
        assert!(block.contains("Windspeed: 8.1 mph"));
        assert!(block.contains("Humidity: 77%"));
        assert!(block.contains("Pressure: 1014 hPa"));
    }
}

use weather_core::WeatherRecord;

const RULE_WIDTH: usize = 50;

pub const UNAVAILABLE: &str = "Не удалось получить данные о погоде";

/// Console block for a lookup result.
pub fn render(weather: Option<&WeatherRecord>) -> String {
    let Some(w) = weather else {
        return format!("  {UNAVAILABLE}");
    };

    let rule = "=".repeat(RULE_WIDTH);
    let mut title = w.city.to_uppercase();
    if let Some(country) = &w.country {
        title = format!("{title}, {country}");
    }

    let mut lines = vec![
        String::new(),
        rule.clone(),
        format!("  ПОГОДА В {title}"),
        rule.clone(),
        format!("  Температура: {}°C", w.temperature),
    ];
    if let Some(feels_like) = w.feels_like {
        lines.push(format!("  Ощущается как: {feels_like}°C"));
    }
    lines.extend([
        format!("  Описание: {}", w.description),
        format!("  Влажность: {}%", w.humidity),
        format!("  Давление: {} {}", w.pressure, w.pressure_unit()),
        format!("  Ветер: {} м/с", w.wind_speed),
        format!("  Время: {}", w.formatted_timestamp()),
        rule,
    ]);

    lines.join("\n")
}

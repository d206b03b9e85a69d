//! Server-rendered HTML for the index page.

use html_escape::{encode_double_quoted_attribute, encode_text};
use weather_core::WeatherRecord;

const STYLE: &str = "body{font-family:sans-serif;max-width:40rem;margin:2rem auto;padding:0 1rem}\
form{display:flex;gap:.5rem}input{flex:1;padding:.4rem}\
.weather{margin-top:1.5rem;padding:1rem;border:1px solid #ccc;border-radius:.5rem}\
.temp{font-size:2.5rem;margin:.2rem 0}.meta{color:#666;font-size:.85rem}";

/// Whole page: search form prefilled with `query`, weather block only when present.
pub fn render(query: &str, weather: Option<&WeatherRecord>) -> String {
    let block = weather.map(weather_block).unwrap_or_default();

    format!(
        "<!DOCTYPE html>\n<html lang=\"ru\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Погода</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <h1>Погода</h1>\n\
         <form method=\"get\" action=\"/\">\n\
         <input type=\"text\" name=\"q\" placeholder=\"Город, например спб\" value=\"{query}\">\n\
         <button type=\"submit\">Показать</button>\n</form>\n\
         {block}</body>\n</html>\n",
        query = encode_double_quoted_attribute(query),
    )
}

fn weather_block(w: &WeatherRecord) -> String {
    let mut title = w.city.clone();
    if let Some(country) = &w.country {
        title = format!("{title}, {country}");
    }

    let feels_like = w
        .feels_like
        .map(|f| format!("<li>Ощущается как: {f}°C</li>\n"))
        .unwrap_or_default();

    format!(
        "<section class=\"weather\">\n\
         <h2>{title}</h2>\n\
         <p class=\"temp\">{temp}°C</p>\n\
         <p>{description}</p>\n<ul>\n{feels_like}\
         <li>Влажность: {humidity}%</li>\n\
         <li>Давление: {pressure} {unit}</li>\n\
         <li>Ветер: {wind} м/с</li>\n</ul>\n\
         <p class=\"meta\">Обновлено {timestamp} · источник: {source}</p>\n\
         </section>\n",
        title = encode_text(&title),
        temp = w.temperature,
        description = encode_text(&w.description),
        humidity = w.humidity,
        pressure = w.pressure,
        unit = w.pressure_unit(),
        wind = w.wind_speed,
        timestamp = w.formatted_timestamp(),
        source = w.source,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_core::provider::mock::MockProvider;

    #[test]
    fn page_without_weather_has_no_block() {
        let html = render("", None);
        assert!(html.contains("<form"));
        assert!(!html.contains("class=\"weather\""));
    }

    #[test]
    fn page_with_weather_shows_block() {
        let record = MockProvider::record_for("Москва");
        let html = render("мск", Some(&record));

        assert!(html.contains("value=\"мск\""));
        assert!(html.contains("<h2>Москва</h2>"));
        assert!(html.contains("22°C"));
        assert!(html.contains("Давление: 1013 гПа"));
        assert!(html.contains("источник: mock"));
    }

    #[test]
    fn user_input_is_escaped() {
        let mut record = MockProvider::record_for("<script>");
        record.description = "a & b".to_string();
        let html = render("\"><script>alert(1)</script>", Some(&record));

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("a &amp; b"));
    }
}

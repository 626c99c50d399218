//! HTML rendering for the weather card and the page that hosts it.
//!
//! All interpolated text goes through Tera's autoescaping. The icon URL uses
//! the `attr_escape` filter instead, which keeps `/` readable in `src`.

use std::{collections::HashMap, fmt::Debug, sync::Arc};

use tera::{Context, Tera, Value};
use thiserror::Error;

use crate::model::WeatherSnapshot;

/// Fragment shown in the container when a lookup fails for any reason.
pub const ERROR_FRAGMENT: &str =
    r#"<p class="text-red-400">Error fetching weather data. Please try again.</p>"#;

const CARD_TEMPLATE: &str = "card.html";
const PAGE_TEMPLATE: &str = "page.html";

mod embedded {
    pub const CARD: &str = r#"<div class="bg-linear-to-b from-30% from-slate-800 to-slate-600 rounded-xl p-6 shadow-lg w-full outline-[0.3px] outline-slate-700">
  <div class="flex justify-between items-start mb-4">
    <div>
      <h2 class="text-2xl font-semibold tracking-tight text-slate-200">{{ city }}, {{ country }}</h2>
      <p class="text-xs text-slate-400">{{ last_updated }}</p>
    </div>
    <img src="{{ icon_url | attr_escape | safe }}" alt="{{ condition }}" class="size-16">
  </div>

  <div class="mb-6">
    <div class="flex items-baseline gap-2">
      <span class="text-5xl font-black text-slate-200">{{ temp_c }}°</span>
      <span class="text-lg text-slate-300">C</span>
    </div>
    <p class="text-slate-300 font-medium mt-2">{{ condition }}</p>
    <p class="text-xs text-slate-400">Feels like {{ feels_like_c }}°</p>
  </div>

  <div class="grid grid-cols-3 gap-2">
    <div class="bg-slate-900/50 rounded-lg p-3">
      <p class="text-xs text-slate-400 mb-1">Humidity</p>
      <p class="text-lg tracking-tighter font-semibold text-white">{{ humidity_pct }}%</p>
    </div>
    <div class="bg-slate-900/50 rounded-lg p-3">
      <p class="text-xs text-slate-400 mb-1">Wind</p>
      <p class="text-lg tracking-tighter font-semibold text-white">{{ wind_kph }} kph</p>
      <p class="text-xs text-slate-400">{{ wind_direction }}</p>
    </div>
    <div class="bg-slate-900/50 rounded-lg p-3">
      <p class="text-xs text-slate-400 mb-1">Cloud</p>
      <p class="text-lg tracking-tighter font-semibold text-white">{{ cloud_pct }}%</p>
    </div>
  </div>
</div>
"#;

    pub const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Weather</title>
</head>
<body class="bg-slate-950 min-h-screen flex items-start justify-center p-6">
  <main class="w-full max-w-md space-y-4">
    <form id="searchCity" class="flex gap-2">
      <input id="cityName" type="text" name="cityName" value="{{ input_value }}" placeholder="Enter a city" class="flex-1 rounded-lg bg-slate-800 px-3 py-2 text-slate-200">
      <button type="submit" class="rounded-lg bg-slate-700 px-4 py-2 text-slate-200">Search</button>
    </form>
    <div id="weatherCardContainer">{{ container | safe }}</div>
  </main>
</body>
</html>
"#;
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to compile template: {0}")]
    Compile(#[source] tera::Error),

    #[error("failed to render template: {0}")]
    Render(#[source] tera::Error),
}

/// Turn the provider's icon reference into an absolute https URL.
///
/// `//host/path` becomes `https://host/path`, absolute http(s) URLs pass
/// through, anything else is taken as host plus path.
pub fn normalize_icon_url(icon: &str) -> String {
    let icon = icon.trim();
    if let Some(rest) = icon.strip_prefix("//") {
        format!("https://{rest}")
    } else if icon.starts_with("https://") || icon.starts_with("http://") {
        icon.to_string()
    } else {
        format!("https://{}", icon.trim_start_matches('/'))
    }
}

fn attr_escape_filter(value: &Value, _: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = tera::try_get_value!("attr_escape", "value", String, value);
    Ok(Value::String(tera::escape_html(&s).replace("&#x2F;", "/")))
}

/// Renders snapshots into card fragments, and fragments into a full page.
#[derive(Clone)]
pub struct CardRenderer {
    tera: Arc<Tera>,
}

impl Debug for CardRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CardRenderer").finish_non_exhaustive()
    }
}

impl CardRenderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".html"]);
        tera.register_filter("attr_escape", attr_escape_filter);

        tera.add_raw_template(CARD_TEMPLATE, embedded::CARD).map_err(RenderError::Compile)?;
        tera.add_raw_template(PAGE_TEMPLATE, embedded::PAGE).map_err(RenderError::Compile)?;

        Ok(Self { tera: Arc::new(tera) })
    }

    pub fn render_card(&self, weather: &WeatherSnapshot) -> Result<String, RenderError> {
        let mut ctx = Context::new();
        ctx.insert("city", &weather.city);
        ctx.insert("country", &weather.country);
        ctx.insert("last_updated", &weather.last_updated);
        ctx.insert("icon_url", &normalize_icon_url(&weather.icon));
        ctx.insert("condition", &weather.condition);
        // Pre-formatted so 10.0 prints as "10", the way the provider sent it.
        ctx.insert("temp_c", &weather.temp_c.to_string());
        ctx.insert("feels_like_c", &weather.feels_like_c.to_string());
        ctx.insert("wind_kph", &weather.wind_kph.to_string());
        ctx.insert("wind_direction", &weather.wind_direction);
        ctx.insert("humidity_pct", &weather.humidity_pct.to_string());
        ctx.insert("cloud_pct", &weather.cloud_pct.to_string());

        self.tera.render(CARD_TEMPLATE, &ctx).map_err(RenderError::Render)
    }

    pub fn render_error(&self) -> String {
        ERROR_FRAGMENT.to_string()
    }

    /// Whole document with the search form. `container_html` must come from
    /// this renderer; it is inserted verbatim.
    pub fn render_page(&self, input_value: &str, container_html: &str) -> Result<String, RenderError> {
        let mut ctx = Context::new();
        ctx.insert("input_value", input_value);
        ctx.insert("container", container_html);

        self.tera.render(PAGE_TEMPLATE, &ctx).map_err(RenderError::Render)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris() -> WeatherSnapshot {
        WeatherSnapshot {
            city: "Paris".into(),
            country: "France".into(),
            last_updated: "2024-01-01 12:00".into(),
            temp_c: 10.0,
            feels_like_c: 8.0,
            wind_kph: 15.0,
            wind_direction: "NW".into(),
            humidity_pct: 60.0,
            cloud_pct: 20.0,
            condition: "Cloudy".into(),
            icon: "//cdn/64.png".into(),
        }
    }

    fn renderer() -> CardRenderer {
        CardRenderer::new().expect("embedded templates compile")
    }

    #[test]
    fn card_shows_all_values_unconverted() {
        let html = renderer().render_card(&paris()).expect("render");

        assert!(html.contains("Paris, France"));
        assert!(html.contains("2024-01-01 12:00"));
        assert!(html.contains("10°"));
        assert!(html.contains("Feels like 8°"));
        assert!(html.contains(">Cloudy<"));
        assert!(html.contains("60%"));
        assert!(html.contains("15 kph"));
        assert!(html.contains(">NW<"));
        assert!(html.contains("20%"));
        assert!(html.contains(r#"src="https://cdn/64.png""#));
        assert!(html.contains(r#"alt="Cloudy""#));
    }

    #[test]
    fn fractional_values_keep_their_digits() {
        let mut snap = paris();
        snap.temp_c = 10.5;
        snap.feels_like_c = -2.3;
        snap.wind_kph = 7.2;

        let html = renderer().render_card(&snap).expect("render");
        assert!(html.contains("10.5°"));
        assert!(html.contains("Feels like -2.3°"));
        assert!(html.contains("7.2 kph"));
    }

    #[test]
    fn percentages_sent_as_floats_render_like_integers() {
        let mut snap = paris();
        snap.humidity_pct = 60.0;
        snap.cloud_pct = 12.5;

        let html = renderer().render_card(&snap).expect("render");
        assert!(html.contains(">60%<"));
        assert!(html.contains(">12.5%<"));
    }

    #[test]
    fn provider_text_is_escaped() {
        let mut snap = paris();
        snap.city = "<script>alert(1)</script>".into();
        snap.condition = r#"Sunny" onerror="alert(1)"#.into();
        snap.icon = r#"//cdn/x.png" onload="alert(1)"#.into();

        let html = renderer().render_card(&snap).expect("render");

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains(r#"" onerror=""#));
        assert!(!html.contains(r#"" onload=""#));
        assert!(html.contains("&quot; onload=&quot;"));
    }

    #[test]
    fn icon_src_escapes_markup_but_keeps_slashes() {
        let mut snap = paris();
        snap.icon = "//cdn/64.png?a=1&b='2'".into();

        let html = renderer().render_card(&snap).expect("render");
        assert!(html.contains(r#"src="https://cdn/64.png?a=1&amp;b=&#x27;2&#x27;""#));
    }

    #[test]
    fn icon_url_normalization() {
        assert_eq!(normalize_icon_url("//cdn/64.png"), "https://cdn/64.png");
        assert_eq!(
            normalize_icon_url("//cdn.weatherapi.com/weather/64x64/day/116.png"),
            "https://cdn.weatherapi.com/weather/64x64/day/116.png"
        );
        assert_eq!(normalize_icon_url("https://cdn/64.png"), "https://cdn/64.png");
        assert_eq!(normalize_icon_url("http://cdn/64.png"), "http://cdn/64.png");
        assert_eq!(normalize_icon_url("cdn/64.png"), "https://cdn/64.png");
        assert_eq!(normalize_icon_url("/cdn/64.png"), "https://cdn/64.png");
    }

    #[test]
    fn error_fragment_is_fixed_text() {
        assert_eq!(
            renderer().render_error(),
            r#"<p class="text-red-400">Error fetching weather data. Please try again.</p>"#
        );
    }

    #[test]
    fn page_embeds_container_and_escapes_input() {
        let r = renderer();
        let card = r.render_card(&paris()).expect("render");
        let page = r.render_page(r#"Lyon" autofocus="#, &card).expect("page");

        assert!(page.contains(r#"<form id="searchCity""#));
        assert!(page.contains(r#"id="cityName""#));
        assert!(page.contains(r#"<div id="weatherCardContainer">"#));
        assert!(page.contains(&card));
        assert!(page.contains("Lyon&quot; autofocus="));
    }

    #[test]
    fn empty_page_has_empty_container() {
        let page = renderer().render_page("", "").expect("page");
        assert!(page.contains(r#"<div id="weatherCardContainer"></div>"#));
        assert!(page.contains(r#"value="""#));
    }
}

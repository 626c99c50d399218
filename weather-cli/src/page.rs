use std::{fs, path::PathBuf};

use anyhow::Context;
use tracing::{debug, error};
use weather_core::{CardRenderer, View};

/// In-memory stand-in for the browser page: the `cityName` input and the
/// `weatherCardContainer` element. With an output path set, every container
/// replacement rewrites the page on disk.
#[derive(Debug)]
pub struct PageView {
    input: String,
    container: String,
    output: Option<PathBuf>,
    renderer: CardRenderer,
}

impl PageView {
    pub fn new(renderer: CardRenderer, output: Option<PathBuf>) -> Self {
        Self { input: String::new(), container: String::new(), output, renderer }
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    /// Write the current page to the output path, if there is one.
    pub fn write_page(&self) -> anyhow::Result<()> {
        let Some(path) = &self.output else {
            return Ok(());
        };

        let html = self.renderer.render_page(&self.input, &self.container)?;
        fs::write(path, html)
            .with_context(|| format!("Failed to write page: {}", path.display()))?;
        debug!(path = %path.display(), "page written");
        Ok(())
    }
}

impl View for PageView {
    fn input_value(&self) -> String {
        self.input.clone()
    }

    fn set_input(&mut self, value: &str) {
        self.input = value.to_string();
    }

    fn replace_container(&mut self, html: String) {
        self.container = html;
        if let Err(e) = self.write_page() {
            error!(error = %format!("{e:#}"), "could not update page file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> CardRenderer {
        CardRenderer::new().expect("templates")
    }

    #[test]
    fn replace_container_drops_previous_content() {
        let mut view = PageView::new(renderer(), None);
        view.replace_container("<p>one</p>".into());
        view.replace_container("<p>two</p>".into());

        assert_eq!(view.container(), "<p>two</p>");
    }

    #[test]
    fn replace_container_rewrites_page_file() {
        let path = std::env::temp_dir().join(format!("weather-page-{}.html", std::process::id()));
        let mut view = PageView::new(renderer(), Some(path.clone()));

        view.set_input("Paris");
        view.replace_container("<p>card</p>".into());

        let html = fs::read_to_string(&path).expect("page written");
        let _ = fs::remove_file(&path);

        assert!(html.contains(r#"<div id="weatherCardContainer"><p>card</p></div>"#));
        assert!(html.contains(r#"value="Paris""#));
    }
}

//! Submit handling: read the input, fetch, render, update the view.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, error, warn};

use crate::{
    model::WeatherRequest,
    provider::WeatherProvider,
    render::{CardRenderer, RenderError},
};

/// The UI surface a [`Controller`] drives: one text input and one container.
pub trait View: Send {
    fn input_value(&self) -> String;

    fn set_input(&mut self, value: &str);

    fn clear_input(&mut self) {
        self.set_input("");
    }

    /// Drop whatever the container holds and put `html` in its place.
    fn replace_container(&mut self, html: String);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Input was blank; nothing was requested or changed.
    Ignored,
    Rendered,
    /// The error fragment replaced the container.
    Failed,
    /// A later submission started before this one finished; its result was dropped.
    Superseded,
}

#[derive(Debug)]
pub struct Controller<V> {
    provider: Arc<dyn WeatherProvider>,
    renderer: CardRenderer,
    view: Mutex<V>,
    latest_request: AtomicU64,
}

impl<V: View> Controller<V> {
    pub fn new(provider: Arc<dyn WeatherProvider>, view: V) -> Result<Self, RenderError> {
        Ok(Self::with_renderer(provider, CardRenderer::new()?, view))
    }

    pub fn with_renderer(provider: Arc<dyn WeatherProvider>, renderer: CardRenderer, view: V) -> Self {
        Self { provider, renderer, view: Mutex::new(view), latest_request: AtomicU64::new(0) }
    }

    pub async fn view(&self) -> MutexGuard<'_, V> {
        self.view.lock().await
    }

    pub fn into_view(self) -> V {
        self.view.into_inner()
    }

    /// Handle one form submission.
    ///
    /// The view is not locked while the request is in flight, so submissions
    /// may overlap. Only the most recent one is allowed to touch the view.
    pub async fn submit(&self) -> SubmitOutcome {
        // The id is taken under the view lock so id order matches input order.
        let (id, request) = {
            let view = self.view.lock().await;
            let Some(request) = WeatherRequest::from_input(&view.input_value()) else {
                return SubmitOutcome::Ignored;
            };
            (self.latest_request.fetch_add(1, Ordering::SeqCst) + 1, request)
        };

        debug!(id, query = %request.query, "submitting weather lookup");

        let result = self.provider.get_weather(&request).await;

        let mut view = self.view.lock().await;
        let latest = self.latest_request.load(Ordering::SeqCst);
        if latest != id {
            warn!(id, latest, query = %request.query, "dropping stale weather response");
            return SubmitOutcome::Superseded;
        }

        let rendered = match result {
            Ok(snapshot) => self.renderer.render_card(&snapshot).map_err(anyhow::Error::from),
            Err(e) => Err(anyhow::Error::from(e)),
        };

        match rendered {
            Ok(html) => {
                view.replace_container(html);
                view.clear_input();
                SubmitOutcome::Rendered
            }
            Err(e) => {
                error!(id, query = %request.query, error = %format!("{e:#}"), "weather lookup failed");
                view.replace_container(self.renderer.render_error());
                SubmitOutcome::Failed
            }
        }
    }
}

// Application state for HTTP handlers
use crate::application::plot_service::PlotService;

#[derive(Clone)]
pub struct AppState {
    pub plot_service: PlotService,
}

// Application layer - plot reduction pipeline and the services around it
pub mod axes;
pub mod measurement_source;
pub mod plot_reducer;
pub mod plot_service;
pub mod refresh;
pub mod series;

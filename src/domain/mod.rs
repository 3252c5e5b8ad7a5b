// Domain layer - measurement and plot models
pub mod measurement;
pub mod palette;
pub mod plot;

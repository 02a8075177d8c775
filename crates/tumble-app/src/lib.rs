/// Terminal front-end for tumble: CLI, event loop, hot reload and the
/// headless text output.
pub mod app;
pub mod cli;
pub mod headless;
pub mod hotreload;

use crate::app::App;

mod app;
mod components;
mod config;
mod logging;
mod services;
mod toast;
mod tops_sheet;

fn main() {
    logging::init(config::app_config().log_level);
    log::info!("starting template editor client");
    yew::Renderer::<App>::new().render();
}

mod handlers;
mod main_menu;
mod review;

pub use main_menu::show_main_menu;

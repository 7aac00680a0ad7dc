mod images;
mod not_found;
mod ping;

pub use images::handler as image_handler;
pub use not_found::not_found_handler;
pub use ping::handler as ping_handler;

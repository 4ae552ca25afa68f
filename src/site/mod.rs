mod build;
mod render;
mod route;

pub use build::{BuildResult, build_site, write_site};
pub use render::{render_episode, render_index, render_not_found};
pub use route::{Page, resolve_route};

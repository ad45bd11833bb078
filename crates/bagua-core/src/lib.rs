pub mod bagua;
pub mod camera;
pub mod config;
pub mod constants;
pub mod elastic;
pub mod error;
pub mod interaction;
pub mod models;
pub mod oracle;
pub mod parallax;
pub mod particles;
pub mod sampler;
pub mod sound;
pub mod ticker;

pub static PARTICLES_WGSL: &str = include_str!("../shaders/particles.wgsl");
pub static RINGS_WGSL: &str = include_str!("../shaders/rings.wgsl");

pub use bagua::*;
pub use camera::*;
pub use config::*;
pub use elastic::*;
pub use error::*;
pub use interaction::*;
pub use models::*;
pub use oracle::*;
pub use parallax::*;
pub use particles::*;
pub use sampler::*;
pub use sound::*;
pub use ticker::*;

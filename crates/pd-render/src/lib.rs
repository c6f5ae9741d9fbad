pub mod camera;
pub mod frame;
pub mod hit;
pub mod paint;
pub mod scene;

pub use camera::{Camera, Ray, Viewport};
pub use frame::{DrawCmd, Frame, RenderStyle, Renderer, TextAlign};
pub use hit::{HitTarget, Intersection, hit_test, raycast};
pub use scene::{Caption, Handle, HandleKind, Scene, Shape};

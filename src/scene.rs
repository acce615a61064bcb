pub mod camera;
pub mod context;
pub mod graph;
pub mod light;
pub mod loader;
pub mod mesh;
pub mod node;
pub mod ray;
pub mod transform;

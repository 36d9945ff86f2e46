pub mod assets;
pub mod building;
pub mod camera;
pub mod grid;
pub mod pathfinding;
pub mod reset;
pub mod roads;
pub mod worker;

pub use assets::AssetsPlugin;
pub use building::BuildingPlugin;
pub use camera::CameraPlugin;
pub use grid::GridPlugin;
pub use reset::ResetPlugin;
pub use roads::RoadPlugin;
pub use worker::WorkerPlugin;

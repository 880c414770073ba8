//! A small 2D rigid body physics engine.
//!
//! Bodies with circle or convex polygon shapes live in a [`World`],
//! which moves them under gravity and external forces
//! and resolves collisions between them with impulses.
//!
//! Enable the `tracy` feature and start a `tracy_client::Client`
//! to see profiling spans of each update.

/// Start a profiling span that ends when the returned value is dropped.
/// Does nothing unless the `tracy` feature is enabled and a client is running.
macro_rules! tracy_span {
    ($name:literal, $fn_name:literal) => {{
        #[cfg(feature = "tracy")]
        let span = tracy_client::Client::running()
            .map(|client| client.span_alloc(Some($name), $fn_name, file!(), line!(), 0));
        #[cfg(not(feature = "tracy"))]
        let span = ();
        span
    }};
}

pub mod math;
pub use math::{uv, Unit, Vec2};

pub mod physics;
pub use physics::{
    collision::{self, query, BroadPhase},
    Body, BodyKey, BodySet, BodyType, CollisionGroup, CollisionHandler, CollisionManager,
    Contact, Polygon, Shape, ShapeError, ShapeKind, World, WorldParams,
};

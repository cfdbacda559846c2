pub mod assignment;
pub mod course;
pub mod user;

/// Liveness probe.
pub async fn health() -> &'static str {
    "ok"
}

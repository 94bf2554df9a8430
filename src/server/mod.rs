mod assets;
mod routes;

pub use routes::{
    ApiError, AppState, ExpandedFlag, ExpansionState, ServeOptions, router, serve,
};

//! Inkbook studio scheduler - integration test support.
//!
//! This crate re-exports the workspace crates so integration tests can use
//! `inkbook_test::` paths.

pub mod component {
    pub use inkbook_service::{client, error, scheduling};

    pub mod store {
        pub use inkbook_app::store_handler::StoreProviderHandler;
        pub use inkbook_service::store::*;
    }

    pub mod db {
        pub use inkbook_db::db::*;
    }

    pub mod model {
        pub use inkbook_db::model::*;
    }

    pub mod config {
        pub use inkbook_app::config::ConfigHandler;
        pub use inkbook_core::config::*;
    }
}

pub mod app {
    pub use inkbook_app::*;

    pub mod api {
        pub use inkbook_app::app::api::*;
    }
}

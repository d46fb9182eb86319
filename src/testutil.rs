//! Shared test helpers for in-crate router tests.

use std::sync::Arc;
use std::time::Duration;

use crate::catalog::Catalog;
use crate::config::{Config, NodeConfig, PubsubConfig};
use crate::AppState;

/// Create a test AppState with a catalog in a temporary directory.
pub fn test_state(temp_dir: &tempfile::TempDir) -> Arc<AppState> {
    let data_dir = temp_dir.path().join("data");

    let config = Config {
        node: NodeConfig {
            bind_address: "127.0.0.1:0".to_string(),
            data_dir: data_dir.to_string_lossy().to_string(),
        },
        pubsub: PubsubConfig {
            ack_deadline: Duration::from_secs(5),
            max_message_size: 1024 * 1024,
        },
        project_id: "test-project".to_string(),
        test_mode: true,
    };

    let catalog = Catalog::open(&data_dir).expect("Failed to open test catalog");

    Arc::new(AppState::new(config, catalog))
}

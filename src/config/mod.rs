pub mod schema;

#[allow(unused_imports)]
pub use schema::{
    ChatConfig, Config, DatabaseConfig, DatasetsConfig, GatewayConfig, RoutingConfig,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reexported_config_default_is_constructible() {
        let config = Config::default();

        assert!(!config.database.url.is_empty());
        assert!(!config.chat.model.is_empty());
        assert!(config.chat.temperature > 0.0);
    }
}

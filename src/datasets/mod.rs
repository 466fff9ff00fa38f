//! Ecological observation datasets.
//!
//! Each provider implements [`ObservationProvider`] and is registered in the
//! factory function [`create_provider`] by its canonical string key.

pub mod ebird;
pub mod inaturalist;
pub mod traits;

pub use ebird::EBirdProvider;
pub use inaturalist::INaturalistProvider;
pub use traits::{
    BoundingBox, DatasetError, DateRange, Observation, ObservationProvider,
};

/// Factory: create an observation provider by canonical name.
///
/// `api_key` is required for eBird and ignored by iNaturalist.
pub fn create_provider(
    name: &str,
    api_key: Option<&str>,
) -> Result<Box<dyn ObservationProvider>, DatasetError> {
    match name.trim().to_lowercase().as_str() {
        "inaturalist" => Ok(Box::new(INaturalistProvider::new())),
        "ebird" => match api_key {
            Some(key) if !key.trim().is_empty() => Ok(Box::new(EBirdProvider::new(key.trim()))),
            _ => Err(DatasetError::MissingApiKey("eBird")),
        },
        _ => Err(DatasetError::UnknownProvider(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factory_inaturalist_needs_no_key() {
        let provider = create_provider("inaturalist", None).unwrap();
        assert_eq!(provider.source(), "iNaturalist");
    }

    #[test]
    fn factory_ebird_requires_key() {
        assert!(matches!(
            create_provider("ebird", None),
            Err(DatasetError::MissingApiKey("eBird"))
        ));
        assert!(matches!(
            create_provider("ebird", Some("   ")),
            Err(DatasetError::MissingApiKey("eBird"))
        ));

        let provider = create_provider("ebird", Some("key")).unwrap();
        assert_eq!(provider.source(), "eBird");
    }

    #[test]
    fn factory_is_case_insensitive() {
        assert!(create_provider("iNaturalist", None).is_ok());
        assert!(create_provider("EBIRD", Some("key")).is_ok());
    }

    #[test]
    fn factory_unknown_provider_errors() {
        let err = create_provider("gbif", None).unwrap_err();
        assert!(err.to_string().contains("gbif"));
    }
}

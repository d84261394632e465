//! The registry of atmospheric monitoring sites retrievals are run for.

use crate::types::site::Site;

/// Immutable lookup table of monitoring sites, keyed by site code.
///
/// The built-in registry carries the nine AGAGE monitoring sites the system
/// was built around; [`SiteRegistry::from_sites`] exists for running against
/// a different set. Iteration order is declaration order and is stable.
#[derive(Debug, Clone)]
pub struct SiteRegistry {
    sites: Vec<Site>,
}

impl SiteRegistry {
    /// The nine built-in monitoring sites.
    pub fn builtin() -> Self {
        Self::from_sites(vec![
            Site::new("MHD", "Mace Head, Ireland", 53.3267, -9.9046),
            Site::new("RPB", "Ragged Point, Barbados", 13.1651, -59.4321),
            Site::new("CGO", "Cape Grim, Australia", -40.6833, 144.6894),
            Site::new("GSN", "Gosan, South Korea", 33.2924, 126.1616),
            Site::new("JFJ", "Jungfraujoch, Switzerland", 46.547767, 7.985883),
            Site::new("CMN", "Monte Cimone, Italy", 44.1932, 10.7014),
            Site::new("THD", "Trinidad Head, USA", 41.0541, -124.151),
            Site::new("ZEP", "Zeppelin, Svalbard", 78.9072, 11.8867),
            Site::new("SMO", "Cape Matatula, American Samoa", -14.2474, -170.5644),
        ])
    }

    /// Builds a registry from an arbitrary site list, in the given order.
    pub fn from_sites(sites: Vec<Site>) -> Self {
        Self { sites }
    }

    /// Looks a site up by its code. `None` when the code is not registered.
    pub fn get(&self, code: &str) -> Option<&Site> {
        self.sites.iter().find(|site| site.code == code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Site> {
        self.sites.iter()
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_nine_sites() {
        let registry = SiteRegistry::builtin();
        assert_eq!(registry.len(), 9);
        assert!(!registry.is_empty());
    }

    #[test]
    fn lookup_by_code() {
        let registry = SiteRegistry::builtin();
        let mhd = registry.get("MHD").unwrap();
        assert_eq!(mhd.name, "Mace Head, Ireland");
        assert!((mhd.latitude - 53.3267).abs() < 1e-9);
        assert!((mhd.longitude - -9.9046).abs() < 1e-9);
    }

    #[test]
    fn unknown_code_is_none() {
        assert!(SiteRegistry::builtin().get("XYZ").is_none());
        assert!(SiteRegistry::builtin().get("mhd").is_none());
    }

    #[test]
    fn iteration_order_is_stable() {
        let codes: Vec<_> = SiteRegistry::builtin()
            .iter()
            .map(|s| s.code.clone())
            .collect();
        assert_eq!(
            codes,
            ["MHD", "RPB", "CGO", "GSN", "JFJ", "CMN", "THD", "ZEP", "SMO"]
        );
    }

    #[test]
    fn custom_registry() {
        let registry = SiteRegistry::from_sites(vec![Site::new("TST", "Test Site", 1.0, 2.0)]);
        assert_eq!(registry.len(), 1);
        assert!(registry.get("TST").is_some());
        assert!(registry.get("MHD").is_none());
    }
}

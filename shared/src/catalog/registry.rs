//! Catalog selection by (API, device family)
//!
//! Counter definitions differ per graphics API and hardware generation. The
//! registry maps each supported pair to its catalog so a scheduler can be
//! created for a given context without knowing which tables back it.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{CatalogFile, StaticCatalog};
use crate::error::{CatalogError, CatalogResult};

/// Graphics or compute API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Api {
    #[serde(rename = "dx11", alias = "directx11")]
    DirectX11,
    #[serde(rename = "dx12", alias = "directx12")]
    DirectX12,
    #[serde(rename = "gl", alias = "opengl")]
    OpenGl,
    #[serde(rename = "cl", alias = "opencl")]
    OpenCl,
    #[serde(rename = "vulkan", alias = "vk")]
    Vulkan,
}

impl std::str::FromStr for Api {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dx11" | "directx11" => Ok(Api::DirectX11),
            "dx12" | "directx12" => Ok(Api::DirectX12),
            "gl" | "opengl" => Ok(Api::OpenGl),
            "cl" | "opencl" => Ok(Api::OpenCl),
            "vk" | "vulkan" => Ok(Api::Vulkan),
            _ => Err(CatalogError::InvalidName {
                kind: "API",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Api::DirectX11 => "dx11",
            Api::DirectX12 => "dx12",
            Api::OpenGl => "gl",
            Api::OpenCl => "cl",
            Api::Vulkan => "vulkan",
        };
        f.write_str(name)
    }
}

/// Hardware generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceFamily {
    Gfx8,
    Gfx9,
    Gfx10,
}

impl std::str::FromStr for DeviceFamily {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gfx8" => Ok(DeviceFamily::Gfx8),
            "gfx9" => Ok(DeviceFamily::Gfx9),
            "gfx10" => Ok(DeviceFamily::Gfx10),
            _ => Err(CatalogError::InvalidName {
                kind: "device family",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for DeviceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DeviceFamily::Gfx8 => "gfx8",
            DeviceFamily::Gfx9 => "gfx9",
            DeviceFamily::Gfx10 => "gfx10",
        };
        f.write_str(name)
    }
}

/// Catalogs keyed by (API, device family)
#[derive(Debug, Clone, Default)]
pub struct CatalogRegistry {
    catalogs: HashMap<(Api, DeviceFamily), Arc<StaticCatalog>>,
}

impl CatalogRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a catalog, replacing any previous one for the same context
    pub fn register(&mut self, api: Api, family: DeviceFamily, catalog: StaticCatalog) {
        info!("Registered catalog for {} on {}", api, family);
        self.catalogs.insert((api, family), Arc::new(catalog));
    }

    /// Register a catalog file that declares its own API and family
    pub fn register_file(&mut self, file: CatalogFile) -> CatalogResult<()> {
        let (api, family) = file.context().ok_or_else(|| CatalogError::InvalidName {
            kind: "catalog context",
            value: "file must declare both api and family".to_string(),
        })?;
        let catalog = file.into_catalog()?;
        self.register(api, family, catalog);
        Ok(())
    }

    /// Catalog for a context
    pub fn select(&self, api: Api, family: DeviceFamily) -> CatalogResult<Arc<StaticCatalog>> {
        self.catalogs
            .get(&(api, family))
            .cloned()
            .ok_or_else(|| CatalogError::UnsupportedContext {
                api: api.to_string(),
                family: family.to_string(),
            })
    }

    /// Registered contexts, sorted for stable output
    pub fn contexts(&self) -> Vec<(Api, DeviceFamily)> {
        let mut contexts: Vec<_> = self.catalogs.keys().copied().collect();
        contexts.sort_by_key(|(api, family)| (api.to_string(), family.to_string()));
        contexts
    }
}
